//! Lexical extraction of MCP declaration metadata from raw server source.
//!
//! This crate implements:
//! - Balanced-delimiter and quoted-string scanning primitives (`scan`)
//! - Extraction of classic `Tool(...)` declarations into normalized
//!   descriptors (`extract`)
//! - Lexical extraction of FastMCP decorator declarations: tools,
//!   resources and prompts (`extract::fastmcp`)
//! - Declaration-style detection and advisory validation (`validate`)
//!
//! The host hands in source text and gets back descriptor lists or their
//! JSON serialization; nothing here executes the source, touches the file
//! system, or keeps state between calls. The scanners are deliberately
//! tolerant: malformed input degrades to omitted or defaulted fields, not
//! to errors.


pub mod extract;
pub mod scan;
pub mod types;
pub mod validate;

pub use extract::fastmcp::extract_definitions;
pub use extract::extract_tools;
pub use types::{
    Extraction, PromptArgument, PromptDescriptor, ResourceDescriptor, ScanError,
    ServerDefinitions, ToolDescriptor,
};
pub use validate::{detect_style, validate, ServerStyle};
