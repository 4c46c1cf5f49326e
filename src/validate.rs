//! Best-effort pre-flight checks on server source.
//!
//! Purely lexical substring probes, same tolerance policy as the
//! extractors: findings are advisory strings, never errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declaration style detected in a piece of server source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerStyle {
    /// FastMCP decorators on plain functions.
    FastMcp,
    /// Classic `mcp.server` style with explicit `Tool(...)` declarations.
    Classic,
    Unknown,
}

impl fmt::Display for ServerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerStyle::FastMcp => write!(f, "fastmcp"),
            ServerStyle::Classic => write!(f, "classic"),
            ServerStyle::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classify the declaration style of the given source.
pub fn detect_style(code: &str) -> ServerStyle {
    if code.contains("FastMCP") || code.contains("@mcp.tool()") {
        ServerStyle::FastMcp
    } else if code.contains("from mcp.server import Server") || code.contains("@server.list_tools()")
    {
        ServerStyle::Classic
    } else {
        ServerStyle::Unknown
    }
}

/// Check source for the markers its declaration style is expected to have.
/// Returns one human-readable finding per missing marker; an empty vector
/// means nothing looked wrong.
pub fn validate(code: &str) -> Vec<String> {
    let mut findings = Vec::new();

    match detect_style(code) {
        ServerStyle::FastMcp => {
            if !code.contains("FastMCP(") {
                findings.push("No FastMCP instance found".to_string());
            }
            let has_decorators = code.contains("@mcp.tool()")
                || code.contains("@mcp.resource(")
                || code.contains("@mcp.prompt(");
            if !has_decorators {
                findings.push("No @mcp decorators found (tool, resource, or prompt)".to_string());
            }
        }
        ServerStyle::Classic => {
            if !code.contains("Server(") {
                findings.push("No Server instance found".to_string());
            }
            if !code.contains("@server.list_tools()") && !code.contains(".list_tools()") {
                findings.push("Missing @server.list_tools() decorator".to_string());
            }
            if !code.contains("@server.call_tool()") && !code.contains(".call_tool()") {
                findings.push("Missing @server.call_tool() decorator".to_string());
            }
            if !code.contains("Tool(") {
                findings.push("No Tool definitions found".to_string());
            }
        }
        ServerStyle::Unknown => {
            findings.push(
                "No MCP server pattern detected. Use FastMCP or classic MCP style.".to_string(),
            );
        }
    }

    findings
}
