use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Placeholder used when a tool declaration carries no usable description.
pub const NO_DESCRIPTION: &str = "No description";

/// MIME type assumed for resources that do not declare one.
pub const DEFAULT_MIME_TYPE: &str = "text/plain";

/// Schema substituted when a tool declares no `inputSchema`, or when the
/// declared schema block fails to parse as JSON.
pub fn default_input_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

/// Errors surfaced to the host. Scanning itself never fails; only turning a
/// result back into a JSON document can.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Failed to serialize scan result: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A tool declaration recovered from source text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// A resource declaration recovered from FastMCP-style source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// One argument of a prompt template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// A prompt template declaration recovered from FastMCP-style source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptDescriptor {
    pub name: String,
    pub description: String,
    pub arguments: Vec<PromptArgument>,
}

/// Result of scanning for classic `Tool(` declarations.
///
/// Serializes to exactly `{"success": true, "tools": [...]}` with tools in
/// textual order of appearance. The name index is a lookup convenience for
/// the host and is never serialized; for duplicate names the index points at
/// the last occurrence while the list keeps every one.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub success: bool,
    pub tools: Vec<ToolDescriptor>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Extraction {
    pub(crate) fn new() -> Self {
        Self {
            success: true,
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub(crate) fn push(&mut self, tool: ToolDescriptor) {
        self.index.insert(tool.name.clone(), self.tools.len());
        self.tools.push(tool);
    }

    /// Look up a tool by name. When the same name was declared more than
    /// once, the last declaration wins.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Serialize to the JSON document handed back to the host.
    pub fn to_json(&self) -> Result<String, ScanError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Result of scanning FastMCP-style source for decorator declarations.
#[derive(Debug, Clone, Serialize)]
pub struct ServerDefinitions {
    pub success: bool,
    pub tools: Vec<ToolDescriptor>,
    pub resources: Vec<ResourceDescriptor>,
    pub prompts: Vec<PromptDescriptor>,
}

impl ServerDefinitions {
    pub(crate) fn new() -> Self {
        Self {
            success: true,
            tools: Vec::new(),
            resources: Vec::new(),
            prompts: Vec::new(),
        }
    }

    /// True when the scan found no declarations of any kind.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.resources.is_empty() && self.prompts.is_empty()
    }

    /// Serialize to the JSON document handed back to the host.
    pub fn to_json(&self) -> Result<String, ScanError> {
        Ok(serde_json::to_string(self)?)
    }
}
