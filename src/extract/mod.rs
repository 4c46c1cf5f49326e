//! Extraction drivers that turn raw server source into declaration lists.
//!
//! `extract_tools` handles the classic style, where tools are declared as
//! `Tool(name=..., description=..., inputSchema={...})` constructor calls.
//! FastMCP decorator style lives in [`fastmcp`].

pub mod fastmcp;

use crate::scan::{extract_json_block, find_string_value, matching_span};
use crate::types::{default_input_schema, Extraction, ToolDescriptor, NO_DESCRIPTION};
use tracing::{debug, trace};

const TOOL_CALL: &str = "Tool(";

/// Scan source text for classic `Tool(...)` declarations.
///
/// Every occurrence of `Tool(` is delimited to its balanced parenthesis
/// span and mined for the `name` and `description` string arguments and the
/// `inputSchema` JSON block. Spans without a usable name are dropped
/// silently; a missing description gets a placeholder and a missing or
/// unparsable schema gets the default object schema.
///
/// If a span never balances before the end of the text, the scan stops
/// there: tools found earlier are kept, anything after the broken span is
/// not examined. A schema block that fails the same way only costs that one
/// schema. The `success` flag on the result is always true and carries no
/// status; it exists for shape compatibility with the host contract.
pub fn extract_tools(code: &str) -> Extraction {
    let mut result = Extraction::new();

    let mut pos = 0;
    while let Some(found) = code[pos..].find(TOOL_CALL) {
        let call_start = pos + found;
        // The opening parenthesis is the last byte of the matched text.
        let open = call_start + TOOL_CALL.len() - 1;

        let Some(span_end) = matching_span(code, open, b'(', b')') else {
            debug!("Unterminated Tool( span at byte {}, aborting scan", call_start);
            break;
        };
        let block = &code[call_start..span_end];
        pos = span_end;

        let name = match find_string_value(block, "name") {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                trace!("Tool( span at byte {} has no name, dropped", call_start);
                continue;
            }
        };

        let description = match find_string_value(block, "description") {
            Some(desc) if !desc.is_empty() => desc.to_string(),
            _ => NO_DESCRIPTION.to_string(),
        };

        let input_schema = extract_json_block(block, "inputSchema")
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_else(default_input_schema);

        trace!("Extracted tool declaration: {}", name);
        result.push(ToolDescriptor {
            name,
            description,
            input_schema,
        });
    }

    debug!("Tool extraction finished with {} tool(s)", result.tools.len());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn test_single_well_formed_tool() {
        let code = r#"Tool(name="ping", description="Pings", inputSchema={"type":"object","properties":{"host":{"type":"string"}},"required":["host"]})"#;

        let result = extract_tools(code);
        assert!(result.success);
        assert_eq!(result.tools.len(), 1);
        assert_eq!(result.tools[0].name, "ping");
        assert_eq!(result.tools[0].description, "Pings");
        assert_eq!(
            result.tools[0].input_schema,
            json!({
                "type": "object",
                "properties": { "host": { "type": "string" } },
                "required": ["host"]
            })
        );
    }

    #[test]
    fn test_multiple_tools_in_source_order() {
        let code = r#"
tools = [
    Tool(name="alpha", description="First", inputSchema={"type":"object"}),
    Tool(name="beta", description="Second", inputSchema={"type":"object"}),
    Tool(name="gamma", description="Third", inputSchema={"type":"object"}),
]
"#;

        let result = extract_tools(code);
        let names: Vec<&str> = result.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_span_without_name_is_dropped() {
        let code = r#"
Tool(description="nameless"),
Tool(name="kept", description="ok"),
"#;

        let result = extract_tools(code);
        assert_eq!(result.tools.len(), 1);
        assert_eq!(result.tools[0].name, "kept");
    }

    #[test]
    fn test_empty_name_is_dropped() {
        let code = r#"Tool(name="", description="blank name")"#;
        assert!(extract_tools(code).tools.is_empty());
    }

    #[test]
    fn test_missing_description_gets_placeholder() {
        let code = r#"Tool(name="bare")"#;

        let result = extract_tools(code);
        assert_eq!(result.tools[0].description, NO_DESCRIPTION);
    }

    #[test]
    fn test_missing_schema_gets_default() {
        let code = r#"Tool(name="bare", description="no schema")"#;

        let result = extract_tools(code);
        assert_eq!(result.tools[0].input_schema, default_input_schema());
    }

    #[test]
    fn test_unparsable_schema_gets_default() {
        let code = r#"Tool(name="bad", inputSchema={not json at all})"#;

        let result = extract_tools(code);
        assert_eq!(result.tools.len(), 1);
        assert_eq!(result.tools[0].input_schema, default_input_schema());
    }

    #[test]
    fn test_unbalanced_schema_only_costs_that_schema() {
        // The brace span never closes inside the balanced call span, so the
        // schema falls back but the tool itself survives, as does the next
        // tool.
        let code = "Tool(name=\"a\", inputSchema=)\nTool(name=\"b\")";

        let result = extract_tools(code);
        assert_eq!(result.tools.len(), 2);
        assert_eq!(result.tools[0].input_schema, default_input_schema());
    }

    #[test]
    fn test_unterminated_call_span_truncates_scan() {
        let code = r#"
Tool(name="before", description="fine"),
Tool(name="broken", description="never closes"
"#;

        let result = extract_tools(code);
        assert!(result.success);
        assert_eq!(result.tools.len(), 1);
        assert_eq!(result.tools[0].name, "before");
    }

    #[test]
    fn test_tools_after_unterminated_span_are_lost() {
        // The hard stop also swallows later spans that would have been
        // valid on their own.
        let code = "Tool(name=\"broken\"\nTool(name=\"valid\", description=\"d\")";

        // The first span never balances... except the second Tool's parens
        // balance it. Character counting only: the `(` of the second Tool(
        // nests and its `)` brings the first span back to depth 1, so the
        // whole text is one unterminated span.
        let result = extract_tools(code);
        assert!(result.tools.is_empty());
    }

    #[test]
    fn test_duplicate_names_list_keeps_all_index_keeps_last() {
        let code = r#"
Tool(name="dup", description="first"),
Tool(name="dup", description="second"),
"#;

        let result = extract_tools(code);
        assert_eq!(result.tools.len(), 2);
        assert_eq!(result.tools[0].description, "first");
        assert_eq!(result.tools[1].description, "second");
        assert_eq!(result.get("dup").unwrap().description, "second");
        assert!(result.get("missing").is_none());
    }

    #[test]
    fn test_serialized_shape_and_field_order() -> Result<()> {
        let code = r#"Tool(name="ping", description="Pings", inputSchema={"type":"object"})"#;

        let doc = extract_tools(code).to_json()?;
        // Exactly two top-level fields, tools carry name/description/
        // inputSchema in that order.
        assert!(doc.starts_with(r#"{"success":true,"tools":["#));
        assert!(doc.contains(r#""name":"ping","description":"Pings","inputSchema":"#));
        Ok(())
    }

    #[test]
    fn test_extraction_is_idempotent() -> Result<()> {
        let code = r#"
Tool(name="a", description="x", inputSchema={"type":"object","properties":{"p":{"type":"integer"}}}),
Tool(name="b"),
"#;

        let first = extract_tools(code).to_json()?;
        let second = extract_tools(code).to_json()?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_no_tools_in_plain_text() {
        let result = extract_tools("nothing to see here");
        assert!(result.success);
        assert!(result.tools.is_empty());
    }
}
