//! Lexical extraction of FastMCP decorator declarations.
//!
//! FastMCP servers declare their surface with decorators on plain
//! functions:
//!
//! ```python
//! mcp = FastMCP("Demo Server")
//!
//! @mcp.tool(description="Add two numbers")
//! def add(a: int, b: int = 0) -> int:
//!     """Adds a and b."""
//!     return a + b
//! ```
//!
//! The source is never executed. The scanner locates the instance binding,
//! then walks each `@<instance>.tool(` / `.resource(` / `.prompt(`
//! decorator: argument values come from the decorator span, the parameter
//! schema from the decorated `def` signature (names, type hints, defaults),
//! and descriptions from the docstring. Malformed declarations are dropped
//! one at a time; the scan itself never fails.

use crate::scan::{find_string_value, matching_span};
use crate::types::{
    PromptArgument, PromptDescriptor, ResourceDescriptor, ServerDefinitions, ToolDescriptor,
    DEFAULT_MIME_TYPE,
};
use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, trace};

/// Scan FastMCP-style source for tool, resource and prompt declarations.
///
/// Without a `<ident> = FastMCP(...)` binding nothing can be attributed, so
/// the result is empty; `success` stays true either way, matching the
/// silent-degradation policy of the classic extractor.
pub fn extract_definitions(code: &str) -> ServerDefinitions {
    let mut defs = ServerDefinitions::new();

    let Some(instance) = find_instance_name(code) else {
        debug!("No FastMCP instance binding found");
        return defs;
    };
    trace!("Found FastMCP instance: {}", instance);

    for decl in declarations(code, &instance, "tool") {
        defs.tools.push(build_tool(&decl));
    }
    for decl in declarations(code, &instance, "resource") {
        if let Some(resource) = build_resource(&decl) {
            defs.resources.push(resource);
        } else {
            trace!("Resource {} has no URI, dropped", decl.func_name);
        }
    }
    for decl in declarations(code, &instance, "prompt") {
        defs.prompts.push(build_prompt(&decl));
    }

    debug!(
        "FastMCP extraction finished: {} tool(s), {} resource(s), {} prompt(s)",
        defs.tools.len(),
        defs.resources.len(),
        defs.prompts.len()
    );
    defs
}

/// One decorator plus the function it decorates.
struct Declaration<'a> {
    /// Decorator text including the marker and both parentheses.
    deco: &'a str,
    func_name: &'a str,
    /// Text between the parentheses of the `def` signature.
    signature: &'a str,
    docstring: Option<String>,
}

/// A parameter recovered from a `def` signature.
struct Param {
    name: String,
    schema_type: &'static str,
    required: bool,
}

/// Identifier bound to the first `FastMCP(...)` constructor call.
fn find_instance_name(code: &str) -> Option<String> {
    for pattern in ["= FastMCP(", "=FastMCP("] {
        if let Some(pos) = code.find(pattern) {
            let head = code[..pos].trim_end();
            let tail: Vec<char> = head
                .chars()
                .rev()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            if !tail.is_empty() {
                return Some(tail.into_iter().rev().collect());
            }
        }
    }
    None
}

/// All `@<instance>.<kind>(...)` declarations in textual order.
fn declarations<'a>(code: &'a str, instance: &str, kind: &str) -> Vec<Declaration<'a>> {
    let marker = format!("@{instance}.{kind}(");
    let mut found = Vec::new();

    let mut pos = 0;
    while let Some(rel) = code[pos..].find(&marker) {
        let deco_start = pos + rel;
        let open = deco_start + marker.len() - 1;

        let Some(deco_end) = matching_span(code, open, b'(', b')') else {
            // Runs off the end of the text; nothing after it can follow.
            break;
        };
        pos = deco_end;

        let Some((func_name, signature, sig_end)) = next_function(code, deco_end) else {
            trace!("Decorator at byte {} has no following def, dropped", deco_start);
            continue;
        };

        found.push(Declaration {
            deco: &code[deco_start..deco_end],
            func_name,
            signature,
            docstring: function_docstring(code, sig_end),
        });
    }
    found
}

/// The next `def` after a decorator span: function name, signature text and
/// the position one past the signature's closing parenthesis.
fn next_function(code: &str, from: usize) -> Option<(&str, &str, usize)> {
    let def_pos = code[from..].find("def ")? + from;
    let name_start = def_pos + "def ".len();
    let open = code[name_start..].find('(')? + name_start;

    let func_name = code[name_start..open].trim();
    if func_name.is_empty() {
        return None;
    }

    let sig_end = matching_span(code, open, b'(', b')')?;
    Some((func_name, &code[open + 1..sig_end - 1], sig_end))
}

/// Docstring of the function whose signature ends at `sig_end`, trimmed.
/// Only a triple-quoted literal directly after the `:` counts.
fn function_docstring(code: &str, sig_end: usize) -> Option<String> {
    let colon = code[sig_end..].find(':')? + sig_end;
    let rest = code[colon + 1..].trim_start();
    for quote in ["\"\"\"", "'''"] {
        if let Some(body) = rest.strip_prefix(quote) {
            let end = body.find(quote)?;
            return Some(body[..end].trim().to_string());
        }
    }
    None
}

fn build_tool(decl: &Declaration) -> ToolDescriptor {
    let name = match find_string_value(decl.deco, "name") {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => decl.func_name.to_string(),
    };
    let description = describe(decl, || format!("Execute {name}"));

    let doc = decl.docstring.as_deref();
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();
    for param in parse_parameters(decl.signature) {
        properties.insert(
            param.name.clone(),
            json!({
                "type": param.schema_type,
                "description": param_description(doc, &param.name),
            }),
        );
        if param.required {
            required.push(Value::String(param.name));
        }
    }

    ToolDescriptor {
        name,
        description,
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": required,
        }),
    }
}

fn build_resource(decl: &Declaration) -> Option<ResourceDescriptor> {
    // `uri` is the identity of a resource; it may be passed by keyword or
    // as the first positional argument.
    let uri = match find_string_value(decl.deco, "uri") {
        Some(u) if !u.is_empty() => u.to_string(),
        _ => first_quoted_literal(decl.deco)?.to_string(),
    };

    let name = match find_string_value(decl.deco, "name") {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => decl.func_name.to_string(),
    };
    let description = describe(decl, || format!("Resource: {name}"));
    let mime_type = match find_string_value(decl.deco, "mime_type") {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => DEFAULT_MIME_TYPE.to_string(),
    };

    Some(ResourceDescriptor {
        uri,
        name,
        description,
        mime_type,
    })
}

fn build_prompt(decl: &Declaration) -> PromptDescriptor {
    let name = match find_string_value(decl.deco, "name") {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => decl.func_name.to_string(),
    };
    let description = describe(decl, || format!("Prompt: {name}"));

    let doc = decl.docstring.as_deref();
    let arguments = parse_parameters(decl.signature)
        .into_iter()
        .map(|param| PromptArgument {
            description: param_description(doc, &param.name),
            name: param.name,
            required: param.required,
        })
        .collect();

    PromptDescriptor {
        name,
        description,
        arguments,
    }
}

/// Description fallback chain: decorator argument, then docstring, then the
/// generated default. Whichever source wins is cut to its first line.
fn describe(decl: &Declaration, fallback: impl FnOnce() -> String) -> String {
    let text = match find_string_value(decl.deco, "description") {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => match decl.docstring.as_deref() {
            Some(doc) if !doc.is_empty() => doc.to_string(),
            _ => fallback(),
        },
    };
    text.lines().next().unwrap_or_default().trim().to_string()
}

/// First single- or double-quoted literal anywhere in the span.
fn first_quoted_literal(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(|b| *b == b'"' || *b == b'\'')?;
    let quote = bytes[start];
    let end = text[start + 1..].find(quote as char)? + start + 1;
    Some(&text[start + 1..end])
}

/// Split a `def` signature into parameters. `self` and `*`/`**` markers are
/// skipped; a parameter is required when it has no default. The split is
/// bracket-depth aware but, like everything in this crate, blind to string
/// contexts.
fn parse_parameters(signature: &str) -> Vec<Param> {
    let mut params = Vec::new();
    for raw in split_top_level(signature, b',') {
        let raw = raw.trim();
        if raw.is_empty() || raw == "self" || raw == "/" || raw.starts_with('*') {
            continue;
        }

        let eq = top_level_position(raw, b'=');
        let decl = match eq {
            Some(i) => raw[..i].trim_end(),
            None => raw,
        };

        let (name, hint) = match decl.split_once(':') {
            Some((n, h)) => (n.trim(), Some(h.trim())),
            None => (decl, None),
        };
        if name.is_empty() {
            continue;
        }

        params.push(Param {
            name: name.to_string(),
            schema_type: json_schema_type(hint),
            required: eq.is_none(),
        });
    }
    params
}

fn split_top_level(text: &str, sep: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ if b == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn top_level_position(text: &str, target: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ if b == target && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Map a Python type hint to a JSON-schema type name. Substring probes in a
/// fixed trial order, so `list[str]` maps to "string" because the `str`
/// probe fires first.
fn json_schema_type(hint: Option<&str>) -> &'static str {
    let Some(hint) = hint else { return "string" };
    let lower = hint.to_lowercase();
    if hint.contains("int") {
        "integer"
    } else if hint.contains("float") {
        "number"
    } else if hint.contains("bool") {
        "boolean"
    } else if hint.contains("str") {
        "string"
    } else if lower.contains("list") {
        "array"
    } else if lower.contains("dict") {
        "object"
    } else {
        "string"
    }
}

/// Parameter description mined from the docstring. Understands the
/// `:param name: text` form and plain `name: text` / `name - text` lines;
/// otherwise a readable default is generated from the parameter name.
fn param_description(docstring: Option<&str>, name: &str) -> String {
    if let Some(doc) = docstring {
        let escaped = regex::escape(name);
        let patterns = [
            format!(r"(?i):param\s+{escaped}\s*:\s*(.+)"),
            format!(r"(?i){escaped}\s*[:\-]\s*(.+)"),
        ];
        for pattern in &patterns {
            if let Ok(re) = Regex::new(pattern) {
                if let Some(captures) = re.captures(doc) {
                    return captures[1].trim().to_string();
                }
            }
        }
    }
    format!("The {}", name.replace('_', " "))
}
