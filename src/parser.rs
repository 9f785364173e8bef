//! Parsers for the host-page inputs.
//!
//! The chart data may arrive as a bare JSON document or as the script the
//! host page uses to declare its globals:
//!
//! ```text
//! var QUALITY = ["unsupported", "unreliable", ...];
//! var STRINGS = {"Father": "Vater", ...};
//! var DATA = {"total": 12, "data": {"anum": 1, ...}};
//! ```
//!
//! Values are read as JSON5, so unquoted keys and trailing commas are fine.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::ir::{AncestorNode, ChartData, HostInputs};

static ASSIGNMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:var|let|const)\s+|window\.)?(QUALITY|STRINGS|DATA)\s*=")
        .unwrap()
});

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid {name} value: {source}")]
    Syntax {
        name: &'static str,
        #[source]
        source: json5::Error,
    },
    #[error("{name} has an unexpected shape: {source}")]
    Shape {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{name} value is never closed")]
    Unterminated { name: &'static str },
    #[error("input is empty")]
    Empty,
}

/// Parses either a JSON chart document or a host script declaring
/// `QUALITY`, `STRINGS` and `DATA`.
pub fn parse_input(input: &str) -> Result<HostInputs, ParseError> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    if trimmed.starts_with('{') {
        return Ok(HostInputs {
            data: Some(parse_chart_data(input)?),
            ..Default::default()
        });
    }
    parse_host_script(input)
}

/// Parses `{ total, data }`, or a bare root node which is wrapped with a
/// total of 0.
pub fn parse_chart_data(input: &str) -> Result<ChartData, ParseError> {
    let value = parse_value("DATA", input)?;
    chart_data_from_value(value)
}

pub fn parse_quality(input: &str) -> Result<Vec<String>, ParseError> {
    let value = parse_value("QUALITY", input)?;
    serde_json::from_value(value).map_err(|source| ParseError::Shape {
        name: "QUALITY",
        source,
    })
}

pub fn parse_strings(input: &str) -> Result<HashMap<String, String>, ParseError> {
    let value = parse_value("STRINGS", input)?;
    serde_json::from_value(value).map_err(|source| ParseError::Shape {
        name: "STRINGS",
        source,
    })
}

/// Extracts the host globals from a script. Globals the script does not
/// declare stay `None`; the last declaration of a name wins. Anything
/// around the declarations (other statements, comments) is skipped.
pub fn parse_host_script(input: &str) -> Result<HostInputs, ParseError> {
    let mut inputs = HostInputs::default();
    let mut pos = 0;
    while let Some(caps) = ASSIGNMENT_RE.captures_at(input, pos) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        // `DATA == x` and `DATA => x` are not declarations.
        if input[whole.end()..].starts_with(['=', '>']) {
            pos = whole.end() + 1;
            continue;
        }
        let name: &'static str = match name.as_str() {
            "QUALITY" => "QUALITY",
            "STRINGS" => "STRINGS",
            _ => "DATA",
        };
        let end = value_end(input.as_bytes(), whole.end())
            .ok_or(ParseError::Unterminated { name })?;
        let body = &input[whole.end()..end];
        match name {
            "QUALITY" => inputs.quality = Some(parse_quality(body)?),
            "STRINGS" => inputs.strings = Some(parse_strings(body)?),
            _ => inputs.data = Some(parse_chart_data(body)?),
        }
        pos = end;
    }
    log::debug!(
        "host script declares QUALITY={} STRINGS={} DATA={}",
        inputs.quality.is_some(),
        inputs.strings.is_some(),
        inputs.data.is_some()
    );
    Ok(inputs)
}

/// End of the value starting at `start`: the matching bracket of an object
/// or array, the closing quote of a string, otherwise the end of the
/// statement. `None` when a bracket or string is never closed.
fn value_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    match bytes.get(i) {
        None => Some(i),
        Some(b'{' | b'[') => balanced_end(bytes, i),
        Some(b'"' | b'\'' | b'`') => string_end(bytes, i),
        Some(_) => Some(
            bytes[i..]
                .iter()
                .position(|&b| b == b';' || b == b'\n')
                .map_or(bytes.len(), |offset| i + offset),
        ),
    }
}

fn string_end(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => {
                i = string_end(bytes, i)?;
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(bytes.len(), |offset| i + offset);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let close = bytes[i + 2..].windows(2).position(|w| w == b"*/")?;
                i += close + 4;
                continue;
            }
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn parse_value(name: &'static str, raw: &str) -> Result<Value, ParseError> {
    let body = raw.trim().trim_end_matches(';').trim_end();
    if body.is_empty() {
        return Err(ParseError::Empty);
    }
    let value: Value = json5::from_str(body).map_err(|source| ParseError::Syntax { name, source })?;
    // Some hosts embed the payload as a JSON string literal.
    match value {
        Value::String(inner) if !inner.trim().is_empty() => {
            json5::from_str(&inner).map_err(|source| ParseError::Syntax { name, source })
        }
        other => Ok(other),
    }
}

fn chart_data_from_value(value: Value) -> Result<ChartData, ParseError> {
    let shape = |source| ParseError::Shape {
        name: "DATA",
        source,
    };
    if value.get("data").is_some() {
        serde_json::from_value(value).map_err(shape)
    } else {
        let data: AncestorNode = serde_json::from_value(value).map_err(shape)?;
        Ok(ChartData { total: 0, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Quality;

    #[test]
    fn parses_json_document() {
        let input = r#"{"total": 3, "data": {"anum": 1, "id": "I1", "name": "Ada", "quality": 9,
            "collapse": false, "children": [{"anum": 2, "id": "I2", "name": "John", "quality": 7}]}}"#;
        let inputs = parse_input(input).unwrap();
        let data = inputs.data.unwrap();
        assert_eq!(data.total, 3);
        assert_eq!(data.data.name, "Ada");
        assert_eq!(data.data.children[0].quality, Quality::Rated(7));
        assert!(inputs.quality.is_none());
    }

    #[test]
    fn parses_bare_root_node() {
        let data = parse_chart_data(r#"{anum: 1, name: "Solo", children: [],}"#).unwrap();
        assert_eq!(data.total, 0);
        assert_eq!(data.data.anum, 1);
        assert_eq!(data.data.name, "Solo");
    }

    #[test]
    fn parses_host_script() {
        let script = r#"
            var QUALITY = ["unsupported", "unreliable", "uncertain"];
            var STRINGS = {
                Father: "Vater",
                "Pedigree Collapse": "Ahnenschwund",
            };
            var DATA = '{"total":1,"data":{"anum":1,"name":"Ada","children":[{"anum":3,"id":"I3"}]}}';
        "#;
        let inputs = parse_host_script(script).unwrap();
        assert_eq!(inputs.quality.as_ref().map(Vec::len), Some(3));
        assert_eq!(
            inputs.strings.as_ref().and_then(|s| s.get("Father")).map(String::as_str),
            Some("Vater")
        );
        let data = inputs.data.unwrap();
        assert_eq!(data.data.children[0].anum, 3);
    }

    #[test]
    fn script_without_data_leaves_it_unset() {
        let inputs = parse_input("const STRINGS = {Self: 'Ich'};").unwrap();
        assert!(inputs.data.is_none());
        assert!(inputs.strings.is_some());
    }

    #[test]
    fn reports_syntax_errors() {
        let err = parse_input("var DATA = {anum: };").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { name: "DATA", .. }));
        assert!(matches!(parse_input("   "), Err(ParseError::Empty)));
    }

    #[test]
    fn one_line_script_with_several_declarations() {
        let inputs = parse_input(
            r#"var DATA = {"total":1,"data":{"anum":1}}; var STRINGS = {"Father":"Vater"};"#,
        )
        .unwrap();
        assert_eq!(inputs.data.as_ref().unwrap().data.anum, 1);
        assert_eq!(inputs.translations().get("Father"), "Vater");
    }

    #[test]
    fn ignores_surrounding_statements_and_comments() {
        let data = r#"var DATA = {"total":1,"data":{"anum":1,"name":"A } ] B"}};"#;
        for tail in [
            "\nvar PAGE_TITLE = \"x\";",
            "\ndrawFanChart();",
            "\n// generated by gigatrees",
            " /* trailing */",
        ] {
            let inputs = parse_input(&format!("{data}{tail}"))
                .unwrap_or_else(|err| panic!("tail {tail:?}: {err}"));
            assert_eq!(inputs.data.unwrap().data.name, "A } ] B", "tail {tail:?}");
        }

        let script = "if (DATA == null) { init(); }\nwindow.QUALITY = [\"a\", // first\n \"b\"]";
        let inputs = parse_input(script).unwrap();
        assert!(inputs.data.is_none());
        assert_eq!(inputs.quality, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn reports_unterminated_values() {
        let err = parse_input(r#"var DATA = {"total": 1, "data": {"anum": 1}"#).unwrap_err();
        assert!(matches!(err, ParseError::Unterminated { name: "DATA" }));
    }

    #[test]
    fn malformed_quality_codes_do_not_fail_the_parse() {
        for raw in ["null", "\"7\"", "7.5"] {
            let input = format!(r#"{{"total":1,"data":{{"anum":1,"id":"I1","quality":{raw}}}}}"#);
            let data = parse_input(&input)
                .unwrap_or_else(|err| panic!("quality {raw}: {err}"))
                .data
                .unwrap();
            assert_eq!(data.data.quality, Quality::Missing, "quality {raw}");
        }
    }

    #[test]
    fn reports_shape_errors() {
        let err = parse_chart_data(r#"{"total": 1, "data": {"name": "no number"}}"#).unwrap_err();
        assert!(matches!(err, ParseError::Shape { name: "DATA", .. }));
    }
}
