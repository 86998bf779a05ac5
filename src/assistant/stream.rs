//! Decoding of the assistant's line-prefixed response body.
//!
//! The upstream streams its answer as newline-separated records. Each record
//! starts with a short type code followed by a colon (`0:"Hel"`, `9:{...}`,
//! `d:{...}`). Only text chunks carry answer text; everything else (tool
//! calls, search results, finish metadata) is dropped without being parsed,
//! since search-result records alone can run to tens of kilobytes.

/// Answer returned when the body carried no answer text.
pub const NO_RESPONSE_MESSAGE: &str = "No response was generated by the documentation assistant.";

/// Kind of a single response line, derived from its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `0:` literal answer text, JSON-encoded as a string.
    TextChunk,
    /// `9:` a tool invocation made by the assistant.
    ToolCall,
    /// `a:` tool output, usually documentation search results.
    ToolResult,
    /// `e:` end-of-step metadata (finish reason, usage).
    FinishMeta,
    /// `d:` end-of-message signal.
    Done,
    /// `f:` message start metadata.
    MessageMeta,
    /// Anything without a recognized prefix.
    Unknown,
}

impl LineKind {
    fn from_code(code: &str) -> Self {
        match code {
            "0" => Self::TextChunk,
            "9" => Self::ToolCall,
            "a" => Self::ToolResult,
            "e" => Self::FinishMeta,
            "d" => Self::Done,
            "f" => Self::MessageMeta,
            _ => Self::Unknown,
        }
    }
}

/// A response line split into its kind and raw payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamLine<'a> {
    pub kind: LineKind,
    pub payload: &'a str,
}

impl<'a> StreamLine<'a> {
    /// Split `line` at its first colon and classify the prefix.
    ///
    /// Lines without a colon, or with an unrecognized code, are
    /// [`LineKind::Unknown`] and keep the whole line as payload.
    #[must_use]
    pub fn parse(line: &'a str) -> Self {
        match line.split_once(':') {
            Some((code, payload)) => {
                let kind = LineKind::from_code(code);
                if kind == LineKind::Unknown {
                    Self {
                        kind,
                        payload: line,
                    }
                } else {
                    Self { kind, payload }
                }
            }
            None => Self {
                kind: LineKind::Unknown,
                payload: line,
            },
        }
    }
}

/// Decode a text-chunk payload into its text fragment.
///
/// The payload should be a single JSON string. Malformed payloads are
/// recovered by dropping one leading and one trailing quote; an empty
/// remainder yields `None`.
#[must_use]
pub fn decode_text_chunk(payload: &str) -> Option<String> {
    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(serde_json::Value::String(text)) => Some(text),
        Ok(other) => {
            tracing::debug!(kind = %json_kind(&other), "text chunk is not a JSON string");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "malformed text chunk, stripping quotes");
            let stripped = payload.strip_prefix('"').unwrap_or(payload);
            let stripped = stripped.strip_suffix('"').unwrap_or(stripped);
            (!stripped.is_empty()).then(|| stripped.to_string())
        }
    }
}

/// Reduce a buffered response body to the plain-text answer.
///
/// Text fragments are concatenated in line order and trimmed. A body with
/// no text (or only whitespace) yields [`NO_RESPONSE_MESSAGE`] rather than
/// an empty string.
#[must_use]
pub fn decode_response(body: &str) -> String {
    let mut answer = String::new();

    for line in body.lines() {
        let line = StreamLine::parse(line.trim_end_matches('\r'));
        if line.kind != LineKind::TextChunk {
            continue;
        }
        if let Some(text) = decode_text_chunk(line.payload) {
            answer.push_str(&text);
        }
    }

    let answer = answer.trim();
    if answer.is_empty() {
        NO_RESPONSE_MESSAGE.to_string()
    } else {
        answer.to_string()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_prefixes() {
        assert_eq!(StreamLine::parse("0:\"hi\"").kind, LineKind::TextChunk);
        assert_eq!(StreamLine::parse("9:{}").kind, LineKind::ToolCall);
        assert_eq!(StreamLine::parse("a:{}").kind, LineKind::ToolResult);
        assert_eq!(StreamLine::parse("e:{}").kind, LineKind::FinishMeta);
        assert_eq!(StreamLine::parse("d:{}").kind, LineKind::Done);
        assert_eq!(StreamLine::parse("f:{}").kind, LineKind::MessageMeta);
        assert_eq!(StreamLine::parse("0:\"hi\"").payload, "\"hi\"");
    }

    #[test]
    fn test_parse_unknown_prefixes() {
        let line = StreamLine::parse("2:[1,2]");
        assert_eq!(line.kind, LineKind::Unknown);
        assert_eq!(line.payload, "2:[1,2]");

        assert_eq!(StreamLine::parse("no colon here").kind, LineKind::Unknown);
        assert_eq!(StreamLine::parse("").kind, LineKind::Unknown);
        assert_eq!(StreamLine::parse("00:\"x\"").kind, LineKind::Unknown);
    }

    #[test]
    fn test_decode_concatenates_in_order() {
        let body = "f:{\"messageId\":\"m1\"}\n0:\"hello\"\n9:{\"toolName\":\"search\"}\n0:\" world\"\ne:{}\nd:{}\n";
        assert_eq!(decode_response(body), "hello world");
    }

    #[test]
    fn test_decode_no_text_chunks_returns_fallback() {
        let body = "f:{}\na:{\"result\":[]}\nd:{\"finishReason\":\"stop\"}";
        assert_eq!(decode_response(body), NO_RESPONSE_MESSAGE);
        assert_eq!(decode_response(""), NO_RESPONSE_MESSAGE);
    }

    #[test]
    fn test_decode_malformed_chunk_is_recovered() {
        let body = "0:not-valid-json\n0:\" and more\"";
        assert_eq!(decode_response(body), "not-valid-json and more");
    }

    #[test]
    fn test_decode_strips_single_unbalanced_quote() {
        assert_eq!(decode_text_chunk("\"broken").as_deref(), Some("broken"));
        assert_eq!(decode_text_chunk("broken\"").as_deref(), Some("broken"));
        assert_eq!(decode_text_chunk("\""), None);
    }

    #[test]
    fn test_decode_handles_escapes_and_crlf() {
        let body = "0:\"line one\\n\"\r\n0:\"\\\"quoted\\\" \\u00e9\"\r\n";
        assert_eq!(decode_response(body), "line one\n\"quoted\" é");
    }

    #[test]
    fn test_whitespace_only_answer_returns_fallback() {
        assert_eq!(decode_response("0:\"  \"\n0:\"\\n\""), NO_RESPONSE_MESSAGE);
    }

    #[test]
    fn test_non_string_chunk_is_ignored() {
        let body = "0:42\n0:\"text\"";
        assert_eq!(decode_response(body), "text");
    }

    #[test]
    fn test_search_results_never_leak_into_answer() {
        let big = "x".repeat(50_000);
        let body = format!("a:{{\"result\":\"{big}\"}}\n0:\"short answer\"");
        assert_eq!(decode_response(&body), "short answer");
    }
}
