//! Payload construction from text plus caller metadata.

use rag_store::Payload;
use serde_json::Value;
use tracing::warn;

/// Builds `{"text": text}` and merges `metadata` on top of it.
///
/// Accepted metadata: a JSON object, or a string holding a JSON object. Null and
/// empty strings mean "no metadata". Anything else is logged and ignored. Metadata
/// keys overwrite `text`.
pub fn build_payload(text: &str, metadata: Option<&Value>) -> Payload {
    let mut payload = Payload::new();
    payload.insert("text".to_string(), Value::String(text.to_string()));

    match metadata {
        None | Some(Value::Null) => {}
        Some(Value::Object(map)) => merge(&mut payload, map),
        Some(Value::String(s)) if s.trim().is_empty() => {}
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => merge(&mut payload, &map),
            Ok(other) => warn!(
                target: "rag_manager::metadata",
                kind = json_kind(&other),
                "metadata string is not a JSON object; ignored"
            ),
            Err(e) => warn!(
                target: "rag_manager::metadata",
                error = %e,
                "metadata string is not valid JSON; ignored"
            ),
        },
        Some(other) => warn!(
            target: "rag_manager::metadata",
            kind = json_kind(other),
            "metadata must be an object; ignored"
        ),
    }

    payload
}

fn merge(payload: &mut Payload, map: &serde_json::Map<String, Value>) {
    for (k, v) in map {
        payload.insert(k.clone(), v.clone());
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_only_without_metadata() {
        let p = build_payload("hello", None);
        assert_eq!(Value::Object(p), json!({ "text": "hello" }));
    }

    #[test]
    fn object_metadata_is_merged() {
        let p = build_payload("hello", Some(&json!({ "lang": "en", "page": 1 })));
        assert_eq!(
            Value::Object(p),
            json!({ "text": "hello", "lang": "en", "page": 1 })
        );
    }

    #[test]
    fn serialized_metadata_is_parsed() {
        let p = build_payload("hello", Some(&json!("{\"lang\":\"en\"}")));
        assert_eq!(p["lang"], "en");
    }

    #[test]
    fn metadata_may_shadow_text() {
        let p = build_payload("hello", Some(&json!({ "text": "override" })));
        assert_eq!(p["text"], "override");
    }

    #[test]
    fn malformed_metadata_is_ignored() {
        for bad in [json!("{not json"), json!("[1,2]"), json!(42), json!([1])] {
            let p = build_payload("hello", Some(&bad));
            assert_eq!(Value::Object(p), json!({ "text": "hello" }));
        }
    }
}
