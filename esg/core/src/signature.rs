use std::fmt;

use serde_json::Value;

/// Key identifying duplicate in-flight requests.
///
/// Built from the uppercased method, the fully resolved URL and the body
/// serialized with object keys in sorted order (`{}` when there is no body),
/// joined with `&`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestSignature(String);

impl RequestSignature {
    pub fn new(method: &str, url: &str, body: Option<&Value>) -> Self {
        let body = match body {
            Some(value) => canonical_json(value),
            None => "{}".to_string(),
        };
        Self(format!("{}&{}&{}", method.to_ascii_uppercase(), url, body))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize `value` as compact JSON with every object's keys sorted.
///
/// Independent of whether `serde_json` was built with `preserve_order`.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Serializing a string cannot fail.
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signature_is_deterministic() {
        let body = json!({"site": "Berlin", "scope": 1});
        let a = RequestSignature::new("post", "http://x/api/v1/emissions", Some(&body));
        let b = RequestSignature::new("post", "http://x/api/v1/emissions", Some(&body));
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a: Value = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap();
        assert_eq!(
            RequestSignature::new("POST", "u", Some(&a)),
            RequestSignature::new("POST", "u", Some(&b))
        );
    }

    #[test]
    fn test_nested_objects_are_sorted() {
        let value = json!({"z": {"y": 1, "x": [ {"b": 1, "a": 2} ]}, "a": null});
        assert_eq!(
            canonical_json(&value),
            r#"{"a":null,"z":{"x":[{"a":2,"b":1}],"y":1}}"#
        );
    }

    #[test]
    fn test_method_is_uppercased() {
        assert_eq!(
            RequestSignature::new("get", "u", None),
            RequestSignature::new("GET", "u", None)
        );
    }

    #[test]
    fn test_missing_body_is_empty_object() {
        let sig = RequestSignature::new("GET", "http://x/api/v1/x", None);
        assert_eq!(sig.as_str(), "GET&http://x/api/v1/x&{}");
        assert_eq!(sig, RequestSignature::new("GET", "http://x/api/v1/x", Some(&json!({}))));
    }

    #[test]
    fn test_any_component_changes_signature() {
        let body = json!({"n": 1});
        let base = RequestSignature::new("POST", "u", Some(&body));
        assert_ne!(base, RequestSignature::new("PUT", "u", Some(&body)));
        assert_ne!(base, RequestSignature::new("POST", "v", Some(&body)));
        assert_ne!(base, RequestSignature::new("POST", "u", Some(&json!({"n": 2}))));
    }

    #[test]
    fn test_string_keys_are_escaped() {
        let value = json!({"quote\"key": "v"});
        assert_eq!(canonical_json(&value), r#"{"quote\"key":"v"}"#);
    }
}
