//! Purpose: Define a stable, structured schema for non-fatal stderr notices.
//! Exports: `Notice`, `notice_json`.
//! Role: Contract helper for CLI diagnostics that are not errors.
//! Invariants: Notices are non-fatal and never alter stdout payloads.
//! Invariants: Fields are additive-only; consumers match on `kind`.
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: String,
    pub time: String,
    pub cmd: String,
    pub message: String,
    pub details: Map<String, Value>,
}

impl Notice {
    pub fn new(
        kind: impl Into<String>,
        cmd: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            time: String::new(),
            cmd: cmd.into(),
            message: message.into(),
            details: Map::new(),
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }
}

pub fn notice_json(notice: &Notice) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(notice.kind));
    inner.insert("time".to_string(), json!(notice.time));
    inner.insert("cmd".to_string(), json!(notice.cmd));
    inner.insert("message".to_string(), json!(notice.message));
    inner.insert("details".to_string(), Value::Object(notice.details.clone()));

    let mut outer = Map::new();
    outer.insert("notice".to_string(), Value::Object(inner));
    Value::Object(outer)
}

#[cfg(test)]
mod tests {
    use super::{Notice, notice_json};
    use serde_json::json;

    #[test]
    fn notice_json_has_required_fields() {
        let notice = Notice::new("redacted", "env", "redacted 3 entries")
            .with_time("2026-08-01T00:00:00Z")
            .with_detail("count", json!(3));

        let value = notice_json(&notice);
        let obj = value
            .get("notice")
            .and_then(|v| v.as_object())
            .expect("notice object");

        assert_eq!(obj.get("kind").and_then(|v| v.as_str()), Some("redacted"));
        assert_eq!(
            obj.get("time").and_then(|v| v.as_str()),
            Some("2026-08-01T00:00:00Z")
        );
        assert_eq!(obj.get("cmd").and_then(|v| v.as_str()), Some("env"));
        assert_eq!(
            obj.get("message").and_then(|v| v.as_str()),
            Some("redacted 3 entries")
        );
        assert_eq!(
            obj.get("details").and_then(|v| v.get("count")),
            Some(&json!(3))
        );
    }
}
