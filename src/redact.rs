//! Purpose: Decide which environment entries are safe to echo into logs.
//! Exports: `is_sensitive_key`, `EnvSnapshot`, `snapshot_environment`.
//! Role: Redaction policy shared by the probe sequence and the `env` command.
//! Invariants: Matching inspects keys only; redacted values are never stored or echoed.
//! Invariants: Visible entries are sorted by key for deterministic output.
use std::env;

const SENSITIVE_KEY_MARKERS: [&str; 4] = ["password", "token", "secret", "key"];

pub fn is_sensitive_key(key: &str) -> bool {
    let lowered = key.to_lowercase();
    SENSITIVE_KEY_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    pub visible: Vec<(String, String)>,
    pub redacted: usize,
}

impl EnvSnapshot {
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut visible = Vec::new();
        let mut redacted = 0usize;
        for (key, value) in vars {
            if is_sensitive_key(&key) {
                redacted += 1;
            } else {
                visible.push((key, value));
            }
        }
        visible.sort_by(|a, b| a.0.cmp(&b.0));
        EnvSnapshot { visible, redacted }
    }
}

pub fn snapshot_environment() -> EnvSnapshot {
    EnvSnapshot::from_vars(env::vars_os().map(|(key, value)| {
        (
            key.to_string_lossy().into_owned(),
            value.to_string_lossy().into_owned(),
        )
    }))
}
