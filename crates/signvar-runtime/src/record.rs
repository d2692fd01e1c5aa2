#![forbid(unsafe_code)]

//! The persisted shape of the store.
//!
//! Ticker settings are omitted when default and viewer records only exist for
//! viewers that customised something, so a quiet store serialises small.

use serde::{Deserialize, Serialize};
use signvar_ticker::TickerConfig;

/// One variable's persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableRecord {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "TickerConfig::is_default")]
    pub ticker: TickerConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub viewers: Vec<ViewerRecord>,
}

/// One viewer's overrides of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerRecord {
    pub viewer: String,
    /// `None` when the viewer shows the default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// `None` when the viewer follows the shared ticker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<TickerConfig>,
}

impl VariableRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ticker: TickerConfig::default(),
            viewers: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signvar_ticker::TickMode;

    #[test]
    fn minimal_record_omits_defaults() {
        let json = serde_json::to_string(&VariableRecord::new("a", "x")).expect("serialize");
        assert_eq!(json, r#"{"name":"a","value":"x"}"#);
    }

    #[test]
    fn full_record_reads_back() {
        let json = r#"{
            "name": "news",
            "value": "%headline%",
            "ticker": {"mode": "left", "interval": 2, "pauses": [{"delay": 3, "duration": 5}]},
            "viewers": [{"viewer": "alice", "value": "hi"}, {"viewer": "bob", "ticker": {"mode": "blink"}}]
        }"#;
        let record: VariableRecord = serde_json::from_str(json).expect("parse");
        assert_eq!(record.ticker.mode, TickMode::Left);
        assert_eq!(record.ticker.interval, 2);
        assert_eq!(record.viewers.len(), 2);
        assert_eq!(record.viewers[0].value.as_deref(), Some("hi"));
        assert_eq!(
            record.viewers[1].ticker.as_ref().map(|t| t.mode),
            Some(TickMode::Blink)
        );
    }
}
