#![forbid(unsafe_code)]

//! Store settings.

use serde::{Deserialize, Serialize};
use signvar_layout::LayoutConfig;

/// Settings for a [`VariableStore`](crate::VariableStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Reserved character that may not appear in variable names.
    pub separator: char,
    pub layout: LayoutConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            separator: '.',
            layout: LayoutConfig::default(),
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Whether `name` may name a variable.
    ///
    /// Names are non-empty and contain neither whitespace, `%`, nor the
    /// reserved separator.
    #[must_use]
    pub fn is_valid_name(&self, name: &str) -> bool {
        !name.is_empty()
            && !name
                .chars()
                .any(|c| c == self.separator || c == '%' || c.is_whitespace())
    }
}
