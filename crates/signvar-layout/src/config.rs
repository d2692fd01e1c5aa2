#![forbid(unsafe_code)]

//! Layout settings.

use serde::{Deserialize, Serialize};
use signvar_style::Style;

/// Per-surface width budget and chain limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Pixel width one surface line can show. A run exactly this wide fits.
    pub width_limit: u32,
    /// Upper bound on surfaces collected by a chain walk.
    pub max_chain_len: usize,
    /// Style every physical line starts in.
    pub base_style: Style,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width_limit: 90,
            max_chain_len: 32,
            base_style: Style::default(),
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn with_width_limit(mut self, width_limit: u32) -> Self {
        self.width_limit = width_limit;
        self
    }

    #[must_use]
    pub fn with_max_chain_len(mut self, max_chain_len: usize) -> Self {
        self.max_chain_len = max_chain_len.max(1);
        self
    }

    #[must_use]
    pub fn with_base_style(mut self, base_style: Style) -> Self {
        self.base_style = base_style;
        self
    }
}
