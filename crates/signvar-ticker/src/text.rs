#![forbid(unsafe_code)]

//! Source text paired with its rendered (animated) view.

use signvar_text::StyledText;

use crate::state::TickerState;

/// The live view of one entry's text under a ticker.
///
/// `rendered` is always `state.render(&source)` for the state last passed to
/// [`set_source`](Self::set_source) or [`refresh`](Self::refresh).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerText {
    source: StyledText,
    rendered: StyledText,
}

impl TickerText {
    #[must_use]
    pub fn new(source: StyledText, state: &TickerState) -> Self {
        let rendered = state.render(&source);
        Self { source, rendered }
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &StyledText {
        &self.source
    }

    /// The text as currently displayed.
    #[inline]
    #[must_use]
    pub fn current(&self) -> &StyledText {
        &self.rendered
    }

    /// Replace the source and re-render. Returns whether the displayed text
    /// changed.
    pub fn set_source(&mut self, source: StyledText, state: &TickerState) -> bool {
        self.source = source;
        self.refresh(state)
    }

    /// Re-render after `state` moved. Returns whether the displayed text
    /// changed.
    pub fn refresh(&mut self, state: &TickerState) -> bool {
        let rendered = state.render(&self.source);
        if rendered == self.rendered {
            return false;
        }
        self.rendered = rendered;
        true
    }
}
