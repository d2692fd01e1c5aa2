#![forbid(unsafe_code)]

//! Literal text around a variable marker on the boundary surfaces.
//!
//! The first surface keeps whatever precedes `%name%`; the last surface keeps
//! whatever follows the marker. On a multi-surface chain the last surface's
//! line may close the value with a bare `%` instead of repeating the marker,
//! in which case the text after the final `%` is the postfix.

use signvar_style::Style;
use signvar_text::StyledText;

/// Prefix and postfix fragments, decoded with their running style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    pub prefix: StyledText,
    pub postfix: StyledText,
}

/// Extract the fragments for `marker` from the boundary lines.
///
/// `first` is the raw line of the first surface, `last` of the last one;
/// they are the same line for a single-surface chain.
#[must_use]
pub fn boundary_fragments(
    first: Option<&str>,
    last: Option<&str>,
    marker: &str,
    base: Style,
) -> Fragments {
    let mut fragments = Fragments::default();
    if let Some(first) = first
        && let Some(at) = first.find(marker)
    {
        fragments.prefix.push_raw(&first[..at], base, base);
    }
    if let Some(last) = last {
        let split = last
            .find(marker)
            .map(|at| at + marker.len())
            .or_else(|| last.rfind('%').map(|at| at + 1));
        if let Some(split) = split {
            let mut lead = StyledText::new();
            let running = lead.push_raw(&last[..split], base, base);
            fragments.postfix.push_raw(&last[split..], running, base);
        }
    }
    fragments
}
