#![forbid(unsafe_code)]

//! Distributing one styled value across a chain of fixed-width surfaces.
//!
//! # Algorithm
//!
//! ```text
//! limits   = width_limit per surface, minus prefix width on the first
//!            and postfix width on the last
//! content  = value (one styled space if the value has no glyphs)
//! wrap?    → cycle content until the next glyph no longer fits anywhere
//! pad?     → add styled spaces on the anchored side(s) while the padded
//!            content still fits the chain
//! lines    = greedy partition: a glyph goes to the current surface if
//!            used + width <= limit, else to the next surface
//! emit     → prefix ++ lines[0], …, lines[n-1] ++ postfix
//! ```
//!
//! Content that does not fit is silently truncated at the last surface.
//!
//! # Invariants
//!
//! 1. The result always has exactly one line per surface.
//! 2. Every line's width, excluding prefix/postfix, fits its limit.
//! 3. The output is a pure function of the inputs.

use signvar_style::Style;
use signvar_text::{StyledChar, StyledText};

use crate::surface::ChainDirection;

/// Where the value sits between the fixed fragments of a chain.
#[derive(Debug, Clone, Copy)]
pub struct LayoutInput<'a> {
    /// Literal text before the variable marker on the first surface.
    pub prefix: &'a StyledText,
    /// The (animated) value to show.
    pub value: &'a StyledText,
    /// Literal text after the variable marker on the last surface.
    pub postfix: &'a StyledText,
    /// Number of surfaces in the chain.
    pub surfaces: usize,
    pub direction: ChainDirection,
    /// Cycle the value to fill the whole chain.
    pub wraparound: bool,
}

/// Compute the styled line for every surface of the chain.
#[must_use]
pub fn layout_lines(input: &LayoutInput<'_>, width_limit: u32) -> Vec<StyledText> {
    let count = input.surfaces;
    if count == 0 {
        return Vec::new();
    }
    let limits = surface_limits(count, width_limit, input.prefix.width(), input.postfix.width());

    let mut content: Vec<StyledChar> = input.value.iter().copied().collect();
    if !content.iter().any(|c| !c.is_marker()) {
        let style = input
            .value
            .last_style()
            .or_else(|| input.prefix.last_style())
            .unwrap_or_default();
        content.push(StyledChar::new(' ', style));
    }

    if input.wraparound {
        content = wrap_fill(&content, &limits);
    } else if count > 1 || input.direction != ChainDirection::None {
        pad_to_fill(&mut content, &limits, input.direction);
    }

    let mut lines = partition(&content, &limits);
    if let Some(first) = lines.first_mut() {
        let mut line = input.prefix.clone();
        line.append(first);
        *first = line;
    }
    if let Some(last) = lines.last_mut() {
        last.append(input.postfix);
    }
    tracing::trace!(
        surfaces = count,
        width_limit,
        wraparound = input.wraparound,
        direction = ?input.direction,
        "layout computed"
    );
    lines
}

/// Encode every line relative to `base`.
#[must_use]
pub fn encode_lines(lines: &[StyledText], base: Style) -> Vec<String> {
    lines.iter().map(|line| line.encode(base)).collect()
}

fn surface_limits(count: usize, width_limit: u32, prefix: u32, postfix: u32) -> Vec<u32> {
    let mut limits = vec![width_limit; count];
    limits[0] = limits[0].saturating_sub(prefix);
    limits[count - 1] = limits[count - 1].saturating_sub(postfix);
    limits
}

/// Greedy partition. Glyphs past the last surface are dropped.
fn partition(content: &[StyledChar], limits: &[u32]) -> Vec<StyledText> {
    let mut lines = vec![StyledText::new(); limits.len()];
    let mut surface = 0;
    let mut used = 0u32;
    'chars: for &c in content {
        let width = c.width();
        while used + width > limits[surface] {
            surface += 1;
            used = 0;
            if surface == limits.len() {
                break 'chars;
            }
        }
        lines[surface].push(c);
        used += width;
    }
    lines
}

/// Whether `content` partitions into the chain without truncation.
fn fits(content: &[StyledChar], limits: &[u32]) -> bool {
    let mut surface = 0;
    let mut used = 0u32;
    for c in content {
        let width = c.width();
        while used + width > limits[surface] {
            surface += 1;
            used = 0;
            if surface == limits.len() {
                return false;
            }
        }
        used += width;
    }
    true
}

/// Repeat `content` cyclically until the next glyph fits no surface.
fn wrap_fill(content: &[StyledChar], limits: &[u32]) -> Vec<StyledChar> {
    let total: u32 = content.iter().map(|c| c.width()).sum();
    if total == 0 {
        return content.to_vec();
    }
    let mut out = Vec::with_capacity(content.len() * 2);
    let mut surface = 0;
    let mut used = 0u32;
    for &c in content.iter().cycle() {
        let width = c.width();
        while used + width > limits[surface] {
            surface += 1;
            used = 0;
            if surface == limits.len() {
                return out;
            }
        }
        out.push(c);
        used += width;
    }
    out
}

/// Pad with styled spaces on the anchored side while the chain still fits.
///
/// Fixed directions always pad the opposite end of the growth direction's
/// anchor; a centred chain alternates, front first.
fn pad_to_fill(content: &mut Vec<StyledChar>, limits: &[u32], direction: ChainDirection) {
    if !fits(content, limits) {
        return;
    }
    let mut front = true;
    loop {
        let at_front = match direction {
            ChainDirection::Left => true,
            ChainDirection::Right => false,
            ChainDirection::None => front,
        };
        let template = if at_front {
            content.first().copied()
        } else {
            content.last().copied()
        };
        let Some(template) = template else {
            return;
        };
        let pad = template.as_space();
        if at_front {
            content.insert(0, pad);
        } else {
            content.push(pad);
        }
        if !fits(content, limits) {
            if at_front {
                content.remove(0);
            } else {
                content.pop();
            }
            return;
        }
        front = !front;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signvar_style::ChatColor;

    fn text(raw: &str) -> StyledText {
        StyledText::from(raw)
    }

    fn plain(lines: &[StyledText]) -> Vec<String> {
        lines.iter().map(StyledText::plain_text).collect()
    }

    fn run(value: &str, surfaces: usize, direction: ChainDirection, wrap: bool) -> Vec<StyledText> {
        let empty = StyledText::new();
        let value = text(value);
        layout_lines(
            &LayoutInput {
                prefix: &empty,
                value: &value,
                postfix: &empty,
                surfaces,
                direction,
                wraparound: wrap,
            },
            90,
        )
    }

    #[test]
    fn single_surface_no_direction_is_verbatim() {
        let lines = run("hello", 1, ChainDirection::None, false);
        assert_eq!(plain(&lines), vec!["hello"]);
    }

    #[test]
    fn empty_value_becomes_one_space() {
        let lines = run("", 1, ChainDirection::None, false);
        assert_eq!(plain(&lines), vec![" "]);
        let wrapped = run("", 2, ChainDirection::None, true);
        assert!(wrapped.iter().all(|l| l.width() > 0));
    }

    #[test]
    fn exact_limit_fits() {
        // 15 * 6 = 90
        let lines = run(&"a".repeat(15), 2, ChainDirection::Right, false);
        assert_eq!(lines[0].plain_text(), "a".repeat(15));
        // the second surface is filled with padding only
        assert!(lines[1].plain_text().chars().all(|c| c == ' '));
    }

    #[test]
    fn overflow_moves_to_next_surface() {
        let lines = run(&"a".repeat(16), 2, ChainDirection::Right, false);
        assert_eq!(lines[0].plain_text(), "a".repeat(15));
        assert!(lines[1].plain_text().starts_with('a'));
    }

    #[test]
    fn right_direction_pads_at_end() {
        let lines = run("ab", 1, ChainDirection::Right, false);
        let line = lines[0].plain_text();
        assert!(line.starts_with("ab"));
        assert!(lines[0].width() <= 90);
        assert!(lines[0].width() > 90 - 4);
    }

    #[test]
    fn left_direction_pads_at_front() {
        let lines = run("ab", 1, ChainDirection::Left, false);
        assert!(lines[0].plain_text().ends_with("ab"));
        assert!(lines[0].plain_text().starts_with(' '));
    }

    #[test]
    fn centred_padding_alternates_front_first() {
        let lines = run("ab", 2, ChainDirection::None, false);
        let joined: String = plain(&lines).concat();
        let lead = joined.chars().take_while(|c| *c == ' ').count();
        let trail = joined.chars().rev().take_while(|c| *c == ' ').count();
        assert!(lead == trail || lead == trail + 1, "lead {lead} trail {trail}");
    }

    #[test]
    fn padding_inherits_edge_style() {
        let value = StyledText::parse("\u{00A7}cx", Style::default());
        let empty = StyledText::new();
        let lines = layout_lines(
            &LayoutInput {
                prefix: &empty,
                value: &value,
                postfix: &empty,
                surfaces: 1,
                direction: ChainDirection::Left,
                wraparound: false,
            },
            90,
        );
        assert!(lines[0].iter().all(|c| c.style() == Style::new(ChatColor::Red)));
    }

    #[test]
    fn wraparound_fills_every_surface() {
        // "ab" is 12 wide; three surfaces of 90 hold 15 glyphs each.
        let lines = run("ab", 3, ChainDirection::None, true);
        for line in &lines {
            assert_eq!(line.width(), 90);
        }
        assert_eq!(lines[0].plain_text(), "abababababababa");
        assert!(lines[1].plain_text().starts_with('b'));
    }

    #[test]
    fn wraparound_200_over_three_surfaces() {
        // 'a' = 6 px: 34 glyphs = 204 px, shorter than 270
        let lines = run(&"a".repeat(34), 3, ChainDirection::Right, true);
        for line in &lines {
            assert!(line.width() <= 90);
            assert!(line.width() + 6 > 90, "under-filled surface");
        }
    }

    #[test]
    fn surplus_surfaces_get_empty_lines() {
        let lines = run("hi", 3, ChainDirection::Right, false);
        assert_eq!(lines.len(), 3);
        let long = run(&"a".repeat(100), 2, ChainDirection::Right, false);
        assert_eq!(long.len(), 2);
        assert_eq!(long[1].plain_text(), "a".repeat(15));
    }

    #[test]
    fn prefix_and_postfix_reserve_width() {
        let prefix = text("<<");
        let postfix = text(">>");
        let value = text(&"a".repeat(20));
        let lines = layout_lines(
            &LayoutInput {
                prefix: &prefix,
                value: &value,
                postfix: &postfix,
                surfaces: 1,
                direction: ChainDirection::None,
                wraparound: false,
            },
            90,
        );
        let line = lines[0].plain_text();
        assert!(line.starts_with("<<a"));
        assert!(line.ends_with("a>>"));
        assert!(lines[0].width() <= 90);
    }

    #[test]
    fn layout_is_deterministic() {
        let a = run("deterministic", 3, ChainDirection::None, false);
        let b = run("deterministic", 3, ChainDirection::None, false);
        assert_eq!(a, b);
    }

    #[test]
    fn encode_lines_starts_each_line_fresh() {
        let lines = vec![
            StyledText::parse("\u{00A7}cab", Style::default()),
            StyledText::parse("\u{00A7}ccd", Style::default()),
        ];
        let encoded = encode_lines(&lines, Style::default());
        assert_eq!(encoded, vec!["\u{00A7}cab", "\u{00A7}ccd"]);
    }
}
