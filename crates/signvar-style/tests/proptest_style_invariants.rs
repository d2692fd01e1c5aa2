//! Property-based invariant tests for style transitions.
//!
//! 1. Replaying an emitted transition from `from` always lands on `to`.
//! 2. A transition between equal styles emits nothing.
//! 3. Emitted code sequences only ever contain valid codes.

use proptest::prelude::*;
use signvar_style::{ChatColor, ESCAPE, FormatFlags, Style, StyleCode};

// ── Helpers ─────────────────────────────────────────────────────────────

fn style_strategy() -> impl Strategy<Value = Style> {
    (0u8..16, 0u8..32).prop_map(|(color, bits)| {
        Style::new(ChatColor::from_index(color).unwrap())
            .with_formats(FormatFlags::from_bits_truncate(bits))
    })
}

fn replay(codes: &str, start: Style, base: Style) -> Style {
    let mut style = start;
    let mut chars = codes.chars();
    while let Some(ch) = chars.next() {
        assert_eq!(ch, ESCAPE);
        let code = chars.next().unwrap();
        style = style.apply(StyleCode::from_char(code).unwrap(), base);
    }
    style
}

proptest! {
    #[test]
    fn transition_replays_to_target(
        from in style_strategy(),
        to in style_strategy(),
        base in style_strategy(),
    ) {
        let mut out = String::new();
        to.write_transition(from, base, &mut out);
        prop_assert_eq!(replay(&out, from, base), to);
    }

    #[test]
    fn equal_styles_emit_nothing(style in style_strategy(), base in style_strategy()) {
        let mut out = String::new();
        style.write_transition(style, base, &mut out);
        prop_assert!(out.is_empty());
    }

    #[test]
    fn emitted_codes_decode(
        from in style_strategy(),
        to in style_strategy(),
        base in style_strategy(),
    ) {
        let mut out = String::new();
        to.write_transition(from, base, &mut out);
        for (i, ch) in out.chars().enumerate() {
            if i % 2 == 0 {
                prop_assert_eq!(ch, ESCAPE);
            } else {
                prop_assert!(StyleCode::from_char(ch).is_some());
            }
        }
    }
}
