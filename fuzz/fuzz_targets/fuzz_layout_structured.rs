#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use signvar_layout::{ChainDirection, LayoutInput, layout_lines};
use signvar_style::Style;
use signvar_text::StyledText;

#[derive(Arbitrary, Debug)]
struct LayoutCase {
    value: String,
    surfaces: u8,
    direction: u8,
    wraparound: bool,
    width_limit: u16,
}

fuzz_target!(|case: LayoutCase| {
    if case.value.len() > 512 {
        return;
    }
    let surfaces = usize::from(case.surfaces % 8) + 1;
    let direction = match case.direction % 3 {
        0 => ChainDirection::None,
        1 => ChainDirection::Left,
        _ => ChainDirection::Right,
    };
    let limit = u32::from(case.width_limit % 1024);
    let empty = StyledText::new();
    let value = StyledText::parse(&case.value, Style::default());
    let lines = layout_lines(
        &LayoutInput {
            prefix: &empty,
            value: &value,
            postfix: &empty,
            surfaces,
            direction,
            wraparound: case.wraparound,
        },
        limit,
    );
    assert_eq!(lines.len(), surfaces);
    for line in &lines {
        assert!(line.width() <= limit);
    }
});
