#![no_main]

use libfuzzer_sys::fuzz_target;
use signvar_style::Style;
use signvar_text::StyledText;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let text = StyledText::parse(&raw, Style::default());
    assert!(text.plain_text().chars().count() <= raw.chars().count());

    let encoded = text.encode(Style::default());
    let _ = StyledText::parse(&encoded, Style::default());

    let offset = data.first().map_or(0, |b| *b as isize - 128);
    assert_eq!(text.rotated(offset).len(), text.len());
    assert_eq!(text.blanked().len(), text.len());
    assert!(text.truncated_to_width(90).width() <= 90);
});
