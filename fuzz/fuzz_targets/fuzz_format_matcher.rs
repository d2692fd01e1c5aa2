#![no_main]

use libfuzzer_sys::fuzz_target;
use signvar_text::{FormatMatcher, FormatPiece, tokenize};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut consumed = 0;
    for piece in FormatMatcher::new(input) {
        match piece {
            FormatPiece::Literal(text) => {
                assert!(!text.is_empty());
                consumed += text.len();
            }
            FormatPiece::Variable(name) => {
                assert!(!name.is_empty());
                assert!(!name.contains('%'));
                assert!(!name.contains(char::is_whitespace));
                consumed += name.len() + 2;
            }
        }
    }
    assert!(consumed <= input.len());
    let _ = tokenize(input);
});
