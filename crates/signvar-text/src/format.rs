#![forbid(unsafe_code)]

//! Best-effort matcher for `%name%` variable references.
//!
//! Formatting never fails: anything that is not a well-formed reference is
//! emitted as literal text.
//!
//! | Input          | Pieces                                   |
//! |----------------|------------------------------------------|
//! | `a %b% c`      | `Literal("a ")`, `Variable("b")`, `Literal(" c")` |
//! | `100%%`        | `Literal("100")`, `Literal("%")`         |
//! | `%no space%`   | `Literal("%")`, `Literal("no space")`, `Literal("%")` |
//! | `50% off`      | `Literal("50")`, `Literal("% off")`      |

use smallvec::SmallVec;

/// One piece of a format string, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatPiece<'a> {
    Literal(&'a str),
    Variable(&'a str),
}

/// Streaming matcher over a format string, yielding pieces left to right.
#[derive(Debug, Clone)]
pub struct FormatMatcher<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> FormatMatcher<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }
}

impl<'a> Iterator for FormatMatcher<'a> {
    type Item = FormatPiece<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.input.get(self.pos..)?;
        if rest.is_empty() {
            return None;
        }
        let start = self.pos;
        let Some(open) = rest.find('%') else {
            self.pos = self.input.len();
            return Some(FormatPiece::Literal(rest));
        };
        if open > 0 {
            self.pos = start + open;
            return Some(FormatPiece::Literal(&rest[..open]));
        }
        // `rest` starts with '%'.
        let Some(close) = rest[1..].find('%').map(|i| i + 1) else {
            self.pos = self.input.len();
            return Some(FormatPiece::Literal(rest));
        };
        let name = &rest[1..close];
        if name.is_empty() {
            self.pos = start + close + 1;
            return Some(FormatPiece::Literal(&rest[..1]));
        }
        if name.contains(char::is_whitespace) {
            self.pos = start + 1;
            return Some(FormatPiece::Literal(&rest[..1]));
        }
        self.pos = start + close + 1;
        Some(FormatPiece::Variable(name))
    }
}

/// A format string split into literal runs and variable names.
///
/// Adjacent literal pieces are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatToken {
    Literal(String),
    Variable(String),
}

/// Tokenise `format`, merging adjacent literals.
#[must_use]
pub fn tokenize(format: &str) -> SmallVec<[FormatToken; 4]> {
    let mut tokens: SmallVec<[FormatToken; 4]> = SmallVec::new();
    for piece in FormatMatcher::new(format) {
        match piece {
            FormatPiece::Literal(text) => {
                if let Some(FormatToken::Literal(last)) = tokens.last_mut() {
                    last.push_str(text);
                } else {
                    tokens.push(FormatToken::Literal(text.to_owned()));
                }
            }
            FormatPiece::Variable(name) => tokens.push(FormatToken::Variable(name.to_owned())),
        }
    }
    tokens
}

/// The literal placeholder shown for `name` (`%name%`).
#[must_use]
pub fn placeholder(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('%');
    out.push_str(name);
    out.push('%');
    out
}
