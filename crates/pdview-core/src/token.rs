//! Line tokenizer and positional field access.

use crate::error::LineError;

/// Message terminator that ends every Pd directive.
pub const TERMINATOR: char = ';';

/// Splits a line into whitespace-separated tokens, dropping empty ones.
///
/// The trailing `;` is kept on the last token; extractors strip it only where
/// they convert that token to a number.
///
/// ```rust
/// use pdview_core::tokenize;
///
/// assert_eq!(tokenize("#X obj  10 20 tgl;"), vec!["#X", "obj", "10", "20", "tgl;"]);
/// assert!(tokenize("   ").is_empty());
/// ```
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Removes one trailing terminator, if present.
#[inline]
pub fn strip_terminator(token: &str) -> &str {
    token.strip_suffix(TERMINATOR).unwrap_or(token)
}

/// Parses a finite `f32`. `nan` and `inf` are rejected.
pub(crate) fn parse_number(token: &str) -> Option<f32> {
    token.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Token slice with checked, typed positional access.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tokens<'a> {
    tokens: &'a [&'a str],
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(tokens: &'a [&'a str]) -> Self {
        Self { tokens }
    }

    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Fails with [`LineError::TooShort`] unless at least `needed` tokens exist.
    pub(crate) fn require(&self, kind: &'static str, needed: usize) -> Result<(), LineError> {
        if self.tokens.len() < needed {
            return Err(LineError::TooShort {
                kind,
                needed,
                found: self.tokens.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn str_at(&self, index: usize) -> Result<&'a str, LineError> {
        self.tokens
            .get(index)
            .copied()
            .ok_or(LineError::MissingToken { index })
    }

    /// Token at `index`, or `None` if the line is shorter.
    pub(crate) fn opt_str(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).copied()
    }

    /// Token at `index` with the terminator removed when it is the last one.
    pub(crate) fn field_at(&self, index: usize) -> Result<&'a str, LineError> {
        let token = self.str_at(index)?;
        if index + 1 == self.tokens.len() {
            Ok(strip_terminator(token))
        } else {
            Ok(token)
        }
    }

    pub(crate) fn f32_at(&self, index: usize) -> Result<f32, LineError> {
        let token = self.field_at(index)?;
        parse_number(token).ok_or_else(|| LineError::BadNumber {
            index,
            token: token.to_string(),
        })
    }

    /// The last token as a number, terminator stripped.
    pub(crate) fn last_f32(&self) -> Result<f32, LineError> {
        match self.tokens.len() {
            0 => Err(LineError::MissingToken { index: 0 }),
            n => self.f32_at(n - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_handles_tabs_and_crlf() {
        assert_eq!(tokenize("#X\tobj 1 2\r"), vec!["#X", "obj", "1", "2"]);
    }

    #[test]
    fn strip_terminator_removes_only_one() {
        assert_eq!(strip_terminator("5;"), "5");
        assert_eq!(strip_terminator("5;;"), "5;");
        assert_eq!(strip_terminator("5"), "5");
    }

    #[test]
    fn parse_number_rejects_non_finite() {
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("-0.5"), Some(-0.5));
        assert_eq!(parse_number("nan"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("tgl"), None);
    }

    #[test]
    fn f32_at_strips_terminator_on_last_token_only() {
        let raw = ["a", "1;", "2;"];
        let t = Tokens::new(&raw);
        assert!(matches!(t.f32_at(1), Err(LineError::BadNumber { index: 1, .. })));
        assert_eq!(t.f32_at(2), Ok(2.0));
        assert_eq!(t.last_f32(), Ok(2.0));
    }

    #[test]
    fn out_of_range_is_missing_token() {
        let raw = ["a"];
        let t = Tokens::new(&raw);
        assert_eq!(t.str_at(3), Err(LineError::MissingToken { index: 3 }));
        assert_eq!(t.opt_str(3), None);
        assert_eq!(
            t.require("toggle", 10),
            Err(LineError::TooShort {
                kind: "toggle",
                needed: 10,
                found: 1
            })
        );
    }
}
