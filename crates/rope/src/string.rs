use crate::error::Result;
use crate::rope::Rope;
use std::convert::Infallible;
use std::fmt::{self, Write};
use std::ops::Range;
use std::str::FromStr;

impl From<&str> for Rope<char> {
    fn from(s: &str) -> Self {
        s.chars().collect()
    }
}

impl From<String> for Rope<char> {
    fn from(s: String) -> Self {
        Rope::from(s.as_str())
    }
}

impl FromStr for Rope<char> {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Rope::from(s))
    }
}

impl fmt::Display for Rope<char> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self {
            f.write_char(*c)?;
        }
        Ok(())
    }
}

/// Conveniences for character ropes
///
/// Positions count `char`s, not bytes; no grapheme or normalization
/// handling is attempted.
impl Rope<char> {
    /// Inserts the characters of `s` before `pos`
    pub fn insert_str(&mut self, pos: usize, s: &str) -> Result<()> {
        self.insert_iter(pos, s.chars())
    }

    /// Returns the characters in `range` as a string
    pub fn substring(&self, range: Range<usize>) -> Result<String> {
        let mut gather = String::with_capacity(range.len());
        self.substring_store(range, &mut gather)?;
        Ok(gather)
    }

    /// Appends the characters in `range` to `buffer`
    pub fn substring_store(&self, range: Range<usize>, buffer: &mut String) -> Result<()> {
        buffer.extend(self.range(range)?);
        Ok(())
    }
}
