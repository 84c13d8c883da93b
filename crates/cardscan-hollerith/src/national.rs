//! National character substitutions.
//!
//! IBM installations redrew a few little-used EBCDIC graphics as national
//! letters. A code page table cannot know which, so the substitution is an
//! explicit post-processing step chosen by the caller.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum National {
    /// Plain code page output.
    #[default]
    None,
    /// Danish installations: `#` is Æ, `@` is Ø, `$` is Å.
    Danish,
}

impl National {
    fn substitutions(self) -> &'static [(char, char)] {
        match self {
            National::None => &[],
            National::Danish => &[('#', 'Æ'), ('@', 'Ø'), ('$', 'Å')],
        }
    }

    #[inline]
    pub fn map_char(self, ch: char) -> char {
        self.substitutions()
            .iter()
            .find(|(from, _)| *from == ch)
            .map_or(ch, |(_, to)| *to)
    }

    pub fn apply(self, text: &str) -> String {
        text.chars().map(|c| self.map_char(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn danish_replaces_three_graphics() {
        assert_eq!(National::Danish.apply("#@$ A#"), "ÆØÅ AÆ");
        assert_eq!(National::None.apply("#@$"), "#@$");
    }
}
