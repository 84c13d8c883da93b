//! Punch-code tables for 80-column cards.
//!
//! A card column is a 12-bit hole pattern (see [`table`] for the bit order).
//! Patterns map to EBCDIC bytes through the embedded Hollerith table, and
//! bytes map to text through a [`CodePage`]. Decoding is total: unmapped
//! patterns become `0x00`, which the code page turns into `'\0'`.
//!
//! ```
//! use cardscan_hollerith::{decode_text, encode_text, CodePage};
//!
//! let punches = encode_text("HELLO", CodePage::Cp037).expect("encodable");
//! assert_eq!(punches[0], 0b100000000010); // 12-8
//! assert_eq!(decode_text(&punches, CodePage::Cp037), "HELLO");
//! ```

mod codepage;
mod national;
pub mod table;

pub use codepage::CodePage;
pub use national::National;
pub use table::{ebcdic_from_hollerith, hollerith_from_ebcdic, lookup};

/// Number of hole rows on a card.
pub const ROWS: usize = 12;

/// Number of columns on a card.
pub const COLUMNS: usize = 80;

/// Keypunch names of the physical rows, top to bottom.
pub const ROW_LABELS: [&str; ROWS] = ["12", "11", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Keypunch notation for a pattern, e.g. `12-1` for `A`; empty for a blank column.
pub fn punch_label(pattern: u16) -> String {
    unpack_column(pattern)
        .iter()
        .zip(ROW_LABELS)
        .filter(|(punched, _)| **punched)
        .map(|(_, label)| label)
        .collect::<Vec<_>>()
        .join("-")
}

/// Pack one column of holes, physical row 1 first, into a 12-bit pattern.
pub fn pack_column(holes: &[bool; ROWS]) -> u16 {
    holes
        .iter()
        .fold(0u16, |acc, &punched| (acc << 1) | punched as u16)
}

/// Inverse of [`pack_column`]; bits above the 12th are ignored.
pub fn unpack_column(pattern: u16) -> [bool; ROWS] {
    std::array::from_fn(|row| pattern & (1 << (ROWS - 1 - row)) != 0)
}

/// EBCDIC bytes for a sequence of column patterns.
pub fn ebcdic_bytes(values: &[u16]) -> Vec<u8> {
    values.iter().map(|&v| ebcdic_from_hollerith(v)).collect()
}

/// Text for a sequence of column patterns, one character per column.
pub fn decode_text(values: &[u16], code_page: CodePage) -> String {
    values
        .iter()
        .map(|&v| code_page.decode_byte(ebcdic_from_hollerith(v)))
        .collect()
}

/// Punch patterns for `text`, or `None` if a character is not in the code page.
pub fn encode_text(text: &str, code_page: CodePage) -> Option<Vec<u16>> {
    text.chars()
        .map(|c| code_page.encode_char(c).map(hollerith_from_ebcdic))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_one_is_the_most_significant_bit() {
        let mut holes = [false; ROWS];
        holes[0] = true;
        assert_eq!(pack_column(&holes), 1 << 11);
        holes = [false; ROWS];
        holes[ROWS - 1] = true;
        assert_eq!(pack_column(&holes), 1);
        assert!(unpack_column(0b100100000000)[3]);
        assert_eq!(pack_column(&unpack_column(0b101010000011)), 0b101010000011);
    }

    #[test]
    fn decoding_never_fails() {
        let values = [0b111111111111, 0, 1 << 11];
        assert_eq!(ebcdic_bytes(&values), vec![0x00, 0x40, 0x50]);
        assert_eq!(decode_text(&values, CodePage::Cp037), "\0 &");
    }

    #[test]
    fn labels_use_keypunch_row_names() {
        assert_eq!(punch_label(0b100100000000), "12-1");
        assert_eq!(punch_label(0b000000100010), "4-8");
        assert_eq!(punch_label(0b101100000001), "12-0-1-9");
        assert_eq!(punch_label(0), "");
    }

    #[test]
    fn text_round_trips_through_punches() {
        let text = "PUNCHED CARD 1967, $12.50 (A+B)*C";
        let punches = encode_text(text, CodePage::Cp037).expect("encodable");
        assert_eq!(punches.len(), text.chars().count());
        assert_eq!(decode_text(&punches, CodePage::Cp037), text);
        assert!(encode_text("\u{20ac}", CodePage::Cp037).is_none());
    }
}
