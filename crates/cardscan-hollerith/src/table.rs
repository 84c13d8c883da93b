//! Hollerith hole patterns and their EBCDIC codes.
//!
//! Patterns are 12-bit values: row 12 (the top "zone" row) is bit 11 and
//! row 9 (the bottom digit row) is bit 0. Equivalently, physical row `r`
//! (1-based, top to bottom) has weight `1 << (12 - r)`.
//!
//! The table comes from Open-SIMH. It is a bijection between 256 hole
//! patterns and the 256 EBCDIC bytes; every other pattern is unmapped.

#![allow(clippy::unreadable_literal)]

/// Number of distinct 12-bit patterns.
pub const PATTERN_COUNT: usize = 1 << 12;

const TABLE: [u16; 256] = [
    0b101100000011, 0b100100000001, 0b100010000001, 0b100001000001, // 0x00
    0b100000100001, 0b100000010001, 0b100000001001, 0b100000000101, // 0x04
    0b100000000011, 0b100100000011, 0b100010000011, 0b100001000011, // 0x08
    0b100000100011, 0b100000010011, 0b100000001011, 0b100000000111, // 0x0c
    0b110100000011, 0b010100000001, 0b010010000001, 0b010001000001, // 0x10
    0b010000100001, 0b010000010001, 0b010000001001, 0b010000000101, // 0x14
    0b010000000011, 0b010100000011, 0b010010000011, 0b010001000011, // 0x18
    0b010000100011, 0b010000010011, 0b010000001011, 0b010000000111, // 0x1c
    0b011100000011, 0b001100000001, 0b001010000001, 0b001001000001, // 0x20
    0b001000100001, 0b001000010001, 0b001000001001, 0b001000000101, // 0x24
    0b001000000011, 0b001100000011, 0b001010000011, 0b001001000011, // 0x28
    0b001000100011, 0b001000010011, 0b001000001011, 0b001000000111, // 0x2c
    0b111100000011, 0b000100000001, 0b000010000001, 0b000001000001, // 0x30
    0b000000100001, 0b000000010001, 0b000000001001, 0b000000000101, // 0x34
    0b000000000011, 0b000100000011, 0b000010000011, 0b000001000011, // 0x38
    0b000000100011, 0b000000010011, 0b000000001011, 0b000000000111, // 0x3c
    0b000000000000, 0b101100000001, 0b101010000001, 0b101001000001, // 0x40
    0b101000100001, 0b101000010001, 0b101000001001, 0b101000000101, // 0x44
    0b101000000011, 0b100100000010, 0b100010000010, 0b100001000010, // 0x48
    0b100000100010, 0b100000010010, 0b100000001010, 0b100000000110, // 0x4c
    0b100000000000, 0b110100000001, 0b110010000001, 0b110001000001, // 0x50
    0b110000100001, 0b110000010001, 0b110000001001, 0b110000000101, // 0x54
    0b110000000011, 0b010100000010, 0b010010000010, 0b010001000010, // 0x58
    0b010000100010, 0b010000010010, 0b010000001010, 0b010000000110, // 0x5c
    0b010000000000, 0b001100000000, 0b011010000001, 0b011001000001, // 0x60
    0b011000100001, 0b011000010001, 0b011000001001, 0b011000000101, // 0x64
    0b011000000011, 0b001100000010, 0b110000000000, 0b001001000010, // 0x68
    0b001000100010, 0b001000010010, 0b001000001010, 0b001000000110, // 0x6c
    0b111000000000, 0b111100000001, 0b111010000001, 0b111001000001, // 0x70
    0b111000100001, 0b111000010001, 0b111000001001, 0b111000000101, // 0x74
    0b111000000011, 0b000100000010, 0b000010000010, 0b000001000010, // 0x78
    0b000000100010, 0b000000010010, 0b000000001010, 0b000000000110, // 0x7c
    0b101100000010, 0b101100000000, 0b101010000000, 0b101001000000, // 0x80
    0b101000100000, 0b101000010000, 0b101000001000, 0b101000000100, // 0x84
    0b101000000010, 0b101000000001, 0b101010000010, 0b101001000010, // 0x88
    0b101000100010, 0b101000010010, 0b101000001010, 0b101000000110, // 0x8c
    0b110100000010, 0b110100000000, 0b110010000000, 0b110001000000, // 0x90
    0b110000100000, 0b110000010000, 0b110000001000, 0b110000000100, // 0x94
    0b110000000010, 0b110000000001, 0b110010000010, 0b110001000010, // 0x98
    0b110000100010, 0b110000010010, 0b110000001010, 0b110000000110, // 0x9c
    0b011100000010, 0b011100000000, 0b011010000000, 0b011001000000, // 0xa0
    0b011000100000, 0b011000010000, 0b011000001000, 0b011000000100, // 0xa4
    0b011000000010, 0b011000000001, 0b011010000010, 0b011001000010, // 0xa8
    0b011000100010, 0b011000010010, 0b011000001010, 0b011000000110, // 0xac
    0b111100000010, 0b111100000000, 0b111010000000, 0b111001000000, // 0xb0
    0b111000100000, 0b111000010000, 0b111000001000, 0b111000000100, // 0xb4
    0b111000000010, 0b111000000001, 0b111010000010, 0b111001000010, // 0xb8
    0b111000100010, 0b111000010010, 0b111000001010, 0b111000000110, // 0xbc
    0b101000000000, 0b100100000000, 0b100010000000, 0b100001000000, // 0xc0
    0b100000100000, 0b100000010000, 0b100000001000, 0b100000000100, // 0xc4
    0b100000000010, 0b100000000001, 0b101010000011, 0b101001000011, // 0xc8
    0b101000100011, 0b101000010011, 0b101000001011, 0b101000000111, // 0xcc
    0b011000000000, 0b010100000000, 0b010010000000, 0b010001000000, // 0xd0
    0b010000100000, 0b010000010000, 0b010000001000, 0b010000000100, // 0xd4
    0b010000000010, 0b010000000001, 0b110010000011, 0b110001000011, // 0xd8
    0b110000100011, 0b110000010011, 0b110000001011, 0b110000000111, // 0xdc
    0b001010000010, 0b011100000001, 0b001010000000, 0b001001000000, // 0xe0
    0b001000100000, 0b001000010000, 0b001000001000, 0b001000000100, // 0xe4
    0b001000000010, 0b001000000001, 0b011010000011, 0b011001000011, // 0xe8
    0b011000100011, 0b011000010011, 0b011000001011, 0b011000000111, // 0xec
    0b001000000000, 0b000100000000, 0b000010000000, 0b000001000000, // 0xf0
    0b000000100000, 0b000000010000, 0b000000001000, 0b000000000100, // 0xf4
    0b000000000010, 0b000000000001, 0b111010000011, 0b111001000011, // 0xf8
    0b111000100011, 0b111000010011, 0b111000001011, 0b111000000111, // 0xfc
];

/// Hole pattern for each EBCDIC byte, indexed by the byte.
pub static HOLLERITH_BY_EBCDIC: [u16; 256] = TABLE;

const UNMAPPED: u16 = 0x100;

const fn build_dense() -> [u16; PATTERN_COUNT] {
    let mut dense = [UNMAPPED; PATTERN_COUNT];
    let mut code = 0;
    while code < TABLE.len() {
        dense[TABLE[code] as usize] = code as u16;
        code += 1;
    }
    dense
}

static EBCDIC_BY_HOLLERITH: [u16; PATTERN_COUNT] = build_dense();

/// EBCDIC byte for a hole pattern, `None` when the pattern is unmapped
/// (or wider than 12 bits).
#[inline]
pub fn lookup(pattern: u16) -> Option<u8> {
    match EBCDIC_BY_HOLLERITH.get(pattern as usize) {
        Some(&code) if code != UNMAPPED => Some(code as u8),
        _ => None,
    }
}

/// EBCDIC byte for a hole pattern; unmapped patterns give `0x00`.
#[inline]
pub fn ebcdic_from_hollerith(pattern: u16) -> u8 {
    lookup(pattern).unwrap_or(0x00)
}

/// Hole pattern that punches the given EBCDIC byte.
#[inline]
pub fn hollerith_from_ebcdic(code: u8) -> u16 {
    HOLLERITH_BY_EBCDIC[code as usize]
}

/// Iterate over all `(pattern, code)` pairs in EBCDIC order.
pub fn entries() -> impl Iterator<Item = (u16, u8)> {
    HOLLERITH_BY_EBCDIC
        .iter()
        .enumerate()
        .map(|(code, &pattern)| (pattern, code as u8))
}
