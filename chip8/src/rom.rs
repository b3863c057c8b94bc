//! Reserved memory image and built-in ROMs.
//!
//! The lower 512 bytes of CHIP-8 memory historically held the CDP1802
//! interpreter. This emulator fills the region with the data the
//! instruction set actually reaches into: the small 4x5 hex font at
//! 0x000 (`LD F, Vx`), the large 8x10 font at 0x050 (`LD HF, Vx`), the
//! sixteen scan line patterns at 0x0F0 and the packed 6-bit ASCII glyph
//! table at 0x100 used by the CHIP-8E `LD A, Vx`, and the unpack
//! scratch at 0x1C0.
use crate::constants::*;

/// The 6-bit ASCII character set of the CHIP-8E, in table order.
pub const ASCII_CHARSET: &str =
    "@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_ !\"#$%&'()*+,-./0123456789:;<=>?";

/// Small 4x5 font, 5 bytes per glyph for 0..F.
#[rustfmt::skip]
const SMALL_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Large 8x10 font (Super-CHIP), 10 bytes per glyph for 0..F.
#[rustfmt::skip]
const LARGE_FONT: [u8; 160] = [
    0x3C, 0x7E, 0xE7, 0xC3, 0xC3, 0xC3, 0xC3, 0xE7, 0x7E, 0x3C, // 0
    0x18, 0x38, 0x58, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x3C, // 1
    0x3E, 0x7F, 0xC3, 0x06, 0x0C, 0x18, 0x30, 0x60, 0xFF, 0xFF, // 2
    0x3C, 0x7E, 0xC3, 0x03, 0x0E, 0x0E, 0x03, 0xC3, 0x7E, 0x3C, // 3
    0x06, 0x0E, 0x1E, 0x36, 0x66, 0xC6, 0xFF, 0xFF, 0x06, 0x06, // 4
    0xFF, 0xFF, 0xC0, 0xC0, 0xFC, 0xFE, 0x03, 0xC3, 0x7E, 0x3C, // 5
    0x3E, 0x7C, 0xC0, 0xC0, 0xFC, 0xFE, 0xC3, 0xC3, 0x7E, 0x3C, // 6
    0xFF, 0xFF, 0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x60, 0x60, // 7
    0x3C, 0x7E, 0xC3, 0xC3, 0x7E, 0x7E, 0xC3, 0xC3, 0x7E, 0x3C, // 8
    0x3C, 0x7E, 0xC3, 0xC3, 0x7F, 0x3F, 0x03, 0x03, 0x3E, 0x7C, // 9
    0x7E, 0xFF, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, 0xC3, 0xC3, 0xC3, // A
    0xFC, 0xFE, 0xC3, 0xC3, 0xFE, 0xFE, 0xC3, 0xC3, 0xFE, 0xFC, // B
    0x3C, 0x7E, 0xC3, 0xC0, 0xC0, 0xC0, 0xC0, 0xC3, 0x7E, 0x3C, // C
    0xFC, 0xFE, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xFE, 0xFC, // D
    0xFF, 0xFF, 0xC0, 0xC0, 0xFC, 0xFC, 0xC0, 0xC0, 0xFF, 0xFF, // E
    0xFF, 0xFF, 0xC0, 0xC0, 0xFC, 0xFC, 0xC0, 0xC0, 0xC0, 0xC0, // F
];

/// The sixteen 5-pixel-wide scan line patterns the 6-bit ASCII glyphs
/// are built from. Glyph nibbles index this table.
#[rustfmt::skip]
const ROW_PATTERNS: [u8; 16] = [
    0x00, // .....
    0xF8, // #####
    0x88, // #...#
    0x80, // #....
    0x08, // ....#
    0x70, // .###.
    0x20, // ..#..
    0x50, // .#.#.
    0xA8, // #.#.#
    0x90, // #..#.
    0x48, // .#..#
    0xF0, // ####.
    0x78, // .####
    0xC0, // ##...
    0x18, // ...##
    0x40, // .#...
];

/// Row pattern indices for each character of [`ASCII_CHARSET`], top to
/// bottom. All glyphs are five rows tall.
#[rustfmt::skip]
const GLYPH_ROWS: [[u8; 5]; 64] = [
    [0x5, 0x2, 0x8, 0x3, 0x5], // @
    [0x5, 0x2, 0x1, 0x2, 0x2], // A
    [0xB, 0x2, 0xB, 0x2, 0xB], // B
    [0x5, 0x3, 0x3, 0x3, 0x5], // C
    [0xB, 0x2, 0x2, 0x2, 0xB], // D
    [0x1, 0x3, 0xB, 0x3, 0x1], // E
    [0x1, 0x3, 0xB, 0x3, 0x3], // F
    [0x5, 0x3, 0x8, 0x2, 0x5], // G
    [0x2, 0x2, 0x1, 0x2, 0x2], // H
    [0x5, 0x6, 0x6, 0x6, 0x5], // I
    [0x4, 0x4, 0x4, 0x2, 0x5], // J
    [0x2, 0x9, 0xD, 0x9, 0x2], // K
    [0x3, 0x3, 0x3, 0x3, 0x1], // L
    [0x2, 0x8, 0x8, 0x2, 0x2], // M
    [0x2, 0x2, 0x8, 0x2, 0x2], // N
    [0x5, 0x2, 0x2, 0x2, 0x5], // O
    [0xB, 0x2, 0xB, 0x3, 0x3], // P
    [0x5, 0x2, 0x2, 0x9, 0xA], // Q
    [0xB, 0x2, 0xB, 0x9, 0x2], // R
    [0xC, 0x3, 0x5, 0x4, 0xB], // S
    [0x1, 0x6, 0x6, 0x6, 0x6], // T
    [0x2, 0x2, 0x2, 0x2, 0x5], // U
    [0x2, 0x2, 0x2, 0x7, 0x6], // V
    [0x2, 0x2, 0x8, 0x8, 0x2], // W
    [0x2, 0x7, 0x6, 0x7, 0x2], // X
    [0x2, 0x7, 0x6, 0x6, 0x6], // Y
    [0x1, 0x4, 0x6, 0xF, 0x1], // Z
    [0xB, 0x3, 0x3, 0x3, 0xB], // [
    [0x3, 0xF, 0x6, 0xE, 0x4], // \
    [0xC, 0x4, 0x4, 0x4, 0xC], // ]
    [0x6, 0x7, 0x2, 0x0, 0x0], // ^
    [0x0, 0x0, 0x0, 0x0, 0x1], // _
    [0x0, 0x0, 0x0, 0x0, 0x0], // space
    [0x6, 0x6, 0x6, 0x0, 0x6], // !
    [0x7, 0x7, 0x0, 0x0, 0x0], // "
    [0x7, 0x1, 0x7, 0x1, 0x7], // #
    [0x6, 0x5, 0x6, 0x5, 0x6], // $
    [0x9, 0x4, 0x6, 0x3, 0xA], // %
    [0x5, 0x9, 0x6, 0x8, 0xC], // &
    [0x6, 0x6, 0x0, 0x0, 0x0], // '
    [0x6, 0xF, 0x3, 0xF, 0x6], // (
    [0x6, 0x4, 0x4, 0x4, 0x6], // )
    [0x0, 0x7, 0x6, 0x7, 0x0], // *
    [0x0, 0x6, 0x1, 0x6, 0x0], // +
    [0x0, 0x0, 0x0, 0x6, 0xF], // ,
    [0x0, 0x0, 0x5, 0x0, 0x0], // -
    [0x0, 0x0, 0x0, 0x0, 0x6], // .
    [0x4, 0xE, 0x6, 0xD, 0x3], // /
    [0x5, 0x2, 0x8, 0x2, 0x5], // 0
    [0x6, 0x6, 0x6, 0x6, 0x5], // 1
    [0x5, 0x4, 0x6, 0x3, 0x1], // 2
    [0x1, 0x4, 0x5, 0x4, 0x1], // 3
    [0x2, 0x2, 0x1, 0x4, 0x4], // 4
    [0x1, 0x3, 0xB, 0x4, 0xB], // 5
    [0x5, 0x3, 0xB, 0x2, 0x5], // 6
    [0x1, 0x4, 0x6, 0xF, 0xF], // 7
    [0x5, 0x2, 0x5, 0x2, 0x5], // 8
    [0x5, 0x2, 0xC, 0x4, 0x5], // 9
    [0x0, 0x6, 0x0, 0x6, 0x0], // :
    [0x0, 0x6, 0x0, 0x6, 0xF], // ;
    [0xE, 0x6, 0xF, 0x6, 0xE], // <
    [0x0, 0x5, 0x0, 0x5, 0x0], // =
    [0xD, 0x6, 0x4, 0x6, 0xD], // >
    [0x5, 0x4, 0x6, 0x0, 0x6], // ?
];

/// Build the pristine reserved region `[0, 0x200)`.
///
/// Glyphs pack three bytes per character: `AB CD EF`, unpacked as
/// `EF CD AB` where the high nibble of `EF` is the glyph height and the
/// remaining five nibbles index [`ROW_PATTERNS`], bottom rows in `AB`.
pub(crate) fn reserved_image() -> [u8; PROGRAM_BASE] {
    let mut image = [0u8; PROGRAM_BASE];

    image[SMALL_FONT_BASE..SMALL_FONT_BASE + SMALL_FONT.len()].copy_from_slice(&SMALL_FONT);
    image[LARGE_FONT_BASE..LARGE_FONT_BASE + LARGE_FONT.len()].copy_from_slice(&LARGE_FONT);
    image[ROW_FONT_BASE..ROW_FONT_BASE + ROW_PATTERNS.len()].copy_from_slice(&ROW_PATTERNS);

    for (i, rows) in GLYPH_ROWS.iter().enumerate() {
        let at = ASCII_TABLE_BASE + i * 3;
        image[at] = rows[3] << 4 | rows[4];
        image[at + 1] = rows[1] << 4 | rows[2];
        image[at + 2] = 5 << 4 | rows[0];
    }

    image
}

/// ROM shown when nothing is loaded: draws an "8" glyph and spins.
#[rustfmt::skip]
pub const BOOT: &[u8] = &[
    0x60, 0x1C,       // LD   V0, #1C
    0x61, 0x0D,       // LD   V1, #0D
    0x62, 0x08,       // LD   V2, #08
    0xF2, 0x29,       // LD   F, V2
    0xD0, 0x15,       // DRW  V0, V1, 5
    0x12, 0x0A,       // JP   #020A
];

/// ROM installed after a failed load so the VM always has something to
/// run: clear the screen, then spin.
#[rustfmt::skip]
pub const DUMMY: &[u8] = &[
    0x00, 0xE0,       // CLS
    0x12, 0x02,       // JP   #0202
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reserved_layout() {
        let image = reserved_image();

        // "0" small glyph.
        assert_eq!(&image[0..5], &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        // Large font directly follows at 0x50.
        assert_eq!(image[LARGE_FONT_BASE], 0x3C);
        // Every glyph stores height 5 in the high nibble of its third byte.
        for i in 0..64 {
            assert_eq!(image[ASCII_TABLE_BASE + i * 3 + 2] >> 4, 5);
        }
        // Scratch area is untouched.
        assert_eq!(&image[ASCII_SCRATCH_BASE..ASCII_SCRATCH_BASE + 5], &[0; 5]);
    }

    #[test]
    fn test_charset_covers_table() {
        assert_eq!(ASCII_CHARSET.len(), GLYPH_ROWS.len());
    }
}
