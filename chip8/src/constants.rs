//! Constant values of the CHIP-8 family architecture.

/// Total addressable memory.
pub const MEM_SIZE: usize = 0x1000; // 4096

/// Programs load at 0x200; the lower 512 bytes historically held the
/// RCA CDP1802 interpreter and now hold font data.
pub const PROGRAM_BASE: usize = 0x200;

/// ETI-660 hosts load programs at 0x600 instead.
pub const ETI_BASE: usize = 0x600;

/// Number of general purpose registers V0..VF.
pub const REGISTER_COUNT: usize = 16;

/// Number of HP-RPL user flag registers R0..R7 (CHIP-48 on HP-48).
pub const USER_FLAG_COUNT: usize = 8;

/// Levels of nesting allowed in the call stack.
pub const STACK_SIZE: usize = 16;

/// Number of keys on the hex keypad (0x0-0xF).
pub const KEY_COUNT: usize = 16;

/// Video memory size in bytes. 128x64 high-res needs 0x400 bytes; four
/// extra scan lines of guard bytes keep scrolling and edge draws in
/// bounds.
pub const VIDEO_SIZE: usize = 0x440;

/// Bytes of video memory actually displayed in high-res mode.
pub const VIDEO_BYTES: usize = 0x400;

/// Bytes per scan line in 64x32 mode.
pub const LOW_PITCH: usize = 8;

/// Bytes per scan line in 128x64 mode.
pub const HIGH_PITCH: usize = 16;

/// Default instructions-per-second. The CDP1802 ran at 1.76 MHz with
/// 16-24 clocks per instruction, a bit over 70k instructions a second;
/// 700 is the conventional emulation baseline.
pub const BASE_SPEED: u64 = 700;

/// Speed adjustment bounds and step.
pub const MIN_SPEED: u64 = 100;
pub const MAX_SPEED: u64 = 15000;
pub const SPEED_STEP: u64 = 200;

/// Delay and sound timers count down at 60 Hz.
pub const TIMER_HZ: u64 = 60;

#[doc(hidden)]
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Small 4x5 font sprites, 5 bytes per glyph, 16 glyphs.
pub const SMALL_FONT_BASE: usize = 0x000;

/// Large 8x10 font sprites (Super-CHIP), 10 bytes per glyph.
pub const LARGE_FONT_BASE: usize = 0x050;

/// Single-byte scan line patterns indexed by CHIP-8E glyph nibbles.
pub const ROW_FONT_BASE: usize = 0x0F0;

/// Packed 6-bit ASCII glyph table (64 characters, 3 bytes each).
pub const ASCII_TABLE_BASE: usize = 0x100;

/// Scratch area where `LD A, Vx` unpacks a glyph.
pub const ASCII_SCRATCH_BASE: usize = 0x1C0;

/// Type for 12-bit memory addresses.
pub type Address = u16;
