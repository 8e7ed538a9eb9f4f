/// # Memory map
/// ```text
/// 0xFFF +-----------------------+ last valid address
///       |  program RAM          |
/// 0x200 +-----------------------+ PC starts here
///       |  free                 |
/// 0x0A0 +-----------------------+
///       |  font sprites         |
/// 0x050 +-----------------------+ Fx29 targets start here
///       |  reserved             |
/// 0x000 +-----------------------+
/// ```
pub const MEMORY_SIZE: usize = 0x1000;
pub const FONT_START: u16 = 0x050;
pub const PROGRAM_START: u16 = 0x200;

/// Bytes available to a program image.
pub const PROGRAM_CAPACITY: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;
pub const KEY_COUNT: usize = 16;

/// The flag register, VF
pub const FLAG: usize = 0xF;

/// Bytes per glyph in the sprite sheet
pub const GLYPH_SIZE: u16 = 5;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Timers are decremented at 60Hz
pub const TIMER_HZ: u32 = 60;
pub const CPU_HZ: u32 = 1000;

/// # Sprite sheet
/// Glyphs for the hex digits 0..F, 4 pixels wide and 5 rows tall.
/// Loaded at `FONT_START`.
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
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

/// # Fallback image
/// Loaded in place of a program that can't be read. Draws "C8" and spins.
#[rustfmt::skip]
pub const FALLBACK_IMAGE: [u8; 22] = [
    0x00, 0xE0, // 200 CLS
    0x60, 0x1A, // 202 LD V0, 0x1A
    0x61, 0x0D, // 204 LD V1, 0x0D
    0x62, 0x0C, // 206 LD V2, 0x0C
    0xF2, 0x29, // 208 LD F, V2
    0xD0, 0x15, // 20A DRW V0, V1, 5
    0x70, 0x06, // 20C ADD V0, 0x06
    0x62, 0x08, // 20E LD V2, 0x08
    0xF2, 0x29, // 210 LD F, V2
    0xD0, 0x15, // 212 DRW V0, V1, 5
    0x12, 0x14, // 214 JP 0x214
];
