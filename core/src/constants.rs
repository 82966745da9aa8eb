/// Display dimensions in pixels
pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Total addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Where programs are loaded; everything below is interpreter/font area
pub const PROGRAM_START: u16 = 0x200;

/// Largest program image that fits between PROGRAM_START and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Return address stack entries; slot 0 is the empty sentinel
pub const STACK_DEPTH: usize = 16;

/// Each font glyph is 5 bytes tall
pub const FONT_GLYPH_BYTES: u16 = 5;

/// Timers are decremented at 60Hz regardless of CPU throughput
pub const TIMER_HZ: u32 = 60;

/// CPU cycles executed per 60Hz tick; a throughput knob, not a correctness one
pub const DEFAULT_CYCLES_PER_TICK: u32 = 10;

/// Cycles that must elapse before a new key press is accepted
pub const DEFAULT_DEBOUNCE_WINDOW: u32 = 3;

/// FX18 beep parameters handed to the audio collaborator
pub const BEEP_FREQUENCY: u16 = 440;
pub const BEEP_DURATION_MS: u64 = 100;

/// Built-in font: 16 glyphs (0-F) of 5 bytes each, preloaded at address 0
/// so that glyph x lives at x * 5.
pub const FONT_SPRITES: [u8; 80] = [
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
