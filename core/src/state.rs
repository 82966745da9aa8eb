use crate::constants::{FONT_SPRITES, MEMORY_SIZE, PROGRAM_START, STACK_DEPTH};
use crate::framebuffer::FrameBuffer;

/// A snapshot of the whole machine, transformed functionally: every
/// instruction takes one `State` and produces the next.
///
/// ## CPU
/// - (v) 16 8-bit registers V0..VF; VF doubles as the flag output of
///   arithmetic and drawing instructions
/// - (i) the 16-bit index register, not masked to the 12-bit address space
/// - (pc) the 16-bit program counter; valid only within [0x200, 0xFFF)
/// - (sp) the stack pointer; 0 is the empty sentinel, calls increment
///   before storing, returns load before decrementing
///
/// ## Memory
/// - 4096 bytes of RAM with the font table at the bottom and the program
///   image from 0x200 up
/// - 16 return address slots
///
/// ## Timing and I/O
/// - the delay timer, decremented at 60Hz by the driver while nonzero
/// - `draw_flag`/`beep_flag`, raised by 00E0/DXYN and FX18 for the driver
///   and audio collaborator to consume after the instruction commits
/// - `register_needing_key`, the explicit FX0A wait mode: while set, cycles
///   are consumed without fetching until the keypad resolves a key
#[derive(Copy, Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub stack: [u16; STACK_DEPTH],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub beep_flag: bool,
    pub register_needing_key: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        // The font sprite table occupies the lowest addresses so that
        // glyph x lives at x * 5
        let mut memory = [0; MEMORY_SIZE];
        memory[..FONT_SPRITES.len()].copy_from_slice(&FONT_SPRITES);

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            stack: [0; STACK_DEPTH],
            memory,
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            beep_flag: false,
            register_needing_key: None,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test_state {
    use super::*;

    #[test]
    fn test_font_is_preloaded_at_the_bottom() {
        let state = State::new();
        // Glyph '0'
        assert_eq!(state.memory[0..5], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        // Glyph 'F'
        assert_eq!(state.memory[75..80], [0xF0, 0x80, 0xF0, 0x80, 0x80]);
    }

    #[test]
    fn test_pc_starts_at_program_start() {
        assert_eq!(State::new().pc, 0x200);
    }
}
