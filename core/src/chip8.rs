use std::io::Read;
use std::time::Duration;

use log::{info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::Audio;
use crate::constants::{
    BEEP_DURATION_MS, BEEP_FREQUENCY, DEFAULT_DEBOUNCE_WINDOW, MAX_ROM_SIZE, MEMORY_SIZE,
    PROGRAM_START,
};
use crate::error::VmError;
use crate::framebuffer::FrameBuffer;
use crate::instruction;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::operations::Peripherals;
use crate::state::State;

/// Tunables that are policy, not architecture: a seed to make the Cxnn
/// random byte source reproducible, and the key debounce window in cycles.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub seed: Option<u64>,
    pub debounce_window: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: None,
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
        }
    }
}

/// # Chip8
///
/// The virtual machine: memory, registers, stack, delay timer, program
/// counter, and framebuffer, driven one instruction per `step`. The audio
/// trigger and the key-state source are injected collaborators; the random
/// byte source is a seedable capability.
///
/// Supplies interfaces for:
/// - loading program images
/// - pressing and releasing keys (debounced by the keypad)
/// - advancing the CPU one cycle at a time
/// - decrementing the delay timer at the driver's 60Hz tick
/// - taking the framebuffer when a draw is pending
pub struct Chip8 {
    state: State,
    keypad: Keypad,
    rng: StdRng,
    audio: Box<dyn Audio>,
}

impl Chip8 {
    pub fn new(config: Config, audio: Box<dyn Audio>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8 {
            state: State::new(),
            keypad: Keypad::new(config.debounce_window),
            rng,
            audio,
        }
    }

    /// Load a raw program image verbatim at 0x200.
    ///
    /// Returns the number of bytes loaded; images larger than the space
    /// above 0x200 are rejected.
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<usize, VmError> {
        let mut image = Vec::new();
        reader.read_to_end(&mut image)?;
        if image.len() > MAX_ROM_SIZE {
            return Err(VmError::RomTooLarge {
                size: image.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + image.len()].copy_from_slice(&image);
        info!("loaded {} byte rom at {:#05X}", image.len(), PROGRAM_START);
        Ok(image.len())
    }

    /// Run one cycle: fetch, decode, and execute a single instruction.
    ///
    /// While in key-wait mode the cycle is consumed without fetching; the
    /// wait ends when the keypad resolves a key, which is written to the
    /// waiting register. Every fault is fatal; the caller must stop driving
    /// the machine after an `Err`.
    pub fn step(&mut self) -> Result<(), VmError> {
        self.keypad.tick();

        if let Some(register) = self.state.register_needing_key {
            // Consume the key so back-to-back waits need separate presses
            if let Some(key) = self.keypad.take_resolved() {
                self.state.v[register as usize] = key;
                self.state.register_needing_key = None;
            }
            return Ok(());
        }

        let pc = self.state.pc;
        if pc < PROGRAM_START || pc as usize + 1 >= MEMORY_SIZE {
            return Err(VmError::PcOutOfRange { pc });
        }

        let op = self.fetch();
        trace!(
            "{:04X} pc={:04X} i={:04X} v={:02X?}",
            op.word(),
            pc,
            self.state.i,
            self.state.v
        );
        let execute = instruction::decode(op).ok_or(VmError::UnknownOpcode {
            opcode: op.word(),
            pc,
        })?;
        let mut io = Peripherals {
            key: self.keypad.resolved(),
            rng: &mut self.rng,
        };
        self.state = execute(op, &self.state, &mut io)?;

        if self.state.beep_flag {
            self.state.beep_flag = false;
            self.audio
                .play(BEEP_FREQUENCY, Duration::from_millis(BEEP_DURATION_MS));
        }
        Ok(())
    }

    /// Decrement the delay timer toward zero. Driven at a fixed 60Hz by the
    /// outer loop, independent of how many cycles ran in the interval.
    pub fn tick_timers(&mut self) {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }
    }

    /// Forward a key press to the keypad; subject to its debounce policy.
    pub fn key_press(&mut self, key: u8) {
        self.keypad.key_down(key);
    }

    /// Forward a key release to the keypad; takes effect immediately.
    pub fn key_release(&mut self, key: u8) {
        self.keypad.key_up(key);
    }

    /// The framebuffer, if a clear or draw happened since the last take.
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Memory is stored as bytes but instructions are 16-bit big-endian
    /// words, so combine two subsequent bytes.
    fn fetch(&self) -> Opcode {
        let hi = u16::from(self.state.memory[self.state.pc as usize]);
        let lo = u16::from(self.state.memory[self.state.pc as usize + 1]);
        Opcode::from(hi << 8 | lo)
    }
}

#[cfg(test)]
mod test_chip8 {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::audio::NullAudio;

    fn chip8() -> Chip8 {
        Chip8::new(Config::default(), Box::new(NullAudio))
    }

    fn chip8_with_program(program: &[u8]) -> Chip8 {
        let mut chip8 = chip8();
        chip8.load_rom(&mut &program[..]).unwrap();
        chip8
    }

    struct CountingAudio(Rc<RefCell<u32>>);

    impl Audio for CountingAudio {
        fn play(&mut self, _frequency: u16, _duration: Duration) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_fetches_big_endian_word() {
        let chip8 = chip8_with_program(&[0xAA, 0xBB]);
        assert_eq!(chip8.fetch().word(), 0xAABB);
    }

    #[test]
    fn test_load_rom_reports_size() {
        let mut chip8 = chip8();
        let loaded = chip8.load_rom(&mut &[0x00u8, 0xE0][..]).unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(chip8.state.memory[0x200..0x202], [0x00, 0xE0]);
    }

    #[test]
    fn test_load_rom_rejects_oversized_image() {
        let mut chip8 = chip8();
        let image = vec![0u8; MAX_ROM_SIZE + 1];
        let result = chip8.load_rom(&mut &image[..]);
        assert!(matches!(result, Err(VmError::RomTooLarge { .. })));
    }

    #[test]
    fn test_load_rom_accepts_a_full_image() {
        let mut chip8 = chip8();
        let image = vec![0u8; MAX_ROM_SIZE];
        assert_eq!(chip8.load_rom(&mut &image[..]).unwrap(), MAX_ROM_SIZE);
    }

    #[test]
    fn test_step_advances_pc() {
        let mut chip8 = chip8_with_program(&[0x00, 0xE0]);
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_step_faults_on_unknown_opcode() {
        let mut chip8 = chip8_with_program(&[0xFF, 0xFF]);
        let result = chip8.step();
        assert!(matches!(
            result,
            Err(VmError::UnknownOpcode {
                opcode: 0xFFFF,
                pc: 0x200
            })
        ));
    }

    #[test]
    fn test_step_faults_when_pc_leaves_the_program_range() {
        let mut chip8 = chip8();
        chip8.state.pc = 0x1FE;
        assert!(matches!(
            chip8.step(),
            Err(VmError::PcOutOfRange { pc: 0x1FE })
        ));
        chip8.state.pc = 0xFFF;
        assert!(matches!(
            chip8.step(),
            Err(VmError::PcOutOfRange { pc: 0xFFF })
        ));
    }

    #[test]
    fn test_recursive_call_overflows_the_stack() {
        // 0x200 calls itself forever
        let mut chip8 = chip8_with_program(&[0x22, 0x00]);
        for _ in 0..15 {
            chip8.step().unwrap();
        }
        assert!(matches!(chip8.step(), Err(VmError::StackOverflow { .. })));
    }

    #[test]
    fn test_wait_mode_stalls_until_a_key_resolves() {
        let mut chip8 = chip8_with_program(&[0xF1, 0x0A, 0x00, 0xE0]);
        chip8.step().unwrap();
        assert_eq!(chip8.state.register_needing_key, Some(0x1));
        assert_eq!(chip8.state.pc, 0x202);

        // Stalls as long as no key resolves
        for _ in 0..5 {
            chip8.step().unwrap();
            assert_eq!(chip8.state.pc, 0x202);
        }

        chip8.key_press(0xE);
        chip8.step().unwrap();
        assert_eq!(chip8.state.register_needing_key, None);
        assert_eq!(chip8.state.v[0x1], 0xE);

        // The next cycle executes normally again
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x204);
    }

    #[test]
    fn test_consecutive_waits_need_separate_presses() {
        let mut chip8 = chip8_with_program(&[0xF1, 0x0A, 0xF2, 0x0A]);
        chip8.step().unwrap();
        chip8.key_press(0xA);
        chip8.step().unwrap();
        assert_eq!(chip8.state.v[0x1], 0xA);

        // The accepted press was consumed by the first wait, so the
        // second wait stalls until a fresh press arrives
        chip8.step().unwrap();
        assert_eq!(chip8.state.register_needing_key, Some(0x2));
        chip8.step().unwrap();
        assert_eq!(chip8.state.register_needing_key, Some(0x2));

        chip8.key_press(0xB);
        chip8.step().unwrap();
        assert_eq!(chip8.state.register_needing_key, None);
        assert_eq!(chip8.state.v[0x2], 0xB);
    }

    #[test]
    fn test_key_press_during_debounce_window_is_suppressed() {
        let mut chip8 = chip8_with_program(&[0x00, 0xE0]);
        chip8.key_press(0x1);
        chip8.key_press(0x2);
        assert_eq!(chip8.keypad.resolved(), Some(0x1));
    }

    #[test]
    fn test_key_release_clears_immediately() {
        let mut chip8 = chip8();
        chip8.key_press(0x1);
        chip8.key_release(0x1);
        assert_eq!(chip8.keypad.resolved(), None);
    }

    #[test]
    fn test_tick_timers_floors_at_zero() {
        let mut chip8 = chip8();
        chip8.state.delay_timer = 1;
        chip8.tick_timers();
        assert_eq!(chip8.state.delay_timer, 0);
        chip8.tick_timers();
        assert_eq!(chip8.state.delay_timer, 0);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = Config {
            seed: Some(42),
            ..Config::default()
        };
        let mut a = Chip8::new(config, Box::new(NullAudio));
        let mut b = Chip8::new(config, Box::new(NullAudio));
        let program = [0xC0, 0xFF, 0xC1, 0xFF];
        a.load_rom(&mut &program[..]).unwrap();
        b.load_rom(&mut &program[..]).unwrap();
        for _ in 0..2 {
            a.step().unwrap();
            b.step().unwrap();
        }
        assert_eq!(a.state.v[0x0], b.state.v[0x0]);
        assert_eq!(a.state.v[0x1], b.state.v[0x1]);
    }

    #[test]
    fn test_beep_fires_the_audio_collaborator_once() {
        let beeps = Rc::new(RefCell::new(0));
        let mut chip8 = Chip8::new(Config::default(), Box::new(CountingAudio(Rc::clone(&beeps))));
        chip8.load_rom(&mut &[0xF0, 0x18, 0x00, 0xE0][..]).unwrap();
        chip8.step().unwrap();
        assert_eq!(*beeps.borrow(), 1);
        assert!(!chip8.state.beep_flag);
        chip8.step().unwrap();
        assert_eq!(*beeps.borrow(), 1);
    }

    #[test]
    fn test_draws_font_glyph_at_origin() {
        // I = 0 (glyph '0'), draw 5 rows at (V0, V0) = (0, 0)
        let mut chip8 = chip8_with_program(&[0xA0, 0x00, 0xD0, 0x05]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.v[0xF], 0x0);
        let frame = chip8.take_frame().expect("draw should leave a frame");
        for (row, byte) in [0xF0u8, 0x90, 0x90, 0x90, 0xF0].iter().enumerate() {
            for bit in 0..8 {
                assert_eq!(frame.pixel(bit, row), (byte >> (7 - bit)) & 0x1);
            }
        }
    }

    #[test]
    fn test_take_frame_clears_the_pending_draw() {
        let mut chip8 = chip8_with_program(&[0x00, 0xE0]);
        assert!(chip8.take_frame().is_none());
        chip8.step().unwrap();
        assert!(chip8.take_frame().is_some());
        assert!(chip8.take_frame().is_none());
    }
}
