use std::fs::File;
use std::io::BufReader;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use log::info;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use vip8_core::constants::TIMER_HZ;
use vip8_core::{Chip8, Config};
use vip8_display::Display;

use crate::audio::Beeper;
use crate::keymap::keymap;
use crate::Args;

/// The driver: one outer tick per 60Hz frame runs `cycles_per_tick` CPU
/// cycles, decrements the timers once, presents the framebuffer when a
/// draw is pending, and sleeps off the remainder of the frame.
pub fn run(args: &Args) -> anyhow::Result<()> {
    let config = Config {
        seed: args.seed,
        debounce_window: args.debounce_window,
    };
    let mut chip8 = Chip8::new(config, Box::new(Beeper));

    let file = File::open(&args.rom)
        .with_context(|| format!("unable to open {}", args.rom.display()))?;
    chip8
        .load_rom(&mut BufReader::new(file))
        .context("unable to load rom")?;

    let sdl = sdl2::init().map_err(|e| anyhow!(e))?;
    let mut display = Display::new(&sdl, args.scale).map_err(|e| anyhow!(e))?;
    let mut events = sdl.event_pump().map_err(|e| anyhow!(e))?;

    let tick_time = Duration::from_micros(1_000_000 / u64::from(TIMER_HZ));

    'tick: loop {
        let tick_start = Instant::now();

        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'tick,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(code) = keymap(key) {
                        chip8.key_press(code);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(code) = keymap(key) {
                        chip8.key_release(code);
                    }
                }
                _ => {}
            }
        }

        for _ in 0..args.cycles_per_tick {
            chip8.step().context("emulation halted")?;
        }
        chip8.tick_timers();

        if let Some(frame) = chip8.take_frame() {
            display.render(frame).map_err(|e| anyhow!(e))?;
        }

        if let Some(rest) = tick_time.checked_sub(tick_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    info!("quit requested; shutting down");
    Ok(())
}
