use std::thread;
use std::time::Duration;

use beep::beep;

use vip8_core::Audio;

/// Square-wave beeper backed by the `beep` crate. The tone is started on
/// the calling thread and silenced from a short-lived helper thread so the
/// trigger never blocks a CPU cycle.
pub struct Beeper;

impl Audio for Beeper {
    fn play(&mut self, frequency: u16, duration: Duration) {
        if beep(frequency).is_ok() {
            thread::spawn(move || {
                thread::sleep(duration);
                let _ = beep(0);
            });
        }
    }
}
