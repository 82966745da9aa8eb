/// # Keypad
///
/// The 16-key input source. Tracks the most recently accepted key (or none)
/// rather than the full pressed set: a press is honored only if at least
/// `debounce_window` cycles have elapsed since the last accepted change, so
/// one physical press is not re-read on every cycle of a slow poll loop.
/// Key-up events clear the state immediately, debounce or not.
pub struct Keypad {
    resolved: Option<u8>,
    cycles_since_accept: u32,
    debounce_window: u32,
}

impl Keypad {
    pub fn new(debounce_window: u32) -> Self {
        Keypad {
            resolved: None,
            // Nothing has been accepted yet, so the first press goes through
            cycles_since_accept: debounce_window,
            debounce_window,
        }
    }

    /// Advance the debounce clock; called once per CPU cycle, including
    /// cycles stalled in key-wait mode.
    pub fn tick(&mut self) {
        self.cycles_since_accept = self.cycles_since_accept.saturating_add(1);
    }

    /// Report a key press. Suppressed while inside the debounce window.
    pub fn key_down(&mut self, key: u8) {
        if self.cycles_since_accept >= self.debounce_window {
            self.resolved = Some(key);
            self.cycles_since_accept = 0;
        }
    }

    /// Report a key release. Takes effect immediately.
    pub fn key_up(&mut self, key: u8) {
        if self.resolved == Some(key) {
            self.resolved = None;
        }
    }

    /// The currently resolved key, 0-15 or none.
    pub fn resolved(&self) -> Option<u8> {
        self.resolved
    }

    /// Consume the resolved key, clearing it. Used when a key-wait
    /// resolves so the next wait needs a fresh press.
    pub fn take_resolved(&mut self) -> Option<u8> {
        self.resolved.take()
    }
}
