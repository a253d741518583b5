use log::warn;

pub const KEY_COUNT: usize = 16;

/// The 16-key hex pad. The frontend feeds press/release events in and
/// the interpreter only ever reads: key states for EX9E/EXA1 and the
/// per-poll "last pressed" edge to resume a machine waiting on FX0A.
pub struct Keypad {
    keys: [bool; KEY_COUNT],
    last_pressed: Option<u8>,
}

impl Keypad {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
            last_pressed: None,
        }
    }

    /// Clears the edge value. The frontend calls this at the start of
    /// every polling step so `last_pressed` only reports keys that went
    /// down during the current cycle.
    pub fn begin_poll(&mut self) {
        self.last_pressed = None;
    }

    pub fn press(&mut self, key: u8) {
        if let Some(state) = self.keys.get_mut(key as usize) {
            *state = true;
            self.last_pressed = Some(key);
        }
    }

    pub fn release(&mut self, key: u8) {
        if let Some(state) = self.keys.get_mut(key as usize) {
            *state = false;
        }
    }

    /// Out-of-range codes are reported as not pressed, with a
    /// diagnostic.
    pub fn is_pressed(&self, key: u8) -> bool {
        match self.keys.get(key as usize) {
            Some(&state) => state,
            None => {
                warn!("key code {key:#04x} is outside the 16-key pad");
                false
            }
        }
    }

    /// The key that went down during the current polling cycle, if any.
    pub fn last_pressed(&self) -> Option<u8> {
        self.last_pressed
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release_round_trip() {
        let mut pad = Keypad::new();
        assert!(!pad.is_pressed(0xA));
        pad.press(0xA);
        assert!(pad.is_pressed(0xA));
        pad.release(0xA);
        assert!(!pad.is_pressed(0xA));
    }

    #[test]
    fn last_pressed_is_a_per_poll_edge() {
        let mut pad = Keypad::new();
        assert_eq!(pad.last_pressed(), None);
        pad.press(0x4);
        assert_eq!(pad.last_pressed(), Some(0x4));

        // held key: the state survives the poll boundary, the edge
        // does not
        pad.begin_poll();
        assert_eq!(pad.last_pressed(), None);
        assert!(pad.is_pressed(0x4));
    }

    #[test]
    fn out_of_range_codes_read_as_not_pressed() {
        let mut pad = Keypad::new();
        pad.press(0x10); // ignored
        assert!(!pad.is_pressed(0x10));
        assert!(!pad.is_pressed(0xFF));
        assert_eq!(pad.last_pressed(), None);
    }
}
