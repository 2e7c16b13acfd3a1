/// Cassette interface pulse source.
///
/// File parsing (CDT/CSW) happens outside the core; the deck consumes a
/// flat sequence of pulses, each a signal level held for a duration in
/// T-states. The machine decrements `sample` once per CPU clock and calls
/// `advance` on underflow.
#[derive(Clone, Copy, Debug)]
pub struct Pulse {
    /// Signal level byte; bit 6 is the EAR line.
    pub level: u8,
    /// Duration in T-states.
    pub length: u32,
}

pub struct TapeDeck {
    pulses: Vec<Pulse>,
    pub pointer: usize,
    pub playing: bool,
    /// Countdown to the next pulse boundary, decremented by the machine.
    pub sample: i32,
    /// Tape-counter position, settable as a rewind target.
    pub counter: usize,
    level: u8,

    /// EAR input capacitor: the line keeps its level briefly after the
    /// driver stops.
    ear_charge: u32,
}

const EAR_CHARGE: u32 = 5000;
const EAR_DECAY: u32 = 650;

impl TapeDeck {
    pub fn new() -> Self {
        Self {
            pulses: Vec::new(),
            pointer: 0,
            playing: false,
            sample: 0,
            counter: 0,
            level: 0,
            ear_charge: 0,
        }
    }

    /// Replace the loaded pulse sequence and rewind.
    pub fn insert(&mut self, pulses: Vec<Pulse>) {
        self.pulses = pulses;
        self.rewind(0);
    }

    pub fn eject(&mut self) {
        self.pulses.clear();
        self.rewind(0);
        self.playing = false;
    }

    pub fn is_loaded(&self) -> bool {
        !self.pulses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    /// Toggle playback.
    pub fn play(&mut self) {
        self.playing = !self.playing && self.is_loaded();
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn rewind(&mut self, position: usize) {
        self.pointer = position.min(self.pulses.len());
        self.sample = 0;
        self.level = 0;
    }

    pub fn reset_counter(&mut self) {
        self.counter = self.pointer;
    }

    /// Step to the next pulse and return its level byte. At the end of the
    /// tape, playback stops and the line goes quiet.
    pub fn advance(&mut self) -> u8 {
        match self.pulses.get(self.pointer) {
            Some(pulse) => {
                self.level = pulse.level;
                self.sample = pulse.length as i32;
                self.pointer += 1;
                self.level
            }
            None => {
                self.playing = false;
                self.level = 0;
                0
            }
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// EAR line seen through the input capacitor: a driven level recharges
    /// it, an idle line decays in fixed steps.
    pub fn ear_feedback(&mut self, driven: bool) -> bool {
        if driven {
            self.ear_charge = EAR_CHARGE;
        } else if self.ear_charge >= EAR_DECAY {
            self.ear_charge -= EAR_DECAY;
        } else {
            self.ear_charge = 0;
        }
        self.ear_charge > 0
    }
}

impl Default for TapeDeck {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pulses() -> Vec<Pulse> {
        vec![
            Pulse { level: 0x40, length: 2168 },
            Pulse { level: 0x00, length: 2168 },
            Pulse { level: 0x40, length: 667 },
        ]
    }

    #[test]
    fn advance_walks_pulses() {
        let mut deck = TapeDeck::new();
        deck.insert(test_pulses());
        deck.play();
        assert!(deck.playing);

        assert_eq!(deck.advance(), 0x40);
        assert_eq!(deck.sample, 2168);
        assert_eq!(deck.advance(), 0x00);
        assert_eq!(deck.advance(), 0x40);

        // Running off the end stops the deck.
        assert_eq!(deck.advance(), 0x00);
        assert!(!deck.playing);
    }

    #[test]
    fn rewind_to_counter() {
        let mut deck = TapeDeck::new();
        deck.insert(test_pulses());
        deck.advance();
        deck.reset_counter();
        deck.advance();
        deck.advance();
        deck.rewind(deck.counter);
        assert_eq!(deck.pointer, 1);
    }

    #[test]
    fn play_requires_tape() {
        let mut deck = TapeDeck::new();
        deck.play();
        assert!(!deck.playing);
    }

    #[test]
    fn ear_capacitor_decays() {
        let mut deck = TapeDeck::new();
        assert!(deck.ear_feedback(true));
        let mut held = 0;
        while deck.ear_feedback(false) {
            held += 1;
            assert!(held < 100);
        }
        // 5000 charge at 650 per step: seven idle steps before the line drops.
        assert_eq!(held, 7);
    }
}
