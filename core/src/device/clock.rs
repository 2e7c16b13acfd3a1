/// Gate Array clock sequencer.
///
/// A 4-bit counter stepped at 16 MHz. Every derived clock in the machine —
/// the 4 MHz CPU clock, the 1 MHz CRTC character clock, the PSG and FDC
/// clocks, READY/WAIT and the DRAM address multiplexer setting — is a fixed
/// decode of this counter, frozen here as 16-entry tables.
///
/// The hardware implements the counter as an 8-bit shift register cycling
/// 0xFF, 0xFE, 0xFC, ... 0x7F; the reset combination (M1, IORQ and RD all
/// low with RESET high) never occurs on a Z80, so the sequence free-runs.
pub struct ClockSequencer {
    state: u8,
}

/// 4 MHz CPU clock level: (S1 ^ S3) | (S5 ^ S7), latched one step late.
const PHI: [bool; 16] = [
    true, false, false, true, true, false, false, true, true, false, false, true, true, false,
    false, true,
];

/// Sub-ticks on which the CPU clock changes phase.
const CPU_EDGE: [bool; 16] = [
    false, true, false, true, false, true, false, true, false, true, false, true, false, true,
    false, true,
];

/// 1 MHz character clock: !(S2 | S5).
const CCLK: [bool; 16] = [
    false, false, false, false, false, false, true, true, true, true, true, false, false, false,
    false, false,
];

/// Address bit overlaid into the RAM address during the two video fetches
/// of each character cycle (even byte, then odd byte).
const CCLK_BIT: [u16; 16] = [0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0];

/// Gate Array READY output (the Z80 #WAIT line).
const READY: [bool; 16] = [
    true, false, false, false, false, false, false, false, false, false, false, false, true, true,
    true, true,
];

/// I/O latch enable: !(S2 & S3 & !IORQ), with the IORQ term resolved by the
/// caller.
const E244: [bool; 16] = [
    false, false, false, true, true, true, true, true, true, true, true, true, false, false,
    false, false,
];

/// Address multiplexer: video address to DRAM (true) or CPU address (false).
const MUX: [bool; 16] = [
    true, true, true, true, true, true, true, true, true, true, false, false, false, false, false,
    false,
];

impl ClockSequencer {
    pub fn new() -> Self {
        Self { state: 0 }
    }

    /// Advance one 16 MHz step.
    pub fn advance(&mut self) {
        self.state = (self.state + 1) & 0x0F;
    }

    pub fn state(&self) -> u8 {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = 0;
    }

    pub fn phi(&self) -> bool {
        PHI[self.state as usize]
    }

    /// True on every other sub-tick (half-phase boundary of the CPU clock).
    pub fn cpu_edge(&self) -> bool {
        CPU_EDGE[self.state as usize]
    }

    /// Rising edge of the 4 MHz CPU clock: one T-state boundary.
    pub fn cpu_tick(&self) -> bool {
        self.state & 0x03 == 0x03
    }

    pub fn cclk(&self) -> bool {
        CCLK[self.state as usize]
    }

    pub fn cclk_bit(&self) -> u16 {
        CCLK_BIT[self.state as usize]
    }

    pub fn ready(&self) -> bool {
        READY[self.state as usize]
    }

    pub fn io_latch_enabled(&self) -> bool {
        E244[self.state as usize]
    }

    pub fn mux_video(&self) -> bool {
        MUX[self.state as usize]
    }

    /// PSG clock: 1 MHz, one pulse per sequence.
    pub fn psg_clock(&self) -> bool {
        self.state == 0
    }

    /// FDC clock: 8 MHz (every even sub-tick).
    pub fn fdc_clock(&self) -> bool {
        self.state & 1 == 0
    }

    /// The CRTC character clock edge the Gate Array acts on.
    pub fn crtc_clock(&self) -> bool {
        self.state == 0x0B
    }
}

impl Default for ClockSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixteen_subticks_per_microsecond() {
        let mut seq = ClockSequencer::new();
        for _ in 0..16 {
            seq.advance();
        }
        assert_eq!(seq.state(), 0);
    }

    #[test]
    fn phi_has_one_edge_per_two_subticks() {
        let mut seq = ClockSequencer::new();
        let mut prev = seq.phi();
        for pair in 0..8 {
            let mut edges = 0;
            for _ in 0..2 {
                seq.advance();
                if seq.phi() != prev {
                    edges += 1;
                }
                prev = seq.phi();
            }
            assert_eq!(edges, 1, "pair {}", pair);
        }
    }

    #[test]
    fn cpu_runs_at_four_mhz() {
        let mut seq = ClockSequencer::new();
        let ticks = (0..16)
            .filter(|_| {
                seq.advance();
                seq.cpu_tick()
            })
            .count();
        assert_eq!(ticks, 4);
    }

    #[test]
    fn psg_clock_is_one_mhz() {
        let mut seq = ClockSequencer::new();
        let mut pulses = 0;
        for _ in 0..64 {
            seq.advance();
            if seq.psg_clock() {
                pulses += 1;
            }
        }
        assert_eq!(pulses, 4);
    }

    #[test]
    fn video_fetch_overlay_tracks_cclk() {
        // The overlay bit is only ever raised while CCLK is high.
        let mut seq = ClockSequencer::new();
        for _ in 0..16 {
            seq.advance();
            if seq.cclk_bit() != 0 {
                assert!(seq.cclk());
            }
        }
    }

    #[test]
    fn ready_window_matches_wait_protocol() {
        // READY falls after sub-tick 0 and rises again at sub-tick 12.
        let mut seq = ClockSequencer::new();
        assert!(seq.ready());
        seq.advance(); // s = 1
        assert!(!seq.ready());
        for _ in 0..11 {
            seq.advance();
        }
        assert_eq!(seq.state(), 0x0C);
        assert!(seq.ready());
    }
}
