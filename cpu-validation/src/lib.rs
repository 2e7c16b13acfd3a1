//! Z80 single-step validation support.
//!
//! Runs the CPU against the community single-step test vectors (one JSON
//! file per opcode, each with a few thousand randomized cases of initial
//! state, final state and bus traffic). The vectors are not shipped with
//! the repository; point `Z80_TESTS_DIR` at a checkout of them and the
//! suite picks them up, transparently handling `.json` and `.json.gz`.

use std::io::Read;
use std::path::{Path, PathBuf};

use arnold_core::core::{Bus, BusMaster, bus::InterruptState};
use serde::Deserialize;

/// One side of a test case: registers plus sparse RAM contents.
#[derive(Debug, Deserialize)]
pub struct Z80CpuState {
    pub pc: u16,
    pub sp: u16,
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub f: u8,
    pub h: u8,
    pub l: u8,
    pub i: u8,
    pub r: u8,
    pub ix: u16,
    pub iy: u16,
    pub af_: u16,
    pub bc_: u16,
    pub de_: u16,
    pub hl_: u16,
    pub wz: u16,
    pub iff1: u8,
    pub iff2: u8,
    pub im: u8,
    pub ram: Vec<(u16, u8)>,
}

#[derive(Debug, Deserialize)]
pub struct Z80TestCase {
    pub name: String,
    pub initial: Z80CpuState,
    #[serde(rename = "final")]
    pub final_state: Z80CpuState,
    /// Port traffic: (address, value, "r" | "w").
    #[serde(default)]
    pub ports: Vec<(u16, u8, String)>,
}

/// Flat 64KB bus that also serves scripted port reads and records port
/// writes, so I/O instructions can be validated.
pub struct TracingBus {
    pub memory: Vec<u8>,
    pub port_reads: Vec<(u16, u8)>,
    pub port_writes: Vec<(u16, u8)>,
}

impl TracingBus {
    pub fn new() -> Self {
        Self {
            memory: vec![0; 0x10000],
            port_reads: Vec::new(),
            port_writes: Vec::new(),
        }
    }
}

impl Default for TracingBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for TracingBus {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        self.memory[addr as usize] = data;
    }

    fn io_read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        // Scripted reads are consumed in order; an exhausted script reads
        // as an open bus.
        match self
            .port_reads
            .iter()
            .position(|&(port, _)| port == addr)
        {
            Some(index) => self.port_reads.remove(index).1,
            None => 0xFF,
        }
    }

    fn io_write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        self.port_writes.push((addr, data));
    }

    fn interrupt_ack(&mut self, _master: BusMaster) -> u8 {
        0xFF
    }

    fn is_halted_for(&self, _master: BusMaster) -> bool {
        false
    }

    fn check_interrupts(&self, _target: BusMaster) -> InterruptState {
        InterruptState::default()
    }
}

/// Location of the test vectors, if configured.
pub fn tests_dir() -> Option<PathBuf> {
    std::env::var_os("Z80_TESTS_DIR").map(PathBuf::from)
}

/// Load one vector file (`.json` or `.json.gz`).
pub fn load_cases(path: &Path) -> std::io::Result<Vec<Z80TestCase>> {
    let raw = std::fs::read(path)?;
    let text = if path.extension().is_some_and(|ext| ext == "gz") {
        let mut decoder = flate2::read::GzDecoder::new(&raw[..]);
        let mut out = String::new();
        decoder.read_to_string(&mut out)?;
        out
    } else {
        String::from_utf8(raw).map_err(|e| std::io::Error::other(e.to_string()))?
    };
    serde_json::from_str(&text).map_err(|e| std::io::Error::other(e.to_string()))
}
