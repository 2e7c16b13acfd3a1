/// Generic CPU interface. The per-T-state clock entry lives on the
/// concrete CPU (`Z80::execute_cycle`): the CPC has a single bus master
/// and the board calls it directly.
pub trait Cpu: CpuStateTrait {
    /// Reset vector fetch
    fn reset(&mut self);

    /// Query if CPU is halted internally (HALT instruction)
    fn is_sleeping(&self) -> bool;
}

// Re-export state types
pub mod state;
pub use state::{CpuStateTrait, Z80State};

// Z80 CPU
pub mod z80;
pub use z80::Z80;
