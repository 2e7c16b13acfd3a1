pub mod core;
pub mod cpu;
pub mod device;

pub mod prelude {
    pub use crate::core::machine::{InputKey, Machine};
    pub use crate::core::{Bus, BusMaster, bus::InterruptState};
    pub use crate::cpu::Cpu;
}
