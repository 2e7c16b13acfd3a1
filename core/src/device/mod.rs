pub mod ay8910;
pub mod clock;
pub mod crtc6845;
pub mod fdc765;
pub mod gate_array;
pub mod ppi8255;
pub mod tape;

pub use ay8910::Ay8910;
pub use clock::ClockSequencer;
pub use crtc6845::Crtc6845;
pub use fdc765::Fdc765;
pub use gate_array::GateArray;
pub use ppi8255::Ppi8255;
pub use tape::TapeDeck;
