//! Prelude
pub use crate::gpio::ll::RegisterFile as _;
pub use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};
