#![no_std]
extern crate alloc;

pub mod bus;
pub mod events;
pub mod simulator;

pub use bus::{PpuBus, Shown};
pub use events::{Stamped, VideoEvent};
pub use simulator::Simulator;
