pub use chip8::{Chip8, FileLoader, Peripherals, ProgramLoader};
pub use config::{Config, Quirks, Rgb, ShiftQuirk};
pub use error::{ConfigError, Error, Result};
pub use instruction::{disassemble, listing, Instruction, Row};
pub use keypad::{KeyState, Keypad};
pub use memory::Memory;
pub use scheduler::{Scheduler, Timestep};
pub use screen::{Display, Screen, SharedScreen};
pub use sound::{Sound, Tone};
pub use state::State;

mod chip8;
pub mod config;
pub mod constants;
mod error;
mod instruction;
mod keypad;
mod memory;
mod opcode;
mod operations;
mod scheduler;
mod screen;
mod sound;
pub mod state;
