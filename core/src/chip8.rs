use std::fmt::Write;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use log::{info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{Config, Quirks};
use crate::constants::{MEMORY_SIZE, PROGRAM_START};
use crate::error::{Error, Result};
use crate::instruction::{disassemble, listing, Instruction};
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::screen::Display;
use crate::sound::Sound;
use crate::state::State;

/// Reads program images.
pub trait ProgramLoader {
    fn load(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Loads program images from the filesystem.
#[derive(Copy, Clone, Debug, Default)]
pub struct FileLoader;

impl ProgramLoader for FileLoader {
    fn load(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

/// The collaborators a machine draws to, reads keys from and beeps with.
pub struct Peripherals {
    pub display: Box<dyn Display + Send>,
    pub keypad: Arc<dyn Keypad + Send + Sync>,
    pub sound: Box<dyn Sound + Send>,
}

impl Peripherals {
    pub fn new(
        display: impl Display + Send + 'static,
        keypad: Arc<dyn Keypad + Send + Sync>,
        sound: impl Sound + Send + 'static,
    ) -> Self {
        Peripherals {
            display: Box::new(display),
            keypad,
            sound: Box::new(sound),
        }
    }

    fn reset(&mut self, config: &Config) {
        self.display.reset(config);
        self.keypad.reset();
        self.sound.reset(config);
    }
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - processor `state`
///  - `memory`, the address space
///  - the `peripherals` instructions draw to and read keys from
///
/// Supplies interfaces for:
/// - booting and reloading from a `Config`
/// - advancing the CPU by one instruction
/// - advancing the timers by one tick
pub struct Chip8 {
    pub(crate) state: State,
    pub(crate) memory: Memory,
    pub(crate) peripherals: Peripherals,
    pub(crate) quirks: Quirks,
    pub(crate) rng: StdRng,
}

impl Chip8 {
    /// A machine with no program loaded.
    pub fn new(peripherals: Peripherals, quirks: Quirks) -> Self {
        Chip8 {
            state: State::new(),
            memory: Memory::new(),
            peripherals,
            quirks,
            rng: StdRng::from_entropy(),
        }
    }

    /// A machine running the program at `config.rom_path`, or the fallback
    /// image if it can't be loaded.
    pub fn boot(config: &Config, peripherals: Peripherals, loader: &dyn ProgramLoader) -> Self {
        let mut chip8 = Chip8::new(peripherals, config.quirks);
        chip8.reload(config, loader);
        chip8
    }

    /// Rebuilds processor state and memory from `config` and resets the peripherals.
    pub fn reload(&mut self, config: &Config, loader: &dyn ProgramLoader) {
        self.state = State::new();
        self.memory = load_memory(&config.rom_path, loader);
        self.quirks = config.quirks;
        self.peripherals.reset(config);
    }

    /// Replaces the random source, e.g. to make `RND` reproducible.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Fetches, decodes and executes a single instruction.
    pub fn step(&mut self) -> Result<()> {
        let pc = self.state.pc;
        let word = self.state.fetch_instruction(&self.memory)?;
        let instruction = Instruction::decode(word);
        trace!("{:#06X} {:04X} {}", pc, word, instruction);
        self.execute(instruction)
    }

    /// Decrements the timers and services the sound and display.
    pub fn tick_timers(&mut self) {
        let audible = self.state.update_timers();
        self.peripherals.sound.set_tone(audible);
        self.peripherals.display.refresh();
    }

    /// The instructions around PC followed by every register.
    pub fn dump_state(&self) -> String {
        let pc = self.state.pc;
        let start = pc.saturating_sub(40).max(PROGRAM_START);
        let end = (pc as usize + 20).min(MEMORY_SIZE);
        let window = self
            .memory
            .read_range(start, end.saturating_sub(start as usize))
            .unwrap_or(&[]);

        let mut out = listing(&disassemble(window, start), Some(pc));
        out.push_str("\nRegisters:");
        for (r, value) in self.state.registers().iter().enumerate() {
            if r == 8 {
                out.push('\n');
            }
            let _ = write!(out, "V{:X}:{:02X} ", r, value);
        }
        let _ = write!(
            out,
            "\n\nI :  {:#06X}\nPC:  {:#06X}\nSP:  {:#04X}\nDT:  {:02X}\nST:  {:02X}\n",
            self.state.i,
            pc,
            self.state.sp(),
            self.state.delay_timer,
            self.state.sound_timer
        );
        out
    }
}

fn load_memory(path: &Path, loader: &dyn ProgramLoader) -> Memory {
    let loaded = loader
        .load(path)
        .map_err(Error::Load)
        .and_then(|image| Memory::with_program(&image).map(|memory| (memory, image.len())));
    match loaded {
        Ok((memory, size)) => {
            info!("loaded {} ({} bytes)", path.display(), size);
            memory
        }
        Err(e) => {
            warn!(
                "unable to load {}: {}; running the fallback image",
                path.display(),
                e
            );
            Memory::with_fallback_program()
        }
    }
}
