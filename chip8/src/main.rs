use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::info;

use emu8_core::{disassemble, listing, Config, FileLoader, ProgramLoader, ShiftQuirk};

use crate::keymap::KeyLayout;

mod keymap;
mod run;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Shift {
    /// Shift Vx in place
    InPlace,
    /// Shift Vy into Vx
    FromVy,
}

impl From<Shift> for ShiftQuirk {
    fn from(shift: Shift) -> Self {
        match shift {
            Shift::InPlace => ShiftQuirk::InPlace,
            Shift::FromVy => ShiftQuirk::FromVy,
        }
    }
}

/// A Chip-8 interpreter
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program image to run; overrides the config file
    rom: Option<PathBuf>,

    /// JSON config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Instructions per second
    #[arg(long)]
    cpu_hz: Option<u32>,

    /// Timer decrements per second
    #[arg(long)]
    timer_hz: Option<u32>,

    /// Window pixels per Chip-8 pixel
    #[arg(short, long)]
    scale: Option<u32>,

    /// Which register 8xy6 and 8xyE shift
    #[arg(long, value_enum)]
    shift_quirk: Option<Shift>,

    /// Clip sprites at the screen edges instead of wrapping them
    #[arg(long)]
    no_wrap: bool,

    #[arg(short, long, value_enum, default_value_t = KeyLayout::Qwerty)]
    layout: KeyLayout,

    /// Print the program's disassembly and exit
    #[arg(short, long)]
    disassemble: bool,
}

impl Args {
    fn config(&self) -> Result<Config, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };
        if let Some(rom) = &self.rom {
            config.rom_path = rom.clone();
        }
        if let Some(hz) = self.cpu_hz {
            config.cpu_hz = hz;
        }
        if let Some(hz) = self.timer_hz {
            config.timer_hz = hz;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if let Some(shift) = self.shift_quirk {
            config.quirks.shift = shift.into();
        }
        if self.no_wrap {
            config.quirks.wrap_columns = false;
            config.quirks.wrap_rows = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    let config = args.config()?;

    if args.disassemble {
        let image = FileLoader.load(&config.rom_path)?;
        print!("{}", listing(&disassemble(&image, 0x200), None));
        return Ok(());
    }

    info!("starting {}", config.rom_path.display());
    run::run(config, args.layout)
}
