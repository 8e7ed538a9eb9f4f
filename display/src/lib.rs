pub use audio::{open_audio, TriangleWave};
pub use display::Window;

mod audio;
mod display;
