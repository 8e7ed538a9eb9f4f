use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use emu8_core::{Config, FileLoader, KeyState, Peripherals, Scheduler, Screen, SharedScreen, Tone};
use emu8_display::{open_audio, Window};

use crate::keymap::KeyLayout;

/// How long to wait for the machine thread on exit
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Redraw cadence of the event loop
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Runs `config` in an SDL2 window until the window is closed.
///
/// The machine runs on its own thread; this thread only renders frames,
/// forwards input and relays reload/dump requests.
pub fn run(config: Config, layout: KeyLayout) -> Result<(), Box<dyn Error>> {
    // Get SDL2 context
    let sdl = sdl2::init()?;
    let mut window = Window::new(&sdl, &config)?;
    let mut events = sdl.event_pump()?;

    let screen = SharedScreen::new(Screen::from_config(&config));
    let keys = Arc::new(KeyState::new());
    let tone = Tone::from_config(&config);
    // Keep the device alive for as long as the loop runs
    let _audio = match open_audio(&sdl, tone.clone()) {
        Ok(device) => Some(device),
        Err(e) => {
            warn!("continuing without sound: {}", e);
            None
        }
    };

    let peripherals = Peripherals::new(screen.clone(), keys.clone(), tone);
    let scheduler = Scheduler::spawn(config, peripherals, Box::new(FileLoader))?;

    'event: loop {
        // Only redraw when the machine has touched the framebuffer
        let frame = {
            let mut shared = screen.lock();
            if shared.take_dirty() {
                Some(shared.clone())
            } else {
                None
            }
        };
        if let Some(frame) = frame {
            window.render(&frame)?;
        }

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => match (key, layout.keymap(key)) {
                    (_, Some(kc)) => keys.press(kc),
                    (Keycode::Escape, _) => break 'event,
                    (Keycode::F5, _) => scheduler.request_reload(),
                    (Keycode::F1, _) => scheduler.request_dump(),
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = layout.keymap(key) {
                        keys.release(kc)
                    }
                }
                Event::DropFile { filename, .. } => {
                    let config = Config {
                        rom_path: filename.into(),
                        ..(*scheduler.config()).clone()
                    };
                    info!("switching to {}", config.rom_path.display());
                    window.configure(&config)?;
                    scheduler.reconfigure(config)?;
                }
                _ => continue,
            };
        }

        if !scheduler.is_running() {
            warn!("machine stopped; closing");
            break 'event;
        }
        std::thread::sleep(FRAME_TIME);
    }

    scheduler.stop(SHUTDOWN_TIMEOUT)?;
    Ok(())
}
