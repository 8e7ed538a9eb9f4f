use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::chip8::{Chip8, Peripherals, ProgramLoader};
use crate::config::Config;
use crate::error::{Error, Result};

/// # Timestep
/// Fixed-rate bookkeeping for the CPU and timer clocks.
///
/// Wall time is added to both accumulators and each due tick subtracts one
/// period, so remainders carry over instead of drifting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Timestep {
    cpu_period: Duration,
    timer_period: Duration,
    cpu_elapsed: Duration,
    timer_elapsed: Duration,
}

impl Timestep {
    pub fn new(cpu_period: Duration, timer_period: Duration) -> Self {
        Timestep {
            cpu_period,
            timer_period,
            cpu_elapsed: Duration::ZERO,
            timer_elapsed: Duration::ZERO,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Timestep::new(config.cpu_period(), config.timer_period())
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.cpu_elapsed += elapsed;
        self.timer_elapsed += elapsed;
    }

    pub fn take_cpu_tick(&mut self) -> bool {
        take(&mut self.cpu_elapsed, self.cpu_period)
    }

    pub fn take_timer_tick(&mut self) -> bool {
        take(&mut self.timer_elapsed, self.timer_period)
    }

    /// Time until the sooner of the two clocks is due
    pub fn idle_for(&self) -> Duration {
        let cpu = self.cpu_period.saturating_sub(self.cpu_elapsed);
        let timer = self.timer_period.saturating_sub(self.timer_elapsed);
        cpu.min(timer)
    }
}

fn take(elapsed: &mut Duration, period: Duration) -> bool {
    if *elapsed >= period {
        *elapsed -= period;
        true
    } else {
        false
    }
}

/// Flags and configuration shared between the scheduler thread and its handle.
struct Control {
    running: AtomicBool,
    reload: AtomicBool,
    dump: AtomicBool,
    config: Mutex<Arc<Config>>,
}

impl Control {
    fn config(&self) -> Arc<Config> {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// # Scheduler
/// Runs a machine on its own thread, interleaving CPU and timer ticks.
///
/// The scheduler thread is the only mutator of the machine. Everything else
/// talks to it through request flags that are consumed once per iteration.
pub struct Scheduler {
    control: Arc<Control>,
    handle: Option<JoinHandle<Result<Chip8>>>,
}

impl Scheduler {
    /// Boots a machine from `config` and starts running it.
    pub fn spawn(
        config: Config,
        peripherals: Peripherals,
        loader: Box<dyn ProgramLoader + Send>,
    ) -> Result<Self> {
        config.validate()?;
        let control = Arc::new(Control {
            running: AtomicBool::new(true),
            reload: AtomicBool::new(false),
            dump: AtomicBool::new(false),
            config: Mutex::new(Arc::new(config)),
        });

        let shared = control.clone();
        let handle = thread::Builder::new()
            .name("chip8".into())
            .spawn(move || {
                let config = shared.config();
                let chip8 = Chip8::boot(&config, peripherals, loader.as_ref());
                run(&shared, chip8, loader.as_ref())
            })?;

        Ok(Scheduler {
            control,
            handle: Some(handle),
        })
    }

    /// The configuration the machine is, or is about to be, running.
    pub fn config(&self) -> Arc<Config> {
        self.control.config()
    }

    /// Replaces the configuration and reloads the machine from it.
    ///
    /// An invalid configuration is rejected and the machine keeps running.
    pub fn reconfigure(&self, config: Config) -> Result<()> {
        config.validate()?;
        *self
            .control
            .config
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(config);
        self.request_reload();
        Ok(())
    }

    /// Restarts the current program on the next iteration.
    pub fn request_reload(&self) {
        self.control.reload.store(true, Ordering::Release);
    }

    /// Logs the machine state on the next iteration.
    pub fn request_dump(&self) {
        self.control.dump.store(true, Ordering::Release);
    }

    /// False once stopped or after a fatal machine error.
    pub fn is_running(&self) -> bool {
        self.control.running.load(Ordering::Acquire)
    }

    /// Asks the thread to exit and waits up to `timeout` for it.
    ///
    /// Returns the machine as it was left, or the error that stopped it.
    pub fn stop(mut self, timeout: Duration) -> Result<Chip8> {
        self.control.running.store(false, Ordering::Release);
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => return Err(Error::Panicked),
        };

        let deadline = Instant::now() + timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                return Err(Error::Unresponsive(timeout));
            }
            thread::sleep(Duration::from_millis(1));
        }
        handle.join().map_err(|_| Error::Panicked)?
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.control.running.store(false, Ordering::Release);
    }
}

fn run(control: &Control, mut chip8: Chip8, loader: &dyn ProgramLoader) -> Result<Chip8> {
    debug!("scheduler started");
    let mut timestep = Timestep::from_config(&control.config());
    let mut last = Instant::now();

    while control.running.load(Ordering::Acquire) {
        let now = Instant::now();
        timestep.advance(now - last);
        last = now;

        if control.reload.swap(false, Ordering::AcqRel) {
            let config = control.config();
            info!("reloading {}", config.rom_path.display());
            chip8.reload(&config, loader);
            // loading can be slow; none of it counts toward the new program
            timestep = Timestep::from_config(&config);
            last = Instant::now();
            continue;
        }

        if control.dump.swap(false, Ordering::AcqRel) {
            info!("\n{}", chip8.dump_state());
        }

        let mut ticked = false;
        if timestep.take_cpu_tick() {
            if let Err(e) = chip8.step() {
                error!("machine stopped: {}\n{}", e, chip8.dump_state());
                control.running.store(false, Ordering::Release);
                return Err(e);
            }
            ticked = true;
        }
        if timestep.take_timer_tick() {
            chip8.tick_timers();
            ticked = true;
        }
        if !ticked {
            thread::sleep(timestep.idle_for());
        }
    }

    debug!("scheduler stopped");
    Ok(chip8)
}
