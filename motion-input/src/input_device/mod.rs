//! Input devices producing relative motion
//!
//! Every device is a periodic task: one poll cycle (acquire → condition → emit), then a re-arm
//! wait of the configured interval, regardless of the cycle's outcome. Cycles never overlap.
//!
//! A device owns all of its mutable state (calibration, sink, bus handles) and is only ever
//! driven through `&mut self` from the single task that runs it. Nothing in here is `Sync`-safe
//! by itself: sharing one device between tasks or executors needs a mutex around the whole device.
use core::future::Future;
use core::pin::pin;

use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Timer};

pub mod adc;
pub mod calibration;
pub mod conditioning;
pub mod joystick;
pub mod pmw3360;
pub mod pointing;

/// Result of one poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// This many axis events were handed to the sink
    Emitted(usize),
    /// Acquisition worked but there was nothing to report
    NoMotion,
    /// Acquisition failed, the cycle was dropped
    Skipped,
}

/// A device that is polled at a fixed interval
pub trait PollingDevice {
    /// Run exactly one poll cycle
    async fn poll_once(&mut self) -> CycleOutcome;

    /// Re-arm delay after each cycle
    fn poll_interval(&self) -> Duration;
}

/// Long running task of a device
pub trait Runnable {
    /// Poll forever
    async fn run(&mut self) -> !;

    /// Poll until `stop` resolves, returns the number of completed cycles.
    ///
    /// `stop` is only observed at the re-arm point, an in-flight cycle always runs to completion.
    async fn run_until<F: Future>(&mut self, stop: F) -> usize;
}

impl<P: PollingDevice> Runnable for P {
    async fn run(&mut self) -> ! {
        loop {
            self.poll_once().await;
            Timer::after(self.poll_interval()).await;
        }
    }

    async fn run_until<F: Future>(&mut self, stop: F) -> usize {
        let mut stop = pin!(stop);
        let mut cycles = 0;
        loop {
            self.poll_once().await;
            cycles += 1;
            match select(Timer::after(self.poll_interval()), stop.as_mut()).await {
                Either::First(_) => {}
                Either::Second(_) => {
                    info!("Polling stopped after {} cycles", cycles);
                    return cycles;
                }
            }
        }
    }
}
