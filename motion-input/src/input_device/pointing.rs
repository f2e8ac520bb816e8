//! Common functionality across register-based motion sensors

use embassy_time::Duration;

use crate::config::OpticalSensorConfig;
use crate::error::{BringUpError, BusError};
use crate::event::{MotionFrame, MotionSink};
use crate::input_device::{CycleOutcome, PollingDevice};

/// Result of one protocol poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionSample {
    /// The sensor flagged unread motion
    pub available: bool,
    pub dx: i16,
    pub dy: i16,
}

impl MotionSample {
    /// Only flagged, non-zero samples count as motion
    pub fn is_motion(&self) -> bool {
        self.available && (self.dx != 0 || self.dy != 0)
    }
}

/// Motion sensor protocol as seen by the poll loop
pub trait MotionSensor {
    /// One-time initialization, any error means the device is absent
    async fn bring_up(&mut self) -> Result<(), BringUpError>;

    /// Read the accumulated motion since the last read
    async fn read_motion(&mut self) -> Result<MotionSample, BusError>;
}

/// Periodically polled motion sensor
///
/// Only exists for a sensor whose bring-up succeeded.
pub struct PointingDevice<S: MotionSensor, K: MotionSink> {
    sensor: S,
    sink: K,
    poll_interval: Duration,
}

impl<S: MotionSensor, K: MotionSink> PointingDevice<S, K> {
    /// Bring the sensor up and wrap it into a pollable device
    ///
    /// The poll interval comes from `config`, an unset (0 ms) interval selects the default.
    pub async fn bring_up(mut sensor: S, config: &OpticalSensorConfig, sink: K) -> Result<Self, BringUpError> {
        sensor.bring_up().await?;
        Ok(Self {
            sensor,
            sink,
            poll_interval: config.poll_interval(),
        })
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }
}

impl<S: MotionSensor, K: MotionSink> PollingDevice for PointingDevice<S, K> {
    async fn poll_once(&mut self) -> CycleOutcome {
        let sample = match self.sensor.read_motion().await {
            Ok(sample) => sample,
            Err(e) => {
                warn!("PointingDevice: motion read failed, skip this cycle: {:?}", e);
                return CycleOutcome::Skipped;
            }
        };

        if !sample.is_motion() {
            trace!("PointingDevice: no motion");
            return CycleOutcome::NoMotion;
        }

        debug!("PointingDevice motion: x: {}, y: {}", sample.dx, sample.dy);
        let sent = self.sink.report_frame(MotionFrame::new(sample.dx, sample.dy)).await;
        CycleOutcome::Emitted(sent)
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
