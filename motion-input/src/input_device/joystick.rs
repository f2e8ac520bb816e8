//! Two-axis analog joystick
//!
//! Bring-up checks and configures both converter channels, then averages a few samples into
//! the rest position. Every poll cycle afterwards samples both axes and reports the conditioned
//! deflection as relative motion.

use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;

use crate::config::JoystickConfig;
use crate::error::BringUpError;
use crate::event::MotionSink;
use crate::input_device::adc::{AnalogChannel, AxisPair};
use crate::input_device::calibration::{AxisCalibration, calibrate};
use crate::input_device::conditioning::ConditioningParameters;
use crate::input_device::{CycleOutcome, PollingDevice};

pub struct Joystick<X: AnalogChannel, Y: AnalogChannel, K: MotionSink> {
    axes: AxisPair<X, Y>,
    calibration: AxisCalibration,
    conditioning: ConditioningParameters,
    poll_interval: Duration,
    sink: K,
}

impl<X: AnalogChannel, Y: AnalogChannel, K: MotionSink> Joystick<X, Y, K> {
    /// Initialize the stick, the stick must be at rest during this call.
    ///
    /// `delay` is only used for calibration settle pauses.
    pub async fn bring_up<D: DelayNs>(
        x: X,
        y: Y,
        mut delay: D,
        config: &JoystickConfig,
        sink: K,
    ) -> Result<Self, BringUpError> {
        let mut axes = AxisPair::new(x, y);
        axes.ensure_ready()?;
        axes.configure(&config.x_channel, &config.y_channel).await?;
        let calibration = calibrate(&mut axes, &mut delay).await?;

        info!(
            "Joystick calibrated, center x: {}, y: {}",
            calibration.center_x, calibration.center_y
        );

        Ok(Self {
            axes,
            calibration,
            conditioning: config.conditioning,
            poll_interval: config.poll_interval(),
            sink,
        })
    }

    pub fn calibration(&self) -> AxisCalibration {
        self.calibration
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Give the channels and the sink back, a new [`Joystick::bring_up`] recalibrates
    pub fn release(self) -> (X, Y, K) {
        let (x, y) = self.axes.release();
        (x, y, self.sink)
    }

    #[cfg(test)]
    pub(crate) fn axes_mut(&mut self) -> &mut AxisPair<X, Y> {
        &mut self.axes
    }
}

impl<X: AnalogChannel, Y: AnalogChannel, K: MotionSink> PollingDevice for Joystick<X, Y, K> {
    async fn poll_once(&mut self) -> CycleOutcome {
        let sample = match self.axes.sample().await {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Joystick: sampling failed, skip this cycle: {:?}", e);
                return CycleOutcome::Skipped;
            }
        };

        let frame = self.conditioning.condition(sample, &self.calibration);
        if frame.is_empty() {
            trace!("Joystick at rest: {:?}", sample);
            return CycleOutcome::NoMotion;
        }

        debug!("Joystick raw: {:?}, motion: x: {}, y: {}", sample, frame.x, frame.y);
        CycleOutcome::Emitted(self.sink.report_frame(frame).await)
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
