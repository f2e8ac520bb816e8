//! Rest-position calibration of a two-axis stick

use embedded_hal_async::delay::DelayNs;

use crate::error::AcquisitionError;
use crate::input_device::adc::{AnalogChannel, AxisPair, RawSample};

/// Samples averaged into the rest position
pub const CALIBRATION_SAMPLES: usize = 8;
/// Pause after every calibration sample
pub const CALIBRATION_SETTLE_MS: u32 = 2;

/// Raw reading of each axis at rest
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisCalibration {
    pub center_x: i32,
    pub center_y: i32,
}

/// Sums raw samples in 64 bit so any number of full-scale readings fits
#[derive(Debug, Default)]
pub struct CenterAccumulator {
    sum_x: i64,
    sum_y: i64,
    count: i64,
}

impl CenterAccumulator {
    pub fn add(&mut self, sample: RawSample) {
        self.sum_x += i64::from(sample.x);
        self.sum_y += i64::from(sample.y);
        self.count += 1;
    }

    /// Mean of all samples, truncated towards zero
    pub fn center(&self) -> AxisCalibration {
        if self.count == 0 {
            return AxisCalibration::default();
        }
        AxisCalibration {
            center_x: (self.sum_x / self.count) as i32,
            center_y: (self.sum_y / self.count) as i32,
        }
    }
}

/// Average [`CALIBRATION_SAMPLES`] readings of both axes.
///
/// Any failed sample aborts the whole calibration, partial sums are discarded.
pub async fn calibrate<X, Y, D>(axes: &mut AxisPair<X, Y>, delay: &mut D) -> Result<AxisCalibration, AcquisitionError>
where
    X: AnalogChannel,
    Y: AnalogChannel,
    D: DelayNs,
{
    let mut accumulator = CenterAccumulator::default();
    for i in 0..CALIBRATION_SAMPLES {
        let sample = axes.sample().await.inspect_err(|e| {
            error!("Joystick calibration failed at sample {}: {:?}", i, e);
        })?;
        accumulator.add(sample);
        delay.delay_ms(CALIBRATION_SETTLE_MS).await;
    }
    Ok(accumulator.center())
}
