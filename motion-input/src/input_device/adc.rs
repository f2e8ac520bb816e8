//! Analog sample acquisition for two-axis sticks
//!
//! The converter HAL is reached through [`AnalogChannel`], one instance per axis. The two axes may
//! live on the same converter or on different ones.

use crate::error::{AcquisitionError, BringUpError};
use crate::event::Axis;

/// Gain of a converter channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    Gain1_6,
    Gain1_5,
    Gain1_4,
    Gain1_3,
    Gain1_2,
    Gain1,
    Gain2,
    Gain4,
}

/// Reference voltage of a converter channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reference {
    Internal,
    Vdd1_4,
}

/// Per-axis converter setup
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Analog input index
    pub channel: u8,
    pub gain: Gain,
    pub reference: Reference,
    pub acquisition_time_us: u16,
    /// Sample resolution in bits, bounds the raw value range
    pub resolution_bits: u8,
    /// Samples averaged by the converter per read
    pub oversampling: u8,
    /// Run the converter's offset self-calibration before the first sample
    pub calibrate: bool,
}

impl ChannelConfig {
    /// Single-ended input with 1/6 gain against the internal reference, 12 bit
    pub const fn new(channel: u8) -> Self {
        Self {
            channel,
            gain: Gain::Gain1_6,
            reference: Reference::Internal,
            acquisition_time_us: 40,
            resolution_bits: 12,
            oversampling: 4,
            calibrate: true,
        }
    }
}

/// One converter input bound to one stick axis
pub trait AnalogChannel {
    type Error;

    /// Whether the converter behind this channel is usable
    fn is_ready(&mut self) -> bool {
        true
    }

    /// Apply the channel setup, called once at bring-up before the first read
    async fn configure(&mut self, config: &ChannelConfig) -> Result<(), Self::Error>;

    /// Trigger one conversion and wait for the signed result
    async fn read(&mut self) -> Result<i16, Self::Error>;
}

/// Raw converter readings of both axes, taken in the same cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub x: i16,
    pub y: i16,
}

/// X and Y converter channels of one stick
pub struct AxisPair<X: AnalogChannel, Y: AnalogChannel> {
    x: X,
    y: Y,
}

impl<X: AnalogChannel, Y: AnalogChannel> AxisPair<X, Y> {
    pub fn new(x: X, y: Y) -> Self {
        Self { x, y }
    }

    /// Check both converters
    pub fn ensure_ready(&mut self) -> Result<(), BringUpError> {
        if !self.x.is_ready() {
            error!("Joystick: X axis converter not ready");
            return Err(BringUpError::ConverterNotReady(Axis::X));
        }
        if !self.y.is_ready() {
            error!("Joystick: Y axis converter not ready");
            return Err(BringUpError::ConverterNotReady(Axis::Y));
        }
        Ok(())
    }

    /// Configure both channels
    pub async fn configure(&mut self, x: &ChannelConfig, y: &ChannelConfig) -> Result<(), BringUpError> {
        if self.x.configure(x).await.is_err() {
            error!("Joystick: failed to setup X axis channel {}", x.channel);
            return Err(BringUpError::ChannelSetup(Axis::X));
        }
        if self.y.configure(y).await.is_err() {
            error!("Joystick: failed to setup Y axis channel {}", y.channel);
            return Err(BringUpError::ChannelSetup(Axis::Y));
        }
        Ok(())
    }

    /// Convert both axes.
    ///
    /// Y is converted even when X failed, but any failure fails the whole sample.
    pub async fn sample(&mut self) -> Result<RawSample, AcquisitionError> {
        let x = self.x.read().await;
        let y = self.y.read().await;

        match (x, y) {
            (Ok(x), Ok(y)) => Ok(RawSample { x, y }),
            (x, y) => Err(AcquisitionError {
                x_failed: x.is_err(),
                y_failed: y.is_err(),
            }),
        }
    }

    pub fn release(self) -> (X, Y) {
        (self.x, self.y)
    }

    #[cfg(test)]
    pub(crate) fn channels_mut(&mut self) -> (&mut X, &mut Y) {
        (&mut self.x, &mut self.y)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::VecDeque;

    use super::*;

    /// Scripted converter channel, repeats `rest` once the script is exhausted
    pub(crate) struct FakeChannel {
        pub script: VecDeque<Result<i16, ()>>,
        pub rest: i16,
        pub ready: bool,
        pub rejects_config: bool,
        pub configured: Option<ChannelConfig>,
        pub reads: usize,
    }

    impl FakeChannel {
        pub fn steady(value: i16) -> Self {
            Self {
                script: VecDeque::new(),
                rest: value,
                ready: true,
                rejects_config: false,
                configured: None,
                reads: 0,
            }
        }

        pub fn then(mut self, reading: Result<i16, ()>) -> Self {
            self.script.push_back(reading);
            self
        }

        pub fn push(&mut self, reading: Result<i16, ()>) {
            self.script.push_back(reading);
        }
    }

    impl AnalogChannel for FakeChannel {
        type Error = ();

        fn is_ready(&mut self) -> bool {
            self.ready
        }

        async fn configure(&mut self, config: &ChannelConfig) -> Result<(), Self::Error> {
            if self.rejects_config {
                return Err(());
            }
            self.configured = Some(config.clone());
            Ok(())
        }

        async fn read(&mut self) -> Result<i16, Self::Error> {
            self.reads += 1;
            self.script.pop_front().unwrap_or(Ok(self.rest))
        }
    }
}
