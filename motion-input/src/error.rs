//! Error types of the motion input drivers
//!
//! Steady-state failures ([`BusError`], [`AcquisitionError`]) only ever skip one poll cycle.
//! [`BringUpError`] aborts device initialization, no poll loop exists afterwards.

use crate::event::Axis;

/// Register bus failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The chip-select line could not be driven
    ChipSelect,
    /// The SPI transfer failed
    Transfer,
}

/// Converter failure during one acquisition of both axes
///
/// Both axes are always attempted, the flags tell which of them failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AcquisitionError {
    pub x_failed: bool,
    pub y_failed: bool,
}

/// Fatal device initialization failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpError {
    /// The register bus is not usable
    BusNotReady,
    /// One of the analog converters is not usable
    ConverterNotReady(Axis),
    /// Register access failed while identifying the sensor
    Io(BusError),
    /// The power-up reset write failed
    ResetFailed(BusError),
    /// The sensor answered with an unexpected product/revision pair
    IdentityMismatch { product_id: u8, revision_id: u8 },
    /// Converter channel configuration was rejected
    ChannelSetup(Axis),
    /// A read failed while computing the stick center
    Calibration(AcquisitionError),
}

impl From<AcquisitionError> for BringUpError {
    fn from(e: AcquisitionError) -> Self {
        BringUpError::Calibration(e)
    }
}
