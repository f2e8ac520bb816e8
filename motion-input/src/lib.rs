//! Relative motion input drivers
//!
//! Two pipelines turn raw peripheral readings into relative motion events at a fixed polling cadence:
//!
//! - [`input_device::pmw3360`]: PMW3360 optical sensor over SPI, driven by [`input_device::pointing::PointingDevice`]
//! - [`input_device::joystick`]: two-axis analog stick read through an ADC
//!
//! Both deliver [`event::RelativeMotionEvent`]s into a [`event::MotionSink`].
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod channel;
pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod input_device;

pub use embassy_futures;
pub use heapless;

/// Raw mutex type used by the channels of this crate
pub type RawMutex = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// Capacity of [`channel::MOTION_EVENT_CHANNEL`]
pub const MOTION_EVENT_CHANNEL_SIZE: usize = 16;
