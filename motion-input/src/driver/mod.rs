//! Bus drivers shared by the sensor implementations

#[cfg(test)]
pub(crate) mod fake;
pub mod register_bus;

pub use register_bus::RegisterBus;
