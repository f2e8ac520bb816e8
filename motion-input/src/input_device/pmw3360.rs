// PMW3360 Mouse Sensor Driver
//
// Register-at-a-time protocol: motion status, then the four delta registers.
// No burst mode, no SROM upload.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;

use crate::config::OpticalSensorConfig;
use crate::driver::RegisterBus;
use crate::error::{BringUpError, BusError};
use crate::event::MotionSink;
use crate::input_device::pointing::{MotionSample, MotionSensor, PointingDevice};

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Register {
    ProductId,
    RevisionId,
    Motion,
    DeltaXL,
    DeltaXH,
    DeltaYL,
    DeltaYH,
    Config1,
    Config2,
    PowerUpReset,
}

impl Register {
    fn value(&self) -> u8 {
        match self {
            Register::ProductId => 0x00,
            Register::RevisionId => 0x01,
            Register::Motion => 0x02,
            Register::DeltaXL => 0x03,
            Register::DeltaXH => 0x04,
            Register::DeltaYL => 0x05,
            Register::DeltaYH => 0x06,
            Register::Config1 => 0x0f,
            Register::Config2 => 0x10,
            Register::PowerUpReset => 0x3a,
        }
    }
}

// ============================================================================
// Constants
// ============================================================================
const PRODUCT_ID_PMW3360: u8 = 0x42;
const REVISION_ID_PMW3360: u8 = 0x01;
const MOTION_STATUS_MOTION: u8 = 0x80; // BIT(7)
const POWER_UP_RESET_VAL: u8 = 0x5a;
const CONFIG2_REST_DISABLED: u8 = 0x00;

// Timing constants
const RESET_DELAY_MS: u32 = 50;

// Resolution constants
const RES_STEP: u16 = 100;
const RES_MIN: u16 = 100;
const RES_MAX: u16 = 12000;

/// Clamp a CPI into the range the sensor supports
pub fn clamp_cpi(cpi: u16) -> u16 {
    cpi.clamp(RES_MIN, RES_MAX)
}

/// Config1 encoding of a CPI, out-of-range values are clamped first
pub fn cpi_register_value(cpi: u16) -> u8 {
    ((clamp_cpi(cpi) / RES_STEP) - 1) as u8
}

/// Reassemble one delta axis: `(high << 8) | low`, as two's complement
pub fn delta_from_bytes(low: u8, high: u8) -> i16 {
    i16::from_le_bytes([low, high])
}

/// PMW3360 driver on a [`RegisterBus`]
pub struct Pmw3360<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    bus: RegisterBus<SPI, CS, D>,
    cpi: u16,
}

impl<SPI, CS, D> Pmw3360<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    /// Create a new PMW3360 driver instance
    pub fn new(bus: RegisterBus<SPI, CS, D>, config: &OpticalSensorConfig) -> Self {
        Self { bus, cpi: config.cpi }
    }

    /// Currently configured CPI, after clamping
    pub fn cpi(&self) -> u16 {
        clamp_cpi(self.cpi)
    }

    /// Check the motion-available bit of the status register
    pub async fn read_motion_status(&mut self) -> Result<bool, BusError> {
        let motion = self.bus.read_register(Register::Motion.value()).await?;
        Ok(motion & MOTION_STATUS_MOTION != 0)
    }

    /// Read both delta axes, all four registers or nothing
    pub async fn read_delta(&mut self) -> Result<(i16, i16), BusError> {
        let xl = self.bus.read_register(Register::DeltaXL.value()).await?;
        let xh = self.bus.read_register(Register::DeltaXH.value()).await?;
        let yl = self.bus.read_register(Register::DeltaYL.value()).await?;
        let yh = self.bus.read_register(Register::DeltaYH.value()).await?;

        Ok((delta_from_bytes(xl, xh), delta_from_bytes(yl, yh)))
    }

    /// Read and verify the product/revision pair
    pub async fn identify(&mut self) -> Result<(u8, u8), BringUpError> {
        let product_id = self.bus.read_register(Register::ProductId.value()).await.map_err(|e| {
            error!("PMW3360: product id read failed: {:?}", e);
            BringUpError::Io(e)
        })?;
        let revision_id = self.bus.read_register(Register::RevisionId.value()).await.map_err(|e| {
            error!("PMW3360: revision id read failed: {:?}", e);
            BringUpError::Io(e)
        })?;

        if product_id != PRODUCT_ID_PMW3360 || revision_id != REVISION_ID_PMW3360 {
            error!("PMW3360: unexpected id: {:#x}/{:#x}", product_id, revision_id);
            return Err(BringUpError::IdentityMismatch {
                product_id,
                revision_id,
            });
        }

        info!("PMW3360 detected, product id: {:#x}, revision: {:#x}", product_id, revision_id);
        Ok((product_id, revision_id))
    }

    /// Set sensor resolution, returns the CPI actually applied
    pub async fn set_cpi(&mut self, cpi: u16) -> Result<u16, BusError> {
        let applied = clamp_cpi(cpi);
        if applied != cpi {
            warn!("PMW3360: CPI {} out of range, using {}", cpi, applied);
        }

        self.bus
            .write_register(Register::Config1.value(), cpi_register_value(applied))
            .await?;
        self.cpi = applied;

        debug!("PMW3360: Resolution set to {} CPI", applied);
        Ok(applied)
    }

    async fn reset(&mut self) -> Result<(), BringUpError> {
        self.bus
            .write_register(Register::PowerUpReset.value(), POWER_UP_RESET_VAL)
            .await
            .map_err(|e| {
                error!("PMW3360: reset failed: {:?}", e);
                BringUpError::ResetFailed(e)
            })?;
        self.bus.pause_ms(RESET_DELAY_MS).await;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn bus_mut(&mut self) -> &mut RegisterBus<SPI, CS, D> {
        &mut self.bus
    }
}

impl<SPI, CS, D> MotionSensor for Pmw3360<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    async fn bring_up(&mut self) -> Result<(), BringUpError> {
        self.bus.ensure_ready().map_err(|_| {
            error!("PMW3360: SPI bus not ready");
            BringUpError::BusNotReady
        })?;

        self.reset().await?;
        self.identify().await?;

        // Configuration write failures are not fatal
        if let Err(e) = self
            .bus
            .write_register(Register::Config2.value(), CONFIG2_REST_DISABLED)
            .await
        {
            warn!("PMW3360: failed to disable rest mode: {:?}", e);
        }
        if let Err(e) = self.set_cpi(self.cpi).await {
            warn!("PMW3360: failed to set CPI: {:?}", e);
        }

        info!("PMW3360 initialized successfully");
        Ok(())
    }

    async fn read_motion(&mut self) -> Result<MotionSample, BusError> {
        if !self.read_motion_status().await? {
            return Ok(MotionSample::default());
        }

        let (dx, dy) = self.read_delta().await?;
        Ok(MotionSample {
            available: true,
            dx,
            dy,
        })
    }
}

impl<SPI, CS, D, K> PointingDevice<Pmw3360<SPI, CS, D>, K>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
    K: MotionSink,
{
    /// Build a PMW3360 device from its configuration and bring it up
    pub async fn from_config(
        spi: SPI,
        cs: CS,
        delay: D,
        config: &OpticalSensorConfig,
        sink: K,
    ) -> Result<Self, BringUpError> {
        let sensor = Pmw3360::new(RegisterBus::new(spi, cs, delay), config);
        PointingDevice::bring_up(sensor, config, sink).await
    }
}
