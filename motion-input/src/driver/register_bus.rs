//! Register-level SPI access with per-access chip-select sessions
//!
//! Every register access is one [`Session`]: select, address phase, settle, data phase, release.
//! The chip-select line is never held across two accesses, which is what keeps the bus exclusive
//! without any extra locking.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;

use crate::error::BusError;

const SPI_WRITE: u8 = 0x80; // BIT(7)
const SPI_ADDRESS_MASK: u8 = 0x7f;

// SPI timing constants in microseconds, all of them are lower bounds
const T_NCS_SCLK_US: u32 = 1;
/// Address written → data phase of a read
pub const T_SRAD_US: u32 = 160;
/// Read released → next access
pub const T_SRX_US: u32 = 19;
/// Address+value written → release of a write
pub const T_SCLK_NCS_WR_US: u32 = 35;
/// Write released → next access
pub const T_SWX_US: u32 = 145;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Read,
    Write,
}

/// One exclusively held register access
///
/// Chip-select is asserted on open. [`Session::close`] releases it and reports a failed release.
/// A session dropped without `close` (cancelled future) still releases the line on drop.
struct Session<'a, CS: OutputPin> {
    cs: &'a mut CS,
    direction: Direction,
    len: usize,
    released: bool,
}

impl<'a, CS: OutputPin> Session<'a, CS> {
    fn open(cs: &'a mut CS, direction: Direction, len: usize) -> Result<Self, BusError> {
        cs.set_low().map_err(|_| BusError::ChipSelect)?;
        Ok(Self {
            cs,
            direction,
            len,
            released: false,
        })
    }

    /// Release chip-select, the device may still be selected when this fails
    fn close(mut self) -> Result<(), BusError> {
        self.released = true;
        self.cs.set_high().map_err(|_| {
            error!(
                "Register bus: failed to release {:?} session of {} bytes",
                self.direction, self.len
            );
            BusError::ChipSelect
        })
    }
}

impl<CS: OutputPin> Drop for Session<'_, CS> {
    fn drop(&mut self) {
        if !self.released && self.cs.set_high().is_err() {
            error!(
                "Register bus: failed to release dropped {:?} session of {} bytes",
                self.direction, self.len
            );
        }
    }
}

/// Register bus on top of an embedded-hal SPI bus and a dedicated chip-select pin
///
/// Settle waits are lower bounds after every access, they also run when the transfer failed.
/// A failed chip-select release fails the access with [`BusError::ChipSelect`].
pub struct RegisterBus<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    spi: SPI,
    cs: CS,
    delay: D,
}

impl<SPI, CS, D> RegisterBus<SPI, CS, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, cs: CS, delay: D) -> Self {
        Self { spi, cs, delay }
    }

    /// Drive chip-select to idle, a bus whose select line can't be released is not usable
    pub fn ensure_ready(&mut self) -> Result<(), BusError> {
        self.cs.set_high().map_err(|_| BusError::ChipSelect)
    }

    /// Read one register
    pub async fn read_register(&mut self, register: u8) -> Result<u8, BusError> {
        let mut value = [0u8];

        let session = Session::open(&mut self.cs, Direction::Read, value.len())?;
        self.delay.delay_us(T_NCS_SCLK_US).await;
        let transfer = Self::read_phases(&mut self.spi, &mut self.delay, register, &mut value).await;
        let release = session.close();
        self.delay.delay_us(T_SRX_US).await;

        transfer?;
        release?;
        Ok(value[0])
    }

    /// Write one register
    pub async fn write_register(&mut self, register: u8, value: u8) -> Result<(), BusError> {
        let frame = [register | SPI_WRITE, value];

        let session = Session::open(&mut self.cs, Direction::Write, frame.len())?;
        self.delay.delay_us(T_NCS_SCLK_US).await;
        let transfer = Self::write_phase(&mut self.spi, &frame).await;
        self.delay.delay_us(T_SCLK_NCS_WR_US).await;
        let release = session.close();
        self.delay.delay_us(T_SWX_US).await;

        transfer?;
        release
    }

    // Address with read bit (bit 7 = 0), settle, then the data phase
    async fn read_phases(spi: &mut SPI, delay: &mut D, register: u8, value: &mut [u8]) -> Result<(), BusError> {
        spi.write(&[register & SPI_ADDRESS_MASK])
            .await
            .map_err(|_| BusError::Transfer)?;
        spi.flush().await.map_err(|_| BusError::Transfer)?;

        delay.delay_us(T_SRAD_US).await;

        spi.read(value).await.map_err(|_| BusError::Transfer)
    }

    // Address with write bit (bit 7 = 1) and value in one frame
    async fn write_phase(spi: &mut SPI, frame: &[u8]) -> Result<(), BusError> {
        spi.write(frame).await.map_err(|_| BusError::Transfer)?;
        spi.flush().await.map_err(|_| BusError::Transfer)
    }

    /// Wait outside of any session, e.g. for a reset to complete
    pub async fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }

    /// Give back the underlying peripherals
    pub fn release(self) -> (SPI, CS, D) {
        (self.spi, self.cs, self.delay)
    }

    #[cfg(test)]
    pub(crate) fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    #[cfg(test)]
    pub(crate) fn cs_mut(&mut self) -> &mut CS {
        &mut self.cs
    }
}
