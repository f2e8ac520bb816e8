//! In-memory register sensor used by the unit tests
//!
//! The SPI bus, chip-select pin and delay provider share one operation log, so tests can check
//! the exact ordering of select, transfer and wait steps.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, ErrorKind};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiBus;

use super::register_bus::RegisterBus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Op {
    CsLow,
    CsHigh,
    Write(Vec<u8>),
    Read(usize),
    Flush,
    Delay(u32),
}

pub(crate) type Log = Rc<RefCell<Vec<Op>>>;

pub(crate) fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) type FakeBus = RegisterBus<FakeSensorSpi, FakeCsPin, FakeDelay>;

/// Register bus wired to a fresh fake sensor, plus the shared log
pub(crate) fn fake_bus() -> (FakeBus, Log) {
    let log = new_log();
    let bus = RegisterBus::new(
        FakeSensorSpi::new(log.clone()),
        FakeCsPin::new(log.clone()),
        FakeDelay::new(log.clone()),
    );
    (bus, log)
}

/// Register file behind a single-byte address protocol, bit 7 of the address selects write
pub(crate) struct FakeSensorSpi {
    log: Log,
    registers: [u8; 128],
    address: Option<u8>,
    failing: Vec<u8>,
    /// Register writes in order, without the write bit
    pub writes: Vec<(u8, u8)>,
}

impl FakeSensorSpi {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            registers: [0; 128],
            address: None,
            failing: Vec::new(),
            writes: Vec::new(),
        }
    }

    pub fn set_register(&mut self, address: u8, value: u8) {
        self.registers[(address & 0x7f) as usize] = value;
    }

    pub fn register(&self, address: u8) -> u8 {
        self.registers[(address & 0x7f) as usize]
    }

    /// Every access to `address` fails from now on
    pub fn fail_register(&mut self, address: u8) {
        self.failing.push(address & 0x7f);
    }

    pub fn recover_register(&mut self, address: u8) {
        self.failing.retain(|a| *a != address & 0x7f);
    }

    /// Number of data-phase reads of `address`
    pub fn reads_of(&self, address: u8) -> usize {
        let log = self.log.borrow();
        let select = Op::Write(vec![address & 0x7f]);
        log.iter()
            .enumerate()
            .filter(|(i, op)| {
                **op == select
                    && log[*i..]
                        .iter()
                        .take_while(|op| **op != Op::CsHigh)
                        .any(|op| *op == Op::Read(1))
            })
            .count()
    }
}

impl spi::ErrorType for FakeSensorSpi {
    type Error = ErrorKind;
}

impl SpiBus for FakeSensorSpi {
    async fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let address = self.address.take().ok_or(ErrorKind::Other)?;
        if self.failing.contains(&address) {
            return Err(ErrorKind::Other);
        }
        self.log.borrow_mut().push(Op::Read(words.len()));
        for word in words.iter_mut() {
            *word = self.registers[address as usize];
        }
        Ok(())
    }

    async fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let Some(&first) = words.first() else {
            return Ok(());
        };
        let address = first & 0x7f;
        if first & 0x80 != 0 && self.failing.contains(&address) {
            return Err(ErrorKind::Other);
        }
        self.log.borrow_mut().push(Op::Write(words.to_vec()));
        if first & 0x80 != 0 {
            if let Some(&value) = words.get(1) {
                self.registers[address as usize] = value;
                self.writes.push((address, value));
            }
        } else {
            self.address = Some(address);
        }
        Ok(())
    }

    async fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.write(write).await?;
        self.read(read).await
    }

    async fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let out = words.to_vec();
        self.write(&out).await?;
        self.read(words).await
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Op::Flush);
        Ok(())
    }
}

pub(crate) struct FakeCsPin {
    log: Log,
    broken: bool,
    stuck_low: bool,
}

impl FakeCsPin {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            broken: false,
            stuck_low: false,
        }
    }

    pub fn fail(&mut self) {
        self.broken = true;
    }

    /// Selecting still works, releasing fails
    pub fn fail_release(&mut self) {
        self.stuck_low = true;
    }
}

impl digital::ErrorType for FakeCsPin {
    type Error = digital::ErrorKind;
}

impl OutputPin for FakeCsPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.broken {
            return Err(digital::ErrorKind::Other);
        }
        self.log.borrow_mut().push(Op::CsLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.broken || self.stuck_low {
            return Err(digital::ErrorKind::Other);
        }
        self.log.borrow_mut().push(Op::CsHigh);
        Ok(())
    }
}

/// Delay provider that returns immediately and records what was asked for
pub(crate) struct FakeDelay {
    log: Log,
}

impl FakeDelay {
    pub fn new(log: Log) -> Self {
        Self { log }
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Op::Delay(ns));
    }
}
