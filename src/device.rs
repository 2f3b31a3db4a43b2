//! Device pins and register writes

use embedded_hal::{
    digital::v2::OutputPin,
    blocking::{delay::DelayUs, spi::Write},
};

use crate::errors::*;
use crate::register::*;


/// Shifts register words out to the chip.
///
/// Data is clocked into the 32-bit shift register on each rising edge
/// of CLK, MSB first, and transferred to the latch selected by the
/// three control bits on the rising edge of LE.
pub trait RegisterWrite {
    /// Writes a single 32-bit word.
    /// Blocking call.
    fn write_register(&mut self, w: u32) -> Result<(), Error>;

    /// Writes all control registers out, R5 first and R0 last.
    /// Blocking call.
    fn write_register_set(&mut self, rs: &RegisterSet) -> Result<(), Error> {
        for w in rs.to_words().iter().rev() {
            self.write_register(*w)?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("registers written {:#x}", rs.to_words());

        Ok(())
    }
}


/// ADF4351 on an SPI bus
pub struct Adf4351<CE, LE, SPI, D> {
    spi: SPI,
    pin_ce: CE,
    pin_le: LE,
    delay: D,
}


impl<CE, LE, SPI, D> Adf4351<CE, LE, SPI, D>
where CE: OutputPin,
      LE: OutputPin,
      SPI: Write<u8>,
      D: DelayUs<u16>,
{
    /// Creates the device (unconfigured, no output).
    ///
    /// `spi` - SPI device (`MOSI` => `DATA`, `CLK` => `CLK`, `CPHA` = 0)
    /// `pin_ce` - "chip enable" pin
    /// `pin_le` - "load enable" pin
    /// `delay` - microsecond delay for LE timing
    ///
    pub fn new(
        spi: SPI,
        pin_ce: CE,
        pin_le: LE,
        delay: D,
    ) -> Self {
        Adf4351 { spi, pin_ce, pin_le, delay }
    }

    /// Powers up the device, depending on the status of the power-down bits.
    #[inline(always)]
    pub fn enable(&mut self) -> Result<(), Error> {
        self.pin_ce.set_high().map_err(|_| Error::Pin)
    }

    /// Powers down the device and puts the charge pump into three-state mode.
    #[inline(always)]
    pub fn disable(&mut self) -> Result<(), Error> {
        self.pin_ce.set_low().map_err(|_| Error::Pin)
    }

    /// Gives back the bus and pins
    pub fn release(self) -> (SPI, CE, LE, D) {
        (self.spi, self.pin_ce, self.pin_le, self.delay)
    }
}

impl<CE, LE, SPI, D> RegisterWrite for Adf4351<CE, LE, SPI, D>
where CE: OutputPin,
      LE: OutputPin,
      SPI: Write<u8>,
      D: DelayUs<u16>,
{
    fn write_register(&mut self, w: u32) -> Result<(), Error> {
        self.pin_le.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_us(5);

        self.spi.write(&w.to_be_bytes()).map_err(|_| Error::Spi)?;

        self.delay.delay_us(5);
        self.pin_le.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_us(10);

        Ok(())
    }
}
