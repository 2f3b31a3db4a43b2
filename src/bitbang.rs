//! Bit-banged 3-wire register writes over GPIO (DATA, CLK, LE)

use embedded_hal::{
    digital::v2::OutputPin,
    blocking::delay::DelayUs,
};

use crate::device::RegisterWrite;
use crate::errors::*;


/// ADF4350/ADF4351 wired to three GPIO outputs
pub struct BitBang<DATA, CLK, LE, D> {
    pin_data: DATA,
    pin_clk: CLK,
    pin_le: LE,
    delay: D,
}

impl<DATA, CLK, LE, D> BitBang<DATA, CLK, LE, D>
where DATA: OutputPin,
      CLK: OutputPin,
      LE: OutputPin,
      D: DelayUs<u16>,
{
    /// Takes the pins and drives all three low.
    pub fn new(
        pin_data: DATA,
        pin_clk: CLK,
        pin_le: LE,
        delay: D,
    ) -> Result<Self, Error> {
        let mut bb = BitBang { pin_data, pin_clk, pin_le, delay };
        bb.pin_le.set_low().map_err(|_| Error::Pin)?;
        bb.pin_clk.set_low().map_err(|_| Error::Pin)?;
        bb.pin_data.set_low().map_err(|_| Error::Pin)?;
        Ok(bb)
    }

    /// Gives back the pins
    pub fn release(self) -> (DATA, CLK, LE, D) {
        (self.pin_data, self.pin_clk, self.pin_le, self.delay)
    }

    #[inline(always)]
    fn clock_bit(&mut self, bit: bool) -> Result<(), Error> {
        if bit {
            self.pin_data.set_high().map_err(|_| Error::Pin)?;
        } else {
            self.pin_data.set_low().map_err(|_| Error::Pin)?;
        }
        self.delay.delay_us(1);
        self.pin_clk.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_us(1);
        self.pin_clk.set_low().map_err(|_| Error::Pin)
    }
}

impl<DATA, CLK, LE, D> RegisterWrite for BitBang<DATA, CLK, LE, D>
where DATA: OutputPin,
      CLK: OutputPin,
      LE: OutputPin,
      D: DelayUs<u16>,
{
    fn write_register(&mut self, w: u32) -> Result<(), Error> {
        self.pin_le.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_us(1);

        for i in (0 .. 32).rev() {
            self.clock_bit(w & (1 << i) != 0)?;
        }

        self.pin_le.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_us(1);

        Ok(())
    }
}
