//! Board configuration consumed by the frequency plan solver

use crate::{constants::*, errors::*, refin::*, register::*};


/// Chip variant, differs in the lowest output frequency
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Chip {
    /// RF divider up to 16
    Adf4350,
    /// RF divider up to 64
    Adf4351,
}

impl Chip {
    /// Minimum output frequency, Hz
    pub fn out_freq_min(&self) -> u64 {
        match self {
            Chip::Adf4350 => ADF4350_OUT_FREQ_MIN,
            Chip::Adf4351 => ADF4351_OUT_FREQ_MIN,
        }
    }

    /// Maximum output frequency, Hz
    pub fn out_freq_max(&self) -> u64 {
        OUT_FREQ_MAX
    }
}


/// Reference input, channel spacing and register settings the
/// solver works from.
///
/// Register 2, 3 and 4 settings that are not part of the frequency plan
/// (charge pump current, MUXOUT, output power, ...) are set on `user`
/// and carried over verbatim.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// REFin, Hz
    pub ref_in_hz: u32,
    /// Requested channel spacing, Hz. The solver may widen it.
    pub channel_spacing_hz: u32,
    /// R counter cap, 0 = no cap
    pub max_r: u16,
    /// REFin doubler
    pub ref_doubler: bool,
    /// Divide-by-2 after the R counter
    pub ref_div2: bool,
    /// Primary RF output enable
    pub rf_output_enabled: bool,
    /// Chip variant
    pub chip: Chip,
    /// User register settings, only registers 2, 3 and 4 are consulted
    pub user: RegisterSet,
}

impl DeviceConfig {

    /// New config, no R cap, doubler and divider off, RF output on.
    pub fn new(chip: Chip, ref_in_hz: u32, channel_spacing_hz: u32) -> Self {
        DeviceConfig {
            ref_in_hz,
            channel_spacing_hz,
            max_r: 0,
            ref_doubler: false,
            ref_div2: false,
            rf_output_enabled: true,
            chip,
            user: RegisterSet::default(),
        }
    }

    /// Update a user register bitfield
    pub fn set<F, R>(mut self, f: F) -> Self
    where F: BitField<R> + Into<u32>,
          RegisterSet: RIdx<R>
    {
        self.user = self.user.set(f);
        self
    }

    pub fn with_max_r(mut self, max_r: u16) -> Self {
        self.max_r = max_r;
        self
    }

    pub fn with_ref_doubler(mut self, enabled: bool) -> Self {
        self.ref_doubler = enabled;
        self
    }

    pub fn with_ref_div2(mut self, enabled: bool) -> Self {
        self.ref_div2 = enabled;
        self
    }

    pub fn with_rf_output(mut self, enabled: bool) -> Self {
        self.rf_output_enabled = enabled;
        self
    }

    /// Checks the reference path, spacing and R cap
    pub fn ref_in(&self) -> Result<RefIn, Error> {
        if self.channel_spacing_hz == 0 {
            return Err(Error::InvalidChannelSpacing);
        }
        if self.max_r > R_COUNTER_MAX {
            return Err(Error::InvalidReferenceCounter);
        }
        RefIn::new(self.ref_in_hz, self.ref_doubler, self.ref_div2)
    }

    /// Effective R counter cap
    pub fn r_cap(&self) -> u16 {
        if self.max_r == 0 { R_COUNTER_MAX } else { self.max_r }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chip_limits() {
        assert_eq!(Chip::Adf4350.out_freq_min(), 137_500_000);
        assert_eq!(Chip::Adf4351.out_freq_min(), 34_375_000);
        assert_eq!(Chip::Adf4351.out_freq_min() * 64, VCO_FREQ_MIN);
        assert_eq!(Chip::Adf4350.out_freq_min() * 16, VCO_FREQ_MIN);
    }

    #[test]
    fn builder_sets_user_fields() {
        let cfg = DeviceConfig::new(Chip::Adf4351, 25_000_000, 1000)
            .set(OutputPower(3))
            .set(ChargePumpCurrent(7))
            .with_max_r(10);

        let power: OutputPower = cfg.user.get();
        let cp: ChargePumpCurrent = cfg.user.get();
        assert_eq!(power, OutputPower(3));
        assert_eq!(cp, ChargePumpCurrent(7));
        assert_eq!(cfg.r_cap(), 10);
        assert_eq!(cfg.with_max_r(0).r_cap(), 1023);
    }

    #[test]
    fn validation() {
        let cfg = DeviceConfig::new(Chip::Adf4351, 25_000_000, 1000);
        assert!(cfg.ref_in().is_ok());

        let mut bad = cfg;
        bad.channel_spacing_hz = 0;
        assert_eq!(bad.ref_in(), Err(Error::InvalidChannelSpacing));

        assert_eq!(cfg.with_max_r(1024).ref_in(), Err(Error::InvalidReferenceCounter));
        assert_eq!(
            DeviceConfig::new(Chip::Adf4351, 50_000_000, 1000).with_ref_doubler(true).ref_in(),
            Err(Error::InvalidReferenceFrequency)
        );
    }
}
