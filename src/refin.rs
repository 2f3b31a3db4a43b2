//! Input reference config
//! RefIn / Doubler / R counter / Divider

use crate::{constants::*, errors::*};


/// Phase Frequency Detector' frequency, kept as an exact ratio.
/// f PFD = REF IN × [(1 + D)/(R × (1 + T))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fpfd {
    /// REF IN × (1 + D), Hz
    pub num: u64,
    /// R × (1 + T)
    pub den: u64,
}

impl Fpfd {
    /// Frequency rounded to the nearest Hz
    pub fn hz(&self) -> u64 {
        (self.num + self.den / 2) / self.den
    }

    /// Frequency rounded to the nearest milli-Hz
    pub fn millihz(&self) -> u64 {
        (self.num * 1000 + self.den / 2) / self.den
    }

    /// Whether f PFD is at or below `max_hz`
    pub fn at_most(&self, max_hz: u32) -> bool {
        self.num <= max_hz as u64 * self.den
    }

    /// Number of whole `step_hz` steps in f PFD, i.e. the fractional modulus
    /// for that channel spacing.
    pub fn steps(&self, step_hz: u32) -> u64 {
        self.num / (self.den * step_hz as u64)
    }

    /// Smallest divider that brings f PFD down to `max_hz` or below.
    pub fn div_ceil(&self, max_hz: u32) -> u64 {
        let d = self.den * max_hz as u64;
        (self.num + d - 1) / d
    }
}


/// Input reference frequency config
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefIn {
    /// Input frequency
    f: u32,
    /// True if 2X doubler is enabled
    doubler: bool,
    /// True if 2X divider is enabled
    divider: bool,
}

impl RefIn {

    /// Configure reference input frequency
    pub fn new(
        f: u32,
        doubler: bool,
        divider: bool,
    ) -> Result<Self, Error> {
        if !(REF_IN_FREQ_MIN ..= REF_IN_FREQ_MAX).contains(&f) {
            return Err(Error::InvalidReferenceFrequency);
        }
        if doubler && f > REF_IN_FREQ_DOUBLER_MAX {
            return Err(Error::InvalidReferenceFrequency);
        }
        Ok(RefIn { f, doubler, divider })
    }

    /// Phase Frequency Detector' frequency
    /// f PFD = REF IN × [(1 + D)/(R × (1 + T))]
    /// where:
    /// REF IN is the reference frequency input.
    /// D is the RF REF IN doubler bit (0 or 1).
    /// R is the RF reference division factor (1 to 1023).
    /// T is the reference divide-by-2 bit (0 or 1).
    pub fn f_pfd(&self, r: u16) -> Fpfd {
        Fpfd {
            num: self.f as u64 * (1 + self.doubler as u64),
            den: r as u64 * (1 + self.divider as u64),
        }
    }

    /// Smallest R counter above `after` that keeps f PFD at or below `pfd_max`.
    pub fn tune_r(&self, after: u16, pfd_max: u32) -> u16 {
        let mut r = after;
        loop {
            r += 1;
            if self.f_pfd(r).at_most(pfd_max) {
                return r;
            }
        }
    }

    pub fn doubler(&self) -> bool {
        self.doubler
    }

    pub fn divider(&self) -> bool {
        self.divider
    }
}
