//! Constants

/// Minimum allowed REFin frequency
pub const REF_IN_FREQ_MIN: u32 = 10_000_000;

/// Maximum allowed REFin frequency
pub const REF_IN_FREQ_MAX: u32 = 250_000_000;

/// The maximum allowable REF IN frequency when the doubler is
/// enabled is 30 MHz.
pub const REF_IN_FREQ_DOUBLER_MAX: u32 = 30_000_000;

/// Max Phase Detector Frequency (fractional N mode)
pub const PFD_FREQ_FRACN_MAX: u32 = 32_000_000;

/// Band select logic clock must stay at or below this rate
pub const BAND_SELECT_CLOCK_MAX: u32 = 125_000;

/// 8-bit band select clock divider
pub const BAND_SELECT_DIV_MAX: u32 = 255;

/// Band select clock divider limit in high band select clock mode
pub const BAND_SELECT_DIV_MAX_HIGH: u32 = 254;

/// Fundamental VCO mode (before dividers), min frequency
pub const VCO_FREQ_MIN: u64 = 2_200_000_000;

/// Fundamental VCO mode (before dividers), max frequency
pub const VCO_FREQ_MAX: u64 = 4_400_000_000;

/// ADF4350: 2200 MHz fundamental output and divide-by-16 selected
pub const ADF4350_OUT_FREQ_MIN: u64 = 137_500_000;

/// ADF4351: 2200 MHz fundamental output and divide-by-64 selected
pub const ADF4351_OUT_FREQ_MIN: u64 = 34_375_000;

/// VCO output, no divider
pub const OUT_FREQ_MAX: u64 = VCO_FREQ_MAX;

/// Above this output frequency the 8/9 prescaler is selected.
/// The 4/5 prescaler is rated up to 3.6 GHz, this leaves some margin.
pub const OUT_FREQ_P45_MAX: u64 = 3_000_000_000;

/// Prescaler = 4/5: N MIN = 23
pub const INT_MIN_P45: u16 = 23;

/// Prescaler = 8/9: N MIN = 75
pub const INT_MIN_P89: u16 = 75;

/// 16 INT bits
pub const INT_MAX: u64 = 0xFFFF;

/// 12-bit modulus
pub const MOD_MAX: u32 = 4095;

/// 10-bit R counter, division ratios from 1 to 1023
pub const R_COUNTER_MAX: u16 = 1023;

/// Upper bound on frequency plan search transitions
pub const SEARCH_STEPS_MAX: u32 = 10_000;
