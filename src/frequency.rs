//! Frequency plan solver
//!
//! Works out R, INT, FRAC, MOD, the RF divider and the band select clock
//! divider for a requested output frequency and encodes them into the six
//! register words.
//!
//! RF OUT = [INT + (FRAC/MOD)] × (f PFD / RF Divider)

use crate::{config::*, constants::*, errors::*, refin::*, register::*};


/// Everything computed for one output frequency.
/// A new plan is computed for every frequency change, nothing is carried
/// over between calls.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrequencyPlan {
    /// Requested output frequency, Hz
    pub f_out_hz: u64,
    /// VCO frequency (requested frequency times the RF divider), Hz
    pub vco_hz: u64,
    /// Phase detector frequency
    pub fpfd: Fpfd,
    /// R counter
    pub r: u16,
    /// Integer part of the feedback ratio
    pub int: u16,
    /// Fraction numerator, in lowest terms
    pub frac: u16,
    /// Fraction denominator, 1 when there is no fractional part
    pub modulus: u16,
    /// RF divider is 2^rf_divider_select
    pub rf_divider_select: u8,
    /// Band select clock divider
    pub band_select_div: u8,
    pub prescaler: Pr1Prescaler,
    /// Channel spacing the plan was found with, may be wider than requested
    pub channel_spacing_hz: u32,
    /// Output frequency the dividers actually produce, milli-Hz
    pub actual_millihz: u64,
    /// Encoded registers
    pub registers: RegisterSet,
}

impl FrequencyPlan {

    /// RF output divider ratio
    pub fn rf_divider(&self) -> u8 {
        1 << self.rf_divider_select
    }

    /// Actual output frequency rounded to the nearest Hz
    pub fn actual_hz(&self) -> u64 {
        (self.actual_millihz + 500) / 1000
    }

    /// Register words, indexed by register address
    pub fn words(&self) -> [u32; 6] {
        self.registers.to_words()
    }
}


/// Computes the frequency plan for `f_out_hz`.
///
/// The only rejection for a valid config is a frequency outside of the
/// chip's range. Channel spacing is widened and R is re-derived as needed
/// to find a plan the chip can run.
pub fn synthesize(f_out_hz: u64, cfg: &DeviceConfig) -> Result<FrequencyPlan, Error> {
    if !(cfg.chip.out_freq_min() ..= cfg.chip.out_freq_max()).contains(&f_out_hz) {
        return Err(Error::OutOfRange);
    }
    let refin = cfg.ref_in()?;

    // prescaler is picked from the output frequency, before the VCO range adjustment
    let (prescaler, int_min) =
        if f_out_hz > OUT_FREQ_P45_MAX {
            (Pr1Prescaler::Pr89, INT_MIN_P89)
        } else {
            (Pr1Prescaler::Pr45, INT_MIN_P45)
        };

    let mut vco_hz = f_out_hz;
    let mut rf_divider_select = 0;
    while vco_hz < VCO_FREQ_MIN { vco_hz <<= 1; rf_divider_select += 1; }

    // f PFD must also be slow enough for the band select divider to bring
    // the band select clock down to 125 kHz
    let band_select_div_max = match cfg.user.get::<BandSelectClockMode, _>() {
        BandSelectClockMode::Low => BAND_SELECT_DIV_MAX,
        BandSelectClockMode::High => BAND_SELECT_DIV_MAX_HIGH,
    };
    let pfd_max = PFD_FREQ_FRACN_MAX.min(BAND_SELECT_CLOCK_MAX * band_select_div_max);

    let d = search(vco_hz, int_min, &refin, pfd_max, cfg.r_cap(), cfg.channel_spacing_hz)?;

    let band_select_div = d.fpfd.div_ceil(BAND_SELECT_CLOCK_MAX).clamp(1, band_select_div_max as u64) as u8;

    let (frac, modulus) = reduce(d.frac, d.modulus);

    let registers = encode(cfg, &refin, &Encoded {
        r: d.r,
        int: d.int as u16,
        frac: frac as u16,
        modulus: modulus as u16,
        prescaler,
        rf_divider_select,
        band_select_div,
    });

    let actual_millihz = f_out_millihz(d.int, frac, modulus, &d.fpfd, rf_divider_select);

    #[cfg(feature = "defmt")]
    defmt::debug!(
        "plan f={=u64} vco={=u64} r={=u16} int={=u64} frac={=u64}/{=u64} rfdiv={=u8} bs={=u8}",
        f_out_hz, vco_hz, d.r, d.int, frac, modulus, rf_divider_select, band_select_div
    );

    Ok(FrequencyPlan {
        f_out_hz,
        vco_hz,
        fpfd: d.fpfd,
        r: d.r,
        int: d.int as u16,
        frac: frac as u16,
        modulus: modulus as u16,
        rf_divider_select,
        band_select_div,
        prescaler,
        channel_spacing_hz: d.channel_spacing_hz,
        actual_millihz,
        registers,
    })
}


/// Divider values found by `search`, fraction not yet reduced
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Dividers {
    r: u16,
    fpfd: Fpfd,
    int: u64,
    frac: u64,
    modulus: u64,
    channel_spacing_hz: u32,
}

/// Search states
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Search {
    /// Look for the next R above `after` with f PFD <= `pfd_max` and MOD <= 4095
    SearchR { after: u16 },
    /// R cap exhausted, relax the channel spacing and start over
    WidenSpacing,
    /// Check INT against the prescaler floor and the 16 bit limit
    CheckFloor { r: u16, fpfd: Fpfd, modulus: u64 },
}

/// Finds R, MOD, INT and FRAC for a VCO frequency.
///
/// Invariants per state:
/// * `SearchR`: every R in `1..=after` was rejected at the current spacing.
/// * `WidenSpacing`: no R up to `r_cap` works at the current spacing.
/// * `CheckFloor`: f PFD <= `pfd_max` and 0 < MOD <= 4095.
fn search(
    vco_hz: u64,
    int_min: u16,
    refin: &RefIn,
    pfd_max: u32,
    r_cap: u16,
    channel_spacing_hz: u32,
) -> Result<Dividers, Error> {
    let mut spacing = channel_spacing_hz;
    let mut state = Search::SearchR { after: 0 };

    for _ in 0 .. SEARCH_STEPS_MAX {
        state = match state {
            Search::SearchR { after } => {
                let mut r = after;
                loop {
                    r = refin.tune_r(r, pfd_max);
                    if r > r_cap {
                        break Search::WidenSpacing;
                    }
                    let fpfd = refin.f_pfd(r);
                    let modulus = fpfd.steps(spacing);
                    if modulus == 0 {
                        // spacing wider than f PFD, a larger R only makes it worse
                        return Err(Error::InvalidChannelSpacing);
                    }
                    if modulus <= MOD_MAX as u64 {
                        break Search::CheckFloor { r, fpfd, modulus };
                    }
                }
            }

            Search::WidenSpacing => {
                if refin.tune_r(0, pfd_max) > r_cap {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("R cap {=u16} is below the smallest usable R", r_cap);
                    return Err(Error::ConvergenceFailure);
                }
                // jump straight to the first spacing R = cap can satisfy
                let fpfd = refin.f_pfd(r_cap);
                let needed = fpfd.num / (fpfd.den * (MOD_MAX as u64 + 1)) + 1;
                spacing = spacing.saturating_add(1).max(needed as u32);

                #[cfg(feature = "defmt")]
                defmt::trace!("channel spacing widened to {=u32}", spacing);

                Search::SearchR { after: 0 }
            }

            Search::CheckFloor { r, fpfd, modulus } => {
                // INT × MOD + FRAC = round(VCO × MOD / f PFD)
                let nscaled = (vco_hz * modulus * fpfd.den + fpfd.num / 2) / fpfd.num;
                let int = nscaled / modulus;
                let frac = nscaled % modulus;

                if int < int_min as u64 {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("INT {=u64} below {=u16}, next R", int, int_min);
                    Search::SearchR { after: r }
                } else if int > INT_MAX {
                    Search::WidenSpacing
                } else {
                    return Ok(Dividers {
                        r,
                        fpfd,
                        int,
                        frac,
                        modulus,
                        channel_spacing_hz: spacing,
                    });
                }
            }
        };
    }

    #[cfg(feature = "defmt")]
    defmt::warn!("no frequency plan after {=u32} steps", SEARCH_STEPS_MAX);
    Err(Error::ConvergenceFailure)
}


/// Greatest common divisor, gcd(0, b) = b
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// FRAC/MOD in lowest terms, 0/1 when there is no fractional part
pub fn reduce(frac: u64, modulus: u64) -> (u64, u64) {
    if frac != 0 && modulus != 0 {
        let g = gcd(modulus, frac);
        (frac / g, modulus / g)
    } else {
        (0, 1)
    }
}

/// RF OUT = [INT + (FRAC/MOD)] × (f PFD / RF Divider), in milli-Hz
pub fn f_out_millihz(int: u64, frac: u64, modulus: u64, fpfd: &Fpfd, rf_divider_select: u8) -> u64 {
    let n = int as u128 * modulus as u128 + frac as u128;
    let num = n * fpfd.num as u128 * 1000;
    let den = (modulus as u128 * fpfd.den as u128) << rf_divider_select;
    ((num + den / 2) / den) as u64
}


/// Computed fields that go into the registers
struct Encoded {
    r: u16,
    int: u16,
    frac: u16,
    modulus: u16,
    prescaler: Pr1Prescaler,
    rf_divider_select: u8,
    band_select_div: u8,
}

/// Packs the plan and the user settings into the six registers
fn encode(cfg: &DeviceConfig, refin: &RefIn, e: &Encoded) -> RegisterSet {
    let r0 = Reg::<R0>::default()
        .set(Int(e.int))
        .set(Frac(e.frac));

    let r1 = Reg::<R1>::default()
        .set(Phase(if e.modulus > 1 { 1 } else { 0 })) // phase word must stay below MOD
        .set(Mod(e.modulus))
        .set(e.prescaler);

    let r2 = Reg::<R2>::default()
        .set(R(e.r))
        .set(if refin.doubler() { RefDoubler::Enabled } else { RefDoubler::Disabled })
        .set(if refin.divider() { Rdiv2::Enabled } else { Rdiv2::Disabled })
        .overlay(&cfg.user.r2, r2_user_mask());

    let r3 = Reg::<R3>::default()
        .overlay(&cfg.user.r3, r3_user_mask());

    let r4 = Reg::<R4>::default()
        .set(FeedbackSelect::Fundamental) // INT/FRAC are computed from the VCO frequency
        .set(RfDividerSelect(e.rf_divider_select))
        .set(BandSelectClockDiv(e.band_select_div))
        .set(if cfg.rf_output_enabled { RfOutputEnable::Enabled } else { RfOutputEnable::Disabled })
        .overlay(&cfg.user.r4, r4_user_mask());

    let mut r5 = Reg::<R5>::default()
        .set(LockDetectPin::DigitalLockDetect);
    r5.w |= R5_RESERVED;

    RegisterSet { r0, r1, r2, r3, r4, r5 }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> DeviceConfig {
        DeviceConfig::new(Chip::Adf4351, 25_000_000, 1000)
    }

    #[test]
    fn gcd_zero_operand() {
        assert_eq!(gcd(0, 12), 12);
        assert_eq!(gcd(12, 0), 12);
        assert_eq!(gcd(3571, 959), 1);
        assert_eq!(gcd(4000, 1500), 500);
    }

    #[test]
    fn reduce_fraction() {
        assert_eq!(reduce(1500, 4000), (3, 8));
        assert_eq!(reduce(0, 4000), (0, 1));
        assert_eq!(reduce(5, 0), (0, 1));
    }

    #[test]
    fn uhf_channel() {
        let plan = synthesize(439_852_000, &cfg()).unwrap();

        assert_eq!(plan.rf_divider_select, 3);
        assert_eq!(plan.rf_divider(), 8);
        assert_eq!(plan.vco_hz, 3_518_816_000);
        assert_eq!(plan.prescaler, Pr1Prescaler::Pr45);
        assert_eq!(plan.r, 7);
        assert_eq!(plan.fpfd, Fpfd { num: 25_000_000, den: 7 });
        assert_eq!(plan.int, 985);
        assert_eq!(plan.frac, 959);
        assert_eq!(plan.modulus, 3571);
        assert_eq!(plan.band_select_div, 29);
        assert_eq!(plan.channel_spacing_hz, 1000);
        assert_eq!(plan.actual_millihz, 439_852_032_244);
        assert_eq!(plan.actual_hz(), 439_852_032);

        let words = plan.words();
        assert_eq!(words[0], 0x01EC_9DF8);
        assert_eq!(words[1], 0x0000_EF99);
        assert_eq!(words[2], 2 | (7 << 14));
        assert_eq!(words[3], 3);
        assert_eq!(words[4], 4 | (1 << 23) | (3 << 20) | (29 << 12) | (1 << 5));
        assert_eq!(words[5], 0x0058_0005);
    }

    #[test]
    fn integer_channel_reduces_to_unit_modulus() {
        let plan = synthesize(2_400_000_000, &cfg()).unwrap();
        assert_eq!(plan.rf_divider_select, 0);
        assert_eq!((plan.int, plan.frac, plan.modulus), (672, 0, 1));
        assert_eq!(plan.actual_hz(), 2_400_000_000);
        assert_eq!(plan.words()[0], 0x0150_0000);
        assert_eq!(plan.words()[1], 0x0000_0009);
        assert_eq!(plan.registers.get::<Phase, _>(), Phase(0));
    }

    #[test]
    fn phase_word_below_modulus() {
        let plan = synthesize(439_852_000, &cfg()).unwrap();
        assert_eq!(plan.registers.get::<Phase, _>(), Phase(1));
        assert!(plan.registers.get::<Phase, _>().0 < plan.modulus);
    }

    #[test]
    fn high_band_uses_8_9_prescaler() {
        let plan = synthesize(3_500_000_000, &cfg()).unwrap();
        assert_eq!(plan.prescaler, Pr1Prescaler::Pr89);
        assert!(plan.int >= INT_MIN_P89);
        assert_eq!(plan.words()[1] & (1 << 27), 1 << 27);

        let plan = synthesize(3_000_000_000, &cfg()).unwrap();
        assert_eq!(plan.prescaler, Pr1Prescaler::Pr45);
    }

    #[test]
    fn range_limits() {
        assert!(synthesize(34_375_000, &cfg()).is_ok());
        assert!(synthesize(4_400_000_000, &cfg()).is_ok());
        assert_eq!(synthesize(34_374_999, &cfg()), Err(Error::OutOfRange));
        assert_eq!(synthesize(4_400_000_001, &cfg()), Err(Error::OutOfRange));

        let mut adf4350 = cfg();
        adf4350.chip = Chip::Adf4350;
        assert_eq!(synthesize(100_000_000, &adf4350), Err(Error::OutOfRange));
        let plan = synthesize(137_500_000, &adf4350).unwrap();
        assert_eq!(plan.rf_divider_select, 4);
    }

    #[test]
    fn min_frequency_uses_divide_by_64() {
        let plan = synthesize(34_375_000, &cfg()).unwrap();
        assert_eq!(plan.rf_divider_select, 6);
        assert_eq!(plan.vco_hz, VCO_FREQ_MIN);
        assert_eq!(plan.words()[4] & (0b111 << 20), 6 << 20);
    }

    #[test]
    fn r_cap_widens_spacing() {
        let plan = synthesize(439_852_000, &cfg().with_max_r(1)).unwrap();
        assert_eq!(plan.r, 1);
        assert_eq!(plan.channel_spacing_hz, 6104);
        assert_eq!(plan.modulus, 4095);
        assert_eq!((plan.int, plan.frac), (140, 3082));
        assert_eq!(plan.band_select_div, 200);
        assert_eq!(plan.actual_millihz, 439_851_953_602);
    }

    #[test]
    fn fine_spacing_keeps_int_in_16_bits() {
        let plan = synthesize(439_852_000, &DeviceConfig::new(Chip::Adf4351, 25_000_000, 1)).unwrap();
        assert_eq!(plan.r, 436);
        assert_eq!(plan.channel_spacing_hz, 14);
        assert_eq!((plan.int, plan.frac, plan.modulus), (61368, 619, 4095));
        assert_eq!(plan.band_select_div, 1);
    }

    #[test]
    fn r_cap_below_pfd_limit_fails() {
        let cfg = DeviceConfig::new(Chip::Adf4351, 100_000_000, 1000).with_max_r(3);
        assert_eq!(synthesize(439_852_000, &cfg), Err(Error::ConvergenceFailure));

        let plan = synthesize(439_852_000, &cfg.with_max_r(4)).unwrap();
        assert_eq!(plan.r, 4);
    }

    #[test]
    fn spacing_wider_than_pfd() {
        let cfg = DeviceConfig::new(Chip::Adf4351, 25_000_000, 30_000_000);
        assert_eq!(synthesize(2_400_000_000, &cfg), Err(Error::InvalidChannelSpacing));
    }

    #[test]
    fn doubler_and_divider_bits() {
        let cfg = cfg().with_ref_doubler(true).with_ref_div2(true);
        let plan = synthesize(1_000_000_000, &cfg).unwrap();
        let doubler: RefDoubler = plan.registers.get();
        let rdiv2: Rdiv2 = plan.registers.get();
        assert_eq!(doubler, RefDoubler::Enabled);
        assert_eq!(rdiv2, Rdiv2::Enabled);
        assert_eq!(plan.fpfd.num, 50_000_000);
        assert_eq!(plan.fpfd.den, 2 * plan.r as u64);
    }

    #[test]
    fn user_settings_are_masked() {
        let cfg = cfg()
            .set(OutputPower(3))
            .set(AuxOutputEnable::Enabled)
            .set(VcoPowerDown::PoweredDown) // not user owned
            .set(ChargePumpCurrent(0xF))
            .set(Muxout::Dlock)
            .set(R(100)) // not user owned
            .set(ClockDividerValue(150))
            .set(BandSelectClockMode::High);
        let plan = synthesize(439_852_000, &cfg).unwrap();

        let rs = plan.registers;
        assert_eq!(rs.get::<OutputPower, _>(), OutputPower(3));
        assert_eq!(rs.get::<AuxOutputEnable, _>(), AuxOutputEnable::Enabled);
        assert_eq!(rs.get::<VcoPowerDown, _>(), VcoPowerDown::PoweredUp);
        assert_eq!(rs.get::<ChargePumpCurrent, _>(), ChargePumpCurrent(0xF));
        assert_eq!(rs.get::<Muxout, _>(), Muxout::Dlock);
        assert_eq!(rs.get::<R, _>(), R(7));
        assert_eq!(rs.get::<ClockDividerValue, _>(), ClockDividerValue(150));
        assert_eq!(rs.get::<BandSelectClockMode, _>(), BandSelectClockMode::High);
        assert_eq!(rs.get::<RfDividerSelect, _>(), RfDividerSelect(3));
    }

    #[test]
    fn rf_output_disabled() {
        let plan = synthesize(439_852_000, &cfg().with_rf_output(false)).unwrap();
        assert_eq!(plan.registers.get::<RfOutputEnable, _>(), RfOutputEnable::Disabled);
    }

    #[test]
    fn band_select_clock_within_limit() {
        // 64 MHz / 2 = 32 MHz would need a divider of 256, R = 2 is the first fit
        let cfg = DeviceConfig::new(Chip::Adf4351, 64_000_000, 10_000).with_ref_div2(true);
        let plan = synthesize(2_400_000_000, &cfg).unwrap();
        assert_eq!(plan.r, 2);
        assert_eq!(plan.band_select_div, 128);

        // 31.85 MHz: 255 in low mode, over the 254 limit in high mode
        let cfg = DeviceConfig::new(Chip::Adf4351, 63_700_000, 10_000).with_ref_div2(true);
        let plan = synthesize(2_400_000_000, &cfg).unwrap();
        assert_eq!(plan.r, 1);
        assert_eq!(plan.band_select_div, 255);
        assert!(plan.fpfd.num <= plan.fpfd.den * BAND_SELECT_CLOCK_MAX as u64 * 255);

        let plan = synthesize(2_400_000_000, &cfg.set(BandSelectClockMode::High)).unwrap();
        assert_eq!(plan.r, 2);
        assert_eq!(plan.band_select_div, 128);
        assert_eq!(plan.registers.get::<BandSelectClockMode, _>(), BandSelectClockMode::High);
    }

    #[test]
    fn actual_frequency_back_computation() {
        let fpfd = Fpfd { num: 25_000_000, den: 1 };
        assert_eq!(f_out_millihz(96, 0, 1, &fpfd, 0), 2_400_000_000_000);
        assert_eq!(f_out_millihz(96, 1, 3, &fpfd, 1), 1_204_166_666_667);
    }
}
