//! ADF4350/ADF4351 registers
//!
//! Six 32-bit write-only registers, the 3 LSBs of each word select the
//! destination latch. Field positions follow the chip's register map.

use core::marker::PhantomData;

/// Register number marker types
macro_rules! gen_register_marker {
    ($r:ident, $n:tt) => {
        /// Register marker
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        pub struct $r {}

        impl Default for Reg<$r> {
            #[inline]
            fn default() -> Self { Reg { w: $n, phantom: PhantomData } }
        }
    };
}

gen_register_marker!(R0, 0);
gen_register_marker!(R1, 1);
gen_register_marker!(R2, 2);
gen_register_marker!(R3, 3);
gen_register_marker!(R4, 4);
gen_register_marker!(R5, 5);

/// Control bits, Bits[DB2:DB0]
pub const CONTROL_BITS_MASK: u32 = 0b111;

/// Register 5 Bits[DB20:DB19] are reserved and must be set to 11
pub const R5_RESERVED: u32 = 0b11 << 19;


/// Single config register
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Reg<R> {
    /// Config register word
    pub w: u32,
    phantom: PhantomData<R>,
}

/// Bit operations on 32bit words
impl<R> Reg<R> {
    #[inline]
    pub fn get<F>(&self) -> F
    where F: BitField<R> + From<u32>
    {
        F::from((self.w >> F::offset()) & F::mask())
    }

    #[inline]
    pub fn set<F>(mut self, f: F) -> Self
    where F: BitField<R> + Into<u32>
    {
        let fbits = (f.into() & F::mask()) << F::offset();
        let rbits = self.w & !F::field_mask();
        self.w = rbits | fbits;
        self
    }

    /// Copies the bits selected by `mask` from `user`, control bits are never copied.
    #[inline]
    pub fn overlay(mut self, user: &Reg<R>, mask: u32) -> Self {
        let mask = mask & !CONTROL_BITS_MASK;
        self.w = (self.w & !mask) | (user.w & mask);
        self
    }

    /// Register address, Bits[DB2:DB0]
    #[inline]
    pub fn address(&self) -> u8 {
        (self.w & CONTROL_BITS_MASK) as u8
    }
}


/// Full set of config registers.
/// Defaults to all config bits set to 0.
///
/// When power is first applied the part requires six writes
/// (R5, R4, R3, R2, R1 and R0, in that order) for the output
/// to become active.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RegisterSet {
    pub r0: Reg<R0>,
    pub r1: Reg<R1>,
    pub r2: Reg<R2>,
    pub r3: Reg<R3>,
    pub r4: Reg<R4>,
    pub r5: Reg<R5>,
}

/// Type-indexed register access
pub trait RIdx<R> {
    fn r(&self) -> Reg<R>;
    fn update_r<F>(self, f: F) -> Self where F: FnOnce(Reg<R>) -> Reg<R>;
}

macro_rules! gen_register_index {
    ($r:ident, $f:tt) => {
        impl RIdx<$r> for RegisterSet {
            #[inline]
            fn r(&self) -> Reg<$r> { self.$f }
            #[inline]
            fn update_r<F>(mut self, f: F) -> Self where F: FnOnce(Reg<$r>) -> Reg<$r> {
                self.$f = f(self.$f);
                self
            }
        }
    };
}

gen_register_index!(R0, r0);
gen_register_index!(R1, r1);
gen_register_index!(R2, r2);
gen_register_index!(R3, r3);
gen_register_index!(R4, r4);
gen_register_index!(R5, r5);


impl RegisterSet {

    /// Register values in device format, indexed by register address.
    #[inline]
    pub fn to_words(&self) -> [u32; 6] {
        [self.r0.w, self.r1.w, self.r2.w, self.r3.w, self.r4.w, self.r5.w]
    }

    /// Get register bitfield value
    #[inline]
    pub fn get<F, R>(&self) -> F
    where F: BitField<R> + From<u32>,
          Self: RIdx<R>
    {
        RIdx::<R>::r(self).get()
    }

    /// Update register bitfield
    #[inline]
    pub fn set<F, R>(self, f: F) -> Self
    where F: BitField<R> + Into<u32>,
          Self: RIdx<R>
    {
        RIdx::<R>::update_r(self, |r| r.set(f))
    }
}


/// Bit operations on 32bit words
pub trait BitField<R> {
    /// Number of bits in the bit field
    fn num_bits() -> u8;

    /// Offset from 0
    fn offset() -> u8;

    #[inline]
    fn mask() -> u32 {
        !(0xFFFF_FFFFu32 << Self::num_bits())
    }

    /// Mask of the field at its position in the register word
    #[inline]
    fn field_mask() -> u32 {
        Self::mask() << Self::offset()
    }
}

/// Generate BitField implementation
macro_rules! gen_bitfield_impl {
    ($r:ty, $n:ident, $nb:tt, $off:tt) => {
        impl BitField<$r> for $n {
            #[inline] fn num_bits() -> u8 { $nb }
            #[inline] fn offset() -> u8 { $off }
        }
    };
}

/// Small bitfield-encoded numbers boilerplate
macro_rules! gen_bitfield_struct {
    ($(#[$meta:meta])*, $r:ty, $n:ident, $v:ty, $nb:tt, $off:tt) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub struct $n(pub $v);

        gen_bitfield_impl!($r, $n, $nb, $off);

        impl From<u32> for $n { #[inline] fn from(x: u32) -> Self { $n(x as $v) } }
        impl From<$n> for u32 { #[inline] fn from(x: $n) -> u32 { x.0 as u32 } }
    };
}

/// Enumerated bitfield boilerplate.
/// Every code the field can hold must be listed, the first variant is
/// what an unlisted code decodes to.
macro_rules! gen_bitfield_enum {
    ($(#[$meta:meta])*, $r:ty, $n:ident, $nb:tt, $off:tt,
     { $(#[$m0:meta])* $v0:ident = $x0:expr $(, $(#[$vm:meta])* $v:ident = $x:expr)* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum $n {
            $(#[$m0])* $v0 = $x0,
            $($(#[$vm])* $v = $x,)*
        }

        gen_bitfield_impl!($r, $n, $nb, $off);

        impl From<u32> for $n {
            #[inline]
            fn from(x: u32) -> Self {
                $(if x == $x { return $n::$v; })*
                $n::$v0
            }
        }
        impl From<$n> for u32 { #[inline] fn from(x: $n) -> u32 { x as u32 } }
    };
}


gen_bitfield_struct!(
    /// 16-bit INT value, Bits[DB30:DB15].
    /// 23 to 65,535 with the 4/5 prescaler, 75 to 65,535 with 8/9.
    , R0, Int, u16, 16, 15
);

gen_bitfield_struct!(
    /// 12-bit FRAC value, Bits[DB14:DB3], numerator of the
    /// Σ-Δ modulator fraction, 0 to (MOD − 1).
    , R0, Frac, u16, 12, 3
);


gen_bitfield_enum!(
    /// Dual-modulus prescaler, Bit DB27.
    /// The 4/5 prescaler tops out at 3.6 GHz.
    , R1, Pr1Prescaler, 1, 27, {
        /// Prescaler = 4/5: INT N MIN = 23
        Pr45 = 0,
        /// Prescaler = 8/9: INT N MIN = 75
        Pr89 = 1,
    }
);

gen_bitfield_struct!(
    /// 12-bit phase word, Bits[DB26:DB15], must be less than MOD.
    , R1, Phase, u16, 12, 15
);

gen_bitfield_struct!(
    /// 12-bit fractional modulus, Bits[DB14:DB3].
    /// Ratio of the PFD frequency to the channel step resolution.
    , R1, Mod, u16, 12, 3
);


gen_bitfield_enum!(
    /// Noise mode, Bits[DB30:DB29].
    /// Low spur mode enables dither, low noise mode disables it.
    , R2, NoiseMode, 2, 29, {
        LowNoise = 0,
        Reserved1 = 1,
        Reserved2 = 2,
        LowSpur = 0b11,
    }
);

gen_bitfield_enum!(
    /// MUXOUT select, Bits[DB28:DB26].
    /// N counter output must be off for VCO band selection to work.
    , R2, Muxout, 3, 26, {
        ThreeStateOut = 0,
        Dvdd = 1,
        Dgnd = 2,
        RCntOut = 3,
        NDivOut = 4,
        Alock = 5,
        Dlock = 6,
        Reserved = 7,
    }
);

gen_bitfield_enum!(
    /// REFin doubler, Bit DB25.
    /// The maximum allowable REF IN frequency when the doubler is
    /// enabled is 30 MHz.
    , R2, RefDoubler, 1, 25, {
        Disabled = 0,
        Enabled = 1,
    }
);

gen_bitfield_enum!(
    /// Divide-by-2 flip-flop between the R counter and the PFD, Bit DB24.
    /// Gives a 50% duty cycle at the PFD, needed for cycle slip reduction.
    , R2, Rdiv2, 1, 24, {
        Disabled = 0,
        Enabled = 1,
    }
);

gen_bitfield_struct!(
    /// 10-bit R counter, Bits[DB23:DB14], 1 to 1023.
    , R2, R, u16, 10, 14
);

gen_bitfield_enum!(
    /// Double buffering of the RF divider select bits in Register 4, Bit DB13.
    , R2, DoubleBuffer, 1, 13, {
        Disabled = 0,
        Enabled = 1,
    }
);

gen_bitfield_struct!(
    /// Charge pump current setting, Bits[DB12:DB9].
    /// Should match the current the loop filter is designed for.
    , R2, ChargePumpCurrent, u8, 4, 9
);

gen_bitfield_enum!(
    /// Lock detect function, Bit DB8: 40 PFD cycles (FRAC-N) or 5 (INT-N).
    , R2, Ldf, 1, 8, {
        FracN = 0,
        IntN = 1,
    }
);

gen_bitfield_enum!(
    /// Lock detect precision, Bit DB7: 10 ns or 6 ns comparison window.
    , R2, Ldp, 1, 7, {
        Ldp10ns = 0,
        Ldp6ns = 1,
    }
);

gen_bitfield_enum!(
    /// Phase detector polarity, Bit DB6.
    /// Positive for passive or noninverting active loop filters.
    , R2, PhaseDetectorPolarity, 1, 6, {
        Negative = 0,
        Positive = 1,
    }
);

gen_bitfield_enum!(
    /// Software power-down, Bit DB5. Register contents are retained.
    , R2, PowerDown, 1, 5, {
        Disabled = 0,
        Enabled = 1,
    }
);

gen_bitfield_enum!(
    /// Charge pump three-state, Bit DB4. 0 for normal operation.
    , R2, ChargePumpThreeState, 1, 4, {
        Disabled = 0,
        Enabled = 1,
    }
);

gen_bitfield_enum!(
    /// R and N counter reset, Bit DB3. 0 for normal operation.
    , R2, CounterReset, 1, 3, {
        Disabled = 0,
        Enabled = 1,
    }
);


gen_bitfield_enum!(
    /// Band select clock mode, Bit DB23.
    /// High selects the faster band selection logic, the band select
    /// clock divider must then be 254 or less.
    , R3, BandSelectClockMode, 1, 23, {
        Low = 0,
        High = 1,
    }
);

gen_bitfield_enum!(
    /// PFD antibacklash pulse width, Bit DB22.
    , R3, AntiBacklashPulseWidth, 1, 22, {
        AB6ns = 0, // FRAC-N
        AB3ns = 1, // INT-N
    }
);

gen_bitfield_enum!(
    /// Charge pump charge cancellation, Bit DB21. INT-N only.
    , R3, ChargeCancellation, 1, 21, {
        Disabled = 0, // FRAC-N
        Enabled = 1, // INT-N
    }
);

gen_bitfield_enum!(
    /// Cycle slip reduction, Bit DB18.
    /// Needs a 50% duty cycle at the PFD and minimum charge pump current.
    , R3, CycleSlipReduction, 1, 18, {
        Disabled = 0,
        Enabled = 1,
    }
);

gen_bitfield_enum!(
    /// Clock divider mode, Bits[DB17:DB16]
    , R3, ClockDividerMode, 2, 16, {
        Off = 0,
        FastLock = 1,
        Resync = 2,
        Reserved = 3,
    }
);

gen_bitfield_struct!(
    /// 12-bit clock divider value, Bits[DB14:DB3].
    /// Timeout counter for phase resync and fast lock.
    , R3, ClockDividerValue, u16, 12, 3
);


gen_bitfield_enum!(
    /// VCO feedback to the N counter, Bit DB23.
    , R4, FeedbackSelect, 1, 23, {
        Divided = 0,
        Fundamental = 1,
    }
);

gen_bitfield_struct!(
    /// RF output divider select, Bits[DB22:DB20], divide by 2^n.
    , R4, RfDividerSelect, u8, 3, 20
);

gen_bitfield_struct!(
    /// Band select clock divider, Bits[DB19:DB12].
    /// Divides the R counter output down for the band select logic.
    , R4, BandSelectClockDiv, u8, 8, 12
);

gen_bitfield_enum!(
    /// VCO power-down, Bit DB11.
    , R4, VcoPowerDown, 1, 11, {
        PoweredUp = 0,
        PoweredDown = 1,
    }
);

gen_bitfield_enum!(
    /// Mute RF output until digital lock detect, Bit DB10.
    , R4, MuteTillLockDetect, 1, 10, {
        Disabled = 0,
        Enabled = 1,
    }
);

gen_bitfield_enum!(
    /// Auxiliary RF output source, Bit DB9.
    , R4, AuxOutputSelect, 1, 9, {
        Divided = 0,
        Fundamental = 1,
    }
);

gen_bitfield_enum!(
    /// Auxiliary RF output enable, Bit DB8.
    , R4, AuxOutputEnable, 1, 8, {
        Disabled = 0,
        Enabled = 1,
    }
);

gen_bitfield_struct!(
    /// Auxiliary output power, Bits[DB7:DB6].
    , R4, AuxOutputPower, u8, 2, 6
);

gen_bitfield_enum!(
    /// Primary RF output enable, Bit DB5.
    , R4, RfOutputEnable, 1, 5, {
        Disabled = 0,
        Enabled = 1,
    }
);

gen_bitfield_struct!(
    /// Primary output power, Bits[DB4:DB3]: -4, -1, +2, +5 dBm.
    , R4, OutputPower, u8, 2, 3
);


gen_bitfield_enum!(
    /// Lock detect pin operation, Bits[DB23:DB22].
    , R5, LockDetectPin, 2, 22, {
        Low = 0,
        DigitalLockDetect = 1,
        Low1 = 2,
        High = 3,
    }
);


/// Register 2 fields taken from the board's user settings.
/// R counter, doubler and divide-by-2 are owned by the frequency plan.
pub fn r2_user_mask() -> u32 {
    <PhaseDetectorPolarity as BitField<R2>>::field_mask()
        | <Ldp as BitField<R2>>::field_mask()
        | <Ldf as BitField<R2>>::field_mask()
        | <ChargePumpCurrent as BitField<R2>>::field_mask()
        | <Muxout as BitField<R2>>::field_mask()
        | <NoiseMode as BitField<R2>>::field_mask()
}

/// Register 3 is entirely user owned.
pub fn r3_user_mask() -> u32 {
    <ClockDividerValue as BitField<R3>>::field_mask()
        | <ClockDividerMode as BitField<R3>>::field_mask()
        | <CycleSlipReduction as BitField<R3>>::field_mask()
        | <ChargeCancellation as BitField<R3>>::field_mask()
        | <AntiBacklashPulseWidth as BitField<R3>>::field_mask()
        | <BandSelectClockMode as BitField<R3>>::field_mask()
}

/// Register 4 output power and aux output settings.
/// Dividers, feedback select and RF output enable are owned by the frequency plan.
pub fn r4_user_mask() -> u32 {
    <OutputPower as BitField<R4>>::field_mask()
        | <AuxOutputPower as BitField<R4>>::field_mask()
        | <AuxOutputEnable as BitField<R4>>::field_mask()
        | <AuxOutputSelect as BitField<R4>>::field_mask()
        | <MuteTillLockDetect as BitField<R4>>::field_mask()
}
