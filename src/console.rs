//! Console commands and user settings
//!
//! Line editing and the serial port live outside this crate, this module
//! only turns a complete command line into a `Command` and formats what
//! the commands report.

use core::fmt;

use crate::{config::*, constants::*, errors::*, frequency::*, register::*};


/// Help text for `help` / `?`
pub const HELP: &str = "\r\nCommands:\r\n\r\n\
    \tfreq [nnnn.nnn]\r\n\t\tSet output frequency in MHz\r\n\r\n\
    \tr [r]\r\n\t\tSet maximum R value\r\n\r\n\
    \tpower [-4|-1|+2|+5]\r\n\t\tSet output power in dBm\r\n\r\n\
    \tout [on|off]\r\n\t\tSet output on or off\r\n\r\n\
    \tshow\r\n\t\tShow current configuration\r\n\r\n\
    \tstate\r\n\t\tShow the last computed frequency plan\r\n\r\n\
    \tdefault\r\n\t\tLoad the default configuration\r\n\r\n\
    \tsave\r\n\t\tSave current configuration\r\n\r\n\
    \treset\r\n\t\tReset the controller\r\n\r\n";


/// Primary RF output power
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerLevel {
    Minus4,
    Minus1,
    Plus2,
    Plus5,
}

impl PowerLevel {
    const ALL: [PowerLevel; 4] = [PowerLevel::Minus4, PowerLevel::Minus1, PowerLevel::Plus2, PowerLevel::Plus5];

    /// Register 4 output power code
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Console spelling, dBm
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerLevel::Minus4 => "-4",
            PowerLevel::Minus1 => "-1",
            PowerLevel::Plus2 => "+2",
            PowerLevel::Plus5 => "+5",
        }
    }

    pub fn parse(s: &str) -> Result<Self, Error> {
        PowerLevel::ALL.iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or(Error::InvalidParameter)
    }
}


/// User settings, the record that gets persisted
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Output frequency, kHz
    pub freq_khz: u64,
    /// R counter cap, 0 = no cap
    pub max_r: u16,
    pub power: PowerLevel,
    pub out_on: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            freq_khz: 439_852,
            max_r: 0,
            power: PowerLevel::Plus5,
            out_on: false,
        }
    }
}

impl Settings {
    /// Output frequency, Hz
    pub fn f_out_hz(&self) -> u64 {
        self.freq_khz.saturating_mul(1000)
    }

    /// Board config with these settings applied
    pub fn apply(&self, board: &DeviceConfig) -> DeviceConfig {
        board
            .with_max_r(self.max_r)
            .with_rf_output(self.out_on)
            .set(OutputPower(self.power.code()))
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\r\nCurrent configuration:\r\n\r\n")?;
        write!(f, "\tfreq ..............: {}.{:03} MHz\r\n", self.freq_khz / 1000, self.freq_khz % 1000)?;
        write!(f, "\tr .................: {}\r\n", self.max_r)?;
        write!(f, "\tpower .............: {} dBm\r\n", self.power.as_str())?;
        write!(f, "\tout ...............: {}\r\n\r\n", if self.out_on { "on" } else { "off" })
    }
}


/// Formats the `state` report for a plan
pub struct PlanReport<'a>(pub &'a FrequencyPlan);

impl<'a> fmt::Display for PlanReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        let pfd_millihz = p.fpfd.millihz();
        write!(f, "\r\nFrequency plan:\r\n\r\n")?;
        write!(f, "\tvco ...............: {} Hz\r\n", p.vco_hz)?;
        write!(f, "\tpfd ...............: {}.{:03} Hz\r\n", pfd_millihz / 1000, pfd_millihz % 1000)?;
        write!(f, "\tr .................: {}\r\n", p.r)?;
        write!(f, "\tint ...............: {}\r\n", p.int)?;
        write!(f, "\tfrac ..............: {}\r\n", p.frac)?;
        write!(f, "\tmod ...............: {}\r\n", p.modulus)?;
        write!(f, "\trf div ............: {}\r\n", p.rf_divider())?;
        write!(f, "\tband select div ...: {}\r\n", p.band_select_div)?;
        write!(f, "\tprescaler .........: {}\r\n", match p.prescaler { Pr1Prescaler::Pr45 => "4/5", Pr1Prescaler::Pr89 => "8/9" })?;
        write!(f, "\tspacing ...........: {} Hz\r\n", p.channel_spacing_hz)?;
        write!(
            f, "\tactual freq .......: {}.{:09} MHz\r\n",
            p.actual_millihz / 1_000_000_000, p.actual_millihz % 1_000_000_000
        )?;
        for (i, w) in p.words().iter().enumerate() {
            write!(f, "\tR{} ................: {:#010x}\r\n", i, w)?;
        }
        write!(f, "\r\n")
    }
}


/// Console command
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Output frequency, kHz
    Freq(u64),
    /// R counter cap
    R(u16),
    Power(PowerLevel),
    Out(bool),
    Show,
    State,
    Save,
    Default,
    Reset,
    Help,
}

impl Command {

    /// Parses one command line, command names are case insensitive
    pub fn parse(line: &str) -> Result<Self, Error> {
        let line = line.trim();
        let (name, arg) = match line.find(char::is_whitespace) {
            Some(i) => (&line[.. i], line[i ..].trim()),
            None => (line, ""),
        };

        let is = |s: &str| name.eq_ignore_ascii_case(s);

        if is("freq") {
            Ok(Command::Freq(parse_khz(required(arg)?)?))
        } else if is("r") {
            let r = parse_digits(required(arg)?)?;
            if r > R_COUNTER_MAX as u64 {
                return Err(Error::InvalidParameter);
            }
            Ok(Command::R(r as u16))
        } else if is("power") {
            Ok(Command::Power(PowerLevel::parse(required(arg)?)?))
        } else if is("out") {
            let arg = required(arg)?;
            if arg.eq_ignore_ascii_case("on") {
                Ok(Command::Out(true))
            } else if arg.eq_ignore_ascii_case("off") {
                Ok(Command::Out(false))
            } else {
                Err(Error::InvalidParameter)
            }
        } else if is("show") {
            Ok(Command::Show)
        } else if is("state") {
            Ok(Command::State)
        } else if is("save") {
            Ok(Command::Save)
        } else if is("default") {
            Ok(Command::Default)
        } else if is("reset") {
            Ok(Command::Reset)
        } else if is("help") || is("?") {
            Ok(Command::Help)
        } else {
            Err(Error::UnknownCommand)
        }
    }
}

fn required(arg: &str) -> Result<&str, Error> {
    if arg.is_empty() { Err(Error::MissingParameter) } else { Ok(arg) }
}

/// Unsigned decimal, digits only
fn parse_digits(s: &str) -> Result<u64, Error> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidParameter);
    }
    s.parse().map_err(|_| Error::InvalidParameter)
}

/// MHz with up to three decimals to kHz, "439.852" -> 439852
fn parse_khz(s: &str) -> Result<u64, Error> {
    let (mhz, dec) = match s.find('.') {
        Some(i) => (&s[.. i], &s[i + 1 ..]),
        None => (s, ""),
    };
    if dec.len() > 3 {
        return Err(Error::InvalidParameter);
    }

    let mut khz = parse_digits(mhz)?
        .checked_mul(1000)
        .ok_or(Error::InvalidParameter)?;
    if !dec.is_empty() {
        let scale = [100, 10, 1][dec.len() - 1];
        khz = parse_digits(dec)?
            .checked_mul(scale)
            .and_then(|d| khz.checked_add(d))
            .ok_or(Error::InvalidParameter)?;
    }
    Ok(khz)
}
