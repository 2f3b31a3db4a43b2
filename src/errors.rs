//! Errors

use core::fmt;

/// Driver errors
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Requested output frequency is outside of the chip's range
    OutOfRange,
    /// Frequency plan search gave up
    ConvergenceFailure,
    /// REFin is outside of the allowed range (or too fast for the doubler)
    InvalidReferenceFrequency,
    /// Channel spacing is zero or wider than the PFD frequency
    InvalidChannelSpacing,
    /// R counter cap does not fit in 10 bits
    InvalidReferenceCounter,
    /// Console: no such command
    UnknownCommand,
    /// Console: command needs an argument
    MissingParameter,
    /// Console: argument could not be parsed
    InvalidParameter,
    /// SPI write failed
    Spi,
    /// GPIO pin update failed
    Pin,
    /// Settings could not be persisted
    Storage,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Error::OutOfRange => "frequency out of range",
            Error::ConvergenceFailure => "no frequency plan found",
            Error::InvalidReferenceFrequency => "invalid reference frequency",
            Error::InvalidChannelSpacing => "invalid channel spacing",
            Error::InvalidReferenceCounter => "invalid R counter",
            Error::UnknownCommand => "no such command",
            Error::MissingParameter => "missing parameter",
            Error::InvalidParameter => "invalid parameter",
            Error::Spi => "SPI error",
            Error::Pin => "pin error",
            Error::Storage => "storage error",
        };
        f.write_str(s)
    }
}
