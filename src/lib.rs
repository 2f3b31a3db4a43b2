#![cfg_attr(not(test), no_std)]

//! [ADF4350/ADF4351](https://www.analog.com/en/products/adf4351.html) frequency
//! synthesizer: frequency plan solver, register encoding and a small
//! console controller.

pub mod constants;
pub mod register;
pub mod errors;
pub mod refin;
pub mod config;
pub mod frequency;
pub mod device;
pub mod bitbang;
pub mod console;
pub mod synth;
