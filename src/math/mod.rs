//! Arithmetic utilities for curve pricing and settlement.
//!
//! - [`CheckedArithmetic`]: `Result`-returning operations on
//!   [`Amount`](crate::domain::Amount).
//! - [`mul_wad`] / [`div_wad`]: WAD fixed-point helpers for the
//!   exponential curve.

mod checked;
mod wad;

pub use checked::CheckedArithmetic;
pub use wad::{div_wad, mul_wad, WAD};
