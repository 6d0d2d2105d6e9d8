//! Core trait abstractions.
//!
//! [`BondingCurve`] is the seam between pairs and their pricing
//! strategies.

mod bonding_curve;

pub use bonding_curve::BondingCurve;
