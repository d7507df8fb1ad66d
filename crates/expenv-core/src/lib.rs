//! Expenv Core - fixed-point primitives for envelope generation
//!
//! This crate provides the numeric building blocks that the envelope engine
//! in `expenv-envelope` is driven by, designed for control paths that must
//! never allocate, block, or fail.
//!
//! # Core Abstractions
//!
//! ## Fixed Point
//!
//! - [`Q8n0`] - 8-bit envelope level (0-255)
//! - [`Q15n16`] - signed 15.16 fixed point used for ramp accumulation
//!
//! ## Interpolation
//!
//! - [`Interpolator`] - trait for ramp generators armed with a target and a
//!   step count
//! - [`Line`] - linear ramp that lands exactly on its target
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! expenv-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod fixed;
pub mod interpolator;
pub mod line;

pub use fixed::{Q8n0, Q15n16, Q16_FRACTIONAL_BITS};
pub use interpolator::Interpolator;
pub use line::Line;
