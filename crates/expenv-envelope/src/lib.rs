//! Expenv Envelope - exponential-decay amplitude envelopes
//!
//! A two-rate envelope generator: phase transitions are decided at a slow
//! control rate, output is produced at the audio rate by a linear
//! interpolator, and during the decay phase that linear output is reshaped
//! through a lookup table into an exponential-looking fall.
//!
//! # Core Abstractions
//!
//! ## Engine
//!
//! - [`EnvelopeEngine`] - the state machine, generic over topology and
//!   interpolator
//! - [`AdsrEnvelope`] / [`AdEnvelope`] - the two variants
//! - [`Envelope`] - object-safe interface for runtime variant selection
//!
//! ## Phases and Topologies
//!
//! - [`PhaseKind`] / [`Phase`] - phase identity and per-phase configuration
//! - [`Topology`] - successor table and note-off behaviour ([`Adsr`], [`Ad`])
//!
//! ## Timing and Shaping
//!
//! - [`Timebase`] - control/audio rate pair, millisecond quantization
//! - [`DecayCurve`] / [`CurveTable`] - decay tables and time compensation
//!
//! # Driving an Envelope
//!
//! The host calls [`EnvelopeEngine::advance`] once per control tick and
//! [`EnvelopeEngine::sample`] once per audio sample:
//!
//! ```rust
//! use expenv_envelope::{AdsrEnvelope, Timebase};
//!
//! let mut env = AdsrEnvelope::new(Timebase::new(64, 16384));
//! env.set_levels(255, 160, 0);
//! env.set_times(10, 300, 200);
//!
//! env.note_on(true);
//! let mut out = Vec::new();
//! for _ in 0..32 {
//!     for _ in 0..env.timebase().lerps_per_control() {
//!         out.push(env.sample());
//!     }
//!     env.advance();
//! }
//! env.note_off();
//! assert!(env.is_release());
//! ```
//!
//! # Logging
//!
//! With the `tracing` feature enabled, duration setters log the quantized
//! tick count at debug level and warn when a non-zero time rounds down to
//! zero ticks. Nothing is logged from `advance` or `sample`.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! expenv-envelope = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod curve;
pub mod engine;
pub mod envelope;
pub mod phase;
pub mod timebase;
pub mod topology;

pub use curve::{
    CURVE_TABLE_LEN, CurveKind, CurveTable, DecayCurve, POWER_LAW_TABLE, SOFT_TABLE,
    SOFT_TEN_PERCENT_INDEX, power_law_entry, soft_entry,
};
pub use engine::{AdEnvelope, AdsrEnvelope, EnvelopeEngine, IDLE_UPDATE_STEPS};
pub use envelope::Envelope;
pub use phase::{Phase, PhaseKind};
pub use timebase::Timebase;
pub use topology::{Ad, Adsr, Topology};

pub use expenv_core::{Interpolator, Line, Q15n16};
