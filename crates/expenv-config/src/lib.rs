//! Patch files for expenv envelopes.
//!
//! A patch is a TOML description of one envelope: its rates, variant, decay
//! curve, levels, and durations. This crate loads, validates, saves, and
//! builds patches, and ships a handful of factory patches.
//!
//! # Features
//!
//! - **Patches**: Load and save envelope patches from TOML files
//! - **Validation**: Reject inconsistent rates and conflicting durations, and
//!   warn about durations that quantize to nothing
//! - **Building**: Turn a patch into a ready-to-drive `Box<dyn Envelope>`
//! - **Factory Patches**: Built-in patches for common shapes
//!
//! # Example
//!
//! ```rust,no_run
//! use expenv_config::{Patch, Times, Variant};
//!
//! // Load a patch from file
//! let patch = Patch::load("pluck.toml").unwrap();
//!
//! // Create a patch programmatically
//! let patch = Patch::new("Blip")
//!     .with_description("Short AD blip")
//!     .with_variant(Variant::Ad)
//!     .with_times(Times::millis(16, 120, 0));
//!
//! let mut env = patch.build().unwrap();
//! env.note_on(true);
//!
//! patch.save("patches/blip.toml").unwrap();
//! ```

mod error;
mod patch;

/// Patch validation.
pub mod validation;

/// Factory patches bundled with the library.
pub mod factory_patches;

pub use error::ConfigError;
pub use factory_patches::{
    FACTORY_PATCH_NAMES, factory_patches, find_patch, get_factory_patch, is_factory_patch,
};
pub use patch::{
    Curve, DEFAULT_AUDIO_RATE, DEFAULT_CONTROL_RATE, Levels, Patch, PhaseTime, Times, Variant,
};
pub use validation::{
    QuantizationWarning, ValidationError, ValidationResult, quantization_warnings, validate_patch,
};

/// Re-export the engine types a patch builds.
pub use expenv_envelope::{DecayCurve, Envelope, PhaseKind, Timebase};
