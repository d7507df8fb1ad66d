//! Patch validation.
//!
//! [`validate_patch`] rejects patches that cannot be built into a working
//! envelope. [`quantization_warnings`] reports patches that build fine but
//! probably do not do what their author meant: millisecond durations that
//! round down to zero control ticks, which makes the phase complete on its
//! first tick.
//!
//! # Example
//!
//! ```rust
//! use expenv_config::{Patch, Times, quantization_warnings, validate_patch};
//!
//! let patch = Patch::new("Click").with_times(Times::millis(5, 200, 100));
//! validate_patch(&patch).expect("rates and times are consistent");
//!
//! // 5 ms at 64 Hz is (5 * 64) >> 10 = 0 ticks
//! let warnings = quantization_warnings(&patch);
//! assert_eq!(warnings.len(), 1);
//! ```

use std::fmt;

use expenv_envelope::PhaseKind;
use thiserror::Error;

use crate::patch::{Patch, PhaseTime, Variant};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Control rate is zero.
    #[error("control rate must be non-zero")]
    ZeroControlRate,

    /// Audio rate is not a whole multiple of the control rate.
    #[error("audio rate {audio_rate} is not a whole multiple of control rate {control_rate}")]
    NonIntegralRates {
        /// Control rate in Hz.
        control_rate: u32,
        /// Audio rate in Hz.
        audio_rate: u32,
    },

    /// A phase has both a millisecond and a step duration.
    #[error("{phase} has both {phase}_ms and {phase}_steps")]
    ConflictingTimes {
        /// Phase name.
        phase: &'static str,
    },

    /// A release setting on a variant without a release phase.
    #[error("'{field}' is set but an AD envelope has no release phase")]
    ReleaseOnAd {
        /// Offending field.
        field: &'static str,
    },

    /// Patch name is empty.
    #[error("patch name must not be empty")]
    EmptyName,

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check that a patch can be built.
///
/// All problems are collected; more than one is returned as
/// [`ValidationError::Multiple`].
pub fn validate_patch(patch: &Patch) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if patch.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }

    if patch.control_rate == 0 {
        errors.push(ValidationError::ZeroControlRate);
    } else if patch.audio_rate < patch.control_rate || patch.audio_rate % patch.control_rate != 0
    {
        errors.push(ValidationError::NonIntegralRates {
            control_rate: patch.control_rate,
            audio_rate: patch.audio_rate,
        });
    }

    for phase in [PhaseKind::Attack, PhaseKind::Decay, PhaseKind::Release] {
        if patch.times.is_conflicting(phase) {
            errors.push(ValidationError::ConflictingTimes {
                phase: phase.name(),
            });
        }
    }

    if patch.variant == Variant::Ad {
        if patch.levels.release != 0 {
            errors.push(ValidationError::ReleaseOnAd {
                field: "levels.release",
            });
        }
        if patch.times.release_ms.is_some_and(|ms| ms != 0) {
            errors.push(ValidationError::ReleaseOnAd {
                field: "times.release_ms",
            });
        }
        if patch.times.release_steps.is_some_and(|steps| steps != 0) {
            errors.push(ValidationError::ReleaseOnAd {
                field: "times.release_steps",
            });
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// A millisecond duration that quantizes to zero control ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizationWarning {
    /// Phase affected.
    pub phase: PhaseKind,
    /// Duration as written in the patch.
    pub msec: u32,
    /// Control rate the duration was quantized at.
    pub control_rate: u32,
}

impl fmt::Display for QuantizationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} ms is shorter than one tick at {} Hz; the phase will be skipped",
            self.phase, self.msec, self.control_rate
        )
    }
}

/// List non-zero millisecond durations that quantize to zero ticks.
///
/// Decay durations are checked after curve compensation. Release is not
/// checked on AD patches.
pub fn quantization_warnings(patch: &Patch) -> Vec<QuantizationWarning> {
    [PhaseKind::Attack, PhaseKind::Decay, PhaseKind::Release]
        .into_iter()
        .filter(|&phase| !(phase == PhaseKind::Release && patch.variant == Variant::Ad))
        .filter_map(|phase| match patch.times.get(phase) {
            Some(PhaseTime::Millis(msec)) if msec > 0 && patch.phase_steps(phase) == 0 => {
                Some(QuantizationWarning {
                    phase,
                    msec,
                    control_rate: patch.control_rate,
                })
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{Levels, Times};

    #[test]
    fn test_default_patch_is_valid() {
        assert_eq!(validate_patch(&Patch::new("ok")), Ok(()));
    }

    #[test]
    fn test_zero_control_rate() {
        let patch = Patch::new("x").with_rates(0, 16384);
        assert_eq!(validate_patch(&patch), Err(ValidationError::ZeroControlRate));
    }

    #[test]
    fn test_non_integral_rates() {
        let patch = Patch::new("x").with_rates(64, 44100);
        assert_eq!(
            validate_patch(&patch),
            Err(ValidationError::NonIntegralRates {
                control_rate: 64,
                audio_rate: 44100
            })
        );

        let slower_audio = Patch::new("x").with_rates(128, 64);
        assert!(validate_patch(&slower_audio).is_err());
    }

    #[test]
    fn test_conflicting_times() {
        let mut patch = Patch::new("x");
        patch.times.decay_ms = Some(100);
        patch.times.decay_steps = Some(4);
        let err = validate_patch(&patch).unwrap_err();
        assert_eq!(err, ValidationError::ConflictingTimes { phase: "decay" });
        assert_eq!(err.to_string(), "decay has both decay_ms and decay_steps");
    }

    #[test]
    fn test_release_settings_on_ad() {
        let patch = Patch::new("x")
            .with_variant(Variant::Ad)
            .with_levels(Levels {
                release: 10,
                ..Levels::default()
            })
            .with_times(Times::millis(20, 100, 50));
        match validate_patch(&patch) {
            Err(ValidationError::Multiple(errors)) => {
                assert_eq!(
                    errors,
                    vec![
                        ValidationError::ReleaseOnAd {
                            field: "levels.release"
                        },
                        ValidationError::ReleaseOnAd {
                            field: "times.release_ms"
                        },
                    ]
                );
            }
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_release_on_ad_is_allowed() {
        let patch = Patch::new("x")
            .with_variant(Variant::Ad)
            .with_times(Times::millis(20, 100, 0));
        assert!(validate_patch(&patch).is_ok());
    }

    #[test]
    fn test_multiple_errors_display() {
        let patch = Patch::new(" ").with_rates(0, 0);
        let err = validate_patch(&patch).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("multiple validation errors"), "got: {msg}");
        assert!(msg.contains("patch name must not be empty"), "got: {msg}");
        assert!(msg.contains("control rate must be non-zero"), "got: {msg}");
    }

    #[test]
    fn test_quantization_warnings() {
        // at 64 Hz anything under 16 ms is zero ticks
        let patch = Patch::new("x").with_times(Times::millis(15, 0, 16));
        let warnings = quantization_warnings(&patch);
        assert_eq!(
            warnings,
            vec![QuantizationWarning {
                phase: PhaseKind::Attack,
                msec: 15,
                control_rate: 64
            }]
        );
        assert!(warnings[0].to_string().contains("15 ms"));
    }

    #[test]
    fn test_decay_warning_uses_compensated_time() {
        // 12 ms stretches to 16 ms with the soft curve: one tick
        let soft = Patch::new("x").with_times(Times::millis(16, 12, 16));
        assert!(quantization_warnings(&soft).is_empty());

        let power = soft.with_curve(crate::patch::Curve::Power);
        let warnings = quantization_warnings(&power);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].phase, PhaseKind::Decay);
    }

    #[test]
    fn test_step_times_never_warn() {
        let patch = Patch::new("x").with_times(Times::steps(0, 0, 0));
        assert!(quantization_warnings(&patch).is_empty());
    }
}
