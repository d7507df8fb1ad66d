//! Patch file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use expenv_envelope::{
    AdEnvelope, AdsrEnvelope, CurveKind, DecayCurve, Envelope, EnvelopeEngine, PhaseKind,
    Timebase, Topology,
};

use crate::error::ConfigError;
use crate::validation::validate_patch;

/// Default control rate in Hz.
pub const DEFAULT_CONTROL_RATE: u32 = 64;

/// Default audio rate in Hz.
pub const DEFAULT_AUDIO_RATE: u32 = 16384;

/// Envelope variant selected by a patch.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Attack, decay, release.
    #[default]
    Adsr,
    /// Attack, decay. `note_off` is ignored.
    Ad,
}

impl Variant {
    /// Name as written in patch files.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Adsr => "adsr",
            Variant::Ad => "ad",
        }
    }
}

/// Decay table selected by a patch.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    /// Soft table, decay time measured to 10%.
    #[default]
    Soft,
    /// Power-law table, decay time measured to the floor.
    Power,
}

impl Curve {
    /// Name as written in patch files.
    pub fn name(self) -> &'static str {
        match self {
            Curve::Soft => "soft",
            Curve::Power => "power",
        }
    }
}

impl From<Curve> for CurveKind {
    fn from(curve: Curve) -> Self {
        match curve {
            Curve::Soft => CurveKind::Soft,
            Curve::Power => CurveKind::PowerLaw,
        }
    }
}

/// Phase levels, 0-255.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Levels {
    /// Peak reached at the end of attack.
    pub attack: u8,
    /// Level reached at the end of decay.
    pub decay: u8,
    /// Level reached at the end of release. ADSR only.
    pub release: u8,
    /// Level idle ramps toward.
    pub idle: u8,
}

impl Default for Levels {
    fn default() -> Self {
        Self {
            attack: 255,
            decay: 0,
            release: 0,
            idle: 0,
        }
    }
}

/// Phase durations.
///
/// Each phase is given either in milliseconds (`*_ms`) or in control ticks
/// (`*_steps`), never both. A phase with neither lasts zero ticks.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Times {
    /// Attack duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_ms: Option<u32>,
    /// Decay duration in milliseconds, compensated by the decay curve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decay_ms: Option<u32>,
    /// Release duration in milliseconds. ADSR only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_ms: Option<u32>,
    /// Attack duration in control ticks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_steps: Option<u32>,
    /// Decay duration in control ticks, used as given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decay_steps: Option<u32>,
    /// Release duration in control ticks. ADSR only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_steps: Option<u32>,
}

/// A phase duration as written in a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTime {
    /// Milliseconds, quantized by the timebase.
    Millis(u32),
    /// Control ticks.
    Steps(u32),
}

impl Times {
    /// Create times in milliseconds for all three phases.
    pub fn millis(attack: u32, decay: u32, release: u32) -> Self {
        Self {
            attack_ms: Some(attack),
            decay_ms: Some(decay),
            release_ms: Some(release),
            ..Self::default()
        }
    }

    /// Create times in control ticks for all three phases.
    pub fn steps(attack: u32, decay: u32, release: u32) -> Self {
        Self {
            attack_steps: Some(attack),
            decay_steps: Some(decay),
            release_steps: Some(release),
            ..Self::default()
        }
    }

    /// Duration for a phase. Milliseconds win if both are set.
    ///
    /// Idle has no configurable duration and always returns `None`.
    pub fn get(&self, phase: PhaseKind) -> Option<PhaseTime> {
        let (ms, steps) = self.fields(phase)?;
        ms.map(PhaseTime::Millis).or(steps.map(PhaseTime::Steps))
    }

    /// Whether a phase has both milliseconds and steps set.
    pub fn is_conflicting(&self, phase: PhaseKind) -> bool {
        matches!(self.fields(phase), Some((Some(_), Some(_))))
    }

    fn fields(&self, phase: PhaseKind) -> Option<(Option<u32>, Option<u32>)> {
        match phase {
            PhaseKind::Attack => Some((self.attack_ms, self.attack_steps)),
            PhaseKind::Decay => Some((self.decay_ms, self.decay_steps)),
            PhaseKind::Release => Some((self.release_ms, self.release_steps)),
            PhaseKind::Idle => None,
        }
    }
}

/// Envelope patch.
///
/// A patch fixes the rates, the variant, the decay curve, and every level and
/// duration. It can be loaded from TOML, built into a running envelope, and
/// saved back.
///
/// # TOML Format
///
/// ```toml
/// name = "Pluck"
/// description = "Short percussive pluck"
/// control_rate = 64
/// audio_rate = 16384
/// variant = "ad"
/// curve = "soft"
///
/// [levels]
/// attack = 255
/// decay = 0
///
/// [times]
/// attack_ms = 16
/// decay_ms = 400
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patch {
    /// Name of the patch.
    pub name: String,

    /// Optional description of the patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Control rate in Hz (defaults to 64).
    #[serde(default = "default_control_rate")]
    pub control_rate: u32,

    /// Audio rate in Hz (defaults to 16384). Must be a whole multiple of the
    /// control rate.
    #[serde(default = "default_audio_rate")]
    pub audio_rate: u32,

    /// Envelope variant.
    #[serde(default)]
    pub variant: Variant,

    /// Decay table.
    #[serde(default)]
    pub curve: Curve,

    /// How long a render holds the note before `note_off`, in milliseconds.
    /// Without it the note is never released early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate_ms: Option<u32>,

    /// Phase levels.
    #[serde(default)]
    pub levels: Levels,

    /// Phase durations.
    #[serde(default)]
    pub times: Times,
}

fn default_control_rate() -> u32 {
    DEFAULT_CONTROL_RATE
}

fn default_audio_rate() -> u32 {
    DEFAULT_AUDIO_RATE
}

impl Patch {
    /// Create a patch with default rates and levels and zero durations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            control_rate: DEFAULT_CONTROL_RATE,
            audio_rate: DEFAULT_AUDIO_RATE,
            variant: Variant::default(),
            curve: Curve::default(),
            gate_ms: None,
            levels: Levels::default(),
            times: Times::default(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set control and audio rates.
    pub fn with_rates(mut self, control_rate: u32, audio_rate: u32) -> Self {
        self.control_rate = control_rate;
        self.audio_rate = audio_rate;
        self
    }

    /// Set the variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the decay curve.
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    /// Set the levels.
    pub fn with_levels(mut self, levels: Levels) -> Self {
        self.levels = levels;
        self
    }

    /// Set the durations.
    pub fn with_times(mut self, times: Times) -> Self {
        self.times = times;
        self
    }

    /// Set the render gate.
    pub fn with_gate_ms(mut self, gate_ms: u32) -> Self {
        self.gate_ms = Some(gate_ms);
        self
    }

    /// Load a patch from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let patch: Patch = toml::from_str(&content)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), name = %patch.name, "loaded patch");

        Ok(patch)
    }

    /// Load a patch from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the patch to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the patch to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rates as a [`Timebase`].
    pub fn timebase(&self) -> Timebase {
        Timebase::new(self.control_rate, self.audio_rate)
    }

    /// Decay table and compensation.
    pub fn decay_curve(&self) -> DecayCurve {
        DecayCurve::from_kind(self.curve.into())
    }

    /// Control ticks a phase will last once built.
    ///
    /// Applies millisecond quantization and, for decay, the curve's
    /// compensation. Phases the variant never enters report 0.
    pub fn phase_steps(&self, phase: PhaseKind) -> u32 {
        if phase == PhaseKind::Release && self.variant == Variant::Ad {
            return 0;
        }
        let timebase = self.timebase();
        match self.times.get(phase) {
            Some(PhaseTime::Millis(ms)) if phase == PhaseKind::Decay => {
                timebase.msec_to_steps(self.decay_curve().compensate_decay_ms(ms))
            }
            Some(PhaseTime::Millis(ms)) => timebase.msec_to_steps(ms),
            Some(PhaseTime::Steps(steps)) => steps,
            None => 0,
        }
    }

    /// Validate the patch and build a configured, idle envelope.
    pub fn build(&self) -> Result<Box<dyn Envelope>, ConfigError> {
        validate_patch(self)?;

        #[cfg(feature = "tracing")]
        for warning in crate::validation::quantization_warnings(self) {
            tracing::warn!(patch = %self.name, "{warning}");
        }

        let timebase = self.timebase();
        let curve = self.decay_curve();
        let env: Box<dyn Envelope> = match self.variant {
            Variant::Adsr => {
                let mut env = AdsrEnvelope::with_curve(timebase, curve);
                self.configure(&mut env);
                env.set_release_level(self.levels.release);
                match self.times.get(PhaseKind::Release) {
                    Some(PhaseTime::Millis(ms)) => env.set_release_time(ms),
                    Some(PhaseTime::Steps(steps)) => env.set_release_update_steps(steps),
                    None => {}
                }
                Box::new(env)
            }
            Variant::Ad => {
                let mut env = AdEnvelope::with_curve(timebase, curve);
                self.configure(&mut env);
                Box::new(env)
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            patch = %self.name,
            variant = self.variant.name(),
            control_rate = self.control_rate,
            audio_rate = self.audio_rate,
            "built envelope"
        );

        Ok(env)
    }

    fn configure<V: Topology>(&self, env: &mut EnvelopeEngine<V>) {
        env.set_ad_levels(self.levels.attack, self.levels.decay);
        env.set_idle_level(self.levels.idle);
        match self.times.get(PhaseKind::Attack) {
            Some(PhaseTime::Millis(ms)) => env.set_attack_time(ms),
            Some(PhaseTime::Steps(steps)) => env.set_attack_update_steps(steps),
            None => {}
        }
        match self.times.get(PhaseKind::Decay) {
            Some(PhaseTime::Millis(ms)) => env.set_decay_time(ms),
            Some(PhaseTime::Steps(steps)) => env.set_decay_update_steps(steps),
            None => {}
        }
    }
}

impl Default for Patch {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
