//! Envelope phases.
//!
//! Every engine owns one fixed slot per [`PhaseKind`]. A slot stores the
//! level the phase ramps to and how long the ramp lasts, in both control
//! ticks and audio samples.

use crate::Timebase;

/// Envelope phase identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhaseKind {
    /// Ramp toward the attack level.
    Attack,
    /// Ramp toward the decay level, shaped by the decay curve.
    Decay,
    /// Ramp toward the release level.
    Release,
    /// Resting state. Only `note_on` leaves it.
    #[default]
    Idle,
}

impl PhaseKind {
    /// Number of phases.
    pub const COUNT: usize = 4;

    /// All phases in slot order.
    pub const ALL: [PhaseKind; Self::COUNT] = [
        PhaseKind::Attack,
        PhaseKind::Decay,
        PhaseKind::Release,
        PhaseKind::Idle,
    ];

    /// Slot index, also the raw phase tag.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Phase for a raw tag.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PhaseKind::Attack),
            1 => Some(PhaseKind::Decay),
            2 => Some(PhaseKind::Release),
            3 => Some(PhaseKind::Idle),
            _ => None,
        }
    }

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            PhaseKind::Attack => "attack",
            PhaseKind::Decay => "decay",
            PhaseKind::Release => "release",
            PhaseKind::Idle => "idle",
        }
    }
}

impl core::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Level and duration of one phase.
///
/// `lerp_steps` is always `update_steps * lerps_per_control` (saturating);
/// both are written together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Phase {
    kind: PhaseKind,
    level: u8,
    update_steps: u32,
    lerp_steps: u32,
}

impl Phase {
    pub(crate) const fn new(kind: PhaseKind) -> Self {
        Self {
            kind,
            level: 0,
            update_steps: 0,
            lerp_steps: 0,
        }
    }

    /// Which phase this slot belongs to.
    #[inline]
    pub const fn kind(&self) -> PhaseKind {
        self.kind
    }

    /// Level the phase ramps to.
    #[inline]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Duration in control ticks.
    #[inline]
    pub const fn update_steps(&self) -> u32 {
        self.update_steps
    }

    /// Duration in audio samples.
    #[inline]
    pub const fn lerp_steps(&self) -> u32 {
        self.lerp_steps
    }

    pub(crate) fn set_level(&mut self, level: u8) {
        self.level = level;
    }

    pub(crate) fn set_update_steps(&mut self, steps: u32, timebase: &Timebase) {
        self.update_steps = steps;
        self.lerp_steps = timebase.lerp_steps(steps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        for kind in PhaseKind::ALL {
            assert_eq!(PhaseKind::from_index(kind.index()), Some(kind));
        }
        assert_eq!(PhaseKind::from_index(4), None);
    }

    #[test]
    fn durations_stay_consistent() {
        let tb = Timebase::new(64, 16384);
        let mut phase = Phase::new(PhaseKind::Decay);
        phase.set_update_steps(10, &tb);
        assert_eq!(phase.update_steps(), 10);
        assert_eq!(phase.lerp_steps(), 2560);

        phase.set_update_steps(0, &tb);
        assert_eq!(phase.lerp_steps(), 0);
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(PhaseKind::Release.to_string(), "release");
    }
}
