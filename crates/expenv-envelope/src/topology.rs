//! Phase graphs for the two envelope variants.
//!
//! A topology is a zero-sized marker that fixes which phase follows which and
//! what `note_off` does. Setters that only make sense for one topology live
//! in that topology's `impl` block on
//! [`EnvelopeEngine`](crate::EnvelopeEngine), so an AD envelope has no
//! release setters at all.

use crate::PhaseKind;

/// Phase successor table and note-off behaviour for an envelope variant.
pub trait Topology {
    /// Short name used in logs and patch files.
    const NAME: &'static str;

    /// Successor of each phase, indexed by [`PhaseKind::index`].
    const SUCCESSORS: [PhaseKind; PhaseKind::COUNT];

    /// Whether `note_off` jumps straight into the release phase.
    const RELEASE_ON_NOTE_OFF: bool;

    /// Phase entered when `phase` completes.
    #[inline]
    fn successor(phase: PhaseKind) -> PhaseKind {
        Self::SUCCESSORS[phase.index()]
    }
}

/// Attack, decay, release, idle.
///
/// Decay falls through to release. `note_off` cuts to release from any
/// phase. Release always runs for its full configured duration regardless of
/// the level it starts from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Adsr;

impl Topology for Adsr {
    const NAME: &'static str = "adsr";
    const SUCCESSORS: [PhaseKind; PhaseKind::COUNT] = [
        PhaseKind::Decay,   // attack
        PhaseKind::Release, // decay
        PhaseKind::Idle,    // release
        PhaseKind::Idle,    // idle
    ];
    const RELEASE_ON_NOTE_OFF: bool = true;
}

/// Attack, decay, idle. Trigger-once.
///
/// Decay falls through to idle and `note_off` is a no-op: there is no
/// sustain to release from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ad;

impl Topology for Ad {
    const NAME: &'static str = "ad";
    const SUCCESSORS: [PhaseKind; PhaseKind::COUNT] = [
        PhaseKind::Decay, // attack
        PhaseKind::Idle,  // decay
        PhaseKind::Idle,  // release (never entered)
        PhaseKind::Idle,  // idle
    ];
    const RELEASE_ON_NOTE_OFF: bool = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adsr_edges() {
        assert_eq!(Adsr::successor(PhaseKind::Attack), PhaseKind::Decay);
        assert_eq!(Adsr::successor(PhaseKind::Decay), PhaseKind::Release);
        assert_eq!(Adsr::successor(PhaseKind::Release), PhaseKind::Idle);
        assert_eq!(Adsr::successor(PhaseKind::Idle), PhaseKind::Idle);
    }

    #[test]
    fn ad_edges() {
        assert_eq!(Ad::successor(PhaseKind::Attack), PhaseKind::Decay);
        assert_eq!(Ad::successor(PhaseKind::Decay), PhaseKind::Idle);
        assert_eq!(Ad::successor(PhaseKind::Idle), PhaseKind::Idle);
    }

    #[test]
    fn ad_never_enters_release() {
        let reachable = PhaseKind::ALL
            .iter()
            .filter(|&&p| p != PhaseKind::Release)
            .any(|&p| Ad::successor(p) == PhaseKind::Release);
        assert!(!reachable);
    }
}
