//! Object-safe envelope interface.
//!
//! [`EnvelopeEngine`] is generic over its topology, so an ADSR and an AD
//! envelope are different types. Hosts that pick the variant at runtime (a
//! patch file, a CLI flag) hold a `Box<dyn Envelope>` instead.

use expenv_core::Interpolator;

use crate::{DecayCurve, EnvelopeEngine, PhaseKind, Timebase, Topology};

/// Runtime-polymorphic envelope.
///
/// Variant-specific configuration is done on the concrete type before it is
/// boxed; this trait only covers driving and observing a configured envelope.
pub trait Envelope {
    /// Control-rate update.
    fn advance(&mut self);

    /// Audio-rate output.
    fn sample(&mut self) -> u8;

    /// Start the attack phase.
    fn note_on(&mut self, reset: bool);

    /// Release the note, if the variant has a release.
    fn note_off(&mut self);

    /// Whether the envelope is sounding.
    fn playing(&self) -> bool;

    /// Current phase.
    fn phase(&self) -> PhaseKind;

    /// Control and audio rates.
    fn timebase(&self) -> Timebase;

    /// Decay table and compensation.
    fn decay_curve(&self) -> DecayCurve;

    /// Variant name, `"adsr"` or `"ad"`.
    fn topology(&self) -> &'static str;

    /// Render one control tick: `lerps_per_control` samples into `out`, then
    /// one [`advance`](Envelope::advance).
    ///
    /// Returns the number of samples written, which is less than a full tick
    /// when `out` is shorter.
    fn render_tick(&mut self, out: &mut [u8]) -> usize {
        let lerps = self.timebase().lerps_per_control() as usize;
        let n = lerps.min(out.len());
        for slot in &mut out[..n] {
            *slot = self.sample();
        }
        self.advance();
        n
    }
}

impl<V: Topology, I: Interpolator> Envelope for EnvelopeEngine<V, I> {
    fn advance(&mut self) {
        EnvelopeEngine::advance(self);
    }

    fn sample(&mut self) -> u8 {
        EnvelopeEngine::sample(self)
    }

    fn note_on(&mut self, reset: bool) {
        EnvelopeEngine::note_on(self, reset);
    }

    fn note_off(&mut self) {
        EnvelopeEngine::note_off(self);
    }

    fn playing(&self) -> bool {
        EnvelopeEngine::playing(self)
    }

    fn phase(&self) -> PhaseKind {
        EnvelopeEngine::phase(self)
    }

    fn timebase(&self) -> Timebase {
        EnvelopeEngine::timebase(self)
    }

    fn decay_curve(&self) -> DecayCurve {
        EnvelopeEngine::decay_curve(self)
    }

    fn topology(&self) -> &'static str {
        V::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AdEnvelope, AdsrEnvelope};

    extern crate alloc;
    use alloc::boxed::Box;

    fn configured(adsr: bool) -> Box<dyn Envelope> {
        let tb = Timebase::new(4, 16);
        if adsr {
            let mut env = AdsrEnvelope::new(tb);
            env.set_levels(255, 100, 0);
            env.set_all_update_steps(2, 2, 2);
            Box::new(env)
        } else {
            let mut env = AdEnvelope::new(tb);
            env.set_ad_levels(255, 0);
            env.set_all_update_steps(2, 2);
            Box::new(env)
        }
    }

    #[test]
    fn test_topology_names() {
        assert_eq!(configured(true).topology(), "adsr");
        assert_eq!(configured(false).topology(), "ad");
    }

    #[test]
    fn test_dyn_note_off_dispatches_per_variant() {
        for (adsr, expected) in [(true, PhaseKind::Release), (false, PhaseKind::Attack)] {
            let mut env = configured(adsr);
            env.note_on(true);
            env.note_off();
            assert_eq!(env.phase(), expected);
        }
    }

    #[test]
    fn test_render_tick_writes_one_block() {
        let mut env = configured(false);
        env.note_on(true);
        let mut block = [0u8; 4];
        assert_eq!(env.render_tick(&mut block), 4);
        // 0 -> 255 over 8 samples
        assert_eq!(block, [31, 63, 95, 127]);
        assert_eq!(env.render_tick(&mut block), 4);
        assert_eq!(block[3], 255);
        assert_eq!(env.phase(), PhaseKind::Decay);
    }

    #[test]
    fn test_render_tick_short_buffer() {
        let mut env = configured(true);
        env.note_on(true);
        let mut block = [0u8; 2];
        assert_eq!(env.render_tick(&mut block), 2);
    }
}
