//! Offline host loop.
//!
//! Drives an envelope the way an audio callback would: every control tick
//! renders `lerps_per_control` audio samples and then calls `advance()`.
//! Note events land on tick boundaries.

use expenv_config::{Envelope, PhaseKind};

/// Upper bound on ticks rendered when no duration is given.
pub const MAX_TICKS: u32 = 1 << 20;

/// When note events happen and how long to render, in control ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderPlan {
    /// Stop after this many ticks. `None` renders until the envelope stops.
    pub total_ticks: Option<u32>,
    /// Tick at which `note_off` is sent.
    pub gate_tick: Option<u32>,
    /// Tick at which a second `note_on` is sent.
    pub retrigger_tick: Option<u32>,
    /// `reset` flag passed to every `note_on`.
    pub reset: bool,
}

/// One rendered audio sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Phase the envelope was in when the sample was taken.
    pub phase: PhaseKind,
    /// Output level.
    pub value: u8,
}

/// Render an envelope according to `plan`.
pub fn render(env: &mut dyn Envelope, plan: &RenderPlan) -> Vec<Frame> {
    let lerps = env.timebase().lerps_per_control();
    let limit = plan.total_ticks.unwrap_or(MAX_TICKS);
    let mut frames = Vec::new();

    env.note_on(plan.reset);
    for tick in 0..limit {
        if plan.total_ticks.is_none() && !env.playing() {
            break;
        }
        if Some(tick) == plan.retrigger_tick {
            env.note_on(plan.reset);
        }
        if Some(tick) == plan.gate_tick {
            env.note_off();
        }
        for _ in 0..lerps {
            let phase = env.phase();
            let value = env.sample();
            frames.push(Frame { phase, value });
        }
        env.advance();
    }

    tracing::debug!(samples = frames.len(), lerps, "render finished");
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use expenv_config::{Patch, Times, Variant};

    fn patch() -> Patch {
        Patch::new("host")
            .with_rates(4, 16)
            .with_times(Times::steps(2, 3, 2))
    }

    #[test]
    fn test_renders_until_stopped() {
        let mut env = patch().build().unwrap();
        let frames = render(env.as_mut(), &RenderPlan::default());
        // 2 + 3 + 2 ticks, one lag tick in idle
        assert_eq!(frames.len(), 8 * 4);
        assert_eq!(frames[0].phase, PhaseKind::Attack);
        assert_eq!(frames.last().map(|f| f.phase), Some(PhaseKind::Idle));
    }

    #[test]
    fn test_fixed_duration_pads_with_silence() {
        let mut env = patch().build().unwrap();
        let plan = RenderPlan {
            total_ticks: Some(20),
            ..RenderPlan::default()
        };
        let frames = render(env.as_mut(), &plan);
        assert_eq!(frames.len(), 20 * 4);
        assert!(frames[8 * 4..].iter().all(|f| f.value == 0));
    }

    #[test]
    fn test_gate_releases_adsr_only() {
        let plan = RenderPlan {
            gate_tick: Some(1),
            ..RenderPlan::default()
        };

        let mut adsr = patch().build().unwrap();
        let frames = render(adsr.as_mut(), &plan);
        assert_eq!(frames[4].phase, PhaseKind::Release);

        let mut ad = patch()
            .with_variant(Variant::Ad)
            .with_times(Times {
                attack_steps: Some(2),
                decay_steps: Some(3),
                ..Times::default()
            })
            .build()
            .unwrap();
        let frames = render(ad.as_mut(), &plan);
        assert_eq!(frames[4].phase, PhaseKind::Attack);
    }

    #[test]
    fn test_retrigger_restarts_attack() {
        let mut env = patch().build().unwrap();
        let plan = RenderPlan {
            retrigger_tick: Some(3),
            reset: true,
            ..RenderPlan::default()
        };
        let frames = render(env.as_mut(), &plan);
        assert_eq!(frames[3 * 4].phase, PhaseKind::Attack);
        // 0 -> 255 over 8 samples again
        assert_eq!(frames[3 * 4].value, 31);
    }
}
