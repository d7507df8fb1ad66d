//! Two-rate envelope state machine.
//!
//! [`EnvelopeEngine`] decides phase transitions in [`advance`] (control rate)
//! and produces output in [`sample`] (audio rate). Between transitions the
//! output comes from an [`Interpolator`] armed once per phase; during the
//! decay phase that output is bent through the engine's [`DecayCurve`].
//!
//! # Known quirks
//!
//! - `playing()` stays true for one control tick after the engine reaches
//!   idle. The flag is cleared by the first `advance()` made in idle, not by
//!   the transition into it.
//! - On an AD envelope `note_off()` does nothing.
//! - Release runs for its configured duration whatever level it starts from,
//!   so a note released early falls more slowly than one released late.
//!
//! [`advance`]: EnvelopeEngine::advance
//! [`sample`]: EnvelopeEngine::sample

use core::marker::PhantomData;

use expenv_core::{Interpolator, Line, Q15n16};

use crate::{Ad, Adsr, DecayCurve, Phase, PhaseKind, Timebase, Topology};

/// Control ticks assigned to the idle phase.
///
/// Large enough that the interpolator's increment toward the idle level is
/// zero, so idle never moves and never times out.
pub const IDLE_UPDATE_STEPS: u32 = u32::MAX;

/// Envelope generator with exponential decay shaping.
///
/// `V` selects the phase graph ([`Adsr`] or [`Ad`]); `I` is the ramp
/// generator, [`Line`] unless a host supplies its own.
///
/// # Example
///
/// ```rust
/// use expenv_envelope::{AdEnvelope, PhaseKind, Timebase};
///
/// let mut env = AdEnvelope::new(Timebase::new(64, 16384));
/// env.set_ad_levels(255, 0);
/// env.set_times(20, 500);
///
/// env.note_on(true);
/// assert!(env.playing());
///
/// // Host loop: one block of audio samples per control tick
/// let lerps = env.timebase().lerps_per_control();
/// for _ in 0..8 {
///     for _ in 0..lerps {
///         let _level = env.sample();
///     }
///     env.advance();
/// }
/// assert_eq!(env.phase(), PhaseKind::Decay);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeEngine<V, I = Line> {
    timebase: Timebase,
    curve: DecayCurve,
    phases: [Phase; PhaseKind::COUNT],
    current: PhaseKind,
    elapsed_in_phase: u32,
    total_steps: u32,
    playing: bool,
    transition: I,
    _topology: PhantomData<V>,
}

/// Attack, decay, release envelope.
pub type AdsrEnvelope<I = Line> = EnvelopeEngine<Adsr, I>;

/// Trigger-once attack, decay envelope.
pub type AdEnvelope<I = Line> = EnvelopeEngine<Ad, I>;

impl<V: Topology> EnvelopeEngine<V, Line> {
    /// Create an idle envelope with the soft decay curve.
    ///
    /// All levels and durations start at zero.
    pub fn new(timebase: Timebase) -> Self {
        Self::with_interpolator(timebase, DecayCurve::default(), Line::new())
    }

    /// Create an idle envelope with the given decay curve.
    pub fn with_curve(timebase: Timebase, curve: DecayCurve) -> Self {
        Self::with_interpolator(timebase, curve, Line::new())
    }
}

impl<V: Topology> Default for EnvelopeEngine<V, Line> {
    fn default() -> Self {
        Self::new(Timebase::default())
    }
}

impl<V: Topology, I: Interpolator> EnvelopeEngine<V, I> {
    /// Create an idle envelope driving a caller-supplied interpolator.
    pub fn with_interpolator(timebase: Timebase, curve: DecayCurve, transition: I) -> Self {
        let mut phases = PhaseKind::ALL.map(Phase::new);
        phases[PhaseKind::Idle.index()].set_update_steps(IDLE_UPDATE_STEPS, &timebase);
        Self {
            timebase,
            curve,
            phases,
            current: PhaseKind::Idle,
            elapsed_in_phase: 0,
            total_steps: 0,
            playing: false,
            transition,
            _topology: PhantomData,
        }
    }

    // ------------------------------------------------------------------
    // Rate entry points
    // ------------------------------------------------------------------

    /// Control-rate update. Call once per control tick.
    ///
    /// Counts ticks in the current phase and moves to the successor when the
    /// phase's duration is reached. In idle, clears the playing flag.
    #[inline]
    pub fn advance(&mut self) {
        if !self.playing {
            return;
        }
        if self.current == PhaseKind::Idle {
            self.playing = false;
            return;
        }
        self.elapsed_in_phase = self.elapsed_in_phase.saturating_add(1);
        if self.elapsed_in_phase >= self.total_steps {
            self.enter(V::successor(self.current));
        }
    }

    /// Audio-rate output. Call once per audio sample.
    ///
    /// Returns 0 without touching the interpolator while not playing.
    #[inline]
    pub fn sample(&mut self) -> u8 {
        if !self.playing {
            return 0;
        }
        let linear = self.transition.next().to_q8n0();
        if self.current == PhaseKind::Decay {
            self.curve.apply(linear)
        } else {
            linear
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start the attack phase from wherever the envelope is.
    ///
    /// With `reset` the ramp starts from zero; otherwise it starts from the
    /// level currently held, so a retrigger has no discontinuity.
    pub fn note_on(&mut self, reset: bool) {
        if reset {
            self.transition.set_immediate(Q15n16::ZERO);
        }
        self.enter(PhaseKind::Attack);
        self.playing = true;
    }

    /// Release the note.
    ///
    /// On [`Adsr`] this cuts straight to the release phase. On [`Ad`] it does
    /// nothing.
    pub fn note_off(&mut self) {
        if V::RELEASE_ON_NOTE_OFF {
            self.enter(PhaseKind::Release);
        }
    }

    fn enter(&mut self, next: PhaseKind) {
        let phase = self.phases[next.index()];
        self.elapsed_in_phase = 0;
        self.total_steps = phase.update_steps();
        self.transition
            .set(Q15n16::from_q8n0(phase.level()), phase.lerp_steps());
        self.current = next;
    }

    // ------------------------------------------------------------------
    // State queries
    // ------------------------------------------------------------------

    /// Whether the envelope is sounding. See the module docs for the
    /// one-tick lag after reaching idle.
    #[inline]
    pub fn playing(&self) -> bool {
        self.playing
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> PhaseKind {
        self.current
    }

    /// Check the current phase.
    #[inline]
    pub fn is_in_phase(&self, kind: PhaseKind) -> bool {
        self.current == kind
    }

    /// In attack?
    #[inline]
    pub fn is_attack(&self) -> bool {
        self.is_in_phase(PhaseKind::Attack)
    }

    /// In decay?
    #[inline]
    pub fn is_decay(&self) -> bool {
        self.is_in_phase(PhaseKind::Decay)
    }

    /// In release?
    #[inline]
    pub fn is_release(&self) -> bool {
        self.is_in_phase(PhaseKind::Release)
    }

    /// Control ticks spent in the current phase.
    #[inline]
    pub fn elapsed_in_phase(&self) -> u32 {
        self.elapsed_in_phase
    }

    /// Control ticks the current phase lasts, as loaded when it was entered.
    #[inline]
    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Unshaped level currently held by the interpolator.
    #[inline]
    pub fn current_level(&self) -> u8 {
        self.transition.current().to_q8n0()
    }

    /// Configuration of one phase.
    pub fn phase_config(&self, kind: PhaseKind) -> &Phase {
        &self.phases[kind.index()]
    }

    /// Rates this envelope was built for.
    pub fn timebase(&self) -> Timebase {
        self.timebase
    }

    /// Decay table and compensation.
    pub fn decay_curve(&self) -> DecayCurve {
        self.curve
    }

    /// The embedded interpolator.
    pub fn interpolator(&self) -> &I {
        &self.transition
    }

    // ------------------------------------------------------------------
    // Levels
    // ------------------------------------------------------------------

    /// Set the attack level.
    pub fn set_attack_level(&mut self, level: u8) {
        self.set_level(PhaseKind::Attack, level);
    }

    /// Set the decay level.
    pub fn set_decay_level(&mut self, level: u8) {
        self.set_level(PhaseKind::Decay, level);
    }

    /// Set the level idle ramps toward. Normally 0.
    pub fn set_idle_level(&mut self, level: u8) {
        self.set_level(PhaseKind::Idle, level);
    }

    /// Set attack and decay levels and reset the idle level to 0.
    pub fn set_ad_levels(&mut self, attack: u8, decay: u8) {
        self.set_attack_level(attack);
        self.set_decay_level(decay);
        self.set_idle_level(0);
    }

    fn set_level(&mut self, kind: PhaseKind, level: u8) {
        self.phases[kind.index()].set_level(level);
    }

    // ------------------------------------------------------------------
    // Durations
    //
    // Changes take effect the next time a phase is entered; the running
    // phase keeps the tick count it was entered with.
    // ------------------------------------------------------------------

    /// Set the attack time in milliseconds.
    ///
    /// Resolved to whole control ticks; see [`Timebase::msec_to_steps`].
    pub fn set_attack_time(&mut self, msec: u32) {
        self.set_time(PhaseKind::Attack, msec);
    }

    /// Set the decay time in milliseconds.
    ///
    /// The time is first stretched by the decay curve's compensation, so with
    /// the soft curve it is the time to fall to 10% of full scale.
    pub fn set_decay_time(&mut self, msec: u32) {
        let stretched = self.curve.compensate_decay_ms(msec);
        self.set_time(PhaseKind::Decay, stretched);
    }

    /// Set the attack duration in control ticks.
    pub fn set_attack_update_steps(&mut self, steps: u32) {
        self.set_update_steps(PhaseKind::Attack, steps);
    }

    /// Set the decay duration in control ticks. No curve compensation.
    pub fn set_decay_update_steps(&mut self, steps: u32) {
        self.set_update_steps(PhaseKind::Decay, steps);
    }

    fn set_time(&mut self, kind: PhaseKind, msec: u32) {
        let steps = self.timebase.msec_to_steps(msec);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            phase = %kind,
            msec,
            steps,
            control_rate = self.timebase.control_rate(),
            "envelope duration quantized"
        );
        #[cfg(feature = "tracing")]
        if msec > 0 && steps == 0 {
            tracing::warn!(
                phase = %kind,
                msec,
                control_rate = self.timebase.control_rate(),
                "duration shorter than one control tick; phase will be skipped"
            );
        }

        self.set_update_steps(kind, steps);
    }

    fn set_update_steps(&mut self, kind: PhaseKind, steps: u32) {
        self.phases[kind.index()].set_update_steps(steps, &self.timebase);
    }

    fn pin_idle(&mut self) {
        self.set_update_steps(PhaseKind::Idle, IDLE_UPDATE_STEPS);
    }
}

impl<I: Interpolator> EnvelopeEngine<Adsr, I> {
    /// Set the release level. Normally 0.
    pub fn set_release_level(&mut self, level: u8) {
        self.set_level(PhaseKind::Release, level);
    }

    /// Set attack, decay and release levels and reset the idle level to 0.
    pub fn set_levels(&mut self, attack: u8, decay: u8, release: u8) {
        self.set_ad_levels(attack, decay);
        self.set_release_level(release);
    }

    /// Set the release time in milliseconds.
    pub fn set_release_time(&mut self, msec: u32) {
        self.set_time(PhaseKind::Release, msec);
    }

    /// Set the release duration in control ticks.
    pub fn set_release_update_steps(&mut self, steps: u32) {
        self.set_update_steps(PhaseKind::Release, steps);
    }

    /// Set attack, decay and release times in milliseconds.
    pub fn set_times(&mut self, attack_ms: u32, decay_ms: u32, release_ms: u32) {
        self.set_attack_time(attack_ms);
        self.set_decay_time(decay_ms);
        self.set_release_time(release_ms);
        self.pin_idle();
    }

    /// Set attack, decay and release durations in control ticks.
    pub fn set_all_update_steps(&mut self, attack: u32, decay: u32, release: u32) {
        self.set_attack_update_steps(attack);
        self.set_decay_update_steps(decay);
        self.set_release_update_steps(release);
        self.pin_idle();
    }
}

impl<I: Interpolator> EnvelopeEngine<Ad, I> {
    /// Set attack and decay times in milliseconds.
    pub fn set_times(&mut self, attack_ms: u32, decay_ms: u32) {
        self.set_attack_time(attack_ms);
        self.set_decay_time(decay_ms);
        self.pin_idle();
    }

    /// Set attack and decay durations in control ticks.
    pub fn set_all_update_steps(&mut self, attack: u32, decay: u32) {
        self.set_attack_update_steps(attack);
        self.set_decay_update_steps(decay);
        self.pin_idle();
    }
}
