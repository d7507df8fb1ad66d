//! Control/audio rate pair and millisecond quantization.
//!
//! The envelope decides phase changes at the control rate and interpolates at
//! the audio rate. Both are fixed when the engine is built; the number of
//! audio samples per control tick is derived once and reused for every
//! duration conversion.

/// Control and audio rates for one envelope instance.
///
/// The audio rate is expected to be a whole multiple of the control rate.
/// Non-integral ratios are truncated and the resulting timing is unspecified.
///
/// # Example
///
/// ```rust
/// use expenv_envelope::Timebase;
///
/// let tb = Timebase::new(64, 16384);
/// assert_eq!(tb.lerps_per_control(), 256);
/// // 1000 ms at 64 Hz: (1000 * 64) >> 10 = 62 ticks
/// assert_eq!(tb.msec_to_steps(1000), 62);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Timebase {
    control_rate: u32,
    audio_rate: u32,
    lerps_per_control: u32,
}

impl Timebase {
    /// Create a timebase.
    ///
    /// A control rate of zero is treated as one.
    pub const fn new(control_rate: u32, audio_rate: u32) -> Self {
        let control_rate = if control_rate == 0 { 1 } else { control_rate };
        Self {
            control_rate,
            audio_rate,
            lerps_per_control: audio_rate / control_rate,
        }
    }

    /// Control-rate ticks per second.
    #[inline]
    pub const fn control_rate(&self) -> u32 {
        self.control_rate
    }

    /// Audio-rate samples per second.
    #[inline]
    pub const fn audio_rate(&self) -> u32 {
        self.audio_rate
    }

    /// Audio samples per control tick.
    #[inline]
    pub const fn lerps_per_control(&self) -> u32 {
        self.lerps_per_control
    }

    /// Whether the audio rate is a whole multiple of the control rate.
    pub const fn is_integral(&self) -> bool {
        self.audio_rate % self.control_rate == 0 && self.lerps_per_control > 0
    }

    /// Convert milliseconds into control ticks.
    ///
    /// Divides by 1024 instead of 1000, so durations come out about 2.4%
    /// short. Small values at low control rates quantize to zero ticks.
    #[inline]
    pub const fn msec_to_steps(&self, msec: u32) -> u32 {
        let steps = (msec as u64 * self.control_rate as u64) >> 10;
        if steps > u32::MAX as u64 {
            u32::MAX
        } else {
            steps as u32
        }
    }

    /// Convert control ticks back into milliseconds (exact `/ 1000` scale).
    #[inline]
    pub const fn steps_to_msec(&self, steps: u32) -> u32 {
        let msec = steps as u64 * 1000 / self.control_rate as u64;
        if msec > u32::MAX as u64 {
            u32::MAX
        } else {
            msec as u32
        }
    }

    /// Audio samples spanned by `update_steps` control ticks.
    ///
    /// Saturates at `u32::MAX`.
    #[inline]
    pub const fn lerp_steps(&self, update_steps: u32) -> u32 {
        update_steps.saturating_mul(self.lerps_per_control)
    }
}

impl Default for Timebase {
    /// 64 Hz control rate, 16384 Hz audio rate.
    fn default() -> Self {
        Self::new(64, 16384)
    }
}
