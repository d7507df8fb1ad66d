//! Fixed-point linear ramp.
//!
//! [`Line`] moves from its current value to a target at a constant increment
//! per step. The increment is computed once when the ramp is armed, using
//! 64-bit intermediate math, and the final step lands exactly on the target
//! so truncation error never accumulates across phases.
//!
//! ## Usage
//!
//! ```rust
//! use expenv_core::{Interpolator, Line, Q15n16};
//!
//! let mut line = Line::new();
//! line.set(Q15n16::from_q8n0(100), 4);
//!
//! let ramp: Vec<u8> = (0..4).map(|_| line.next().to_q8n0()).collect();
//! assert_eq!(ramp, vec![25, 50, 75, 100]);
//! ```

use crate::{Interpolator, Q15n16};

/// A linear ramp over [`Q15n16`] values.
///
/// A step count of `u32::MAX` produces an increment of zero for any
/// difference between two 8-bit levels, which effectively freezes the line.
#[derive(Debug, Clone, Default)]
pub struct Line {
    /// Current value
    current: Q15n16,
    /// Target value
    target: Q15n16,
    /// Raw increment per step (can be negative)
    increment: i32,
    /// Steps remaining until target reached
    steps_remaining: u32,
}

impl Line {
    /// Create a line resting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a line resting at `initial`.
    pub fn with_value(initial: Q15n16) -> Self {
        Self {
            current: initial,
            target: initial,
            increment: 0,
            steps_remaining: 0,
        }
    }

    /// Target of the armed ramp.
    #[inline]
    pub fn target(&self) -> Q15n16 {
        self.target
    }

    /// Raw per-step increment of the armed ramp.
    #[inline]
    pub fn increment(&self) -> i32 {
        self.increment
    }

    /// Steps left before the target is reached.
    #[inline]
    pub fn steps_remaining(&self) -> u32 {
        self.steps_remaining
    }

    /// Check if the ramp has reached its target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.steps_remaining == 0 && self.current == self.target
    }
}

impl Interpolator for Line {
    fn set(&mut self, target: Q15n16, steps: u32) {
        self.target = target;
        if steps == 0 {
            // Snap on the next call to `next`.
            self.increment = 0;
            self.steps_remaining = 1;
        } else {
            let delta = i64::from(target.raw()) - i64::from(self.current.raw());
            self.increment = (delta / i64::from(steps)) as i32;
            self.steps_remaining = steps;
        }
    }

    fn set_immediate(&mut self, value: Q15n16) {
        self.current = value;
        self.target = value;
        self.increment = 0;
        self.steps_remaining = 0;
    }

    #[inline]
    fn next(&mut self) -> Q15n16 {
        if self.steps_remaining > 0 {
            self.current = self.current + Q15n16::from_raw(self.increment);
            self.steps_remaining -= 1;
            if self.steps_remaining == 0 {
                self.current = self.target;
            }
        }
        self.current
    }

    #[inline]
    fn current(&self) -> Q15n16 {
        self.current
    }
}
