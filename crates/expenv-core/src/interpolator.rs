//! Ramp generator abstraction.
//!
//! The envelope engine never computes intermediate values itself: it arms an
//! [`Interpolator`] with a target and a step count at every phase change, then
//! pulls one value per audio sample. [`Line`](crate::Line) is the stock
//! implementation; tests and alternative hosts can supply their own.

use crate::Q15n16;

/// A value that ramps toward a target over a fixed number of steps.
///
/// Implementations must be real-time safe: no allocation, no blocking.
pub trait Interpolator {
    /// Arm a ramp from the current value to `target` over `steps` calls to
    /// [`next`](Self::next).
    ///
    /// With `steps == 0` the next call to `next` returns `target`.
    fn set(&mut self, target: Q15n16, steps: u32);

    /// Jump to `value` and hold it.
    fn set_immediate(&mut self, value: Q15n16);

    /// Advance one step and return the new value.
    fn next(&mut self) -> Q15n16;

    /// Current value without advancing.
    fn current(&self) -> Q15n16;
}
