use crate::animation::ease::Ease;
use crate::foundation::core::Quat;

/// Interpolation contract for tweened value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Quat {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.slerp(*b, t as f32)
    }
}

/// Time-based interpolation from `from` to `to`.
///
/// The value holds at `from` for `delay` seconds, then eases to `to` over `duration` seconds.
/// A zero duration jumps to `to` as soon as the delay has elapsed.
#[derive(Clone, Debug)]
pub struct Tween<T> {
    from: T,
    to: T,
    delay: f64,
    duration: f64,
    ease: Ease,
    elapsed: f64,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    pub fn new(from: T, to: T, duration_secs: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            delay: 0.0,
            duration: sanitize_secs(duration_secs),
            ease,
            elapsed: 0.0,
        }
    }

    pub fn with_delay(mut self, delay_secs: f64) -> Self {
        self.delay = sanitize_secs(delay_secs);
        self
    }

    /// Step the tween by `dt` seconds and return the value at the new time.
    pub fn advance(&mut self, dt: f64) -> T {
        self.elapsed += sanitize_secs(dt);
        self.sample()
    }

    pub fn sample(&self) -> T {
        let local = self.elapsed - self.delay;
        let t = if local < 0.0 {
            0.0
        } else if self.duration <= 0.0 {
            1.0
        } else {
            local / self.duration
        };
        let eased = self.ease.apply(t);
        if eased >= 1.0 {
            return self.to.clone();
        }
        T::lerp(&self.from, &self.to, eased)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }

    pub fn target(&self) -> &T {
        &self.to
    }
}

fn sanitize_secs(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
