use crate::animation::ease::Ease;
use crate::animation::tween::Tween;

/// The externally driven transition scalar.
///
/// Writes are last-write-wins: a direct [`set`](Self::set) cancels any running animation, and a
/// new animation replaces the running one, starting from the current value.
#[derive(Clone, Debug, Default)]
pub struct ProgressController {
    value: f64,
    tween: Option<Tween<f64>>,
}

impl ProgressController {
    pub fn new(initial: f64) -> Self {
        Self {
            value: initial,
            tween: None,
        }
    }

    /// Current value. Not clamped; the compositor clamps on read.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Assign immediately, cancelling any in-flight animation.
    pub fn set(&mut self, value: f64) {
        self.tween = None;
        self.value = value;
    }

    pub fn set_target(&mut self, value: f64, duration_secs: f64, ease: Ease) {
        self.set_target_delayed(value, 0.0, duration_secs, ease);
    }

    /// Animate from the current value to `value`, holding for `delay_secs` first.
    pub fn set_target_delayed(
        &mut self,
        value: f64,
        delay_secs: f64,
        duration_secs: f64,
        ease: Ease,
    ) {
        self.tween =
            Some(Tween::new(self.value, value, duration_secs, ease).with_delay(delay_secs));
    }

    /// Step the running animation by `dt` seconds. Returns the new value.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if let Some(tween) = self.tween.as_mut() {
            self.value = tween.advance(dt);
            if tween.is_finished() {
                self.tween = None;
            }
        }
        self.value
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/progress.rs"]
mod tests;
