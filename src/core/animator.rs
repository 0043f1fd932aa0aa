//! Position animator for the glass card.
//!
//! The card's vertical offset eases toward a target with a cubic ease-out.
//! A new target interrupts the running tween and restarts from the value
//! currently on screen, so rapid flips never jump or overshoot.

use std::time::{Duration, Instant};

/// Fraction of the viewport height the card travels to when the last image
/// is visible.
pub const BOTTOM_FRACTION: f64 = 0.95;

/// Offset the card should settle at for the given bottom state.
///
/// Negative (or NaN) viewport heights are treated as zero.
pub fn target_offset(at_bottom: bool, viewport_rows: f64) -> f64 {
    if !at_bottom {
        return 0.0;
    }
    let h = if viewport_rows.is_nan() { 0.0 } else { viewport_rows.max(0.0) };
    BOTTOM_FRACTION * h
}

/// Monotonic ease-out on `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f64,
    to: f64,
    start: Instant,
    duration: Duration,
}

impl Tween {
    fn settled(value: f64, now: Instant) -> Self {
        Self {
            from: value,
            to: value,
            start: now,
            duration: Duration::ZERO,
        }
    }

    fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        elapsed.as_secs_f64() / self.duration.as_secs_f64()
    }

    fn sample(&self, now: Instant) -> f64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        let v = self.from + (self.to - self.from) * ease_out_cubic(t);
        // Keep float noise from leaking outside the segment.
        v.clamp(self.from.min(self.to), self.from.max(self.to))
    }

    fn is_done(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Retargetable eased scalar.
#[derive(Debug, Clone)]
pub struct PositionAnimator {
    tween: Tween,
    duration: Duration,
    /// Last value handed out by [`tick`](Self::tick).
    published: f64,
}

impl PositionAnimator {
    /// Build an animator resting at `value`.
    pub fn starting_at(value: f64, duration: Duration, now: Instant) -> Self {
        Self {
            tween: Tween::settled(value, now),
            duration,
            published: value,
        }
    }

    pub fn target(&self) -> f64 {
        self.tween.to
    }

    /// Point the animation at `to`.  Returns `false` (and leaves any running
    /// tween alone) when `to` already is the target.
    pub fn set_target(&mut self, to: f64, now: Instant) -> bool {
        let to = if to.is_finite() { to } else { 0.0 };
        if (to - self.tween.to).abs() < f64::EPSILON {
            return false;
        }
        let live = self.tween.sample(now);
        self.tween = Tween {
            from: live,
            to,
            start: now,
            duration: self.duration,
        };
        true
    }

    /// Value at `now` without publishing it.
    pub fn sample(&self, now: Instant) -> f64 {
        self.tween.sample(now)
    }

    /// Advance to `now` and publish the new value.  Call once per frame.
    pub fn tick(&mut self, now: Instant) -> f64 {
        self.published = self.sample(now);
        self.published
    }

    /// Last published value.
    pub fn offset(&self) -> f64 {
        self.published
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        !self.tween.is_done(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn target_is_ninety_five_percent_at_bottom() {
        assert_eq!(target_offset(true, 800.0), 760.0);
        assert_eq!(target_offset(false, 800.0), 0.0);
        for h in [0.0, 1.0, 37.0, 1080.0] {
            assert_eq!(target_offset(true, h), 0.95 * h);
            assert_eq!(target_offset(false, h), 0.0);
        }
    }

    #[test]
    fn negative_viewport_clamps_to_zero() {
        assert_eq!(target_offset(true, -10.0), 0.0);
        assert_eq!(target_offset(true, f64::NAN), 0.0);
    }

    #[test]
    fn easing_is_bounded_and_monotonic() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_out_cubic(i as f64 / 100.0);
            assert!(v > prev);
            prev = v;
        }
    }

    #[test]
    fn starts_at_zero() {
        let t0 = Instant::now();
        let a = PositionAnimator::starting_at(0.0, ms(300), t0);
        assert_eq!(a.offset(), 0.0);
        assert!(!a.is_animating(t0));
    }

    #[test]
    fn converges_monotonically_within_bounded_frames() {
        let t0 = Instant::now();
        let mut a = PositionAnimator::starting_at(0.0, ms(300), t0);
        assert!(a.set_target(760.0, t0));

        let mut now = t0;
        let mut prev = a.tick(now);
        let mut frames = 0;
        while a.is_animating(now) {
            now += FRAME;
            frames += 1;
            let v = a.tick(now);
            assert!((0.0..=760.0).contains(&v));
            if a.is_animating(now) {
                assert!(v > prev, "frame {frames}: {v} <= {prev}");
            }
            prev = v;
            assert!(frames <= 20);
        }
        assert_eq!(a.offset(), 760.0);
    }

    #[test]
    fn same_target_does_not_restart() {
        let t0 = Instant::now();
        let mut a = PositionAnimator::starting_at(0.0, ms(300), t0);
        a.set_target(760.0, t0);
        let mid = t0 + ms(150);
        let before = a.sample(mid);
        assert!(!a.set_target(760.0, mid));
        assert_eq!(a.sample(mid), before);
        assert_eq!(a.sample(t0 + ms(300)), 760.0);
    }

    #[test]
    fn redirect_mid_flight_starts_from_live_value() {
        let t0 = Instant::now();
        let mut a = PositionAnimator::starting_at(0.0, ms(300), t0);
        a.set_target(760.0, t0);

        // Run until the card is roughly half way.
        let mut now = t0;
        while a.tick(now) < 400.0 {
            now += ms(1);
        }
        let live = a.offset();
        assert!(live >= 400.0 && live < 760.0);

        assert!(a.set_target(0.0, now));
        // No jump at the moment of redirection.
        assert_eq!(a.sample(now), live);

        let mut prev = live;
        for _ in 0..30 {
            now += FRAME;
            let v = a.tick(now);
            assert!(v <= prev, "moving away from new target");
            assert!(v >= 0.0 && v <= live);
            prev = v;
        }
        assert_eq!(a.offset(), 0.0);
    }

    #[test]
    fn rapid_flips_stay_in_range() {
        let t0 = Instant::now();
        let mut a = PositionAnimator::starting_at(0.0, ms(300), t0);
        let mut now = t0;
        for i in 0..40 {
            let target = if i % 2 == 0 { 760.0 } else { 0.0 };
            a.set_target(target, now);
            now += ms(7 * (i % 5 + 1));
            let v = a.tick(now);
            assert!((0.0..=760.0).contains(&v));
        }
        now += ms(300);
        assert_eq!(a.tick(now), a.target());
    }

    #[test]
    fn zero_duration_snaps() {
        let t0 = Instant::now();
        let mut a = PositionAnimator::starting_at(0.0, Duration::ZERO, t0);
        a.set_target(42.0, t0);
        assert_eq!(a.tick(t0), 42.0);
        assert!(!a.is_animating(t0));
    }
}
