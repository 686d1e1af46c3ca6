//! Transient "cols x rows" indicator shown while the window is resized.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shown {
    at: Instant,
    cols: usize,
    rows: usize,
}

/// Resize indicator with a fade-out over the last third of its lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeIndicator {
    duration: Duration,
    shown: Option<Shown>,
}

impl ResizeIndicator {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            shown: None,
        }
    }

    /// Show the new grid size, restarting the timer.
    pub fn show(&mut self, cols: usize, rows: usize, now: Instant) {
        self.shown = Some(Shown {
            at: now,
            cols,
            rows,
        });
    }

    pub fn cancel(&mut self) {
        self.shown = None;
    }

    pub fn is_active(&self) -> bool {
        self.shown.is_some()
    }

    /// Label and opacity at `now`; the indicator expires once its lifetime ends.
    pub fn state(&mut self, now: Instant) -> Option<(String, f32)> {
        let shown = self.shown?;
        match fade_alpha(now.saturating_duration_since(shown.at), self.duration) {
            Some(alpha) => Some((format!("{}x{}", shown.cols, shown.rows), alpha)),
            None => {
                self.shown = None;
                None
            }
        }
    }
}

/// Opacity `elapsed` into a lifetime of `duration`: fully opaque for the
/// first two thirds, then linear down to zero.
pub fn fade_alpha(elapsed: Duration, duration: Duration) -> Option<f32> {
    if elapsed >= duration {
        return None;
    }
    let fade_start = duration * 2 / 3;
    if elapsed <= fade_start {
        return Some(1.0);
    }
    let fade = (duration - fade_start).as_secs_f32();
    Some(1.0 - (elapsed - fade_start).as_secs_f32() / fade)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_millis(1000);

    #[test]
    fn opaque_until_the_last_third() {
        assert_eq!(fade_alpha(Duration::ZERO, SECOND), Some(1.0));
        assert_eq!(fade_alpha(Duration::from_millis(600), SECOND), Some(1.0));
        let mid_fade = fade_alpha(Duration::from_millis(833), SECOND).unwrap_or(0.0);
        assert!((mid_fade - 0.5).abs() < 0.01, "alpha {mid_fade}");
        assert_eq!(fade_alpha(SECOND, SECOND), None);
    }

    #[test]
    fn indicator_expires_and_can_be_cancelled() {
        let start = Instant::now();
        let mut indicator = ResizeIndicator::new(SECOND);
        indicator.show(80, 24, start);
        assert_eq!(indicator.state(start), Some(("80x24".to_string(), 1.0)));
        assert_eq!(indicator.state(start + SECOND), None);
        assert!(!indicator.is_active());

        indicator.show(100, 30, start);
        indicator.cancel();
        assert_eq!(indicator.state(start), None);
    }

    #[test]
    fn new_resize_restarts_the_timer() {
        let start = Instant::now();
        let mut indicator = ResizeIndicator::new(SECOND);
        indicator.show(80, 24, start);
        indicator.show(81, 24, start + Duration::from_millis(900));
        let (label, alpha) = indicator
            .state(start + Duration::from_millis(1200))
            .expect("still visible");
        assert_eq!(label, "81x24");
        assert_eq!(alpha, 1.0);
    }
}
