use crate::color::Rgb;
use std::time::{Duration, Instant};

/// Particle and edge colors, animated together
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorPair {
    pub particle: Rgb,
    pub edge: Rgb,
}

impl ColorPair {
    pub fn new(particle: Rgb, edge: Rgb) -> Self {
        ColorPair { particle, edge }
    }

    fn lerp(self, to: ColorPair, t: f64) -> ColorPair {
        ColorPair {
            particle: self.particle.lerp(to.particle, t),
            edge: self.edge.lerp(to.edge, t),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Job {
    from: ColorPair,
    to: ColorPair,
    started: Instant,
    duration: Duration,
}

impl Job {
    /// Colors at `now`; exactly `to` once the duration has elapsed
    fn sample(&self, now: Instant) -> ColorPair {
        let elapsed = now.saturating_duration_since(self.started);
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from.lerp(self.to, t.min(1.0))
    }

    fn finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

/// Color state of the field plus at most one in-flight job. A new job
/// starts from the colors on screen when it is requested.
#[derive(Debug, Clone)]
pub struct ColorTransition {
    /// Colors recorded by the last completed job
    baseline: ColorPair,
    /// Colors drawn on the most recent frame
    displayed: ColorPair,
    job: Option<Job>,
}

impl ColorTransition {
    pub fn new(initial: ColorPair) -> Self {
        ColorTransition {
            baseline: initial,
            displayed: initial,
            job: None,
        }
    }

    pub fn displayed(&self) -> ColorPair {
        self.displayed
    }

    #[cfg(test)]
    pub fn baseline(&self) -> ColorPair {
        self.baseline
    }

    pub fn is_animating(&self) -> bool {
        self.job.is_some()
    }

    /// Colors that would be on screen at `now`, without advancing
    pub fn sample(&self, now: Instant) -> ColorPair {
        match &self.job {
            Some(job) => job.sample(now),
            None => self.baseline,
        }
    }

    /// Starts a transition, superseding any job in flight.
    ///
    /// A missing edge color follows the particle color.
    pub fn start(&mut self, particle: Rgb, edge: Option<Rgb>, duration: Duration, now: Instant) {
        let from = self.sample(now);
        let to = ColorPair::new(particle, edge.unwrap_or(particle));
        self.displayed = from;
        self.job = Some(Job {
            from,
            to,
            started: now,
            duration,
        });
        self.advance(now);
    }

    /// Advances the running job to `now` and returns the colors to draw
    pub fn advance(&mut self, now: Instant) -> ColorPair {
        if let Some(job) = self.job {
            self.displayed = job.sample(now);
            if job.finished(now) {
                self.displayed = job.to;
                self.baseline = job.to;
                self.job = None;
            }
        }
        self.displayed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);
    const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);

    fn blue() -> ColorTransition {
        ColorTransition::new(ColorPair::new(BLUE, BLUE))
    }

    #[test]
    fn interpolates_linearly_over_elapsed_time() {
        let t0 = Instant::now();
        let mut colors = blue();
        colors.start(RED, None, Duration::from_secs(2), t0);

        let quarter = colors.advance(t0 + Duration::from_millis(500));
        assert!((quarter.particle.r - 0.25).abs() < 1e-12);
        assert!((quarter.particle.b - 0.75).abs() < 1e-12);
        assert_eq!(quarter.edge, quarter.particle);
        assert!(colors.is_animating());
    }

    #[test]
    fn snaps_to_exact_target_and_records_baseline() {
        let t0 = Instant::now();
        let target = Rgb::new(0.1, 0.7, 0.3);
        let mut colors = blue();
        colors.start(target, Some(GREEN), Duration::from_secs(1), t0);

        let done = colors.advance(t0 + Duration::from_millis(1500));
        assert_eq!(done.particle, target);
        assert_eq!(done.edge, GREEN);
        assert_eq!(colors.baseline(), ColorPair::new(target, GREEN));
        assert!(!colors.is_animating());
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let t0 = Instant::now();
        let mut colors = blue();
        colors.start(RED, None, Duration::ZERO, t0);
        assert_eq!(colors.displayed(), ColorPair::new(RED, RED));
        assert!(!colors.is_animating());
    }

    #[test]
    fn interrupted_job_restarts_from_on_screen_color() {
        let t0 = Instant::now();
        let mut colors = blue();
        colors.start(RED, None, Duration::from_secs(1), t0);

        // halfway to red, a new command to green arrives
        let mid = t0 + Duration::from_millis(500);
        let on_screen = colors.sample(mid);
        colors.start(GREEN, None, Duration::from_secs(1), mid);
        assert_eq!(colors.displayed(), on_screen);
        // the superseded target never becomes the baseline
        assert_eq!(colors.baseline(), ColorPair::new(BLUE, BLUE));

        let later = colors.advance(mid + Duration::from_millis(500));
        assert!((later.particle.r - 0.25).abs() < 1e-12);
        assert!((later.particle.g - 0.5).abs() < 1e-12);
        assert!((later.particle.b - 0.25).abs() < 1e-12);

        colors.advance(mid + Duration::from_secs(1));
        assert_eq!(colors.baseline(), ColorPair::new(GREEN, GREEN));
    }

    #[test]
    fn idle_sample_is_baseline() {
        let colors = blue();
        assert_eq!(colors.sample(Instant::now()), ColorPair::new(BLUE, BLUE));
    }
}
