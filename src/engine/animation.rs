// Animation coordinator
//
// Owns the single in-flight transition and its schedule of hull sampling
// ticks. Every transition gets a fresh generation number; ticks carry the
// generation they were scheduled for and are discarded when it no longer
// matches, so a superseded transition can never repaint a hull.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::trace;

/// Ease-out cubic: fast start, gentle arrival (t clamped to [0, 1])
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// A scheduled hull resample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleTick {
    pub generation: u64,
    /// 1-based sample number within its transition
    pub index: usize,
    pub due: Instant,
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    generation: u64,
    started: Instant,
}

#[derive(Debug, Clone)]
pub struct AnimationCoordinator {
    generation: u64,
    transition: Option<Transition>,
    pending: VecDeque<SampleTick>,
    duration: Duration,
    sample_count: usize,
}

impl AnimationCoordinator {
    pub fn new(duration: Duration, sample_count: usize) -> Self {
        Self {
            generation: 0,
            transition: None,
            pending: VecDeque::new(),
            duration,
            sample_count,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Number of sampling ticks still scheduled
    pub fn pending_ticks(&self) -> usize {
        self.pending.len()
    }

    /// Stop the current transition immediately
    ///
    /// Returns true when a transition was in flight. The generation is
    /// bumped either way so any tick handed out earlier is now stale.
    pub fn cancel(&mut self) -> bool {
        self.generation = self.generation.wrapping_add(1);
        self.pending.clear();
        self.transition.take().is_some()
    }

    /// Start a new transition at `now`, superseding any previous one
    pub fn begin(&mut self, now: Instant) -> u64 {
        self.cancel();
        let generation = self.generation;
        self.transition = Some(Transition {
            generation,
            started: now,
        });

        let samples = self.sample_count.max(1) as u32;
        self.pending.extend((1..=self.sample_count).map(|index| SampleTick {
            generation,
            index,
            due: now + self.duration * index as u32 / samples,
        }));

        trace!(generation, samples = self.sample_count, "Transition scheduled");
        generation
    }

    /// Linear progress of the running transition in [0, 1]
    pub fn progress(&self, now: Instant) -> Option<f64> {
        let transition = self.transition?;
        if self.duration.is_zero() {
            return Some(1.0);
        }
        let elapsed = now.saturating_duration_since(transition.started);
        Some((elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0))
    }

    /// Take the sampling work due at `now`
    ///
    /// All due ticks are drained; ticks from another generation are dropped
    /// and several due ticks of the current one collapse into the latest.
    pub fn poll(&mut self, now: Instant) -> Option<SampleTick> {
        let mut latest = None;
        while let Some(tick) = self.pending.front().copied() {
            if tick.due > now {
                break;
            }
            self.pending.pop_front();
            if tick.generation != self.generation {
                trace!(tick = tick.generation, current = self.generation, "Dropping stale sample tick");
                continue;
            }
            latest = Some(tick);
        }
        latest
    }

    /// Earliest instant at which `poll` or `finish` has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        let transition = self.transition?;
        let end = transition.started + self.duration;
        Some(match self.pending.front() {
            Some(tick) => tick.due.min(end),
            None => end,
        })
    }

    /// End the transition once its duration has elapsed
    ///
    /// Returns true exactly once per transition, on the call that ends it.
    pub fn finish(&mut self, now: Instant) -> bool {
        match self.transition {
            Some(t) if now >= t.started + self.duration && t.generation == self.generation => {
                self.transition = None;
                self.pending.clear();
                true
            }
            _ => false,
        }
    }
}

impl Default for AnimationCoordinator {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), 20)
    }
}
