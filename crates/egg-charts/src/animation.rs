//! Reveal animation timing
//!
//! [`AnimationDriver`] turns wall-clock time into a global progress in `[0, 1]`;
//! [`Stagger`] derives per-element progress from it so elements reveal
//! left-to-right and, within a stacked column, bottom-to-top.

use serde::{Deserialize, Serialize};

/// Default reveal duration in milliseconds
pub const DEFAULT_DURATION_MS: f64 = 1500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationPhase {
    /// No dataset bound, or torn down
    #[default]
    Idle,
    Running,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationState {
    pub start_time: f64,
    pub progress: f64,
}

// ============================================================================
// ANIMATION DRIVER
// ============================================================================

/// Idle → Running → Complete state machine over a fixed duration
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    duration: f64,
    phase: AnimationPhase,
    state: AnimationState,
    run: u64,
}

impl AnimationDriver {
    pub fn new(duration_ms: f64) -> Self {
        let duration = if duration_ms.is_finite() && duration_ms > 0.0 {
            duration_ms
        } else {
            DEFAULT_DURATION_MS
        };

        Self {
            duration,
            phase: AnimationPhase::Idle,
            state: AnimationState::default(),
            run: 0,
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn progress(&self) -> f64 {
        self.state.progress
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Number of times the reveal has been (re)started
    pub fn run(&self) -> u64 {
        self.run
    }

    /// Starts a fresh run at progress 0
    pub fn restart(&mut self, now: f64) {
        self.state = AnimationState {
            start_time: now,
            progress: 0.0,
        };
        self.phase = AnimationPhase::Running;
        self.run += 1;
    }

    /// Recomputes progress for a frame at `now`.
    ///
    /// Progress never decreases within a run, even if the clock steps backwards.
    pub fn advance(&mut self, now: f64) -> AnimationPhase {
        if self.phase != AnimationPhase::Running {
            return self.phase;
        }

        let elapsed = (now - self.state.start_time).max(0.0);
        let progress = (elapsed / self.duration).min(1.0);
        self.state.progress = self.state.progress.max(progress);

        if self.state.progress >= 1.0 {
            self.state.progress = 1.0;
            self.phase = AnimationPhase::Complete;
        }

        self.phase
    }

    /// Back to Idle; progress is kept so a torn-down chart renders its last frame
    pub fn stop(&mut self) {
        self.phase = AnimationPhase::Idle;
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MS)
    }
}

// ============================================================================
// STAGGER
// ============================================================================

/// Per-element reveal: `clamp(global * span - offset, 0, 1)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stagger {
    /// Time-scale factor applied to the element count
    pub rate: f64,
    /// Extra offset per stacked layer, in element units
    pub layer_offset: f64,
}

impl Stagger {
    pub const fn new(rate: f64, layer_offset: f64) -> Self {
        Self { rate, layer_offset }
    }

    /// Global-progress span covering `elements` columns of `layers` layers each.
    ///
    /// Wide enough that the last layer of the last element finishes at global 1.
    pub fn span(&self, elements: usize, layers: usize) -> f64 {
        if elements == 0 {
            return 1.0;
        }

        let last = self.offset(elements - 1, layers.saturating_sub(1));
        (elements as f64 * self.rate).max(last + 1.0)
    }

    pub fn offset(&self, index: usize, layer: usize) -> f64 {
        index as f64 + layer as f64 * self.layer_offset
    }

    pub fn progress(&self, global: f64, span: f64, offset: f64) -> f64 {
        (global * span - offset).clamp(0.0, 1.0)
    }
}

impl Default for Stagger {
    fn default() -> Self {
        Self::new(1.5, 0.5)
    }
}
