//! External services a chart instance depends on
//!
//! Frame scheduling, resize notifications, container measurement and the clock
//! are injected so the runtime can be driven by the browser or by tests.
//! Subscriptions hand back a [`Disposer`] that is invoked at teardown.

use crate::ContainerSize;

/// Monotonic time source in milliseconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// One-shot animation frame requests
pub trait FrameScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Disposer;
}

/// Container resize notifications
pub trait ResizeSource {
    fn subscribe(&self, callback: Box<dyn Fn()>) -> Disposer;
}

/// Measures the chart's host container
pub trait ContainerMeasure {
    fn measure(&self) -> ContainerSize;
}

/// Cancels a subscription exactly once, explicitly or when dropped
#[must_use = "dropping a Disposer cancels the subscription"]
pub struct Disposer(Option<Box<dyn FnOnce()>>);

impl Disposer {
    pub fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(dispose)))
    }

    /// A disposer with nothing to cancel
    pub fn noop() -> Self {
        Self(None)
    }

    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }

    pub fn dispose(&mut self) {
        if let Some(dispose) = self.0.take() {
            dispose();
        }
    }
}

impl Default for Disposer {
    fn default() -> Self {
        Self::noop()
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Disposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Disposer").field(&self.is_active()).finish()
    }
}

// ============================================================================
// TEST DOUBLES
// ============================================================================
