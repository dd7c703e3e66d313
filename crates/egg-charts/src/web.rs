//! Browser implementations of the chart services

use crate::{
    ContainerSize,
    services::{Clock, ContainerMeasure, Disposer, FrameScheduler, ResizeSource},
};
use leptos::prelude::*;

/// `requestAnimationFrame` scheduler
#[derive(Debug, Clone, Copy, Default)]
pub struct RafScheduler;

impl FrameScheduler for RafScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Disposer {
        match request_animation_frame_with_handle(callback) {
            Ok(handle) => Disposer::new(move || handle.cancel()),
            Err(e) => {
                tracing::error!("Failed to request animation frame: {:?}", e);
                Disposer::noop()
            }
        }
    }
}

/// Window `resize` events
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowResize;

impl ResizeSource for WindowResize {
    fn subscribe(&self, callback: Box<dyn Fn()>) -> Disposer {
        let handle = window_event_listener(leptos::ev::resize, move |_| callback());
        Disposer::new(move || handle.remove())
    }
}

/// `Date.now()` in milliseconds
#[derive(Debug, Clone, Copy, Default)]
pub struct DateClock;

impl Clock for DateClock {
    fn now(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// Bounding box of the chart's host element
#[derive(Debug, Clone)]
pub struct ElementMeasure(pub web_sys::Element);

impl ContainerMeasure for ElementMeasure {
    fn measure(&self) -> ContainerSize {
        let rect = self.0.get_bounding_client_rect();
        ContainerSize::new(rect.width(), rect.height())
    }
}
