//! Event wiring for one chart instance
//!
//! [`ChartRuntime`] connects a [`ChartState`] to its services: it measures the
//! container on mount and on resize, drives the reveal animation from frame
//! callbacks, forwards pointer events and publishes a fresh [`Scene`] after
//! every state change. Teardown cancels the pending frame and the resize
//! listener; nothing is published after it.

use crate::{
    animation::AnimationPhase,
    chart::{ChartState, ChartVariant},
    hover::PointerPosition,
    scene::Scene,
    services::{Clock, ContainerMeasure, Disposer, FrameScheduler, ResizeSource},
};
use egg_core::{DatasetProvider, Granularity, HoveredBucket, SeriesSet};
use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

type RenderCallback = Box<dyn Fn(Scene)>;
type HoverCallback = Box<dyn Fn(Option<HoveredBucket>)>;

struct RuntimeInner<V: ChartVariant> {
    state: RefCell<ChartState<V>>,
    provider: Rc<dyn DatasetProvider>,
    frames: Rc<dyn FrameScheduler>,
    clock: Rc<dyn Clock>,
    measure: RefCell<Option<Box<dyn ContainerMeasure>>>,
    pending_frame: RefCell<Disposer>,
    resize: RefCell<Disposer>,
    mounted: Cell<bool>,
    on_render: RefCell<Option<RenderCallback>>,
    on_hover: RefCell<Option<HoverCallback>>,
    published_hover: RefCell<Option<HoveredBucket>>,
}

impl<V: ChartVariant> RuntimeInner<V> {
    fn publish(&self) {
        // State borrow must end before callbacks run
        let scene = self.state.borrow().render();
        if let Some(callback) = self.on_render.borrow().as_ref() {
            callback(scene);
        }
        self.publish_hover();
    }

    fn publish_hover(&self) {
        let hovered = self.state.borrow().hovered_bucket();
        if *self.published_hover.borrow() == hovered {
            return;
        }

        self.published_hover.replace(hovered.clone());
        if let Some(callback) = self.on_hover.borrow().as_ref() {
            callback(hovered);
        }
    }

    fn schedule_frame(this: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(this);
        let disposer = this.frames.request_frame(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                Self::on_frame(&inner);
            }
        }));

        // Dropping the previous handle cancels it, so only one loop is ever live
        drop(this.pending_frame.replace(disposer));
    }

    fn cancel_frame(&self) {
        drop(self.pending_frame.replace(Disposer::noop()));
    }

    fn on_frame(this: &Rc<Self>) {
        if !this.mounted.get() {
            return;
        }

        let phase = this.state.borrow_mut().advance_animation(this.clock.now());
        this.publish();

        match phase {
            AnimationPhase::Running => Self::schedule_frame(this),
            AnimationPhase::Complete => {
                tracing::debug!("Reveal animation complete");
                this.cancel_frame();
            }
            AnimationPhase::Idle => this.cancel_frame(),
        }
    }

    fn remeasure(&self) {
        if !self.mounted.get() {
            return;
        }

        let Some(size) = self.measure.borrow().as_ref().map(|m| m.measure()) else {
            return;
        };
        self.state.borrow_mut().set_geometry(size);
        self.publish();
    }
}

/// One mounted chart: state plus its service subscriptions
pub struct ChartRuntime<V: ChartVariant> {
    inner: Rc<RuntimeInner<V>>,
}

impl<V: ChartVariant> Clone for ChartRuntime<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: ChartVariant> ChartRuntime<V> {
    pub fn new(
        variant: V,
        series: SeriesSet,
        provider: Rc<dyn DatasetProvider>,
        frames: Rc<dyn FrameScheduler>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                state: RefCell::new(ChartState::new(variant, series)),
                provider,
                frames,
                clock,
                measure: RefCell::new(None),
                pending_frame: RefCell::new(Disposer::noop()),
                resize: RefCell::new(Disposer::noop()),
                mounted: Cell::new(false),
                on_render: RefCell::new(None),
                on_hover: RefCell::new(None),
                published_hover: RefCell::new(None),
            }),
        }
    }

    /// Receives every newly rendered scene
    pub fn on_render(&self, callback: impl Fn(Scene) + 'static) {
        self.inner.on_render.replace(Some(Box::new(callback)));
    }

    /// Receives the hovered-bucket summary whenever it changes
    pub fn on_hover(&self, callback: impl Fn(Option<HoveredBucket>) + 'static) {
        self.inner.on_hover.replace(Some(Box::new(callback)));
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&ChartState<V>) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    /// Measures the container, subscribes to resizes and starts the reveal
    /// when a dataset is already bound.
    pub fn mount(&self, measure: Box<dyn ContainerMeasure>, resize: &dyn ResizeSource) {
        if self.inner.mounted.replace(true) {
            tracing::debug!("Chart already mounted");
            return;
        }

        let size = measure.measure();
        self.inner.measure.replace(Some(measure));
        self.inner.state.borrow_mut().set_geometry(size);

        let weak = Rc::downgrade(&self.inner);
        let subscription = resize.subscribe(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.remeasure();
            }
        }));
        drop(self.inner.resize.replace(subscription));

        let has_dataset = self.inner.state.borrow().dataset().is_some();
        if has_dataset {
            self.inner
                .state
                .borrow_mut()
                .restart_animation(self.inner.clock.now());
            RuntimeInner::schedule_frame(&self.inner);
        }

        tracing::debug!("Chart mounted at {}x{}", size.width, size.height);
        self.inner.publish();
    }

    /// Binds the dataset for a granularity.
    ///
    /// A different dataset cancels the in-flight frame before the restarted
    /// reveal schedules its own, so two loops never race.
    pub fn set_granularity(&self, granularity: Granularity) {
        let dataset = self.inner.provider.dataset(granularity);
        let now = self.inner.clock.now();
        let changed = self.inner.state.borrow_mut().set_dataset(dataset, now);

        if !changed || !self.inner.mounted.get() {
            return;
        }

        tracing::debug!("Switched to {} dataset", granularity);
        self.inner.cancel_frame();
        RuntimeInner::schedule_frame(&self.inner);
        self.inner.publish();
    }

    pub fn pointer_move(&self, pointer: PointerPosition) {
        if !self.inner.mounted.get() {
            return;
        }

        self.inner.state.borrow_mut().set_hover(pointer);
        self.inner.publish();
    }

    pub fn pointer_leave(&self) {
        if !self.inner.mounted.get() {
            return;
        }

        self.inner.state.borrow_mut().clear_hover();
        self.inner.publish();
    }

    /// Cancels the pending frame and removes the resize listener
    pub fn unmount(&self) {
        if !self.inner.mounted.replace(false) {
            return;
        }

        self.inner.cancel_frame();
        drop(self.inner.resize.replace(Disposer::noop()));
        self.inner.measure.replace(None);
        self.inner.state.borrow_mut().teardown();
        self.inner.publish_hover();

        tracing::debug!("Chart unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::testing::{FixedMeasure, ManualClock, ManualResize, ManualScheduler},
        stacked_bar::StackedBar,
    };
    use egg_core::StaticDatasetProvider;

    struct Harness {
        runtime: ChartRuntime<StackedBar>,
        clock: Rc<ManualClock>,
        frames: Rc<ManualScheduler>,
        resize: ManualResize,
        measure: FixedMeasure,
        scenes: Rc<RefCell<Vec<Scene>>>,
        hovered: Rc<RefCell<Vec<Option<HoveredBucket>>>>,
    }

    fn harness() -> Harness {
        let clock = Rc::new(ManualClock::default());
        let frames = Rc::new(ManualScheduler::default());
        let runtime = ChartRuntime::new(
            StackedBar::default(),
            SeriesSet::egg_defects(),
            Rc::new(StaticDatasetProvider::egg_defects()),
            frames.clone(),
            clock.clone(),
        );

        let scenes = Rc::new(RefCell::new(Vec::new()));
        let sink = scenes.clone();
        runtime.on_render(move |scene| sink.borrow_mut().push(scene));

        let hovered = Rc::new(RefCell::new(Vec::new()));
        let sink = hovered.clone();
        runtime.on_hover(move |bucket| sink.borrow_mut().push(bucket));

        Harness {
            runtime,
            clock,
            frames,
            resize: ManualResize::default(),
            measure: FixedMeasure::new(640.0, 300.0),
            scenes,
            hovered,
        }
    }

    impl Harness {
        fn mount(&self) {
            self.runtime.mount(Box::new(self.measure.clone()), &self.resize);
        }

        fn tick(&self, ms: f64) -> usize {
            self.clock.advance(ms);
            self.frames.run_frame()
        }

        fn progress(&self) -> f64 {
            self.runtime.with_state(|s| s.progress())
        }
    }

    #[test]
    fn test_mount_runs_animation_to_completion() {
        let h = harness();
        h.runtime.set_granularity(Granularity::Daily);
        assert_eq!(h.frames.pending(), 0);

        h.mount();
        assert_eq!(h.frames.pending(), 1);
        assert_eq!(h.progress(), 0.0);

        h.tick(750.0);
        assert_eq!(h.progress(), 0.5);
        assert_eq!(h.frames.pending(), 1);

        h.tick(750.0);
        assert_eq!(h.progress(), 1.0);
        assert_eq!(h.frames.pending(), 0);
        assert_eq!(h.tick(16.0), 0);

        let last = h.scenes.borrow().last().cloned().unwrap();
        assert!(!last.is_empty());
    }

    #[test]
    fn test_switch_cancels_in_flight_frame() {
        let h = harness();
        h.runtime.set_granularity(Granularity::Daily);
        h.mount();
        h.tick(600.0);
        assert!(h.progress() > 0.0);

        h.runtime.set_granularity(Granularity::Monthly);
        assert_eq!(h.progress(), 0.0);
        assert_eq!(h.runtime.with_state(|s| s.max_magnitude()), 25_500.0);

        // Exactly one loop survives the switch
        assert_eq!(h.frames.pending(), 1);
        assert_eq!(h.tick(150.0), 1);
        assert_eq!(h.progress(), 0.1);
    }

    #[test]
    fn test_same_granularity_does_not_restart() {
        let h = harness();
        h.runtime.set_granularity(Granularity::Daily);
        h.mount();
        h.tick(300.0);
        let requested = h.frames.requested();

        h.runtime.set_granularity(Granularity::Daily);
        assert_eq!(h.frames.requested(), requested);
        assert_eq!(h.progress(), 0.2);
    }

    #[test]
    fn test_unmount_cancels_frame_and_listener() {
        let h = harness();
        h.runtime.set_granularity(Granularity::Daily);
        h.mount();
        assert_eq!(h.resize.listener_count(), 1);

        h.runtime.unmount();
        assert_eq!(h.frames.pending(), 0);
        assert_eq!(h.resize.listener_count(), 0);

        let published = h.scenes.borrow().len();
        h.resize.fire();
        h.tick(500.0);
        h.runtime.pointer_move(PointerPosition::new(100.0, 150.0));
        h.runtime.set_granularity(Granularity::Monthly);

        assert_eq!(h.scenes.borrow().len(), published);
        assert_eq!(h.frames.pending(), 0);
    }

    #[test]
    fn test_frame_after_unmount_is_dropped() {
        let h = harness();
        h.runtime.set_granularity(Granularity::Daily);
        h.mount();

        // A callback that escaped cancellation must still be inert
        let inner = Rc::downgrade(&h.runtime.inner);
        h.runtime.unmount();
        if let Some(inner) = inner.upgrade() {
            RuntimeInner::on_frame(&inner);
        }

        assert_eq!(h.progress(), 0.0);
        assert_eq!(h.frames.pending(), 0);
    }

    #[test]
    fn test_resize_recomputes_geometry_and_clears_hover() {
        let h = harness();
        h.runtime.set_granularity(Granularity::Daily);
        h.mount();

        h.runtime.pointer_move(PointerPosition::new(100.0, 150.0));
        assert!(h.runtime.with_state(|s| s.hover().is_some()));

        h.measure.set(900.0, 400.0);
        h.resize.fire();

        h.runtime.with_state(|s| {
            assert_eq!(s.geometry().plot_width, 600.0);
            assert_eq!(s.geometry().plot_height, 350.0);
            assert!(s.hover().is_none());
        });
        assert_eq!(h.scenes.borrow().last().unwrap().width(), 900.0);
    }

    #[test]
    fn test_unmeasured_container_publishes_empty_scene() {
        let h = harness();
        h.measure.set(0.0, 0.0);
        h.runtime.set_granularity(Granularity::Daily);
        h.mount();
        h.tick(1500.0);

        assert!(h.scenes.borrow().iter().all(Scene::is_empty));
    }

    #[test]
    fn test_hover_is_published_on_change() {
        let h = harness();
        h.runtime.set_granularity(Granularity::Daily);
        h.mount();

        h.runtime.pointer_move(PointerPosition::new(60.0, 150.0));
        h.runtime.pointer_move(PointerPosition::new(61.0, 150.0));
        h.runtime.pointer_leave();

        let hovered = h.hovered.borrow();
        assert_eq!(hovered.len(), 2);
        assert_eq!(hovered[0].as_ref().map(|b| b.label.as_str()), Some("Mon"));
        assert!(hovered[1].is_none());
    }
}
