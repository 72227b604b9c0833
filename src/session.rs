//! Host-side dispatch: routes per-finger platform events to pointer contexts
//! and runs deferred tasks on the same thread.

use crate::config::Config;
use crate::gesture::{DeferredTask, GestureCoordinator, PointerId, PointerTouchContext, TouchEnv};
use crate::scheduler::TimerQueue;
use crate::sink::RemoteSessionSink;
use crate::surface::SurfaceSize;

/// One streaming session worth of touch state.
///
/// Every method runs to completion before the next one starts. Tasks due
/// strictly before an event's timestamp run before the event is handled.
pub struct TouchSession<S> {
    config: Config,
    sink: S,
    timers: TimerQueue<DeferredTask>,
    coordinator: GestureCoordinator,
    surface: SurfaceSize,
    contexts: Vec<PointerTouchContext>,
}

impl<S: RemoteSessionSink> TouchSession<S> {
    pub fn new(config: Config, sink: S) -> Self {
        let surface = SurfaceSize::new(config.reference_width, config.reference_height);
        Self {
            config,
            sink,
            timers: TimerQueue::new(),
            coordinator: GestureCoordinator::new(),
            surface,
            contexts: Vec::new(),
        }
    }

    pub fn with_surface(mut self, width: u32, height: u32) -> Self {
        self.resize_surface(width, height);
        self
    }

    /// New scale factors take effect at the next finger down.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        log::debug!("[touch] surface resized to {}x{}", width, height);
        self.surface = SurfaceSize::new(width, height);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn coordinator(&self) -> &GestureCoordinator {
        &self.coordinator
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn context(&self, pointer_id: PointerId) -> Option<&PointerTouchContext> {
        self.contexts.iter().find(|c| c.pointer_id() == pointer_id)
    }

    pub fn live_pointers(&self) -> impl Iterator<Item = PointerId> + '_ {
        self.contexts.iter().map(PointerTouchContext::pointer_id)
    }

    pub fn now(&self) -> u64 {
        self.timers.now()
    }

    /// When the host must next call [`advance_to`](Self::advance_to).
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    pub fn touch_down(&mut self, pointer_id: PointerId, x: i32, y: i32, time: u64) -> bool {
        self.run_tasks_before(time);

        if self.context(pointer_id).is_some() {
            log::warn!("[touch] duplicate down for live pointer {}", pointer_id);
            return false;
        }

        let is_first_finger = self.contexts.is_empty();
        let action_index = (0..)
            .find(|i| !self.contexts.iter().any(|c| c.action_index() == *i))
            .unwrap_or(self.contexts.len());
        self.contexts
            .push(PointerTouchContext::new(pointer_id, action_index));
        self.broadcast_pointer_count(self.contexts.len());

        log::debug!(
            "[touch] down pointer={} slot={} at ({}, {}) t={}",
            pointer_id,
            action_index,
            x,
            y,
            time
        );
        let index = self.contexts.len() - 1;
        self.with_context(index, |ctx, env| {
            ctx.touch_down(env, pointer_id, x, y, time, true, is_first_finger)
        })
    }

    pub fn touch_move(&mut self, pointer_id: PointerId, x: i32, y: i32, time: u64) -> bool {
        self.run_tasks_before(time);

        let Some(index) = self.position(pointer_id) else {
            log::trace!("[touch] move for unknown pointer {}", pointer_id);
            return false;
        };
        self.with_context(index, |ctx, env| ctx.touch_move(env, pointer_id, x, y, time))
    }

    pub fn touch_up(&mut self, pointer_id: PointerId, x: i32, y: i32, time: u64) {
        self.run_tasks_before(time);

        let Some(index) = self.position(pointer_id) else {
            log::trace!("[touch] up for unknown pointer {}", pointer_id);
            return;
        };
        // The lifting finger still counts for this event.
        self.broadcast_pointer_count(self.contexts.len());
        let mut ctx = self.contexts.remove(index);
        log::debug!("[touch] up pointer={} t={}", pointer_id, time);
        ctx.touch_up(&mut self.env(), x, y, time);
        self.broadcast_pointer_count(self.contexts.len());
    }

    pub fn touch_cancel(&mut self, pointer_id: PointerId) {
        let Some(index) = self.position(pointer_id) else {
            return;
        };
        let mut ctx = self.contexts.remove(index);
        ctx.cancel(&mut self.env());
        self.broadcast_pointer_count(self.contexts.len());
    }

    /// The platform aborted the whole gesture.
    pub fn cancel_all(&mut self) {
        let contexts = std::mem::take(&mut self.contexts);
        if !contexts.is_empty() {
            log::debug!("[touch] cancelling {} pointers", contexts.len());
        }
        for mut ctx in contexts {
            ctx.cancel(&mut self.env());
        }
    }

    /// Runs every deferred task due at or before `now`.
    pub fn advance_to(&mut self, now: u64) {
        while let Some(task) = self.timers.pop_due(now) {
            self.run_task(task);
        }
        self.timers.set_now(now);
    }

    fn run_tasks_before(&mut self, time: u64) {
        if let Some(limit) = time.checked_sub(1) {
            while let Some(task) = self.timers.pop_due(limit) {
                self.run_task(task);
            }
        }
        self.timers.set_now(time);
    }

    fn run_task(&mut self, task: DeferredTask) {
        let Self {
            config,
            sink,
            timers,
            coordinator,
            surface,
            contexts,
        } = self;
        let mut env = TouchEnv {
            coordinator,
            sink,
            scheduler: timers,
            config,
            surface: *surface,
        };
        if let Some(pointer_id) = task.run_shared(&mut env) {
            match contexts.iter_mut().find(|c| c.pointer_id() == pointer_id) {
                Some(ctx) => ctx.confirm_drag(&mut env),
                None => log::trace!("[touch] drag timer for lifted pointer {}", pointer_id),
            }
        }
    }

    fn position(&self, pointer_id: PointerId) -> Option<usize> {
        self.contexts.iter().position(|c| c.pointer_id() == pointer_id)
    }

    fn broadcast_pointer_count(&mut self, count: usize) {
        for ctx in &mut self.contexts {
            ctx.set_pointer_count(count);
        }
    }

    fn env(&mut self) -> TouchEnv<'_> {
        TouchEnv {
            coordinator: &mut self.coordinator,
            sink: &mut self.sink,
            scheduler: &mut self.timers,
            config: &self.config,
            surface: self.surface,
        }
    }

    fn with_context<R>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut PointerTouchContext, &mut TouchEnv<'_>) -> R,
    ) -> R {
        let Self {
            config,
            sink,
            timers,
            coordinator,
            surface,
            contexts,
        } = self;
        let mut env = TouchEnv {
            coordinator,
            sink,
            scheduler: timers,
            config,
            surface: *surface,
        };
        f(&mut contexts[index], &mut env)
    }
}
