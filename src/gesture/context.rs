use super::{
    DeferredTask, PointerId, TouchEnv, QUICK_TAP_CLICK_DELAY_MS, QUICK_TAP_TIME_INTERVAL_MS,
    SCROLL_SPEED_FACTOR, TAP_DISTANCE_THRESHOLD, TAP_MOVEMENT_THRESHOLD,
};
use crate::scheduler::TaskHandle;
use crate::sink::{saturate_i16, saturate_u16, MouseButton};
use crate::surface::ScaleFactors;

/// Gesture state for one finger, from its down to its up or cancel.
///
/// Every handler returns immediately. Clicks and releases that must happen later
/// go through the scheduler in [`TouchEnv`].
#[derive(Debug)]
pub struct PointerTouchContext {
    pointer_id: PointerId,
    action_index: usize,
    latest_touch_x: i32,
    latest_touch_y: i32,
    first_touch_x: i32,
    first_touch_y: i32,
    cancelled: bool,
    confirmed_move: bool,
    confirmed_drag: bool,
    distance_moved: f64,
    scale: ScaleFactors,
    pointer_count: usize,
    max_pointer_count_in_gesture: usize,
    drag_timer: Option<TaskHandle>,
}

impl PointerTouchContext {
    pub fn new(pointer_id: PointerId, action_index: usize) -> Self {
        Self {
            pointer_id,
            action_index,
            latest_touch_x: 0,
            latest_touch_y: 0,
            first_touch_x: 0,
            first_touch_y: 0,
            cancelled: false,
            confirmed_move: false,
            confirmed_drag: false,
            distance_moved: 0.0,
            scale: ScaleFactors::IDENTITY,
            pointer_count: 0,
            max_pointer_count_in_gesture: 0,
            drag_timer: None,
        }
    }

    pub fn pointer_id(&self) -> PointerId {
        self.pointer_id
    }

    pub fn action_index(&self) -> usize {
        self.action_index
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn confirmed_move(&self) -> bool {
        self.confirmed_move
    }

    pub fn confirmed_drag(&self) -> bool {
        self.confirmed_drag
    }

    pub fn latest_touch(&self) -> (i32, i32) {
        (self.latest_touch_x, self.latest_touch_y)
    }

    pub fn first_touch(&self) -> (i32, i32) {
        (self.first_touch_x, self.first_touch_y)
    }

    pub fn distance_moved(&self) -> f64 {
        self.distance_moved
    }

    pub fn pointer_count(&self) -> usize {
        self.pointer_count
    }

    pub fn max_pointer_count_in_gesture(&self) -> usize {
        self.max_pointer_count_in_gesture
    }

    fn button(&self) -> MouseButton {
        MouseButton::for_action_index(self.action_index)
    }

    pub fn set_pointer_count(&mut self, pointer_count: usize) {
        self.pointer_count = pointer_count;
        self.max_pointer_count_in_gesture = self.max_pointer_count_in_gesture.max(pointer_count);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn touch_down(
        &mut self,
        env: &mut TouchEnv<'_>,
        pointer_id: PointerId,
        x: i32,
        y: i32,
        time: u64,
        is_new_finger: bool,
        is_first_finger: bool,
    ) -> bool {
        self.check_pointer_id(pointer_id);
        // Surface size may have changed since the last finger.
        self.scale = ScaleFactors::between(
            env.config.reference_width,
            env.config.reference_height,
            env.surface,
        );
        let pointer_id = self.pointer_id;

        // Only the finger that opens a gesture can be the second tap of a double tap.
        if is_first_finger {
            env.coordinator.lock_for_gesture(pointer_id);
            log::debug!("[gesture] pointer {} locked for mouse", pointer_id);
            env.coordinator.record_touch_down(time, x, y);
        } else {
            env.coordinator.note_touch_down(time, x, y);
        }

        self.latest_touch_x = x;
        self.latest_touch_y = y;
        self.first_touch_x = x;
        self.first_touch_y = y;

        if let Some(hold_ms) = env.config.drag_hold_ms {
            if is_new_finger {
                self.cancel_drag_timer(env);
                self.drag_timer = Some(
                    env.scheduler
                        .schedule(DeferredTask::ConfirmDrag { pointer_id }, hold_ms),
                );
            }
        }

        true
    }

    pub fn touch_move(
        &mut self,
        env: &mut TouchEnv<'_>,
        pointer_id: PointerId,
        x: i32,
        y: i32,
        time: u64,
    ) -> bool {
        self.check_pointer_id(pointer_id);
        log::trace!("[gesture] pointer {} at ({}, {}) t={}", self.pointer_id, x, y, time);
        if self.pointer_count >= 3 {
            return true;
        }
        if self.pointer_count == 2 {
            env.coordinator.set_scrolling();
        }
        if x == self.latest_touch_x && y == self.latest_touch_y {
            return true;
        }

        self.check_for_confirmed_move(env, x, y);

        if !env.coordinator.holds_lock(self.pointer_id) {
            self.latest_touch_x = x;
            self.latest_touch_y = y;
            return true;
        }

        env.coordinator.mark_locked_pointer_moved();

        let dx = self.scale.scale_x(x.saturating_sub(self.latest_touch_x));
        let dy = self.scale.scale_y(y.saturating_sub(self.latest_touch_y));
        log::trace!("[gesture] pointer {} delta ({}, {})", self.pointer_id, dx, dy);

        if self.pointer_count == 2 {
            if env.coordinator.is_scrolling() {
                let amount = saturate_i16(dy.saturating_mul(SCROLL_SPEED_FACTOR));
                env.sink.send_mouse_high_res_scroll(amount);
            }
        } else if env.config.absolute_mouse_mode {
            env.sink.send_mouse_move_as_mouse_position(
                saturate_i16(dx),
                saturate_i16(dy),
                saturate_u16(env.surface.width),
                saturate_u16(env.surface.height),
            );
        } else {
            env.sink.send_mouse_move(saturate_i16(dx), saturate_i16(dy));
        }

        // Deltas that scaled to zero keep the old anchor so slow drift still adds up.
        if dx != 0 {
            self.latest_touch_x = x;
        }
        if dy != 0 {
            self.latest_touch_y = y;
        }
        true
    }

    pub fn touch_up(&mut self, env: &mut TouchEnv<'_>, _x: i32, _y: i32, _time: u64) {
        self.cancel_drag_timer(env);

        if self.confirmed_drag {
            env.sink.send_mouse_button_up(self.button());
        } else if !self.confirmed_move
            && !env.coordinator.locked_pointer_moved()
            && !env.coordinator.quick_tap_detected()
            && !env.coordinator.is_scrolling()
        {
            // Single tap. The release is decided when the timer fires, so a quick
            // second tap can keep the button held for a drag.
            log::debug!("[gesture] tap by pointer {}", self.pointer_id);
            env.sink.send_mouse_button_down(MouseButton::Left);
            let handle = env
                .scheduler
                .schedule(DeferredTask::ReleaseTapButton, QUICK_TAP_TIME_INTERVAL_MS);
            env.coordinator.set_pending_tap_release(handle);
        }

        if env.coordinator.quick_tap_detected() {
            // Second tap: release the button the first tap left down, then
            // make up the click if this was not a drag.
            self.release_quick_tap_button(env);
            if !env.coordinator.locked_pointer_moved() {
                env.scheduler.schedule(
                    DeferredTask::Click(MouseButton::Left),
                    QUICK_TAP_CLICK_DELAY_MS,
                );
            }
        }

        if self.pointer_count == 2 && !env.coordinator.is_scrolling() && !self.confirmed_drag {
            log::debug!("[gesture] two-finger tap, right click");
            env.scheduler
                .schedule(DeferredTask::Click(MouseButton::Right), 0);
        }

        env.coordinator.release_lock(self.pointer_id);
    }

    /// The platform aborted this pointer. Any button this gesture holds is released.
    pub fn cancel(&mut self, env: &mut TouchEnv<'_>) {
        self.cancel_drag_timer(env);

        if env.coordinator.quick_tap_detected() {
            self.release_quick_tap_button(env);
        }
        if self.confirmed_drag {
            env.sink.send_mouse_button_up(self.button());
        }

        env.coordinator.release_lock(self.pointer_id);
        self.cancelled = true;
        log::debug!("[gesture] pointer {} cancelled", self.pointer_id);
    }

    /// Hold timer expired without the finger moving.
    pub fn confirm_drag(&mut self, env: &mut TouchEnv<'_>) {
        self.drag_timer = None;

        if self.cancelled || self.confirmed_move || self.confirmed_drag {
            return;
        }
        // A quick second tap already holds the left button.
        if env.coordinator.quick_tap_detected() {
            return;
        }
        // Only the last finger of the gesture drags.
        if self.action_index + 1 != self.max_pointer_count_in_gesture {
            return;
        }

        self.confirmed_drag = true;
        log::debug!(
            "[gesture] pointer {} held, dragging with {:?}",
            self.pointer_id,
            self.button()
        );
        env.sink.send_mouse_button_down(self.button());
    }

    fn release_quick_tap_button(&mut self, env: &mut TouchEnv<'_>) {
        env.sink.send_mouse_button_up(MouseButton::Left);
        if let Some(pending) = env.coordinator.take_pending_tap_release() {
            env.scheduler.cancel(pending);
        }
        env.coordinator.clear_quick_tap();
    }

    /// Lock ownership and timers follow the id this context was created for.
    /// A sample carrying another id is a routing error upstream and is only logged.
    fn check_pointer_id(&self, pointer_id: PointerId) {
        if pointer_id != self.pointer_id {
            log::warn!(
                "[gesture] sample for pointer {} routed to pointer {}",
                pointer_id,
                self.pointer_id
            );
        }
    }

    fn is_within_tap_bounds(&self, x: i32, y: i32) -> bool {
        let dx = (i64::from(x) - i64::from(self.latest_touch_x)).abs();
        let dy = (i64::from(y) - i64::from(self.latest_touch_y)).abs();
        let threshold = i64::from(TAP_MOVEMENT_THRESHOLD);
        dx <= threshold && dy <= threshold
    }

    fn check_for_confirmed_move(&mut self, env: &mut TouchEnv<'_>, x: i32, y: i32) {
        if self.confirmed_move || self.confirmed_drag {
            return;
        }

        if !self.is_within_tap_bounds(x, y) {
            self.confirm_move(env);
            return;
        }

        let dx = f64::from(x) - f64::from(self.latest_touch_x);
        let dy = f64::from(y) - f64::from(self.latest_touch_y);
        self.distance_moved += dx.hypot(dy);
        if self.distance_moved >= TAP_DISTANCE_THRESHOLD {
            self.confirm_move(env);
        }
    }

    fn confirm_move(&mut self, env: &mut TouchEnv<'_>) {
        self.confirmed_move = true;
        self.cancel_drag_timer(env);
        log::debug!("[gesture] pointer {} confirmed move", self.pointer_id);
    }

    fn cancel_drag_timer(&mut self, env: &mut TouchEnv<'_>) {
        if let Some(handle) = self.drag_timer.take() {
            env.scheduler.cancel(handle);
        }
    }
}
