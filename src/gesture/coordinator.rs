use super::{PointerId, QUICK_TAP_TIME_INTERVAL_MS, TAP_MOVEMENT_THRESHOLD};
use crate::scheduler::TaskHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TouchDownRecord {
    time: u64,
    x: i32,
    y: i32,
}

/// Session-wide state shared by every live pointer context.
///
/// At most one pointer holds the lock. Only the lock holder drives cursor
/// motion and scrolling. A fresh coordinator is needed per streaming session.
#[derive(Debug, Default)]
pub struct GestureCoordinator {
    locked_pointer: Option<PointerId>,
    locked_pointer_moved: bool,
    quick_tap_detected: bool,
    last_touch_down: Option<TouchDownRecord>,
    scrolling: bool,
    pending_tap_release: Option<TaskHandle>,
}

impl GestureCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new gesture owned by `pointer_id`.
    pub fn lock_for_gesture(&mut self, pointer_id: PointerId) {
        if let Some(previous) = self.locked_pointer {
            log::debug!(
                "[gesture] lock moves from pointer {} to {}",
                previous,
                pointer_id
            );
        }
        self.scrolling = false;
        self.locked_pointer = Some(pointer_id);
        self.locked_pointer_moved = false;
    }

    /// Releases the lock if `pointer_id` holds it. Returns whether it did.
    pub fn release_lock(&mut self, pointer_id: PointerId) -> bool {
        if self.locked_pointer != Some(pointer_id) {
            return false;
        }
        self.locked_pointer = None;
        self.locked_pointer_moved = false;
        log::debug!("[gesture] pointer {} released the lock", pointer_id);
        true
    }

    pub fn locked_pointer(&self) -> Option<PointerId> {
        self.locked_pointer
    }

    pub fn holds_lock(&self, pointer_id: PointerId) -> bool {
        self.locked_pointer == Some(pointer_id)
    }

    pub fn locked_pointer_moved(&self) -> bool {
        self.locked_pointer_moved
    }

    pub fn mark_locked_pointer_moved(&mut self) {
        self.locked_pointer_moved = true;
    }

    /// Whether a down at `time` and (`x`, `y`) falls in the quick-tap window of the previous down.
    pub fn is_quick_tap(&self, time: u64, x: i32, y: i32) -> bool {
        let Some(last) = self.last_touch_down else {
            return false;
        };
        let in_time = time
            .checked_sub(last.time)
            .is_some_and(|elapsed| elapsed < QUICK_TAP_TIME_INTERVAL_MS);
        let dx = (i64::from(x) - i64::from(last.x)).abs();
        let dy = (i64::from(y) - i64::from(last.y)).abs();
        let threshold = i64::from(TAP_MOVEMENT_THRESHOLD);
        in_time && dx <= threshold && dy <= threshold
    }

    /// Records a down, evaluating the quick-tap window first. Returns the new quick-tap flag.
    pub fn record_touch_down(&mut self, time: u64, x: i32, y: i32) -> bool {
        self.quick_tap_detected = self.is_quick_tap(time, x, y);
        self.last_touch_down = Some(TouchDownRecord { time, x, y });
        if self.quick_tap_detected {
            log::debug!("[gesture] quick tap at ({}, {})", x, y);
        }
        self.quick_tap_detected
    }

    /// Records a down from a finger joining a gesture. The quick-tap flag is left alone.
    pub fn note_touch_down(&mut self, time: u64, x: i32, y: i32) {
        self.last_touch_down = Some(TouchDownRecord { time, x, y });
    }

    pub fn quick_tap_detected(&self) -> bool {
        self.quick_tap_detected
    }

    pub fn clear_quick_tap(&mut self) {
        self.quick_tap_detected = false;
    }

    pub fn last_touch_down_timestamp(&self) -> Option<u64> {
        self.last_touch_down.map(|r| r.time)
    }

    pub fn last_touch(&self) -> Option<(i32, i32)> {
        self.last_touch_down.map(|r| (r.x, r.y))
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    pub fn set_scrolling(&mut self) {
        if !self.scrolling {
            log::debug!("[gesture] two fingers down, scrolling");
        }
        self.scrolling = true;
    }

    pub fn set_pending_tap_release(&mut self, handle: TaskHandle) {
        self.pending_tap_release = Some(handle);
    }

    pub fn take_pending_tap_release(&mut self) -> Option<TaskHandle> {
        self.pending_tap_release.take()
    }
}
