//! Gesture recognition: one state machine per finger plus the session-wide
//! coordinator that decides which finger drives the cursor.

mod context;
mod coordinator;

pub use context::PointerTouchContext;
pub use coordinator::GestureCoordinator;

use crate::config::Config;
use crate::scheduler::DeferredTaskScheduler;
use crate::sink::{MouseButton, RemoteSessionSink};
use crate::surface::SurfaceSize;

/// Platform-assigned finger identifier, unique while the finger is down.
pub type PointerId = u32;

/// Max per-axis jump (px) between samples that still counts as the same tap.
/// Also the max distance between two downs of a quick tap.
pub const TAP_MOVEMENT_THRESHOLD: i32 = 100;

/// Accumulated path length (px) that turns a touch into a move.
pub const TAP_DISTANCE_THRESHOLD: f64 = 25.0;

/// Window (ms) in which a second down counts as a quick tap. Also the delay
/// before a single tap's button is released.
pub const QUICK_TAP_TIME_INTERVAL_MS: u64 = 200;

pub const SCROLL_SPEED_FACTOR: i32 = 5;

/// How long a synthesized click holds its button (ms).
pub const CLICK_HOLD_MS: u64 = 50;

/// Delay (ms) before the compensating click after a quick second tap.
pub const QUICK_TAP_CLICK_DELAY_MS: u64 = 50;

/// Work the gesture core defers through the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Release the left button pressed by a single tap, unless a quick
    /// second tap has since started.
    ReleaseTapButton,
    /// Press `button` now and release it after [`CLICK_HOLD_MS`].
    Click(MouseButton),
    ButtonUp(MouseButton),
    /// Hold timer for a time-gated drag on `pointer_id`.
    ConfirmDrag { pointer_id: PointerId },
}

impl DeferredTask {
    /// Runs a task that only touches shared state. A `ConfirmDrag` belongs to
    /// a pointer context, so its pointer id is handed back to the caller.
    pub fn run_shared(self, env: &mut TouchEnv<'_>) -> Option<PointerId> {
        match self {
            DeferredTask::ReleaseTapButton => {
                if env.coordinator.quick_tap_detected() {
                    log::debug!("[gesture] quick tap in progress, keeping left button down");
                } else {
                    env.sink.send_mouse_button_up(MouseButton::Left);
                }
            }
            DeferredTask::Click(button) => {
                env.sink.send_mouse_button_down(button);
                env.scheduler
                    .schedule(DeferredTask::ButtonUp(button), CLICK_HOLD_MS);
            }
            DeferredTask::ButtonUp(button) => env.sink.send_mouse_button_up(button),
            DeferredTask::ConfirmDrag { pointer_id } => return Some(pointer_id),
        }
        None
    }
}

/// Everything a pointer context reaches while handling one event or task.
pub struct TouchEnv<'a> {
    pub coordinator: &'a mut GestureCoordinator,
    pub sink: &'a mut dyn RemoteSessionSink,
    pub scheduler: &'a mut dyn DeferredTaskScheduler<DeferredTask>,
    pub config: &'a Config,
    pub surface: SurfaceSize,
}
