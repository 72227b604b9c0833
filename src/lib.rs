//! Turn multi-finger touch input into relative mouse commands (move, click,
//! drag, scroll, right click) for a remote session.
//!
//! The platform layer feeds per-finger down/move/up/cancel events into a
//! [`TouchSession`]. Each finger gets a [`PointerTouchContext`] state machine;
//! a shared [`GestureCoordinator`] decides which finger drives the cursor and
//! when two fingers mean scrolling. Output goes to a [`RemoteSessionSink`].
//!
//! Everything runs on one thread. Delayed releases and synthesized clicks are
//! queued in a [`TimerQueue`] that the host drains with
//! [`TouchSession::advance_to`].

pub mod config;
pub mod error;
pub mod gesture;
pub mod scheduler;
pub mod session;
pub mod sink;
pub mod surface;

pub use config::Config;
pub use error::{Error, Result};
pub use gesture::{DeferredTask, GestureCoordinator, PointerId, PointerTouchContext, TouchEnv};
pub use scheduler::{DeferredTaskScheduler, TaskHandle, TimerQueue};
pub use session::TouchSession;
pub use sink::{MouseButton, RecordingSink, RemoteSessionSink, SinkCommand};
#[cfg(target_os = "linux")]
pub use sink::UinputSink;
pub use surface::{ScaleFactors, SurfaceSize};
