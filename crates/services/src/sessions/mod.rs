mod controller;
mod progress;
mod timer;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{SessionController, SessionPhase, Step, Tick};
pub use progress::SessionProgress;
pub use timer::{DEFAULT_TICK_PERIOD, TickTimer};
pub use workflow::{TrainingLoopService, TrainingSession};
