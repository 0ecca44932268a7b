pub mod console_observer;
pub mod interactive;
pub mod output;
pub mod progress;
pub mod signals;

pub use console_observer::ConsoleObserver;
pub use interactive::{parse_command, spawn_control_listener, ControlCommand};
pub use output::{DisplayMode, OutputFormatter};
pub use progress::ProgressManager;
pub use signals::GracefulShutdown;
