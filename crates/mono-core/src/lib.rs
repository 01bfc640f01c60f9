pub mod config;
pub mod dispatch;
pub mod error;
pub mod invocation;
pub mod io;
pub mod launcher;
pub mod paths;
pub mod template;

pub use config::{Config, Step};
pub use dispatch::Dispatcher;
pub use error::{MonoError, Result};
pub use invocation::Invocation;
pub use launcher::{CommandSpec, DryRunLauncher, EchoLauncher, Launcher, SystemLauncher};
