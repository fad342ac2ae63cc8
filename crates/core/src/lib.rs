#![forbid(unsafe_code)]

pub mod log;
pub mod model;
pub mod time;

pub use log::{Logger, MemoryLogger, TracingLogger};
pub use time::Clock;
