//! Application context and run loop.

mod app;
mod run_loop;

pub use app::{App, AppConfig};
