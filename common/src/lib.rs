//! Ambient stack shared by every crate in the workspace: logging, the
//! shared error vocabulary, the timer tick source, and the configuration
//! surface. Mirrors the role `common` plays in the teacher crate.

pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
