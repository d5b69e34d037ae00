#![doc = include_str!("../README.md")]

mod auto_traits;
mod config;
mod error;
mod ingress;
mod limiter;
mod pending;
mod queue;
mod state;
mod task;
mod worker;

#[cfg(feature = "reqwest")]
pub mod reqwest;

pub use config::LimiterConfig;
pub use error::{ConfigError, LimiterError};
pub use limiter::{Limiter, LimiterBuilder};
pub use pending::Pending;
pub use state::Stats;
