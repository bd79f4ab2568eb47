pub mod config;
pub mod core;
pub mod domain;
pub mod sources;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::core::aggregator::Aggregator;
pub use crate::domain::model::{FlightOffer, Query, RawCandidate, SearchOutcome};
pub use crate::domain::ports::FlightSource;
pub use crate::utils::error::{Result, SearchError};
