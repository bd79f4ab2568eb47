pub mod aggregator;
pub mod dedup;
pub mod normalize;

pub use crate::domain::model::{
    FlightOffer, Query, RawCandidate, SearchOutcome, SourceReport, SourceStatus,
};
pub use crate::domain::ports::FlightSource;
pub use crate::utils::error::Result;
