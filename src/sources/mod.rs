pub mod amadeus;
pub mod expedia;
pub mod kayak;
pub mod skyscanner;
pub(crate) mod util;

pub use amadeus::Amadeus;
pub use expedia::Expedia;
pub use kayak::Kayak;
pub use skyscanner::Skyscanner;

use std::sync::Arc;

use crate::config::sources::SourcesConfig;
use crate::domain::ports::FlightSource;
use crate::utils::error::Result;

/// Assembles the enabled sources. Registering a new provider here is the
/// only change the rest of the crate needs to pick it up.
pub fn build_sources(config: &SourcesConfig) -> Result<Vec<Arc<dyn FlightSource>>> {
    let mut sources: Vec<Arc<dyn FlightSource>> = Vec::new();

    if config.kayak.enabled {
        sources.push(Arc::new(Kayak::new(config.kayak.base_url.as_deref())?));
    }
    if config.expedia.enabled {
        sources.push(Arc::new(Expedia::new(config.expedia.base_url.as_deref())?));
    }
    if config.skyscanner.enabled {
        sources.push(Arc::new(Skyscanner::new(
            config.skyscanner.base_url.as_deref(),
        )?));
    }
    if config.amadeus.enabled {
        // Missing credentials surface per-query as an isolated source
        // failure, not as a startup error.
        sources.push(Arc::new(Amadeus::new(
            config.amadeus.base_url.as_deref(),
            config.amadeus.credentials(),
        )?));
    }

    Ok(sources)
}
