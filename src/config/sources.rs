use serde::Deserialize;
use std::path::Path;

use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_url};

fn default_enabled() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    90
}

/// Optional TOML configuration for the source set. Every section and field
/// has a default, so an empty file (or no file) yields the standard three
/// page sources with a 90-second per-source budget.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SourcesConfig {
    #[serde(default)]
    pub aggregator: AggregatorSection,
    #[serde(default)]
    pub kayak: SiteSection,
    #[serde(default)]
    pub expedia: SiteSection,
    #[serde(default)]
    pub skyscanner: SiteSection,
    #[serde(default)]
    pub amadeus: AmadeusSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorSection {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for AggregatorSection {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
        }
    }
}

/// Amadeus stays off until credentials are set up.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AmadeusSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
}

impl AmadeusSection {
    /// Config values win; the AMADEUS_API_KEY / AMADEUS_API_SECRET
    /// environment variables fill the gaps.
    pub fn credentials(&self) -> Option<(String, String)> {
        let key = self
            .api_key
            .clone()
            .or_else(|| std::env::var("AMADEUS_API_KEY").ok())?;
        let secret = self
            .api_secret
            .clone()
            .or_else(|| std::env::var("AMADEUS_API_SECRET").ok())?;
        Some((key, secret))
    }
}

impl SourcesConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SourcesConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.aggregator.timeout_seconds)
    }

    fn validate(&self) -> Result<()> {
        let overrides = [
            ("kayak.base_url", &self.kayak.base_url),
            ("expedia.base_url", &self.expedia.base_url),
            ("skyscanner.base_url", &self.skyscanner.base_url),
            ("amadeus.base_url", &self.amadeus.base_url),
        ];
        for (field, base_url) in overrides {
            if let Some(url) = base_url {
                validate_url(field, url)?;
            }
        }
        if let Some(key) = &self.amadeus.api_key {
            validate_non_empty_string("amadeus.api_key", key)?;
        }
        if let Some(secret) = &self.amadeus.api_secret {
            validate_non_empty_string("amadeus.api_secret", secret)?;
        }
        Ok(())
    }
}
