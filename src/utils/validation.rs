use crate::utils::error::{Result, SearchError};

/// Airport codes are IATA-style: exactly three ASCII letters.
pub fn validate_airport_code(field_name: &str, code: &str) -> Result<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(SearchError::invalid_query(
            field_name,
            format!("airport code must be 3 letters, got {:?}", code),
        ));
    }
    Ok(())
}

pub fn validate_passenger_count(field_name: &str, count: u32) -> Result<()> {
    if count < 1 {
        return Err(SearchError::invalid_query(
            field_name,
            "passenger count must be at least 1",
        ));
    }
    Ok(())
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SearchError::ConfigError {
            message: format!("{}: URL cannot be empty", field_name),
        });
    }

    match url::Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SearchError::ConfigError {
                message: format!("{}: unsupported URL scheme: {}", field_name, scheme),
            }),
        },
        Err(e) => Err(SearchError::ConfigError {
            message: format!("{}: invalid URL format: {}", field_name, e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SearchError::ConfigError {
            message: format!("{} cannot be empty or whitespace-only", field_name),
        });
    }
    Ok(())
}
