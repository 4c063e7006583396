//! OMNI client configuration.

use std::time::Duration;

use serde::Deserialize;

/// Endpoints and retry policy for the OMNI archive.
///
/// Deserialized from the `omni:` section of the pipeline YAML; every field
/// has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OmniConfig {
    /// Page listing the date range each dataset covers
    pub availability_url: String,
    /// OMNIWeb CGI endpoint that builds listings on request
    pub cgi_url: String,
    /// HTTP request timeout
    pub timeout_secs: u64,
    /// Maximum number of download retry attempts
    pub max_retries: u32,
    /// Initial retry delay (doubles each retry)
    pub initial_retry_delay_secs: u64,
    /// Maximum retry delay
    pub max_retry_delay_secs: u64,
    /// Rewrite `http://` listing links to `https://`
    pub force_https: bool,
}

impl Default for OmniConfig {
    fn default() -> Self {
        Self {
            availability_url: "https://omniweb.gsfc.nasa.gov/html/ow_data.html".to_string(),
            cgi_url: "https://omniweb.sci.gsfc.nasa.gov/cgi/nx1.cgi".to_string(),
            timeout_secs: 120,
            max_retries: 3,
            initial_retry_delay_secs: 2,
            max_retry_delay_secs: 60,
            force_https: true,
        }
    }
}

impl OmniConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn initial_retry_delay(&self) -> Duration {
        Duration::from_secs(self.initial_retry_delay_secs)
    }

    pub fn max_retry_delay(&self) -> Duration {
        Duration::from_secs(self.max_retry_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: OmniConfig = serde_yaml::from_str("max_retries: 5\nforce_https: false\n").unwrap();
        assert_eq!(config.max_retries, 5);
        assert!(!config.force_https);
        assert_eq!(config.initial_retry_delay(), Duration::from_secs(2));
        assert!(config.cgi_url.ends_with("nx1.cgi"));
    }
}
