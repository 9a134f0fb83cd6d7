use serde::{Deserialize, Serialize};

use crate::error::ResolutionError;

const UNKNOWN_CITY: &str = "Unknown";
const NO_COUNTRY_CODE: &str = "N/A";

/// Geographic label of the server endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub city: String,
    pub country_name: String,
    pub country_code: String,
}

/// Placeholder records shown instead of a real location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    DnsError,
    GeoApiError,
    ParseError,
}

impl Sentinel {
    pub fn country_name(&self) -> &'static str {
        match self {
            Sentinel::DnsError => "DNS Error",
            Sentinel::GeoApiError => "IP API Error",
            Sentinel::ParseError => "Parse Error",
        }
    }

    pub fn record(&self) -> LocationRecord {
        LocationRecord {
            city: UNKNOWN_CITY.to_string(),
            country_name: self.country_name().to_string(),
            country_code: NO_COUNTRY_CODE.to_string(),
        }
    }

    /// Sentinel for an adapter failure. `Cancelled` has none: it produces no output.
    pub fn for_error(error: &ResolutionError) -> Option<Self> {
        match error {
            ResolutionError::DnsFailed(_) => Some(Sentinel::DnsError),
            ResolutionError::GeoLookupFailed(_) => Some(Sentinel::GeoApiError),
            ResolutionError::ParseFailure(_) => Some(Sentinel::ParseError),
            ResolutionError::Cancelled => None,
        }
    }
}

impl LocationRecord {
    pub fn new(
        city: impl Into<String>,
        country_name: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            country_name: country_name.into(),
            country_code: country_code.into(),
        }
    }

    /// Which sentinel this record is, if any
    pub fn sentinel(&self) -> Option<Sentinel> {
        if self.city != UNKNOWN_CITY || self.country_code != NO_COUNTRY_CODE {
            return None;
        }

        [Sentinel::DnsError, Sentinel::GeoApiError, Sentinel::ParseError]
            .into_iter()
            .find(|s| s.country_name() == self.country_name)
    }

    pub fn is_sentinel(&self) -> bool {
        self.sentinel().is_some()
    }
}
