use serde::{Deserialize, Serialize};

pub mod scan;
pub mod source;

// Re-exports for convenience
pub use scan::*;
pub use source::*;

/// Retailer integrations known to the tracker registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TrackerType {
    Webhallen,
    Inet,
    Netonnet,
    Power,
    Maxgaming,
    Mediamarkt,
    Spelochsant,
    Amazon,
}

impl TrackerType {
    pub const ALL: [TrackerType; 8] = [
        TrackerType::Webhallen,
        TrackerType::Inet,
        TrackerType::Netonnet,
        TrackerType::Power,
        TrackerType::Maxgaming,
        TrackerType::Mediamarkt,
        TrackerType::Spelochsant,
        TrackerType::Amazon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerType::Webhallen => "webhallen",
            TrackerType::Inet => "inet",
            TrackerType::Netonnet => "netonnet",
            TrackerType::Power => "power",
            TrackerType::Maxgaming => "maxgaming",
            TrackerType::Mediamarkt => "mediamarkt",
            TrackerType::Spelochsant => "spelochsant",
            TrackerType::Amazon => "amazon",
        }
    }
}

impl std::fmt::Display for TrackerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Which of the two tracked product SKUs a source watches.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    #[default]
    Standard,
    Digital,
}

impl Edition {
    pub fn from_digital(is_digital: bool) -> Self {
        if is_digital {
            Edition::Digital
        } else {
            Edition::Standard
        }
    }

    pub fn is_digital(&self) -> bool {
        matches!(self, Edition::Digital)
    }
}

impl std::fmt::Display for Edition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Edition::Standard => f.write_str("standard"),
            Edition::Digital => f.write_str("digital"),
        }
    }
}
