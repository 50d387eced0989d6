use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, ClassifyError};

/// Response body as handed to a tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Final URL after redirects
    pub url: String,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON, reporting shape mismatches as classification errors.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClassifyError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Transport,
    Classification,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Transport => f.write_str("transport"),
            FailureKind::Classification => f.write_str("classification"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ScanFailure {
    pub fn transport(err: &AppError) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: err.to_string(),
        }
    }

    pub fn classification(err: &ClassifyError) -> Self {
        Self {
            kind: FailureKind::Classification,
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for ScanFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failure: {}", self.kind, self.message)
    }
}

/// Outcome of checking one source once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScanResult {
    Available,
    Unavailable,
    Failed(ScanFailure),
}

impl ScanResult {
    pub fn from_available(available: bool) -> Self {
        if available {
            ScanResult::Available
        } else {
            ScanResult::Unavailable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScanResult::Available => "available",
            ScanResult::Unavailable => "unavailable",
            ScanResult::Failed(_) => "failed",
        }
    }
}
