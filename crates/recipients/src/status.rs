use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use bloodbank_core::{DomainError, ValueObject};

/// Workflow status shared by recipients and blood requests.
///
/// Status changes are bookkeeping only; no transition touches inventory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Completed,
        RequestStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Completed => "Completed",
            RequestStatus::Cancelled => "Cancelled",
        }
    }
}

impl ValueObject for RequestStatus {}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = DomainError;

    /// Exact match against the four labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(
                    "status",
                    format!("'{s}' is not one of Pending, Approved, Completed, Cancelled"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_four_labels() {
        for status in RequestStatus::ALL {
            assert_eq!(status.as_str().parse::<RequestStatus>().unwrap(), status);
        }
    }

    #[test]
    fn rejects_anything_else() {
        for bad in ["", "pending", "Done", "Rejected", "Pending "] {
            let err = bad.parse::<RequestStatus>().unwrap_err();
            assert_eq!(err.field(), Some("status"), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn defaults_to_pending() {
        assert_eq!(RequestStatus::default(), RequestStatus::Pending);
    }
}
