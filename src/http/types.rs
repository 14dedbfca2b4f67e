use serde::{Deserialize, Serialize};

use crate::scan::engine::ScanOutcome;

/// Wire envelope returned for every scan, regardless of outcome. The HTTP
/// status carries the classification; the body repeats it for clients that
/// only look at the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    #[serde(rename = "foundBlacklistedIban")]
    pub found_blacklisted_iban: bool,
    pub message: String,
}

impl ScanResponse {
    pub fn from_outcome(outcome: &ScanOutcome) -> Self {
        Self {
            found_blacklisted_iban: outcome.rejected,
            message: outcome.message.clone(),
        }
    }

    pub fn failure(detail: impl std::fmt::Display) -> Self {
        Self {
            found_blacklisted_iban: false,
            message: format!("Error: {}", detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_flag_in_camel_case() {
        let json =
            serde_json::to_value(ScanResponse::from_outcome(&ScanOutcome::rejected("found")))
                .unwrap();
        assert_eq!(json["foundBlacklistedIban"], true);
        assert_eq!(json["message"], "found");
    }

    #[test]
    fn failure_envelope_prefixes_the_detail() {
        let response = ScanResponse::failure("connection refused");
        assert!(!response.found_blacklisted_iban);
        assert_eq!(response.message, "Error: connection refused");
    }
}
