use std::fmt::Display;

use loyalty_common::Points;
use serde::{Deserialize, Serialize};

/// Calculation status reported by the accrual service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccrualStatus {
    /// The order is known to the service, but calculation has not started.
    Registered,
    /// The reward is being calculated.
    Processing,
    /// The order will never earn a reward.
    Invalid,
    /// Calculation is complete. `accrual` carries the reward, if any.
    Processed,
}

impl Display for AccrualStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registered => write!(f, "REGISTERED"),
            Self::Processing => write!(f, "PROCESSING"),
            Self::Invalid => write!(f, "INVALID"),
            Self::Processed => write!(f, "PROCESSED"),
        }
    }
}

/// Body of a successful `GET /api/orders/{number}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualResponse {
    pub order: String,
    pub status: AccrualStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accrual: Option<Points>,
}
