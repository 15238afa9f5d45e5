use std::{convert::Infallible, fmt::Display, str::FromStr};

use accrual_tools::AccrualStatus;
use chrono::{DateTime, Utc};
use loyalty_common::{helpers::is_valid_luhn, Points};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------        OrderId        ---------------------------------------------------------
/// The purchase order number a customer submitted. Numeric, but treated as an opaque string everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the order number passes the Luhn checksum.
    pub fn is_valid(&self) -> bool {
        is_valid_luhn(&self.0)
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatusType {
    /// The order number has been uploaded, and the accrual service has not reported on it yet.
    New,
    /// The accrual service knows about the order, but has not started calculating the reward.
    Registered,
    /// The accrual service is calculating the reward.
    Processing,
    /// The order does not qualify for a reward. Terminal.
    Invalid,
    /// The reward has been calculated and credited. Terminal.
    Processed,
}

impl OrderStatusType {
    /// Statuses that the accrual service will never change again.
    pub const TERMINAL: [OrderStatusType; 2] = [OrderStatusType::Invalid, OrderStatusType::Processed];

    pub fn is_terminal(&self) -> bool {
        Self::TERMINAL.contains(self)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::New => write!(f, "NEW"),
            OrderStatusType::Registered => write!(f, "REGISTERED"),
            OrderStatusType::Processing => write!(f, "PROCESSING"),
            OrderStatusType::Invalid => write!(f, "INVALID"),
            OrderStatusType::Processed => write!(f, "PROCESSED"),
        }
    }
}

impl From<AccrualStatus> for OrderStatusType {
    fn from(status: AccrualStatus) -> Self {
        match status {
            AccrualStatus::Registered => Self::Registered,
            AccrualStatus::Processing => Self::Processing,
            AccrualStatus::Invalid => Self::Invalid,
            AccrualStatus::Processed => Self::Processed,
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(Self::New),
            "REGISTERED" => Ok(Self::Registered),
            "PROCESSING" => Ok(Self::Processing),
            "INVALID" => Ok(Self::Invalid),
            "PROCESSED" => Ok(Self::Processed),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    /// The customer that uploaded the order number
    pub customer_id: String,
    pub status: OrderStatusType,
    /// The reward credited for this order. Only set once the accrual service has calculated it.
    pub accrual: Option<Points>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewOrder        ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub customer_id: String,
    /// The time the customer uploaded the order number
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(order_id: OrderId, customer_id: String) -> Self {
        Self { order_id, customer_id, created_at: Utc::now() }
    }
}

//--------------------------------------     AccrualResult     ---------------------------------------------------------
/// The accrual service's verdict for one order, as it will be written to the order store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccrualResult {
    pub order_id: OrderId,
    pub status: AccrualStatus,
    pub accrual: Option<Points>,
}

impl AccrualResult {
    pub fn new(order_id: OrderId, status: AccrualStatus, accrual: Option<Points>) -> Self {
        Self { order_id, status, accrual }
    }

    /// The order status this result moves the order into.
    pub fn order_status(&self) -> OrderStatusType {
        self.status.into()
    }
}

impl Display for AccrualResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.accrual {
            Some(accrual) => write!(f, "{} {} ({accrual} points)", self.order_id, self.status),
            None => write!(f, "{} {}", self.order_id, self.status),
        }
    }
}
