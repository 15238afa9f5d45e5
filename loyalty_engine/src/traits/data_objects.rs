use crate::db_types::Order;

/// Outcome of an idempotent order insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOrderResult {
    /// The order number was new and has been stored.
    Inserted(Order),
    /// The order number was already registered. The existing record is returned unchanged, so that callers can check
    /// whether it belongs to the same customer.
    AlreadyExists(Order),
}

impl InsertOrderResult {
    pub fn order(&self) -> &Order {
        match self {
            Self::Inserted(order) | Self::AlreadyExists(order) => order,
        }
    }

    pub fn was_inserted(&self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}
