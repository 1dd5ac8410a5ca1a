use uuid::Uuid;

// ============================================================================
// Group Order Commands - Represent caller intent
// ============================================================================
//
// Opening an order is not a command on an existing aggregate; the command
// handler has a dedicated `open` path for it.
//
// ============================================================================

#[derive(Debug, Clone)]
pub enum GroupOrderCommand {
    /// Add `quantity` to the caller's stake (creates the stake if absent).
    Join {
        vendor_id: Uuid,
        quantity: u32,
    },
    /// Replace the caller's stake with `new_quantity`.
    Adjust {
        vendor_id: Uuid,
        new_quantity: u32,
    },
    /// Supplier marked the closed order as fulfilled.
    Deliver,
    /// Supplier abandoned the order.
    Cancel {
        reason: Option<String>,
        cancelled_by: Option<Uuid>,
    },
}

impl GroupOrderCommand {
    /// Label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GroupOrderCommand::Join { .. } => "join",
            GroupOrderCommand::Adjust { .. } => "modify",
            GroupOrderCommand::Deliver => "deliver",
            GroupOrderCommand::Cancel { .. } => "cancel",
        }
    }
}
