//! Backend commands queued from the view to the backend worker.

use shared::domain::ProductId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Mount,
    AddItem {
        product_id: ProductId,
        quantity: u32,
    },
    SetQuantity {
        product_id: ProductId,
        quantity: u32,
    },
    RemoveItem {
        product_id: ProductId,
    },
    ClearCart,
    Refresh,
    CheckHealth,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Mount => "mount",
            BackendCommand::AddItem { .. } => "add_item",
            BackendCommand::SetQuantity { .. } => "set_quantity",
            BackendCommand::RemoveItem { .. } => "remove_item",
            BackendCommand::ClearCart => "clear_cart",
            BackendCommand::Refresh => "refresh",
            BackendCommand::CheckHealth => "check_health",
        }
    }

    /// Commands that change the cart and must reach the service in order.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            BackendCommand::AddItem { .. }
                | BackendCommand::SetQuantity { .. }
                | BackendCommand::RemoveItem { .. }
                | BackendCommand::ClearCart
        )
    }
}
