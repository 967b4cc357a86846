//! Command orchestration helpers from view intents to the backend command queue.

use crossbeam_channel::{Sender, TrySendError};
use shared::domain::ProductId;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::reducer::ViewState,
    ui::input::Intent,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentOutcome {
    Dispatch(BackendCommand),
    ShowHelp,
    Quit,
    Rejected(String),
}

/// Maps an intent onto a backend command using the quantities currently shown.
pub fn resolve_intent(intent: Intent, state: &ViewState) -> IntentOutcome {
    if !state.is_ready() && intent != Intent::Quit && intent != Intent::Help {
        return IntentOutcome::Rejected("Still loading the storefront...".to_string());
    }

    match intent {
        Intent::Add {
            product_id,
            quantity,
        } => {
            if state.product(&product_id).is_none() {
                return IntentOutcome::Rejected(format!("No product with id '{product_id}'"));
            }
            IntentOutcome::Dispatch(BackendCommand::AddItem {
                product_id,
                quantity,
            })
        }
        Intent::Increment(product_id) => {
            with_cart_quantity(state, product_id, |quantity| quantity.saturating_add(1))
        }
        Intent::Decrement(product_id) => {
            with_cart_quantity(state, product_id, |quantity| quantity.saturating_sub(1))
        }
        Intent::Remove(product_id) => with_cart_quantity(state, product_id, |_| 0),
        Intent::Drop(product_id) => match state.cart_item(&product_id) {
            Some(_) => IntentOutcome::Dispatch(BackendCommand::RemoveItem { product_id }),
            None => not_in_cart(&product_id),
        },
        Intent::Clear => IntentOutcome::Dispatch(BackendCommand::ClearCart),
        Intent::Refresh => IntentOutcome::Dispatch(BackendCommand::Refresh),
        Intent::Health => IntentOutcome::Dispatch(BackendCommand::CheckHealth),
        Intent::Help => IntentOutcome::ShowHelp,
        Intent::Quit => IntentOutcome::Quit,
    }
}

fn with_cart_quantity(
    state: &ViewState,
    product_id: ProductId,
    next: impl FnOnce(u32) -> u32,
) -> IntentOutcome {
    match state.cart_item(&product_id) {
        Some(item) => IntentOutcome::Dispatch(BackendCommand::SetQuantity {
            quantity: next(item.quantity),
            product_id,
        }),
        None => not_in_cart(&product_id),
    }
}

fn not_in_cart(product_id: &ProductId) -> IntentOutcome {
    IntentOutcome::Rejected(format!("Product '{product_id}' is not in the cart"))
}

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued view->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "Command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend worker stopped; restart the storefront".to_string();
        }
    }
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
