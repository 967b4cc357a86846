//! View state and the transitions driven by backend events.

use shared::domain::{Cart, CartItem, Product, ProductId};

use crate::controller::events::UiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewPhase {
    #[default]
    Loading,
    Ready,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub phase: ViewPhase,
    pub products: Vec<Product>,
    pub cart: Option<Cart>,
    pub status: String,
    pub backend_failed: bool,
}

impl ViewState {
    /// Applies one backend event. Returns `true` when the view should re-render.
    pub fn apply(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Ready { products, cart } => {
                self.products = products;
                if cart.is_some() {
                    self.cart = cart;
                }
                self.phase = ViewPhase::Ready;
                true
            }
            UiEvent::ProductsUpdated(products) => {
                self.products = products;
                self.phase == ViewPhase::Ready
            }
            UiEvent::CartUpdated(cart) => {
                self.cart = Some(cart);
                self.phase == ViewPhase::Ready
            }
            UiEvent::HealthChecked(healthy) => {
                self.status = if healthy {
                    "Cart service is healthy".to_string()
                } else {
                    "Cart service did not answer the health check".to_string()
                };
                true
            }
            UiEvent::BackendFailed(message) => {
                self.status = message;
                self.backend_failed = true;
                true
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase == ViewPhase::Ready
    }

    pub fn product(&self, product_id: &ProductId) -> Option<&Product> {
        self.products
            .iter()
            .find(|product| &product.id == product_id)
    }

    pub fn cart_item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.cart.as_ref().and_then(|cart| cart.item(product_id))
    }

    /// Number of distinct lines, shown as the cart badge.
    pub fn cart_badge(&self) -> usize {
        self.cart.as_ref().map_or(0, |cart| cart.items.len())
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
