//! Events delivered from the backend worker to the view.

use shared::domain::{Cart, Product};

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Initial catalog and cart fetches have both settled.
    Ready {
        products: Vec<Product>,
        cart: Option<Cart>,
    },
    ProductsUpdated(Vec<Product>),
    CartUpdated(Cart),
    HealthChecked(bool),
    /// The worker could not start; nothing further will arrive.
    BackendFailed(String),
}
