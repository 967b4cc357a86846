use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use shared::{
    domain::{Cart, Product, ProductId, UserId},
    protocol::{AddToCartRequest, UpdateCartItemRequest},
};
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};

pub mod api;
pub mod catalog;
pub mod error;

pub use api::{HttpStorefrontApi, MissingStorefrontApi, StorefrontApi, DEFAULT_API_BASE_URL};
pub use catalog::demo_products;
pub use error::ClientError;

/// Quantity sent by the "Add to Cart" action.
pub const DEFAULT_ADD_QUANTITY: u32 = 1;

#[derive(Debug, Clone)]
pub enum SyncEvent {
    ProductsUpdated(Vec<Product>),
    CartUpdated(Cart),
}

#[derive(Default)]
struct SyncState {
    products: Vec<Product>,
    cart: Option<Cart>,
    applied_cart_ticket: u64,
}

/// Keeps the catalog and one user's cart in step with the cart service.
///
/// The service is the source of truth: every mutation is followed by a full
/// cart refetch and nothing is patched locally. Mutations are serialized per
/// synchronizer, and each cart fetch carries a ticket so that a response
/// overtaken by a newer one is dropped instead of applied.
pub struct CartSync {
    api: Arc<dyn StorefrontApi>,
    user_id: UserId,
    state: RwLock<SyncState>,
    cart_tickets: AtomicU64,
    mutations: Mutex<()>,
    events: broadcast::Sender<SyncEvent>,
}

impl CartSync {
    pub fn new(api: Arc<dyn StorefrontApi>, user_id: UserId) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            user_id,
            state: RwLock::new(SyncState::default()),
            cart_tickets: AtomicU64::new(0),
            mutations: Mutex::new(()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.state.read().await.products.clone()
    }

    pub async fn cart(&self) -> Option<Cart> {
        self.state.read().await.cart.clone()
    }

    /// Initial load: catalog and cart are requested concurrently and both
    /// must settle before the caller leaves its loading state.
    pub async fn mount(&self) -> (Vec<Product>, Option<Cart>) {
        let (products, _) = futures::join!(self.load_products(), self.load_cart());
        let cart = self.cart().await;
        info!(
            user_id = %self.user_id,
            products = products.len(),
            cart_items = cart.as_ref().map_or(0, |cart| cart.items.len()),
            "storefront mounted"
        );
        (products, cart)
    }

    pub async fn load_products(&self) -> Vec<Product> {
        let products = match self.api.list_products().await {
            Ok(products) if !products.is_empty() => products,
            Ok(_) => {
                info!("product service returned an empty catalog; using demo products");
                demo_products()
            }
            Err(err) => {
                warn!("error fetching products, using demo products: {err}");
                demo_products()
            }
        };

        self.state.write().await.products = products.clone();
        let _ = self.events.send(SyncEvent::ProductsUpdated(products.clone()));
        products
    }

    /// Returns the cart this fetch applied. `None` means the fetch failed or
    /// was overtaken by a newer one; either way the previously applied cart
    /// stays in place.
    pub async fn load_cart(&self) -> Option<Cart> {
        let ticket = self.next_cart_ticket();
        match self.api.fetch_cart(&self.user_id).await {
            Ok(cart) => self
                .apply_cart(ticket, cart.clone())
                .await
                .then_some(cart),
            Err(err) if err.is_not_found() => {
                debug!(user_id = %self.user_id, "no cart on the service yet");
                None
            }
            Err(err) => {
                warn!(user_id = %self.user_id, "error fetching cart: {err}");
                None
            }
        }
    }

    pub async fn add_item(&self, product_id: &ProductId, quantity: u32) {
        let request = AddToCartRequest {
            user_id: self.user_id.clone(),
            product_id: product_id.clone(),
            quantity,
        };
        self.mutate("add_item", self.api.add_to_cart(&request)).await;
    }

    /// A quantity of zero asks the service to drop the line.
    pub async fn set_quantity(&self, product_id: &ProductId, quantity: u32) {
        let request = UpdateCartItemRequest {
            product_id: product_id.clone(),
            quantity,
        };
        self.mutate(
            "set_quantity",
            self.api.update_cart_item(&self.user_id, &request),
        )
        .await;
    }

    pub async fn remove_item(&self, product_id: &ProductId) {
        self.mutate(
            "remove_item",
            self.api.remove_cart_item(&self.user_id, product_id),
        )
        .await;
    }

    pub async fn clear_cart(&self) {
        self.mutate("clear_cart", self.api.clear_cart(&self.user_id)).await;
    }

    pub async fn health(&self) -> bool {
        match self.api.health().await {
            Ok(response) => response.is_ok(),
            Err(err) => {
                warn!("health check failed: {err}");
                false
            }
        }
    }

    /// Runs one mutation and its resync while holding the mutation lock.
    /// The resync happens whether or not the mutation succeeded.
    async fn mutate<F>(&self, operation: &'static str, request: F)
    where
        F: Future<Output = Result<(), ClientError>>,
    {
        let _serialized = self.mutations.lock().await;
        match request.await {
            Ok(()) => debug!(operation, user_id = %self.user_id, "cart mutation accepted"),
            Err(err) => warn!(operation, user_id = %self.user_id, "cart mutation failed: {err}"),
        }
        self.load_cart().await;
    }

    fn next_cart_ticket(&self) -> u64 {
        self.cart_tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publishes while the write guard is held so subscribers see carts in
    /// the same order they were applied.
    async fn apply_cart(&self, ticket: u64, cart: Cart) -> bool {
        let mut guard = self.state.write().await;
        if ticket <= guard.applied_cart_ticket {
            debug!(
                ticket,
                applied = guard.applied_cart_ticket,
                "discarding stale cart response"
            );
            return false;
        }
        guard.applied_cart_ticket = ticket;
        guard.cart = Some(cart.clone());
        let _ = self.events.send(SyncEvent::CartUpdated(cart));
        true
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
