//! In-process cart service used by the HTTP-backed tests.

use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use shared::{
    domain::{Cart, CartItem, Product, UserId},
    protocol::{AddToCartRequest, UpdateCartItemRequest},
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Default)]
pub(crate) struct MockCartState {
    pub(crate) products: Vec<Product>,
    pub(crate) products_unavailable: bool,
    pub(crate) carts_unavailable: bool,
    pub(crate) carts: HashMap<String, Cart>,
    /// Reported instead of the computed total when set.
    pub(crate) total_override: Option<f64>,
    pub(crate) hits: Vec<String>,
}

#[derive(Clone, Default)]
pub(crate) struct MockCartService {
    pub(crate) inner: Arc<Mutex<MockCartState>>,
}

impl MockCartService {
    pub(crate) fn with_products(products: Vec<Product>) -> Self {
        let service = Self::default();
        service
            .inner
            .try_lock()
            .expect("fresh mock state")
            .products = products;
        service
    }

    pub(crate) async fn hits(&self) -> Vec<String> {
        self.inner.lock().await.hits.clone()
    }
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}

fn recompute_total(cart: &mut Cart, total_override: Option<f64>) {
    cart.total = total_override.unwrap_or_else(|| {
        cart.items
            .iter()
            .map(|item| item.price * f64::from(item.quantity))
            .sum()
    });
}

async fn list_products(State(service): State<MockCartService>) -> Response {
    let mut guard = service.inner.lock().await;
    guard.hits.push("GET /products".into());
    if guard.products_unavailable {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Error fetching products" })),
        )
            .into_response();
    }
    Json(guard.products.clone()).into_response()
}

async fn add_to_cart(
    State(service): State<MockCartService>,
    Json(input): Json<AddToCartRequest>,
) -> Response {
    let mut guard = service.inner.lock().await;
    guard.hits.push("POST /cart".into());
    let Some(product) = guard
        .products
        .iter()
        .find(|product| product.id == input.product_id)
        .cloned()
    else {
        return not_found("Product not found");
    };

    let total_override = guard.total_override;
    let cart = guard
        .carts
        .entry(input.user_id.0.clone())
        .or_insert_with(|| Cart {
            user_id: input.user_id.clone(),
            items: Vec::new(),
            total: 0.0,
        });
    match cart
        .items
        .iter()
        .position(|item| item.product_id == input.product_id)
    {
        Some(index) => cart.items[index].quantity += input.quantity,
        None => cart.items.push(CartItem {
            product_id: product.id,
            name: product.name,
            price: product.price,
            quantity: input.quantity,
        }),
    }
    recompute_total(cart, total_override);
    Json(cart.clone()).into_response()
}

async fn get_cart(
    State(service): State<MockCartService>,
    Path(user_id): Path<String>,
) -> Response {
    let mut guard = service.inner.lock().await;
    guard.hits.push(format!("GET /cart/{user_id}"));
    if guard.carts_unavailable {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch cart" })),
        )
            .into_response();
    }
    match guard.carts.get(&user_id) {
        Some(cart) => Json(cart.clone()).into_response(),
        None => not_found("Cart not found"),
    }
}

async fn update_cart_item(
    State(service): State<MockCartService>,
    Path(user_id): Path<String>,
    Json(input): Json<UpdateCartItemRequest>,
) -> Response {
    let mut guard = service.inner.lock().await;
    guard.hits.push(format!("PUT /cart/{user_id}"));
    let total_override = guard.total_override;
    let Some(cart) = guard.carts.get_mut(&user_id) else {
        return not_found("Cart not found");
    };
    let Some(index) = cart
        .items
        .iter()
        .position(|item| item.product_id == input.product_id)
    else {
        return not_found("Product not found in cart");
    };
    if input.quantity == 0 {
        cart.items.remove(index);
    } else {
        cart.items[index].quantity = input.quantity;
    }
    recompute_total(cart, total_override);
    Json(cart.clone()).into_response()
}

async fn clear_cart(
    State(service): State<MockCartService>,
    Path(user_id): Path<String>,
) -> Response {
    let mut guard = service.inner.lock().await;
    guard.hits.push(format!("DELETE /cart/{user_id}"));
    let Some(cart) = guard.carts.get_mut(&user_id) else {
        return not_found("Cart not found");
    };
    cart.items.clear();
    cart.total = 0.0;
    Json(json!({ "message": "Cart cleared successfully" })).into_response()
}

async fn remove_cart_item(
    State(service): State<MockCartService>,
    Path((user_id, product_id)): Path<(String, String)>,
) -> Response {
    let mut guard = service.inner.lock().await;
    guard.hits.push(format!("DELETE /cart/{user_id}/{product_id}"));
    let total_override = guard.total_override;
    let Some(cart) = guard.carts.get_mut(&user_id) else {
        return not_found("Cart not found");
    };
    let before = cart.items.len();
    cart.items.retain(|item| item.product_id.0 != product_id);
    if cart.items.len() == before {
        return not_found("Product not found in cart");
    }
    recompute_total(cart, total_override);
    Json(cart.clone()).into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Serves the mock on an ephemeral port and returns the `/api/v1` base url.
pub(crate) async fn spawn_cart_server(service: MockCartService) -> Result<String> {
    let api = Router::new()
        .route("/products", get(list_products))
        .route("/cart", axum::routing::post(add_to_cart))
        .route(
            "/cart/:user_id",
            get(get_cart).put(update_cart_item).delete(clear_cart),
        )
        .route(
            "/cart/:user_id/:product_id",
            axum::routing::delete(remove_cart_item),
        );
    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .with_state(service);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}/api/v1"))
}

/// A base url whose port was just released, so connections are refused.
pub(crate) async fn unreachable_base_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}/api/v1"))
}

pub(crate) fn user123() -> UserId {
    UserId::new("user123")
}
