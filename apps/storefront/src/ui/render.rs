//! Plain-text rendering of the storefront. Everything shown is derived from
//! [`ViewState`]; amounts come straight from the fetched data.

use std::fmt::Write as _;

use shared::domain::{Cart, Product};

use crate::controller::reducer::{ViewPhase, ViewState};

const STORE_TITLE: &str = "Tech Store 🛍️";
const RULE: &str = "------------------------------------------------------------";

pub fn render(state: &ViewState) -> String {
    let mut out = String::new();
    match state.phase {
        ViewPhase::Loading => {
            out.push_str("Loading storefront...\n");
        }
        ViewPhase::Ready => {
            render_header(&mut out, state.cart_badge());
            render_catalog(&mut out, &state.products);
            render_cart(&mut out, state.cart.as_ref());
        }
    }
    if !state.status.is_empty() {
        let _ = writeln!(out, "> {}", state.status);
    }
    out
}

fn render_header(out: &mut String, badge: usize) {
    if badge > 0 {
        let _ = writeln!(out, "{STORE_TITLE}    🛒 ({badge})");
    } else {
        let _ = writeln!(out, "{STORE_TITLE}    🛒");
    }
    let _ = writeln!(out, "{RULE}");
}

pub fn render_catalog(out: &mut String, products: &[Product]) {
    for product in products {
        let _ = writeln!(
            out,
            "[{id}] {emoji}  {name}",
            id = product.id,
            emoji = product.display_emoji(),
            name = product.name
        );
        let _ = writeln!(
            out,
            "     ${:.2}    Stock: {}    Add to Cart: add {}",
            product.price, product.stock, product.id
        );
    }
    let _ = writeln!(out, "{RULE}");
}

pub fn render_cart(out: &mut String, cart: Option<&Cart>) {
    let _ = writeln!(out, "Shopping Cart");
    let Some(cart) = cart.filter(|cart| !cart.is_empty()) else {
        let _ = writeln!(out, "  🛒 Your cart is empty");
        let _ = writeln!(out, "  Add some products to your cart");
        return;
    };

    for item in &cart.items {
        let _ = writeln!(
            out,
            "  {name}  ${price:.2} each   [-] {quantity} [+] [x]   Subtotal: ${subtotal:.2}",
            name = item.name,
            price = item.price,
            quantity = item.quantity,
            subtotal = item.line_subtotal()
        );
        let _ = writeln!(
            out,
            "    dec {id} | inc {id} | rm {id}",
            id = item.product_id
        );
    }
    let _ = writeln!(out, "  Total: ${:.2}", cart.total);
}

#[cfg(test)]
#[path = "../tests/render_tests.rs"]
mod tests;
