use shared::domain::{Product, ProductId};

/// Fallback catalog shown whenever the product service is unreachable or empty.
pub fn demo_products() -> Vec<Product> {
    [
        ("1", "Gaming Laptop", 1299.99, 10, "💻"),
        ("2", "Wireless Headphones", 199.99, 15, "🎧"),
        ("3", "Smartphone", 899.99, 8, "📱"),
        ("4", "Smart Watch", 299.99, 12, "⌚"),
        ("5", "Tablet", 499.99, 6, "📱"),
        ("6", "Wireless Mouse", 49.99, 20, "🖱️"),
    ]
    .into_iter()
    .map(|(id, name, price, stock, emoji)| Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price,
        stock,
        emoji: emoji.to_string(),
    })
    .collect()
}
