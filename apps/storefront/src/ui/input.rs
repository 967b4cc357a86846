use shared::domain::ProductId;

use client_core::DEFAULT_ADD_QUANTITY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Add { product_id: ProductId, quantity: u32 },
    Increment(ProductId),
    Decrement(ProductId),
    /// Sets the quantity to zero.
    Remove(ProductId),
    /// Deletes the line through the dedicated endpoint.
    Drop(ProductId),
    Clear,
    Refresh,
    Health,
    Help,
    Quit,
}

pub const HELP: &str = "Commands: add <id> [qty] | inc <id> | dec <id> | rm <id> | drop <id> | clear | refresh | health | help | quit";

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_intent(line: &str) -> Result<Option<Intent>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let intent = match verb.to_ascii_lowercase().as_str() {
        "add" | "a" => {
            let product_id = product_arg(verb, &args)?;
            let quantity = match args.get(1) {
                Some(raw) => raw
                    .parse::<u32>()
                    .ok()
                    .filter(|quantity| *quantity > 0)
                    .ok_or_else(|| format!("Invalid quantity '{raw}'"))?,
                None => DEFAULT_ADD_QUANTITY,
            };
            Intent::Add {
                product_id,
                quantity,
            }
        }
        "inc" | "+" => Intent::Increment(product_arg(verb, &args)?),
        "dec" | "-" => Intent::Decrement(product_arg(verb, &args)?),
        "rm" | "x" => Intent::Remove(product_arg(verb, &args)?),
        "drop" => Intent::Drop(product_arg(verb, &args)?),
        "clear" => Intent::Clear,
        "refresh" | "r" => Intent::Refresh,
        "health" => Intent::Health,
        "help" | "?" => Intent::Help,
        "quit" | "q" | "exit" => Intent::Quit,
        other => return Err(format!("Unknown command '{other}'. Type 'help' for commands.")),
    };
    Ok(Some(intent))
}

fn product_arg(verb: &str, args: &[&str]) -> Result<ProductId, String> {
    args.first()
        .map(|raw| ProductId::new(*raw))
        .ok_or_else(|| format!("'{verb}' needs a product id"))
}

#[cfg(test)]
#[path = "../tests/input_tests.rs"]
mod tests;
