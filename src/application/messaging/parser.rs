//! Parsing of callback data and slash commands into structured intents

use crate::domain::entities::{Intent, ProductId};

/// Parse inline-keyboard callback data into an intent.
/// Returns `None` for unrecognized or malformed data (stale keyboards,
/// hand-crafted queries) so the dispatcher can drop it quietly.
pub fn parse_callback(data: &str) -> Option<Intent> {
    match data {
        "menu:main" => return Some(Intent::ViewCatalog),
        "cart:view" => return Some(Intent::ViewCart),
        "cart:clear" => return Some(Intent::ClearCart),
        "cart:checkout" => return Some(Intent::Checkout),
        "noop" => return Some(Intent::Noop),
        _ => {}
    }

    if let Some(id) = strip_id(data, "flavor:") {
        return Some(Intent::ViewProduct(id));
    }
    if let Some(id) = strip_id(data, "cart:add:") {
        return Some(Intent::AddToCart(id));
    }
    if let Some(id) = strip_id(data, "cart:inc:") {
        return Some(Intent::IncrementCartLine(id));
    }
    if let Some(id) = strip_id(data, "cart:dec:") {
        return Some(Intent::DecrementCartLine(id));
    }

    None
}

fn strip_id(data: &str, prefix: &str) -> Option<ProductId> {
    data.strip_prefix(prefix)?.parse().ok()
}

/// A parsed slash command: lowercase name and whitespace-split args
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

/// Parse a `/command arg1 arg2` message. The `@botname` suffix Telegram
/// appends in group chats is stripped from the command name.
pub fn parse_command(text: &str) -> Option<ParsedCommand> {
    let text = text.trim();
    let rest = text.strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let raw_name = parts.next()?;
    if raw_name.is_empty() {
        return None;
    }
    let name = raw_name
        .split('@')
        .next()
        .unwrap_or(raw_name)
        .to_lowercase();

    Some(ParsedCommand {
        name,
        args: parts.map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_menu_and_cart_callbacks() {
        assert_eq!(parse_callback("menu:main"), Some(Intent::ViewCatalog));
        assert_eq!(parse_callback("cart:view"), Some(Intent::ViewCart));
        assert_eq!(parse_callback("cart:clear"), Some(Intent::ClearCart));
        assert_eq!(parse_callback("cart:checkout"), Some(Intent::Checkout));
        assert_eq!(parse_callback("noop"), Some(Intent::Noop));
    }

    #[test]
    fn parses_product_callbacks() {
        assert_eq!(parse_callback("flavor:7"), Some(Intent::ViewProduct(7)));
        assert_eq!(parse_callback("cart:add:3"), Some(Intent::AddToCart(3)));
        assert_eq!(
            parse_callback("cart:inc:21"),
            Some(Intent::IncrementCartLine(21))
        );
        assert_eq!(
            parse_callback("cart:dec:1"),
            Some(Intent::DecrementCartLine(1))
        );
    }

    #[test]
    fn rejects_malformed_callbacks() {
        assert_eq!(parse_callback(""), None);
        assert_eq!(parse_callback("flavor:"), None);
        assert_eq!(parse_callback("flavor:abc"), None);
        assert_eq!(parse_callback("cart:add:-1"), None);
        assert_eq!(parse_callback("something:else"), None);
    }

    #[test]
    fn parses_commands_with_args() {
        let cmd = parse_command("/setstock 3 10").unwrap();
        assert_eq!(cmd.name, "setstock");
        assert_eq!(cmd.args, vec!["3", "10"]);
    }

    #[test]
    fn strips_bot_mention_from_command() {
        let cmd = parse_command("/stock@chaser_shop_bot").unwrap();
        assert_eq!(cmd.name, "stock");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn non_commands_are_ignored() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command("   "), None);
    }
}
