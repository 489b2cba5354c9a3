//! Text codec for the shopping list note.
//!
//! The list lives inside an ordinary note as plain text, one `- ` line per
//! item, with completed items wrapped in tildes (`- ~Milk~`). Parsing is
//! lossy: lines that do not look like items are dropped and regenerated
//! content is always canonical.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub text: String,
    pub is_completed: bool,
}

/// Parse note content into shopping items. Non-item lines are ignored.
pub fn parse_items(content: &str) -> Vec<ShoppingItem> {
    let mut items = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if !trimmed.starts_with('-') {
            continue;
        }

        let item_text = trimmed[1..].trim();

        // A lone tilde is an open item, not an empty completed one
        let is_completed =
            item_text.len() >= 2 && item_text.starts_with('~') && item_text.ends_with('~');

        let text = if is_completed {
            item_text[1..item_text.len() - 1].trim().to_string()
        } else {
            item_text.to_string()
        };

        items.push(ShoppingItem {
            text,
            is_completed,
        });
    }

    items
}

/// Render items back to note content. No trailing newline.
pub fn generate_content(items: &[ShoppingItem]) -> String {
    items
        .iter()
        .map(|item| {
            if item.is_completed {
                format!("- ~{}~", item.text)
            } else {
                format!("- {}", item.text)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
