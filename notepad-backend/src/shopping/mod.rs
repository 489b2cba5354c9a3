pub mod codec;
pub mod list;

pub use codec::{generate_content, parse_items, ShoppingItem};
pub use list::{ShoppingList, SHOPPING_LIST_TAG, SHOPPING_LIST_TITLE};
