pub mod health;
pub mod notes;
pub mod shopping_list;
pub mod uploads;
