//! Ordering handlers.

mod move_item;

pub use move_item::{MoveItemCommand, MoveItemHandler};
