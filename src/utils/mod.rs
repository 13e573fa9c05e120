//! Shared utilities: flag column parsing, inventory validation.

pub mod flag;
pub mod validation;

pub use flag::parse_flag;
pub use validation::{validate_inventory, InventoryReport};
