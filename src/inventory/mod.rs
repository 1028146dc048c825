//! Inventory service client

mod gateway;

pub use gateway::{InventoryConfig, InventoryGateway};
