pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{HttpCatalog, JsonCartStore};
pub use app::{CartApi, CartService};
pub use crate::core::store::CartStore;
pub use utils::error::{CartError, Result};
