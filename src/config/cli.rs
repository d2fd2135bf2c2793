use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use clap::{Parser, Subcommand};
use std::collections::HashMap;

#[derive(Debug, Clone, Parser)]
#[command(name = "shop-cart")]
#[command(about = "A small cart tool with inventory-aware validation")]
pub struct CliConfig {
    /// Product catalog base URL; products are fetched as {endpoint}/{id}
    #[arg(long, default_value = "http://localhost:4000/api/products")]
    pub catalog_endpoint: String,

    #[arg(long, default_value = "./carts")]
    pub storage_path: String,

    #[arg(long, default_value = "10")]
    pub timeout_seconds: u64,

    /// User whose cart is operated on
    #[arg(long)]
    pub user: String,

    /// Optional TOML config file; its settings replace the flags above
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CartCommand {
    /// Show the current hydrated cart
    Show,
    /// Add a quantity of a product (optionally a specific size)
    Add {
        product_id: String,
        #[arg(long, default_value = "1")]
        qty: i64,
        #[arg(long)]
        size: Option<String>,
    },
    /// Set an existing line to an absolute quantity
    Update {
        product_id: String,
        #[arg(long)]
        qty: i64,
        #[arg(long)]
        size: Option<String>,
    },
    /// Remove one line by exact (product, size) identity
    Remove {
        product_id: String,
        #[arg(long)]
        size: Option<String>,
    },
    /// Empty the cart
    Clear,
    /// Reconcile a saved client snapshot (JSON file) against live stock
    Sync {
        #[arg(long)]
        file: String,
    },
}

impl ConfigProvider for CliConfig {
    fn catalog_endpoint(&self) -> &str {
        &self.catalog_endpoint
    }

    fn storage_path(&self) -> &str {
        &self.storage_path
    }

    fn request_timeout_secs(&self) -> u64 {
        self.timeout_seconds
    }

    fn catalog_headers(&self) -> Option<&HashMap<String, String>> {
        None
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("catalog_endpoint", &self.catalog_endpoint)?;
        validate_path("storage_path", &self.storage_path)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        validate_non_empty_string("user", &self.user)?;
        Ok(())
    }
}
