use clap::Parser;
use shop_cart::app::service::{
    AddItemRequest, CartApi, CartResponse, SyncRequest, UpdateItemRequest,
};
use shop_cart::config::cli::CartCommand;
use shop_cart::domain::ports::ConfigProvider;
use shop_cart::utils::error::ErrorSeverity;
use shop_cart::utils::{logger, validation::Validate};
use shop_cart::{CartService, CliConfig, HttpCatalog, JsonCartStore, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting shop-cart CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let result = match &config.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let file_config = match TomlConfig::from_file(path) {
                Ok(file_config) => file_config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };

            // 驗證配置
            if let Err(e) = file_config.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }

            run(&file_config, &config).await
        }
        None => {
            if let Err(e) = config.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }

            run(&config, &config).await
        }
    };

    match result {
        Ok(response) => {
            tracing::info!("✅ Cart operation completed");
            print_cart(&response);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Cart operation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run<P: ConfigProvider>(
    provider: &P,
    args: &CliConfig,
) -> shop_cart::Result<CartResponse> {
    // 建立目錄與儲存適配器，再組裝服務
    let catalog = HttpCatalog::from_config(provider);
    let repo = JsonCartStore::new(provider.storage_path());
    let service = CartService::new(catalog, repo);
    let user = args.user.as_str();

    match &args.command {
        CartCommand::Show => service.get_cart(user).await,
        CartCommand::Add {
            product_id,
            qty,
            size,
        } => {
            service
                .add_item(
                    user,
                    AddItemRequest {
                        product_id: product_id.clone(),
                        quantity: *qty,
                        size: size.clone(),
                    },
                )
                .await
        }
        CartCommand::Update {
            product_id,
            qty,
            size,
        } => {
            service
                .update_item(
                    user,
                    product_id,
                    UpdateItemRequest {
                        quantity: *qty,
                        size: size.clone(),
                    },
                )
                .await
        }
        CartCommand::Remove { product_id, size } => {
            service.remove_item(user, product_id, size.as_deref()).await
        }
        CartCommand::Clear => service.clear_cart(user).await,
        CartCommand::Sync { file } => {
            tracing::info!("🔄 Reconciling snapshot from: {}", file);
            let content = std::fs::read_to_string(file)?;
            let cart_items = serde_json::from_str(&content)?;
            service.sync_cart(user, SyncRequest { cart_items }).await
        }
    }
}

fn print_cart(response: &CartResponse) {
    if response.cart_items.is_empty() {
        println!("🛒 Cart is empty");
    } else {
        println!("🛒 Cart contents:");
        for item in &response.cart_items {
            let size = item
                .size
                .as_deref()
                .map(|s| format!(" [{}]", s))
                .unwrap_or_default();
            match &item.detail {
                Some(detail) => println!(
                    "  - {}{} x{} @ {:.2} (available: {})",
                    detail.name, size, item.quantity, detail.price, item.available
                ),
                None => println!(
                    "  - {}{} x{} (no longer in catalog)",
                    item.product_id, size, item.quantity
                ),
            }
        }
    }

    if let Some(notices) = &response.validation_messages {
        println!("⚠️  Adjustments made during sync:");
        for notice in notices {
            println!("  - {}", notice.message());
        }
    }
}
