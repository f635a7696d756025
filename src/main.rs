use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};

use storefront_composer::app::load_use_case::LoadWorkflow;
use storefront_composer::app::ports::{InventoryGateway, StoreProfileGateway};
use storefront_composer::app::publish_use_case::PublishWorkflow;
use storefront_composer::catalog::module_registry::ModuleRegistry;
use storefront_composer::catalog::theme_catalog::ThemeCatalog;
use storefront_composer::composer::preview::{self, DeviceMode, PreviewMode};
use storefront_composer::config::Config;
use storefront_composer::domain::profile::InventoryFilter;
use storefront_composer::infra::http_gateway::StorefrontApi;
use storefront_composer::logging::init_logging;

#[derive(Parser)]
#[command(name = "storefront-composer")]
#[command(about = "Storefront module composition and publishing engine")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in module templates and themes
    Catalog,
    /// Load a store's customization and print its render plan
    Preview {
        #[arg(long)]
        store_id: i64,
        /// Device mode: desktop, tablet or mobile
        #[arg(long, default_value = "desktop")]
        device: String,
    },
    /// Persist the current draft for a store
    Save {
        #[arg(long)]
        store_id: i64,
    },
    /// Validate, save and publish a store's draft
    Publish {
        #[arg(long)]
        store_id: i64,
    },
}

fn parse_device(device: &str) -> DeviceMode {
    match device {
        "mobile" => DeviceMode::Mobile,
        "tablet" => DeviceMode::Tablet,
        _ => DeviceMode::Desktop,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let registry = Arc::new(ModuleRegistry::builtin());
    let themes = Arc::new(ThemeCatalog::builtin());

    match cli.command {
        Commands::Catalog => {
            println!("📦 Module templates:");
            for template in registry.templates() {
                let premium = if template.premium { " (premium)" } else { "" };
                println!(
                    "   {:<20} {}{}",
                    template.module_type, template.name, premium
                );
            }
            println!("\n🎨 Themes:");
            for theme in themes.themes() {
                let premium = if theme.premium { " (premium)" } else { "" };
                println!("   {:<20} {} [{}]{}", theme.id, theme.name, theme.category, premium);
            }
        }
        Commands::Preview { store_id, device } => {
            let api = build_api()?;
            let session = LoadWorkflow::new(&api, &api)
                .load(store_id, registry, themes.clone())
                .await?;
            let mode = PreviewMode {
                device: parse_device(&device),
                is_live_preview: true,
            };
            let plan = preview::render(session.document(), &themes, &mode);
            if plan.sections.iter().any(|s| s.uses_live_inventory) {
                let filter = InventoryFilter {
                    store_id,
                    limit: Some(8),
                    category: None,
                };
                match api.items(&filter).await {
                    Ok(items) => {
                        println!("🛒 {} live inventory items feed the featured sections", items.len())
                    }
                    Err(e) => println!("⚠️  Inventory feed unavailable: {}", e),
                }
            }
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Commands::Save { store_id } => {
            let api = build_api()?;
            let mut session = LoadWorkflow::new(&api, &api)
                .load(store_id, registry, themes)
                .await?;
            let workflow = PublishWorkflow::new(&api);
            match workflow.save_draft(&mut session).await {
                Ok(outcome) => {
                    info!("save finished");
                    println!("💾 Save result: {:?}", outcome);
                }
                Err(e) => {
                    error!("save failed: {}", e);
                    println!("⚠️  Save failed: {} (draft kept in memory)", e);
                }
            }
        }
        Commands::Publish { store_id } => {
            let api = build_api()?;
            let mut session = LoadWorkflow::new(&api, &api)
                .load(store_id, registry, themes)
                .await?;
            let seed_name = match api.comprehensive_details(store_id).await {
                Ok(profile) => profile.name,
                Err(_) => format!("store-{store_id}"),
            };
            let workflow = PublishWorkflow::new(&api);
            match workflow.publish(&mut session, &seed_name).await {
                Ok(outcome) => {
                    info!("publish finished");
                    println!("\n🚀 Published storefront:");
                    println!("   URL:     {}", outcome.public_url);
                    println!("   Slug:    {}", outcome.slug);
                    println!("   Version: {}", outcome.publish_version);
                }
                Err(e) => {
                    error!("publish failed: {}", e);
                    println!("⚠️  Publish failed: {} (draft preserved)", e);
                }
            }
        }
    }

    Ok(())
}

fn build_api() -> Result<StorefrontApi, Box<dyn std::error::Error>> {
    let config = Config::load_with_env()?;
    Ok(StorefrontApi::new(
        &config.api.base_url,
        config.api.timeout_seconds,
    )?)
}
