//! ClosetSwap CLI and marketplace binary
//!
//! Commands for initializing and validating configuration, browsing and
//! listing on the demo catalog, and running the marketplace's background
//! expiry sweep.

mod app;
mod shutdown;
mod sweeper;

use anyhow::{Context, Result};
use app::App;
use assistant::CandidateProduct;
use catalog::{BrowseQuery, NewListing};
use cli::{BrowseArgs, Cli, Commands, ListArgs};
use common::{Product, SystemTimeProvider, TimeProvider};
use config::{
    generate_default_config, load_config, save_config, validate_config, MarketplaceConfig,
};
use observability::{init_logging, init_metrics, LogFormat, MarketplaceMetrics};
use ranking::{BrowseFilter, SortMode};
use shutdown::ShutdownController;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use sweeper::ExpirySweeper;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Run { config } => {
            let config = load_and_init(&config)?;
            info!("Executing 'run' command");
            run_command(config).await
        }
        Commands::Browse(args) => {
            let config = load_and_init(&args.config)?;
            info!("Executing 'browse' command");
            browse_command(config, args).await
        }
        Commands::List(args) => {
            let config = load_and_init(&args.config)?;
            info!("Executing 'list' command");
            list_command(config, args).await
        }
        Commands::Validate { config } => {
            init_logging("closetswap", LogFormat::Pretty)?;
            info!("Executing 'validate' command");
            validate_command(config).await
        }
        Commands::Init { output } => {
            init_logging("closetswap", LogFormat::Pretty)?;
            info!("Executing 'init' command");
            init_command(output).await
        }
    }
}

/// Load configuration, refuse invalid files, then install logging in the
/// configured format
fn load_and_init(path: &Path) -> Result<MarketplaceConfig> {
    let config = load_config(path)?;
    let format = LogFormat::parse(&config.logging.format).unwrap_or_default();
    init_logging("closetswap", format)?;

    let report = validate_config(&config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }
    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("Cannot start marketplace due to configuration errors");
    }

    debug!(path = ?path, "Configuration ready");
    Ok(config)
}

fn metrics_for(config: &MarketplaceConfig) -> Result<MarketplaceMetrics> {
    if let Some(port) = config.monitoring.metrics_port {
        init_metrics(port)?;
    }
    Ok(MarketplaceMetrics::new())
}

async fn run_command(config: MarketplaceConfig) -> Result<()> {
    let metrics = metrics_for(&config)?;
    let clock: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider::new());
    let app = App::demo(&config, clock, metrics).await?;

    let shutdown = ShutdownController::with_ctrl_c();
    let interval = Duration::from_secs(config.listings.expiry_sweep_interval_seconds());
    let sweeper = tokio::spawn(
        ExpirySweeper::new(app.service.clone(), interval).run(shutdown.child_token()),
    );

    info!(
        marketplace = %config.marketplace.name,
        version = %config.marketplace.version,
        "Marketplace running, press Ctrl+C to stop"
    );
    shutdown.wait_for_shutdown().await;

    let expired = sweeper.await.context("Expiry sweeper panicked")?;
    info!(expired, "Marketplace stopped");
    Ok(())
}

async fn browse_command(config: MarketplaceConfig, args: BrowseArgs) -> Result<()> {
    let metrics = metrics_for(&config)?;
    let clock: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider::new());
    let app = App::demo(&config, clock, metrics).await?;

    let viewer = match &args.viewer {
        Some(email) => Some(
            app.service
                .store()
                .user_by_email(email)
                .with_context(|| format!("No account with email {}", email))?,
        ),
        None => None,
    };
    let viewer_id = viewer.as_ref().map(|u| u.id);

    let mut filter = BrowseFilter::new().price_range(args.min_price, args.max_price);
    if let Some(category) = &args.category {
        filter = filter.category(category.clone());
    }
    if let Some(condition) = &args.condition {
        filter = filter.condition(condition.parse()?);
    }

    let search_ids = match &args.search {
        Some(text) => {
            let candidates: Vec<CandidateProduct> = app
                .service
                .searchable_products(viewer_id.as_ref())?
                .iter()
                .map(CandidateProduct::from)
                .collect();
            let result = app.assistant.search_catalog(text, &candidates).await;
            if let Some(id) = viewer_id {
                app.preferences.record_search(id, text).await?;
            }
            println!("{}", result.summary);
            println!();
            Some(result.matched_ids)
        }
        None => None,
    };

    let query = BrowseQuery {
        sort: args.sort.as_str().parse::<SortMode>()?,
        filter,
        search_ids,
    };
    let counts = app.preferences.wishlist_counts().await?;
    let listings = app.service.browse(viewer_id.as_ref(), &query, counts)?;

    match &viewer {
        Some(user) => println!("Browsing as {} ({})", user.name, user.email),
        None => println!("Browsing anonymously"),
    }
    println!("Sort: {}  Results: {}", query.sort, listings.len());
    println!();
    for product in &listings {
        print_listing(product);
    }

    Ok(())
}

async fn list_command(config: MarketplaceConfig, args: ListArgs) -> Result<()> {
    let metrics = metrics_for(&config)?;
    let clock: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider::new());
    let app = App::demo(&config, clock, metrics).await?;

    let seller = app
        .service
        .store()
        .user_by_email(&args.seller)
        .with_context(|| format!("No account with email {}", args.seller))?;
    let description = args.description.unwrap_or_default();
    let shipping_cost = match args.shipping {
        Some(cost) => cost,
        None => {
            app.assistant
                .suggest_shipping_cost(&args.title, &args.category, &description)
                .await
        }
    };

    let listing = NewListing {
        title: args.title,
        description,
        price: args.price,
        reserve_price: args.reserve,
        image_url: args.image,
        category: args.category,
        condition: args.condition.parse()?,
        shipping_cost,
        is_nsfw: args.nsfw,
        documented_damage: Vec::new(),
        duration_days: args.days,
    };
    let product = app.create_listing(&seller.id, listing).await?;

    println!("Listed by {} ({})", seller.name, seller.email);
    print_listing(&product);
    if product.reported_nsfw {
        println!();
        println!("Flagged as mature content and queued for moderator review");
    }
    println!("Expires: {}", product.expires_at.format("%Y-%m-%d %H:%M UTC"));

    Ok(())
}

fn print_listing(product: &Product) {
    let reserve = product
        .reserve_price
        .map(|r| format!("  reserve ${:.2}", r))
        .unwrap_or_default();
    println!(
        "  ${:>8.2}  {:<28} {:<12} {:<14} +${:.2} shipping{}",
        product.price,
        product.title,
        product.category,
        product.condition,
        product.shipping_cost,
        reserve
    );
}

async fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Marketplace: {}", config.marketplace.name);
    println!("Version: {}", config.marketplace.version);
    println!(
        "Fee rate: {:.0}%  Bid increment: ${:.2}",
        config.fees.rate * 100.0,
        config.auction.bid_increment
    );
    println!("Categories: {}", config.listings.categories.join(", "));
    println!(
        "Assistant: {}",
        config
            .assistant
            .as_ref()
            .map(|a| a.endpoint.as_str())
            .unwrap_or("disabled")
    );

    Ok(())
}

async fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Edit admin_emails and the listing categories");
    println!("  2. Add an assistant endpoint to enable search and listing help");
    println!(
        "  3. Run 'closetswap validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  4. Run 'closetswap browse --config {:?}' to browse the demo catalog",
        output_path
    );

    Ok(())
}
