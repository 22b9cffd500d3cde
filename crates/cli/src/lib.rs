use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "closetswap")]
#[command(about = "ClosetSwap - a second-hand clothing marketplace")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the marketplace with the demo catalog until Ctrl+C
    Run {
        /// Path to the configuration file
        #[arg(short, long, default_value = "closetswap.yaml", env = "CLOSETSWAP_CONFIG")]
        config: PathBuf,
    },

    /// Browse the demo catalog as a given viewer
    Browse(BrowseArgs),

    /// List an item for sale after the assistant's content screen
    List(ListArgs),

    /// Validate configuration without starting the marketplace
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = "closetswap.yaml", env = "CLOSETSWAP_CONFIG")]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "closetswap.yaml")]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Path to the configuration file
    #[arg(short, long, default_value = "closetswap.yaml", env = "CLOSETSWAP_CONFIG")]
    pub config: PathBuf,

    /// Email of the viewing account; anonymous when omitted
    #[arg(long)]
    pub viewer: Option<String>,

    #[arg(short, long, value_enum, default_value = "recommended")]
    pub sort: SortArg,

    /// Natural-language search handled by the assistant
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// new-with-tags, like-new, good or fair
    #[arg(long)]
    pub condition: Option<String>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Path to the configuration file
    #[arg(short, long, default_value = "closetswap.yaml", env = "CLOSETSWAP_CONFIG")]
    pub config: PathBuf,

    /// Email of the selling account
    #[arg(long)]
    pub seller: String,

    #[arg(long)]
    pub title: String,

    /// Drafted by the assistant when omitted
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub price: f64,

    #[arg(long)]
    pub reserve: Option<f64>,

    #[arg(long)]
    pub category: String,

    /// new-with-tags, like-new, good or fair
    #[arg(long, default_value = "good")]
    pub condition: String,

    /// Suggested by the assistant when omitted
    #[arg(long)]
    pub shipping: Option<f64>,

    /// Declare the item as mature content
    #[arg(long)]
    pub nsfw: bool,

    #[arg(long)]
    pub image: Option<String>,

    /// Listing duration; the configured default when omitted
    #[arg(long)]
    pub days: Option<u32>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortArg {
    Newest,
    PriceAsc,
    PriceDesc,
    Relevance,
    Recommended,
}

impl SortArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortArg::Newest => "newest",
            SortArg::PriceAsc => "price-asc",
            SortArg::PriceDesc => "price-desc",
            SortArg::Relevance => "relevance",
            SortArg::Recommended => "recommended",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
