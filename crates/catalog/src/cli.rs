//! Clap derive structures for the `catalog` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use catalog_core::{ProductCategory, SortField, SortOrder, Theme};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// catalog -- browse and manage a product catalog from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "catalog",
    version,
    about = "Browse and manage a product catalog from the command line",
    long_about = "A CLI for a REST product catalog backend.\n\n\
        Lists, filters and paginates products, and creates, edits or\n\
        deletes them with optimistic updates and confirmation prompts.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "CATALOG_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, env = "CATALOG_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "CATALOG_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "CATALOG_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "CATALOG_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, inspect, create, edit and delete products
    #[command(alias = "p")]
    Products(ProductsArgs),

    /// Show or change the light/dark theme preference
    Theme(ThemeArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Products ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List one page of products
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a single product
    Get {
        /// Product ID
        id: String,
    },

    /// Create a product
    Create(CreateArgs),

    /// Update fields of an existing product
    Update {
        /// Product ID
        id: String,

        #[command(flatten)]
        fields: UpdateArgs,
    },

    /// Delete a product (asks for confirmation)
    #[command(alias = "rm")]
    Delete {
        /// Product ID
        id: String,
    },
}

/// Filter, sort and pagination flags for `products list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Full-text search term
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only products in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Minimum price
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Sort field (default: created-at)
    #[arg(long)]
    pub sort_by: Option<SortFieldArg>,

    /// Sort direction (default: desc)
    #[arg(long)]
    pub sort_order: Option<SortOrderArg>,

    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Products per page
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Product name (at least 3 characters)
    #[arg(long)]
    pub name: String,

    /// Price (at least 0.01)
    #[arg(long)]
    pub price: f64,

    /// Category: Electronics, Clothing, Home, Books or Other
    #[arg(long, value_parser = parse_category)]
    pub category: ProductCategory,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Units in stock
    #[arg(long, default_value_t = 0)]
    pub stock: u32,

    #[arg(long, default_value = "")]
    pub image_url: String,

    /// Rating from 0 to 5
    #[arg(long, default_value_t = 0.0)]
    pub rating: f64,

    /// Tag (repeatable)
    #[arg(long = "tag", action = clap::ArgAction::Append)]
    pub tags: Vec<String>,
}

/// Every flag is optional; only the given fields are sent.
#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long, value_parser = parse_category)]
    pub category: Option<ProductCategory>,

    #[arg(long)]
    pub stock: Option<u32>,

    #[arg(long)]
    pub image_url: Option<String>,

    #[arg(long)]
    pub rating: Option<f64>,

    /// Replace tags (repeatable)
    #[arg(long = "tag", action = clap::ArgAction::Append)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortFieldArg {
    Name,
    Price,
    CreatedAt,
    Stock,
}

impl From<SortFieldArg> for SortField {
    fn from(arg: SortFieldArg) -> Self {
        match arg {
            SortFieldArg::Name => Self::Name,
            SortFieldArg::Price => Self::Price,
            SortFieldArg::CreatedAt => Self::CreatedAt,
            SortFieldArg::Stock => Self::Stock,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortOrderArg {
    Asc,
    Desc,
}

impl From<SortOrderArg> for SortOrder {
    fn from(arg: SortOrderArg) -> Self {
        match arg {
            SortOrderArg::Asc => Self::Asc,
            SortOrderArg::Desc => Self::Desc,
        }
    }
}

fn parse_category(raw: &str) -> Result<ProductCategory, String> {
    raw.parse().map_err(|_| {
        format!("unknown category '{raw}' (expected Electronics, Clothing, Home, Books or Other)")
    })
}

// ── Theme ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: ThemeCommand,
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Print the saved theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Save a specific theme
    Set {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Self::Light,
            ThemeArg::Dark => Self::Dark,
        }
    }
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file (prompts for anything not given as a flag)
    Init {
        /// Profile name
        #[arg(long = "name")]
        profile_name: Option<String>,
    },

    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a profile value (api_url, timeout, page_limit, insecure, ca_cert)
    Set { key: String, value: String },

    /// Make a profile the default
    Use { name: String },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
