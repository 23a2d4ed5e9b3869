//! Clap derive structures for the `tessera` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tessera -- admin CLI for the digital business-card backend
#[derive(Debug, Parser)]
#[command(
    name = "tessera",
    version,
    about = "Manage digital business cards from the command line",
    long_about = "An administration CLI for the tessera digital-card backend.\n\n\
        Sign in once with `tessera login`; the session is cached per profile\n\
        and refreshed transparently when it expires.",
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
    #[arg(long, short = 'p', env = "TESSERA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 's', env = "TESSERA_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TESSERA_OUTPUT",
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
    #[arg(long, short = 'k', env = "TESSERA_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "TESSERA_TIMEOUT", global = true)]
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

/// Backend role, as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Administrator,
    Author,
}

impl From<RoleArg> for tessera_api::types::Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Administrator => Self::Administrator,
            RoleArg::Author => Self::Author,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and cache the session for this profile
    Login(LoginArgs),

    /// Sign out and drop the cached session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage digital business cards
    #[command(alias = "card", alias = "c")]
    Cards(CardsArgs),

    /// Manage promotional banners (administrators only)
    #[command(alias = "banner", alias = "b")]
    Banners(BannersArgs),

    /// Manage user accounts (administrators only)
    #[command(alias = "user", alias = "u")]
    Users(UsersArgs),

    /// View and update your own account settings
    Account(AccountArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Login email (falls back to the profile's email, then a prompt)
    #[arg(long)]
    pub email: Option<String>,

    /// Password (prompted interactively when omitted)
    #[arg(long, env = "TESSERA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ── Shared list arguments ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Free-text search filter
    #[arg(long)]
    pub search: Option<String>,

    /// Results per page
    #[arg(long)]
    pub per_page: Option<u32>,
}

// ── Cards ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CardsArgs {
    #[command(subcommand)]
    pub command: CardsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CardsCommand {
    /// List cards
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a single card
    Show {
        /// Card id
        id: u64,
    },

    /// Create a card
    Create(CardCreateArgs),

    /// Update a card
    Update(CardUpdateArgs),

    /// Delete a card
    #[command(alias = "rm")]
    Delete {
        /// Card id
        id: u64,
    },

    /// Toggle the active/public flags
    Toggle {
        /// Card id
        id: u64,

        /// Set the active flag
        #[arg(long)]
        active: Option<bool>,

        /// Set the public flag
        #[arg(long)]
        public: Option<bool>,
    },

    /// Upload a profile image
    UploadImage {
        /// Card id
        id: u64,

        /// Image file path
        path: PathBuf,
    },

    /// Remove the profile image
    DeleteImage {
        /// Card id
        id: u64,
    },
}

#[derive(Debug, Args)]
pub struct CardCreateArgs {
    /// Person name for the card
    #[arg(long, required_unless_present = "from_file")]
    pub name: Option<String>,

    /// Job title
    #[arg(long)]
    pub title: Option<String>,

    /// Location
    #[arg(long)]
    pub location: Option<String>,

    /// Read the full payload from a JSON file instead of flags
    #[arg(long, value_name = "PATH", conflicts_with_all = ["name", "title", "location"])]
    pub from_file: Option<PathBuf>,

    /// Create the card as active
    #[arg(long)]
    pub active: bool,

    /// Create the card as publicly visible
    #[arg(long)]
    pub public: bool,
}

#[derive(Debug, Args)]
pub struct CardUpdateArgs {
    /// Card id
    pub id: u64,

    /// New person name
    #[arg(long)]
    pub name: Option<String>,

    /// New job title
    #[arg(long)]
    pub title: Option<String>,

    /// New location
    #[arg(long)]
    pub location: Option<String>,

    /// Read the full payload from a JSON file instead of flags
    #[arg(long, value_name = "PATH", conflicts_with_all = ["name", "title", "location"])]
    pub from_file: Option<PathBuf>,
}

// ── Banners ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BannersArgs {
    #[command(subcommand)]
    pub command: BannersCommand,
}

#[derive(Debug, Subcommand)]
pub enum BannersCommand {
    /// List banners
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a single banner
    Show {
        /// Banner id
        id: u64,
    },

    /// Create a banner
    Create(BannerCreateArgs),

    /// Update a banner
    Update(BannerUpdateArgs),

    /// Delete a banner
    #[command(alias = "rm")]
    Delete {
        /// Banner id
        id: u64,
    },

    /// Toggle banner visibility
    Toggle {
        /// Banner id
        id: u64,

        /// Set the active flag
        #[arg(long)]
        active: bool,
    },
}

#[derive(Debug, Args)]
pub struct BannerCreateArgs {
    /// Banner title
    #[arg(long, required_unless_present = "from_file")]
    pub title: Option<String>,

    /// Image URL
    #[arg(long)]
    pub image_url: Option<String>,

    /// Click-through link URL
    #[arg(long)]
    pub link_url: Option<String>,

    /// Display position (lower sorts first)
    #[arg(long)]
    pub position: Option<u32>,

    /// Read the full payload from a JSON file instead of flags
    #[arg(long, value_name = "PATH", conflicts_with_all = ["title", "image_url", "link_url", "position"])]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BannerUpdateArgs {
    /// Banner id
    pub id: u64,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New image URL
    #[arg(long)]
    pub image_url: Option<String>,

    /// New click-through link URL
    #[arg(long)]
    pub link_url: Option<String>,

    /// New display position
    #[arg(long)]
    pub position: Option<u32>,

    /// Read the full payload from a JSON file instead of flags
    #[arg(long, value_name = "PATH", conflicts_with_all = ["title", "image_url", "link_url", "position"])]
    pub from_file: Option<PathBuf>,
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a single user
    Show {
        /// User id
        id: u64,
    },

    /// Register a new user
    Register {
        /// Full name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Role for the new account
        #[arg(long, value_enum, default_value = "author")]
        role: RoleArg,

        /// Initial password (prompted interactively when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Update a user
    Update {
        /// User id
        id: u64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New email
        #[arg(long)]
        email: Option<String>,

        /// New role
        #[arg(long, value_enum)]
        role: Option<RoleArg>,

        /// Enable or disable the account
        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a user
    #[command(alias = "rm")]
    Delete {
        /// User id
        id: u64,
    },
}

// ── Account ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Show your account settings
    Show,

    /// Update your profile fields
    Update {
        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New email
        #[arg(long)]
        email: Option<String>,
    },

    /// Change your password (prompts for current and new password)
    ChangePassword,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with an initial profile (interactive)
    Init,

    /// Print the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
