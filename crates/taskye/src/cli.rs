//! Clap derive structures for the `taskye` CLI.
//!
//! Defines the complete command tree, global flags, and shared value enums.
//! Only depends on clap + clap_complete so build.rs can include it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// taskye -- service-desk tickets from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "taskye",
    version,
    about = "Service-desk tickets, kanban and AI-assisted drafting from the command line",
    long_about = "Manage service-desk tickets, the kanban board, the dashboard and the\n\
        equipment inventory. `taskye assist` turns a free-text problem report\n\
        (and optionally a screenshot or PDF) into a structured ticket.",
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
    /// Config file path
    #[arg(long, env = "TASKYE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding ticket, session and inventory snapshots
    #[arg(long, env = "TASKYE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Generative provider API key
    #[arg(long, env = "TASKYE_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Pin the model used by `assist` and `review`
    #[arg(long, short = 'm', env = "TASKYE_MODEL", global = true)]
    pub model: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TASKYE_OUTPUT",
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
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
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

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Domain value enums ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Open,
    InProgress,
    Waiting,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Hardware,
    Software,
    Access,
    Network,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LaneArg {
    Backlog,
    Todo,
    InProgress,
    Review,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    All,
    Open,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    All,
    Today,
    Week,
    Month,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ItemKindArg {
    Computer,
    Monitor,
    Printer,
    Server,
    Laptop,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ItemStatusArg {
    Available,
    InUse,
    Maintenance,
    Obsolete,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with a directory account
    Login(LoginArgs),

    /// End the current session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage tickets
    #[command(alias = "t")]
    Tickets(TicketsArgs),

    /// View and rearrange the kanban board
    #[command(alias = "b")]
    Board(BoardArgs),

    /// Ticket metrics and breakdowns
    #[command(alias = "dash")]
    Dashboard(DashboardArgs),

    /// Manage the equipment inventory
    #[command(alias = "inv")]
    Inventory(InventoryArgs),

    /// Draft a ticket from a free-text report with the AI assistant
    Assist(AssistArgs),

    /// Proofread and rewrite text with the AI assistant
    Review(ReviewArgs),

    /// Inspect generative models available to the configured key
    Models(ModelsArgs),

    /// Manage CLI configuration and the provider key
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Account password (prompted when omitted)
    #[arg(long, env = "TASKYE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ── Tickets ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TicketsArgs {
    #[command(subcommand)]
    pub command: TicketsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TicketsCommand {
    /// List tickets
    #[command(alias = "ls")]
    List(TicketFilterArgs),

    /// Show one ticket with its activity timeline
    Show {
        /// Ticket ID
        id: String,
    },

    /// Open a new ticket
    Create(CreateTicketArgs),

    /// Change a ticket's status
    Status {
        /// Ticket ID
        id: String,
        /// New status
        status: StatusArg,
    },

    /// Change a ticket's priority
    Priority {
        /// Ticket ID
        id: String,
        /// New priority
        priority: PriorityArg,
    },

    /// Assign a ticket, or clear the assignee with --clear
    Assign {
        /// Ticket ID
        id: String,
        /// Assignee name
        #[arg(required_unless_present = "clear")]
        assignee: Option<String>,
        /// Remove the current assignee
        #[arg(long, conflicts_with = "assignee")]
        clear: bool,
    },

    /// Mark a ticket resolved
    Resolve {
        /// Ticket ID
        id: String,
        /// Resolution note recorded in the history
        #[arg(long, short = 'n')]
        note: Option<String>,
    },

    /// Add a comment to a ticket
    Comment {
        /// Ticket ID
        id: String,
        /// Comment text
        text: String,
    },

    /// Delete a comment from a ticket
    Uncomment {
        /// Ticket ID
        id: String,
        /// Comment ID
        comment_id: String,
    },
}

#[derive(Debug, Args)]
pub struct TicketFilterArgs {
    /// Only tickets with this status
    #[arg(long, short = 's')]
    pub status: Option<StatusArg>,

    /// Only tickets with this priority
    #[arg(long, short = 'p')]
    pub priority: Option<PriorityArg>,

    /// Only tickets in this category
    #[arg(long, short = 'c')]
    pub category: Option<CategoryArg>,

    /// Case-insensitive match on title, description or ID
    #[arg(long, short = 'f')]
    pub search: Option<String>,

    /// Only tickets created by the signed-in user
    #[arg(long)]
    pub mine: bool,
}

#[derive(Debug, Args)]
pub struct CreateTicketArgs {
    /// Short summary
    #[arg(long, short = 't')]
    pub title: String,

    /// Full problem description
    #[arg(long, short = 'd')]
    pub description: String,

    #[arg(long, short = 'p', default_value = "medium")]
    pub priority: PriorityArg,

    #[arg(long, short = 'c', default_value = "other")]
    pub category: CategoryArg,

    /// Assignee name
    #[arg(long)]
    pub assignee: Option<String>,

    /// Where the problem is
    #[arg(long)]
    pub location: Option<String>,

    /// Affected equipment
    #[arg(long)]
    pub equipment: Option<String>,

    /// Requester contact email
    #[arg(long)]
    pub requester_email: Option<String>,

    /// Requester contact phone
    #[arg(long)]
    pub requester_phone: Option<String>,

    /// Attach a file (JPEG, PNG, GIF, WebP or PDF, up to 10 MiB)
    #[arg(long, short = 'a')]
    pub attach: Option<PathBuf>,
}

// ── Board ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BoardArgs {
    #[command(subcommand)]
    pub command: BoardCommand,
}

#[derive(Debug, Subcommand)]
pub enum BoardCommand {
    /// Show every lane
    Show {
        /// Only this lane
        #[arg(long, short = 'l')]
        lane: Option<LaneArg>,
    },

    /// Move a ticket to another lane
    Move {
        /// Ticket ID
        id: String,
        /// Target lane
        lane: LaneArg,
    },
}

// ── Dashboard ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Ticket scope
    #[arg(long, short = 's', default_value = "all")]
    pub scope: ScopeArg,

    /// Only tickets with this priority
    #[arg(long, short = 'p')]
    pub priority: Option<PriorityArg>,

    /// Creation window relative to now
    #[arg(long, default_value = "all")]
    pub period: PeriodArg,
}

// ── Inventory ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InventoryArgs {
    #[command(subcommand)]
    pub command: InventoryCommand,
}

#[derive(Debug, Subcommand)]
pub enum InventoryCommand {
    /// List assets
    #[command(alias = "ls")]
    List {
        /// Only assets of this kind
        #[arg(long, short = 'k')]
        kind: Option<ItemKindArg>,
        /// Only assets in this state
        #[arg(long, short = 's')]
        status: Option<ItemStatusArg>,
        /// Case-insensitive match on name, ID, serial or location
        #[arg(long, short = 'f')]
        search: Option<String>,
    },

    /// Show one asset
    Show {
        /// Asset ID (INV-###)
        id: String,
    },

    /// Register a new asset
    Add(AddItemArgs),

    /// Change an asset's status
    SetStatus {
        /// Asset ID (INV-###)
        id: String,
        /// New status
        status: ItemStatusArg,
    },

    /// Delete an asset
    #[command(alias = "rm")]
    Remove {
        /// Asset ID (INV-###)
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct AddItemArgs {
    /// Asset name
    #[arg(long, short = 'n')]
    pub name: String,

    #[arg(long, short = 'k')]
    pub kind: ItemKindArg,

    #[arg(long, short = 's', default_value = "available")]
    pub status: ItemStatusArg,

    /// Physical location
    #[arg(long, short = 'l')]
    pub location: String,

    /// Serial number
    #[arg(long)]
    pub serial: String,

    /// Person the asset is assigned to
    #[arg(long)]
    pub assigned_to: Option<String>,

    /// Warranty expiry date (YYYY-MM-DD)
    #[arg(long)]
    pub warranty: Option<String>,
}

// ── Assistant ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AssistArgs {
    /// Free-text problem report (may be empty with --attach)
    #[arg(default_value = "")]
    pub message: String,

    /// Screenshot or document to analyse alongside the message
    #[arg(long, short = 'a')]
    pub attach: Option<PathBuf>,

    /// Print the draft without creating a ticket
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// Text to review
    pub text: String,

    /// Desired tone
    #[arg(long, short = 't', default_value = "professional")]
    pub tone: String,
}

#[derive(Debug, Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ModelsCommand {
    /// List models, best candidate first
    #[command(alias = "ls")]
    List,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// Store the provider API key in the system keyring
    SetKey,

    /// Remove the provider API key from the system keyring
    ClearKey,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
