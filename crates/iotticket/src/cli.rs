//! Clap derive structures for the `iotticket` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// iotticket -- command-line client for the IoT-Ticket data platform
#[derive(Debug, Parser)]
#[command(
    name = "iotticket",
    version,
    about = "Read and write IoT-Ticket process data from the command line",
    long_about = "A command-line client for the IoT-Ticket REST API.\n\n\
        Register devices, write datapoints, read raw and statistical\n\
        process data, browse enterprises and check quotas.",
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
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "IOTTICKET_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "IOTTICKET_URL", global = true)]
    pub url: Option<String>,

    /// Username for HTTP Basic authentication
    #[arg(long, short = 'U', env = "IOTTICKET_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for HTTP Basic authentication
    #[arg(
        long,
        env = "IOTTICKET_PASSWORD",
        global = true,
        hide = true,
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "IOTTICKET_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "IOTTICKET_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "IOTTICKET_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, inspect and register devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// List the datanodes of a device
    #[command(alias = "dn")]
    Datanodes(DatanodesArgs),

    /// Write a datapoint to a device
    Write(WriteArgs),

    /// Read raw process data
    Read(ReadArgs),

    /// Read aggregated statistics
    Stats(StatsArgs),

    /// Browse the enterprise hierarchy
    #[command(alias = "ent")]
    Enterprises(EnterprisesArgs),

    /// Show account or device quota
    Quota(QuotaArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Paging arguments shared by all listing commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Max results per page
    #[arg(long, short = 'l', default_value = "25")]
    pub limit: u32,

    /// Number of results to skip
    #[arg(long, default_value = "0")]
    pub offset: u32,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List registered devices
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one device
    Get {
        /// Device ID
        id: String,
    },

    /// Register a new device
    Register {
        /// Device name
        #[arg(long)]
        name: String,

        /// Manufacturer name
        #[arg(long)]
        manufacturer: String,

        /// Device type
        #[arg(long = "type")]
        device_type: Option<String>,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,

        /// Attribute as key=value (repeatable)
        #[arg(long = "attr", value_name = "KEY=VALUE")]
        attributes: Vec<String>,
    },
}

// ── Datanodes ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DatanodesArgs {
    /// Device ID
    pub device_id: String,

    #[command(flatten)]
    pub list: ListArgs,
}

// ── Process data ─────────────────────────────────────────────────────

/// Type to encode a written value as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ValueType {
    /// Integer if it parses, then float, then boolean, else string
    #[default]
    Auto,
    Double,
    Long,
    String,
    Boolean,
    /// Base64-encoded bytes
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Order {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupingArg {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

#[derive(Debug, Args)]
pub struct WriteArgs {
    /// Device ID
    pub device_id: String,

    /// Datanode name
    #[arg(long)]
    pub name: String,

    /// Datanode path
    #[arg(long, default_value = "")]
    pub path: String,

    /// Value to write
    #[arg(long, allow_hyphen_values = true)]
    pub value: String,

    /// How to interpret --value
    #[arg(long = "type", value_enum, default_value = "auto")]
    pub value_type: ValueType,

    /// Unit of the value
    #[arg(long)]
    pub unit: Option<String>,

    /// Timestamp (RFC 3339, YYYY-MM-DD or epoch millis); server time if omitted
    #[arg(long)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Device ID
    pub device_id: String,

    /// Datanode paths (e.g. "room/Temperature")
    #[arg(required = true)]
    pub datanodes: Vec<String>,

    /// Max values per datanode
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Start of range (RFC 3339, YYYY-MM-DD or epoch millis)
    #[arg(long)]
    pub from: Option<String>,

    /// End of range (RFC 3339, YYYY-MM-DD or epoch millis)
    #[arg(long)]
    pub to: Option<String>,

    /// Sort order
    #[arg(long, value_enum)]
    pub order: Option<Order>,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Device ID
    pub device_id: String,

    /// Datanode paths
    #[arg(required = true)]
    pub datanodes: Vec<String>,

    /// Bucket width
    #[arg(long, short = 'g', value_enum)]
    pub grouping: GroupingArg,

    /// Start of range (RFC 3339, YYYY-MM-DD or epoch millis)
    #[arg(long)]
    pub from: String,

    /// End of range (RFC 3339, YYYY-MM-DD or epoch millis)
    #[arg(long)]
    pub to: String,

    /// Sort order
    #[arg(long, value_enum)]
    pub order: Option<Order>,

    /// Virtual tag filter (repeatable)
    #[arg(long = "vtag")]
    pub vtags: Vec<String>,
}

// ── Enterprises ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EnterprisesArgs {
    #[command(subcommand)]
    pub command: EnterprisesCommand,
}

#[derive(Debug, Subcommand)]
pub enum EnterprisesCommand {
    /// List root enterprises
    #[command(alias = "ls")]
    List(ListArgs),

    /// List the sub-enterprises of an enterprise
    Sub {
        /// Enterprise resource ID
        id: String,

        #[command(flatten)]
        list: ListArgs,
    },
}

// ── Quota ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct QuotaArgs {
    #[command(subcommand)]
    pub command: Option<QuotaCommand>,
}

#[derive(Debug, Subcommand)]
pub enum QuotaCommand {
    /// Quota of a single device
    Device {
        /// Device ID
        id: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (passwords redacted)
    Show,

    /// Print the configuration file path
    Path,

    /// Store a profile password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
