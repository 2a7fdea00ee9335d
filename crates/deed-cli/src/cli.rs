use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "deed",
    about = "Deed Registry: property records with validated registration and owner updates",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Snapshot file holding the registry state
    #[arg(long, global = true, default_value = "deed-state.json")]
    pub state: PathBuf,

    /// Registry configuration (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Principal making the call
    #[arg(long, global = true, default_value = "ST1TEST")]
    pub caller: String,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty registry snapshot
    Init(InitArgs),
    /// Set the fee authority (once)
    SetAuthority(SetAuthorityArgs),
    /// Change the registration fee
    SetFee(SetFeeArgs),
    /// Register a property owned by the caller
    Register(RegisterArgs),
    /// Update a property the caller owns
    Update(UpdateArgs),
    /// Show a property and its latest update
    Show(ShowArgs),
    /// Number of registered properties
    Count,
    /// Check whether a document hash is registered
    Exists(ExistsArgs),
    /// List fee transfers
    Transfers,
    /// Advance the block height
    Advance(AdvanceArgs),
    /// Show registry settings
    Status,
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing snapshot
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct SetAuthorityArgs {
    pub principal: String,
}

#[derive(Args)]
pub struct SetFeeArgs {
    pub amount: u64,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub description: String,
    /// Title document hash, 64 hex characters
    #[arg(long)]
    pub hash: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub location: String,
    /// STX, USD or BTC
    #[arg(long, default_value = "STX")]
    pub currency: String,
    #[arg(long, allow_negative_numbers = true)]
    pub size: i64,
    /// residential, commercial or industrial
    #[arg(long)]
    pub zoning: String,
    #[arg(long)]
    pub tax_id: String,
    #[arg(long, allow_negative_numbers = true)]
    pub assessment: i64,
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub lien: i64,
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub mortgage: i64,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub id: u64,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub address: String,
    #[arg(long, allow_negative_numbers = true)]
    pub size: i64,
    #[arg(long)]
    pub zoning: String,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: u64,
}

#[derive(Args)]
pub struct ExistsArgs {
    pub hash: String,
}

#[derive(Args)]
pub struct AdvanceArgs {
    #[arg(short = 'n', long, default_value = "1")]
    pub blocks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["deed", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init(_)));
        assert_eq!(cli.state, PathBuf::from("deed-state.json"));
        assert_eq!(cli.caller, "ST1TEST");
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "deed",
            "count",
            "--state",
            "/tmp/s.json",
            "--caller",
            "ST9X",
            "--config",
            "deed.toml",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Count));
        assert_eq!(cli.state, PathBuf::from("/tmp/s.json"));
        assert_eq!(cli.caller, "ST9X");
        assert_eq!(cli.config, Some(PathBuf::from("deed.toml")));
    }

    #[test]
    fn parse_register() {
        let cli = Cli::try_parse_from([
            "deed",
            "register",
            "--description",
            "Lot 7",
            "--hash",
            "0101",
            "--address",
            "123 Main St",
            "--location",
            "City",
            "--size",
            "2000",
            "--zoning",
            "residential",
            "--tax-id",
            "TAX123",
            "--assessment",
            "100000",
            "--mortgage",
            "50000",
        ])
        .unwrap();
        if let Command::Register(args) = cli.command {
            assert_eq!(args.currency, "STX");
            assert_eq!(args.size, 2000);
            assert_eq!(args.lien, 0);
            assert_eq!(args.mortgage, 50_000);
            assert_eq!(args.tax_id, "TAX123");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_negative_amounts() {
        let cli = Cli::try_parse_from([
            "deed",
            "update",
            "0",
            "--description",
            "d",
            "--address",
            "a",
            "--size",
            "-5",
            "--zoning",
            "commercial",
        ])
        .unwrap();
        if let Command::Update(args) = cli.command {
            assert_eq!(args.id, 0);
            assert_eq!(args.size, -5);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_set_fee() {
        let cli = Cli::try_parse_from(["deed", "set-fee", "10000"]).unwrap();
        if let Command::SetFee(args) = cli.command {
            assert_eq!(args.amount, 10_000);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_advance_default() {
        let cli = Cli::try_parse_from(["deed", "advance"]).unwrap();
        if let Command::Advance(args) = cli.command {
            assert_eq!(args.blocks, 1);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["deed", "--format", "json", "transfers"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["deed", "-v", "status"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn negative_fee_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["deed", "set-fee", "-1"]).is_err());
    }
}
