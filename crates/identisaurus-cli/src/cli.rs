use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "identisaurus",
    about = "Identisaurus -- per-artifact build counters and embedded build strings",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with stamping settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Where `stamp` sends the build string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum EmitFormat {
    /// Print the bare string to stdout
    Stdout,
    /// Write a Rust source file with a `#[used]` static
    Rust,
    /// Write a C source file with an `__attribute__((used))` static
    C,
    /// Write the bare bytes to a file
    Raw,
}

#[derive(Subcommand)]
pub enum Command {
    /// Bump the build count for a source file and emit its build string
    Stamp(StampArgs),
    /// Show the current build count for a source file
    Count(CountArgs),
    /// Overwrite the build count for a source file
    Set(SetArgs),
    /// List the records of a ledger
    Show(ShowArgs),
    /// Find embedded build strings in a compiled artifact
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct StampArgs {
    pub source: PathBuf,
    /// Name shown in the build string (defaults to the source file name)
    #[arg(long)]
    pub display_name: Option<String>,
    #[arg(long, value_enum, default_value = "stdout")]
    pub emit: EmitFormat,
    /// Output file for the rust, c, and raw emitters
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    #[arg(long)]
    pub symbol: Option<String>,
    #[arg(long)]
    pub tag: Option<String>,
    /// Match ledger names exactly instead of by prefix
    #[arg(long)]
    pub exact: bool,
    /// Hold an advisory lock on the ledger while updating it
    #[arg(long)]
    pub lock: bool,
    /// Replace the ledger via a temporary file and rename
    #[arg(long)]
    pub atomic: bool,
}

#[derive(Args)]
pub struct CountArgs {
    pub source: PathBuf,
    #[arg(long)]
    pub exact: bool,
}

#[derive(Args)]
pub struct SetArgs {
    pub source: PathBuf,
    pub count: u64,
    #[arg(long)]
    pub exact: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Ledger file, or a directory containing one (defaults to `.`)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct InspectArgs {
    pub artifact: PathBuf,
    #[arg(long)]
    pub tag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_stamp_defaults() {
        let cli = Cli::try_parse_from(["identisaurus", "stamp", "src/foo.c"]).unwrap();
        if let Command::Stamp(args) = cli.command {
            assert_eq!(args.source, PathBuf::from("src/foo.c"));
            assert_eq!(args.emit, EmitFormat::Stdout);
            assert!(args.out.is_none());
            assert!(!args.exact && !args.lock && !args.atomic);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_stamp_rust_out() {
        let cli = Cli::try_parse_from([
            "identisaurus", "stamp", "main.rs", "--emit", "rust", "-o", "out/stamp.rs", "--tag", "proj",
        ])
        .unwrap();
        if let Command::Stamp(args) = cli.command {
            assert_eq!(args.emit, EmitFormat::Rust);
            assert_eq!(args.out, Some(PathBuf::from("out/stamp.rs")));
            assert_eq!(args.tag, Some("proj".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_stamp_flags() {
        let cli = Cli::try_parse_from([
            "identisaurus", "stamp", "a.c", "--exact", "--lock", "--atomic", "--display-name", "lib/a.c",
        ])
        .unwrap();
        if let Command::Stamp(args) = cli.command {
            assert!(args.exact && args.lock && args.atomic);
            assert_eq!(args.display_name, Some("lib/a.c".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_set() {
        let cli = Cli::try_parse_from(["identisaurus", "set", "foo.c", "12"]).unwrap();
        if let Command::Set(args) = cli.command {
            assert_eq!(args.count, 12);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn reject_negative_set() {
        assert!(Cli::try_parse_from(["identisaurus", "set", "foo.c", "-1"]).is_err());
    }

    #[test]
    fn parse_show_without_path() {
        let cli = Cli::try_parse_from(["identisaurus", "show"]).unwrap();
        if let Command::Show(args) = cli.command {
            assert!(args.path.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_inspect() {
        let cli = Cli::try_parse_from(["identisaurus", "inspect", "target/app", "--tag", "t"]).unwrap();
        assert!(matches!(cli.command, Command::Inspect(_)));
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "identisaurus", "count", "x.c", "--verbose", "--format", "json", "--config", "id.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("id.toml")));
    }

    #[test]
    fn reject_unknown_emitter() {
        assert!(Cli::try_parse_from(["identisaurus", "stamp", "a.c", "--emit", "elf"]).is_err());
    }
}
