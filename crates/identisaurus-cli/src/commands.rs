use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use identisaurus_counter::{MatchMode, VersionString};
use identisaurus_embed::{CSourceEmbedder, Embedder, MemoryEmbedder, RawEmbedder, RustSourceEmbedder};
use identisaurus_ledger::{LedgerFile, LockConfig, SaveMode};
use identisaurus_stamp::{StampConfig, StampOutcome, Stamper};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Stamp(args) => cmd_stamp(config, args, &cli.format),
        Command::Count(args) => cmd_count(config, args, &cli.format),
        Command::Set(args) => cmd_set(config, args, &cli.format),
        Command::Show(args) => cmd_show(&config, args, &cli.format),
        Command::Inspect(args) => cmd_inspect(&config, args, &cli.format),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StampConfig> {
    match path {
        Some(path) => StampConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(StampConfig::default()),
    }
}

/// Command-line flags win over the config file.
fn apply_stamp_overrides(mut config: StampConfig, args: &StampArgs) -> anyhow::Result<StampConfig> {
    if let Some(tag) = &args.tag {
        config.tag = tag.clone();
    }
    if let Some(symbol) = &args.symbol {
        config.symbol = symbol.clone();
    }
    if args.exact {
        config.match_mode = MatchMode::Exact;
    }
    if args.atomic {
        config.save_mode = SaveMode::AtomicReplace;
    }
    if args.lock && config.lock.is_none() {
        config.lock = Some(LockConfig::default());
    }
    config.validate()?;
    Ok(config)
}

fn with_exact(mut config: StampConfig, exact: bool) -> StampConfig {
    if exact {
        config.match_mode = MatchMode::Exact;
    }
    config
}

fn build_embedder(emit: EmitFormat, out: Option<&Path>) -> anyhow::Result<Box<dyn Embedder>> {
    let require_out = || match out {
        Some(path) => Ok(path.to_path_buf()),
        None => bail!("--out is required with --emit {emit:?}"),
    };
    let embedder: Box<dyn Embedder> = match emit {
        EmitFormat::Stdout => Box::new(RawEmbedder::stdout()),
        EmitFormat::Rust => Box::new(RustSourceEmbedder::new(require_out()?)),
        EmitFormat::C => Box::new(CSourceEmbedder::new(require_out()?)),
        EmitFormat::Raw => Box::new(RawEmbedder::to_file(require_out()?)),
    };
    Ok(embedder)
}

fn cmd_stamp(config: StampConfig, args: StampArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let config = apply_stamp_overrides(config, &args)?;
    let stamper = Stamper::new(config);

    // In JSON mode stdout carries the report, so the string travels inside it.
    let json = matches!(format, OutputFormat::Json);
    let mut embedder: Box<dyn Embedder> = if json && args.emit == EmitFormat::Stdout {
        Box::new(MemoryEmbedder::new())
    } else {
        build_embedder(args.emit, args.out.as_deref())?
    };

    let outcome = match &args.display_name {
        Some(name) => stamper.stamp_as(&args.source, name, embedder.as_mut()),
        None => stamper.stamp(&args.source, embedder.as_mut()),
    }
    .with_context(|| format!("stamping {}", args.source.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if args.emit != EmitFormat::Stdout {
        print_stamp(&outcome, args.out.as_deref());
    }
    Ok(())
}

fn print_stamp(outcome: &StampOutcome, out: Option<&Path>) {
    println!(
        "{} {} build {}",
        "✓".green().bold(),
        outcome.base_name.yellow().bold(),
        outcome.count.to_string().bold()
    );
    println!("  Ledger: {}", outcome.ledger_path.display());
    if let Some(out) = out {
        println!("  Output: {}", out.display().to_string().cyan());
    }
    println!("  String: {}", outcome.version.to_string().trim_end().dimmed());
}

fn cmd_count(config: StampConfig, args: CountArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let stamper = Stamper::new(with_exact(config, args.exact));
    let count = stamper
        .peek(&args.source)
        .with_context(|| format!("reading count for {}", args.source.display()))?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "source": args.source,
                "ledger_path": stamper.ledger_path(&args.source),
                "count": count,
            })
        ),
        OutputFormat::Text => println!("{} {}", args.source.display().to_string().yellow(), count.to_string().bold()),
    }
    Ok(())
}

fn cmd_set(config: StampConfig, args: SetArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let stamper = Stamper::new(with_exact(config, args.exact));
    let ledger_path = stamper
        .set(&args.source, args.count)
        .with_context(|| format!("setting count for {}", args.source.display()))?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "source": args.source,
                "ledger_path": ledger_path,
                "count": args.count,
            })
        ),
        OutputFormat::Text => println!(
            "{} Set {} to {} in {}",
            "✓".green(),
            args.source.display().to_string().yellow(),
            args.count.to_string().bold(),
            ledger_path.display()
        ),
    }
    Ok(())
}

/// A directory argument means the ledger inside it.
fn resolve_ledger(path: Option<&Path>, ledger_file_name: &str) -> PathBuf {
    let path = path.unwrap_or_else(|| Path::new("."));
    if path.is_dir() {
        path.join(ledger_file_name)
    } else {
        path.to_path_buf()
    }
}

fn cmd_show(config: &StampConfig, args: ShowArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let path = resolve_ledger(args.path.as_deref(), &config.ledger_file_name);
    if !path.exists() {
        bail!("no ledger at {}", path.display());
    }
    let ledger = LedgerFile::new(&path).load()?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ledger)?),
        OutputFormat::Text => {
            if ledger.is_empty() {
                println!("Ledger {} is empty.", path.display());
            }
            let width = ledger.iter().map(|r| r.name.len()).max().unwrap_or(0);
            for record in &ledger {
                println!(
                    "{:<width$}  {}",
                    record.name.yellow(),
                    record.build_count.to_string().bold()
                );
            }
        }
    }
    Ok(())
}

fn cmd_inspect(config: &StampConfig, args: InspectArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let tag = args.tag.as_deref().unwrap_or(&config.tag);
    let bytes = fs::read(&args.artifact)
        .with_context(|| format!("reading {}", args.artifact.display()))?;
    let found = VersionString::scan(&bytes, tag);
    if found.is_empty() {
        bail!("no <{tag}> build strings in {}", args.artifact.display());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&found)?),
        OutputFormat::Text => {
            for version in &found {
                println!(
                    "{}  build {}  at {}",
                    version.source.yellow(),
                    version.count.to_string().bold(),
                    version.timestamp
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn stamp_args(argv: &[&str]) -> StampArgs {
        let mut full = vec!["identisaurus", "stamp"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Stamp(args) => args,
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn overrides_apply_on_top_of_config() {
        let base = StampConfig {
            tag: "fromfile".into(),
            ..StampConfig::default()
        };
        let args = stamp_args(&["a.c", "--tag", "cli", "--exact", "--atomic", "--lock"]);
        let config = apply_stamp_overrides(base, &args).unwrap();
        assert_eq!(config.tag, "cli");
        assert_eq!(config.match_mode, MatchMode::Exact);
        assert_eq!(config.save_mode, SaveMode::AtomicReplace);
        assert_eq!(config.lock, Some(LockConfig::default()));
    }

    #[test]
    fn lock_flag_keeps_configured_timing() {
        let custom = LockConfig {
            timeout_ms: 1,
            poll_ms: 1,
        };
        let base = StampConfig {
            lock: Some(custom.clone()),
            ..StampConfig::default()
        };
        let config = apply_stamp_overrides(base, &stamp_args(&["a.c", "--lock"])).unwrap();
        assert_eq!(config.lock, Some(custom));
    }

    #[test]
    fn invalid_symbol_override_fails() {
        let args = stamp_args(&["a.c", "--symbol", "no-dashes"]);
        assert!(apply_stamp_overrides(StampConfig::default(), &args).is_err());
    }

    #[test]
    fn file_emitters_require_out() {
        assert!(build_embedder(EmitFormat::Rust, None).is_err());
        assert!(build_embedder(EmitFormat::C, None).is_err());
        assert!(build_embedder(EmitFormat::Raw, None).is_err());
        assert!(build_embedder(EmitFormat::Stdout, None).is_ok());
        assert!(build_embedder(EmitFormat::Rust, Some(Path::new("x.rs"))).is_ok());
    }

    #[test]
    fn resolve_ledger_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_ledger(Some(dir.path()), ".identisaurus.rawr"),
            dir.path().join(".identisaurus.rawr")
        );
        let file = dir.path().join("custom.rawr");
        assert_eq!(resolve_ledger(Some(&file), ".identisaurus.rawr"), file);
    }

    #[test]
    fn stamp_command_writes_rust_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("main.rs");
        let out = dir.path().join("stamp.rs");
        let args = stamp_args(&[
            source.to_str().unwrap(),
            "--emit",
            "rust",
            "-o",
            out.to_str().unwrap(),
        ]);

        cmd_stamp(StampConfig::default(), args, &OutputFormat::Json).unwrap();

        let generated = fs::read_to_string(&out).unwrap();
        assert!(generated.contains("pub static __identisaurus"));
        assert!(generated.contains("<identisaurus>main.rs:Build 1 at "));
        assert_eq!(
            fs::read_to_string(dir.path().join(".identisaurus.rawr")).unwrap(),
            "main, 1\n"
        );
    }

    #[test]
    fn set_then_count() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("util.c");
        let set = SetArgs {
            source: source.clone(),
            count: 9,
            exact: false,
        };
        cmd_set(StampConfig::default(), set, &OutputFormat::Text).unwrap();

        let stamper = Stamper::new(StampConfig::default());
        assert_eq!(stamper.peek(&source).unwrap(), 9);
    }

    #[test]
    fn show_missing_ledger_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = ShowArgs {
            path: Some(dir.path().to_path_buf()),
        };
        assert!(cmd_show(&StampConfig::default(), args, &OutputFormat::Text).is_err());
    }

    #[test]
    fn inspect_finds_stamp_in_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("app.bin");
        let mut bytes = vec![0u8; 64];
        bytes.extend_from_slice(b"<identisaurus>app.c:Build 4 at 99</identisaurus>\n");
        fs::write(&artifact, bytes).unwrap();

        let args = InspectArgs {
            artifact: artifact.clone(),
            tag: None,
        };
        assert!(cmd_inspect(&StampConfig::default(), args, &OutputFormat::Text).is_ok());

        let args = InspectArgs {
            artifact,
            tag: Some("other".into()),
        };
        assert!(cmd_inspect(&StampConfig::default(), args, &OutputFormat::Text).is_err());
    }
}
