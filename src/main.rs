use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use protgen::{Config, GeneratingReader, Preset, generator};

/// Generate dynamic-loading boilerplate from C function prototypes
#[derive(Parser, Debug)]
#[command(name = "protgen", version)]
struct Args {
    /// Prototype source file, `-` for stdin. Defaults to the preset's sources.
    source: Option<PathBuf>,

    /// Preset file with [Settings] and [Sources] sections
    #[arg(long)]
    preset: Option<PathBuf>,

    #[arg(long)]
    prefix: Option<String>,

    #[arg(long)]
    load_macro: Option<String>,

    #[arg(long)]
    load_lib_handle: Option<String>,

    #[arg(long)]
    load_lib_name: Option<String>,

    #[arg(long)]
    load_lib_field_prefix: Option<String>,

    /// Write the effective settings and source to a preset file
    #[arg(long)]
    save_preset: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{}] {}", record.level(), message)))
        .level(log_level(verbose))
        .chain(io::stderr())
        .apply()
        .context("failed to install logger")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let preset = match &args.preset {
        Some(path) => Some(
            Preset::load(path).with_context(|| format!("failed to load preset {}", path.display()))?,
        ),
        None => None,
    };

    let mut config = preset.as_ref().map(Preset::config).unwrap_or_default();
    let overrides = [
        (generator::PREFIX, &args.prefix),
        (generator::LOAD_MACRO, &args.load_macro),
        (generator::LOAD_LIB_HANDLE, &args.load_lib_handle),
        (generator::LOAD_LIB_NAME, &args.load_lib_name),
        (generator::LOAD_LIB_FIELD_PREFIX, &args.load_lib_field_prefix),
    ];
    for (name, value) in overrides {
        if let Some(value) = value {
            config.set(name, value.as_str());
        }
    }

    let source = read_source(args.source.as_ref(), preset.as_ref())?;

    if let Some(path) = &args.save_preset {
        Preset::from_parts(&config, &source)
            .save(path)
            .with_context(|| format!("failed to save preset {}", path.display()))?;
    }

    write_generated(&source, config)
}

fn read_source(path: Option<&PathBuf>, preset: Option<&Preset>) -> Result<String> {
    let mut source = String::new();
    match (path, preset) {
        (Some(path), _) if path.to_str() != Some("-") => {
            File::open(path)
                .and_then(|mut f| f.read_to_string(&mut source))
                .with_context(|| format!("failed to read {}", path.display()))?;
        }
        (None, Some(preset)) => source = preset.source(),
        _ => {
            io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
        }
    }
    Ok(source)
}

fn write_generated(source: &str, config: Config) -> Result<()> {
    let mut reader = GeneratingReader::new(source.as_bytes(), config);
    let mut stdout = io::stdout().lock();
    io::copy(&mut reader, &mut stdout).context("failed to write output")?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(log_level(0), LevelFilter::Warn);
        assert_eq!(log_level(1), LevelFilter::Info);
        assert_eq!(log_level(2), LevelFilter::Debug);
        assert_eq!(log_level(3), LevelFilter::Trace);
        assert_eq!(log_level(9), LevelFilter::Trace);
    }

    #[test]
    fn test_verbose_flag_counts() {
        let args = Args::try_parse_from(["protgen", "-vv", "--prefix", "X_"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.prefix.as_deref(), Some("X_"));
    }
}
