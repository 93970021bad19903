//! Cymraeg CLI: resolve Welsh words to phonemes and CVVC aliases.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use cymraeg_core::config::PhonemizerConfig;
use cymraeg_core::voicebank::AliasSet;
use cymraeg_core::Phonemizer;

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "cymraeg",
    about = "Welsh CVVC phonemizer for concatenative singing voicebanks",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the phoneme sequence of each word
    Resolve(ResolveArgs),
    /// Print the voicebank aliases of each word
    Phonemize(PhonemizeArgs),
}

// ─── Shared arguments (embedded in each subcommand) ──────────────

#[derive(Parser, Debug)]
struct SharedArgs {
    /// Words to process
    #[arg(required = true)]
    words: Vec<String>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Voicebank folder (overrides the config)
    #[arg(long)]
    voicebank: Option<PathBuf>,

    /// G2P pack archive (overrides the config)
    #[arg(long)]
    pack: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    #[command(flatten)]
    shared: SharedArgs,
}

#[derive(Parser, Debug)]
struct PhonemizeArgs {
    #[command(flatten)]
    shared: SharedArgs,

    /// oto.ini files listing the voicebank's aliases
    #[arg(long, required = true)]
    oto: Vec<PathBuf>,

    /// MIDI tone the words are sung at
    #[arg(long, default_value_t = 60)]
    tone: i32,
}

// ─── Entry point ─────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let log_level = match &cli.command {
        Command::Resolve(a) if a.shared.verbose => "debug",
        Command::Phonemize(a) if a.shared.verbose => "debug",
        _ => "warn",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Resolve(args) => run_resolve(args),
        Command::Phonemize(args) => run_phonemize(args),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Load the config file, if any, and apply command-line overrides.
fn load_config(shared: &SharedArgs) -> Result<PhonemizerConfig> {
    let mut config = match &shared.config {
        Some(path) => PhonemizerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PhonemizerConfig::default(),
    };
    if let Some(dir) = &shared.voicebank {
        config.voicebank_dir = Some(dir.clone());
    }
    if let Some(pack) = &shared.pack {
        config.pack_path = Some(pack.clone());
    }
    log::debug!("Config: {:?}", config);
    Ok(config)
}

// ─── Resolve ─────────────────────────────────────────────────────

fn run_resolve(args: ResolveArgs) -> Result<()> {
    let config = load_config(&args.shared)?;
    let phonemizer = Phonemizer::from_config(&config, Arc::new(AliasSet::default()))?;

    let mut resolved = Vec::with_capacity(args.shared.words.len());
    for word in &args.shared.words {
        let phonemes = phonemizer
            .resolve(word)
            .with_context(|| format!("Failed to resolve {:?}", word))?;
        resolved.push((word.as_str(), phonemes));
    }

    if args.shared.json {
        let value: serde_json::Map<String, serde_json::Value> = resolved
            .into_iter()
            .map(|(word, phonemes)| (word.to_string(), serde_json::json!(phonemes)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        for (word, phonemes) in resolved {
            println!("{}\t{}", word, phonemes.join(" "));
        }
    }
    Ok(())
}

// ─── Phonemize ───────────────────────────────────────────────────

fn run_phonemize(args: PhonemizeArgs) -> Result<()> {
    let config = load_config(&args.shared)?;
    let oto_paths: Vec<&std::path::Path> = args.oto.iter().map(|p| p.as_path()).collect();
    let inventory = AliasSet::load_oto(&oto_paths)?.with_subbanks(config.subbanks.clone());
    let phonemizer = Phonemizer::from_config(&config, Arc::new(inventory))?;

    let mut results = Vec::with_capacity(args.shared.words.len());
    for word in &args.shared.words {
        let result = phonemizer
            .phonemize_word(word, args.tone)
            .with_context(|| format!("Failed to phonemize {:?}", word))?;
        results.push(result);
    }

    if args.shared.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            let units: Vec<String> = result
                .units
                .iter()
                .map(|u| format!("[{}] {:.0}ms", u.alias, u.transition_ms))
                .collect();
            println!("{}\t{}\t{}", result.word, result.phonemes.join(" "), units.join(" "));
        }
    }
    Ok(())
}
