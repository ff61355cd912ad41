//! jsonlingo - translate the text embedded in JSON documents
//!
//! Command-line entry point: parses arguments, sets up logging and
//! configuration, then hands off to the library workflow.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info, warn};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use jsonlingo::cli::{Args, Commands, ConfigAction, CredentialAction, LanguageAction, parse_language_list};
use jsonlingo::config::{Config, TranslationMode};
use jsonlingo::credentials::{
    AWS_ACCESS_KEY, AWS_SECRET_KEY, CredentialBundle, CredentialStore, OPENAI_KEY, mask_secret,
};
use jsonlingo::engine::{EngineFactory, EngineKind};
use jsonlingo::error::LingoError;
use jsonlingo::language::{LanguageManager, LanguageNames};
use jsonlingo::mode::ModeFactory;
use jsonlingo::status::{CancelFlag, ProgressStatus};
use jsonlingo::workflow::{TranslationRequest, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try config.toml in the current directory first
            if Path::new("config.toml").exists() {
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    setup_logging(args.verbose, &config.log_dir())?;
    info!("Starting jsonlingo");

    let names = LanguageNames::load(config.paths.language_map_file.as_deref())?;

    match args.command {
        Commands::Translate { input, engine, mode, targets, source, output_dir } => {
            let mode: TranslationMode = mode.parse()?;
            let target_langs = resolve_targets(&config, &names, targets);
            let source_lang = source.unwrap_or_else(|| config.default_source_lang.clone());
            let workflow = build_workflow(&config, &engine, names)?;

            let request = TranslationRequest {
                input,
                mode,
                source_lang,
                target_langs,
                output_dir,
            };
            let mut progress = ProgressStatus::new();
            let summary = workflow.translate_file(&request, &mut progress).await;
            progress.finish("done");
            let summary = summary?;

            if summary.outputs.is_empty() {
                println!("No translatable texts found in {}", request.input.display());
            }
            for path in &summary.outputs {
                println!("Saved translated file: {}", path.display());
            }
        }
        Commands::Batch { input_dir, engine, mode, targets, source, output_dir } => {
            let mode: TranslationMode = mode.parse()?;
            let target_langs = resolve_targets(&config, &names, targets);
            let source_lang = source.unwrap_or_else(|| config.default_source_lang.clone());
            let workflow = build_workflow(&config, &engine, names)?;

            let mut progress = ProgressStatus::new();
            let summary = workflow
                .translate_directory(
                    &input_dir,
                    mode,
                    &source_lang,
                    &target_langs,
                    output_dir.as_deref(),
                    &mut progress,
                )
                .await;
            progress.finish("done");
            let summary = summary?;

            println!(
                "Processed {} file(s), {} failed, {} output file(s) written",
                summary.processed,
                summary.failed,
                summary.outputs.len()
            );
        }
        Commands::Verify { engine } => {
            let workflow = build_workflow(&config, &engine, names)?;
            workflow.engine().verify().await?;
            println!("{} engine is ready", workflow.engine().name());
        }
        Commands::Modes => {
            println!("\nTranslation Modes:");
            println!("{:<10} {}", "Name", "Description");
            println!("{}", "-".repeat(70));
            for (name, description) in ModeFactory::describe_all() {
                println!("{:<10} {}", name, description);
            }
        }
        Commands::Languages { action } => {
            let manager = LanguageManager::new(config.languages_path(), names);
            match action {
                LanguageAction::List { all } => {
                    println!("\nSelected Languages:");
                    for code in manager.languages() {
                        println!("{:<8} {}", code, manager.names().name(&code));
                    }
                    if all {
                        println!("\nKnown Languages:");
                        for (code, name) in manager.names().iter() {
                            println!("{:<8} {}", code, name);
                        }
                    }
                }
                LanguageAction::Add { code } => {
                    let languages = manager.add(&code)?;
                    println!("Target languages: {}", languages.join(", "));
                }
                LanguageAction::Remove { code } => {
                    let languages = manager.remove(&code)?;
                    println!("Target languages: {}", languages.join(", "));
                }
            }
        }
        Commands::Credentials { action } => {
            let mut store = CredentialStore::load(config.credentials_path())?;
            match action {
                CredentialAction::Set { engine, api_key, access_key, secret_key } => {
                    let kind: EngineKind = engine.parse()?;
                    let bundle = credential_bundle(kind, api_key, access_key, secret_key)?;
                    store.save(kind.id(), bundle)?;
                    println!("Credentials saved for {}", kind);
                }
                CredentialAction::Clear { engine } => {
                    let kind = engine.map(|e| e.parse::<EngineKind>()).transpose()?;
                    store.clear(kind.map(|k| k.id()))?;
                    println!("Credentials cleared");
                }
                CredentialAction::Show => {
                    let mut any = false;
                    for (engine, bundle) in store.engines() {
                        for (key, value) in bundle {
                            println!("{:<10} {:<16} {}", engine, key, mask_secret(value));
                            any = true;
                        }
                    }
                    if !any {
                        println!("No credentials stored in {}", store.path().display());
                    }
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { output, force } => {
                if output.exists() && !force {
                    return Err(LingoError::Config(format!(
                        "{} already exists; pass --force to overwrite",
                        output.display()
                    ))
                    .into());
                }
                Config::default().save_to_file(&output)?;
                println!("Wrote default configuration to {}", output.display());
            }
        },
    }

    info!("jsonlingo completed successfully");
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool, log_dir: &Path) -> Result<()> {
    let log_dir: PathBuf = if log_dir.is_absolute() {
        log_dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(log_dir)
    };
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotation; the guard must outlive the program
    let file_appender = rolling::daily(&log_dir, "jsonlingo.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    std::mem::forget(_guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("jsonlingo.log").display()
    );

    Ok(())
}

/// Create the engine, then a workflow whose cancel flag trips on Ctrl-C
fn build_workflow(config: &Config, engine: &str, names: LanguageNames) -> Result<Workflow> {
    let kind: EngineKind = engine.parse()?;
    let credentials = CredentialStore::load(config.credentials_path())?;
    let engine = EngineFactory::create(kind, config, &credentials, names)?;

    let cancel = CancelFlag::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current batch");
            on_signal.cancel();
        }
    });

    Ok(Workflow::new(config.clone(), engine, cancel))
}

/// Explicit `--targets`, else the saved language list
fn resolve_targets(config: &Config, names: &LanguageNames, targets: Option<String>) -> Vec<String> {
    match targets {
        Some(list) => parse_language_list(&list),
        None => LanguageManager::new(config.languages_path(), names.clone()).languages(),
    }
}

fn credential_bundle(
    kind: EngineKind,
    api_key: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
) -> Result<CredentialBundle> {
    let missing = |flag: &str| LingoError::Credentials(format!("{} requires {}", kind, flag));
    let mut bundle = CredentialBundle::new();
    match kind {
        EngineKind::OpenAi => {
            bundle.insert(OPENAI_KEY.to_string(), api_key.ok_or_else(|| missing("--api-key"))?);
        }
        EngineKind::Amazon => {
            bundle.insert(AWS_ACCESS_KEY.to_string(), access_key.ok_or_else(|| missing("--access-key"))?);
            bundle.insert(AWS_SECRET_KEY.to_string(), secret_key.ok_or_else(|| missing("--secret-key"))?);
        }
        EngineKind::Local => {
            return Err(LingoError::Credentials("The local engine needs no credentials".to_string()).into());
        }
    }
    Ok(bundle)
}
