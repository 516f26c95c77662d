// Main entry point
use clap::Parser;
use colored::Colorize;
use lingo_relay::application::translate::{self, OutputMode, StreamFormat};
use lingo_relay::domain::model::{Overrides, TranslationRequest};
use lingo_relay::domain::traits::{EnvSource, ProcessEnv};
use lingo_relay::infrastructure::config::{self, load_config};
use lingo_relay::infrastructure::providers::PROVIDERS;
use lingo_relay::interfaces::cli::Cli;
use lingo_relay::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }
    if cli.edit_config {
        if let Some(config_path) = config::get_config_path() {
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            tokio::task::spawn_blocking(move || {
                std::process::Command::new(editor).arg(&config_path).status()
            })
            .await??;
        } else {
            eprintln!("{}", "Config file not found".red());
        }
        return Ok(());
    }

    let state = AppState::new(config)?;

    if cli.status {
        print_status(&state);
        return Ok(());
    }

    if cli.text.is_empty() {
        eprintln!("{}", "Please provide the text to translate".red());
        std::process::exit(1);
    }
    let Some(target_lang) = cli
        .target_lang
        .clone()
        .or_else(|| state.config.default_target_lang.clone())
    else {
        eprintln!("{}", "Please provide a target language with -l".red());
        std::process::exit(1);
    };

    let platform = cli
        .platform
        .clone()
        .or_else(|| {
            // Without an explicit platform, a custom base URL decides
            cli.base_url
                .is_none()
                .then(|| state.config.default_platform.clone())
        });
    let overrides = Overrides::new(cli.api_key.clone(), cli.base_url.clone(), cli.model.clone());

    let translator = match state.translator_for(platform.as_deref(), &overrides) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            std::process::exit(1);
        }
    };

    if cli.sse && !state.config.stream {
        eprintln!(
            "{}",
            "--sse overrides `stream = false` from the config file".yellow()
        );
    }
    let mode = OutputMode::select(cli.no_stream, cli.sse, state.config.stream);
    let request = TranslationRequest::new(cli.text.join(" "), target_lang)
        .with_source_lang(cli.source_lang.clone())
        .streaming(mode != OutputMode::Whole);

    let OutputMode::Stream(format) = mode else {
        match translate::translate_text(&translator, &request).await {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                std::process::exit(1);
            }
        }
        return Ok(());
    };
    let mut stdout = std::io::stdout();

    // Dropping the stream on Ctrl-C closes the upstream connection
    tokio::select! {
        result = translate::stream_translation(&translator, &request, format, &mut stdout) => {
            let summary = result?;
            if format == StreamFormat::Plain {
                println!();
            }
            if summary.failed() {
                // SSE output already carries the error frame
                if let (StreamFormat::Plain, Some(err)) = (format, &summary.error) {
                    eprintln!("{}", err.red());
                }
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            eprintln!("\n{}", "Translation interrupted".yellow());
        }
    }

    Ok(())
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = config::log_directive(&logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn print_status(state: &AppState) {
    println!("{}", "lingo-relay Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!(
        "Config: {}",
        config::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );
    println!("Default platform: {}", state.config.default_platform);

    let env = ProcessEnv;
    for profile in PROVIDERS {
        let key = if env.get(profile.api_key_env).is_some_and(|v| !v.trim().is_empty()) {
            "key set".green()
        } else {
            "no key".red()
        };
        println!(
            "  {:<12} {:<8} {} ({})",
            profile.id,
            key,
            profile.default_base_url.unwrap_or("-"),
            profile.default_model.unwrap_or("-")
        );
    }

    let fallback = state.resolver.fallback();
    println!(
        "Fallback: api_key {}, base_url {}, model {}",
        if fallback.api_key.is_some() { "set" } else { "unset" },
        fallback.base_url.as_deref().unwrap_or("unset"),
        fallback.model.as_deref().unwrap_or("unset")
    );
}
