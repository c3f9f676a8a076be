//! browser-pilot - computer-use agent CLI
//!
//! Main entry point: one goal in, one session out.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use browser_pilot::{
    load_api_key, BrowserPage, ChromeSession, Config, GeminiClient, Goal, SessionOutcome,
    TerminalConfirmer, TurnOrchestrator,
};

/// browser-pilot - let a computer-use model drive Chrome toward a goal
#[derive(Parser, Debug)]
#[command(name = "browser-pilot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Goal for the agent, e.g. "find the weather in Paris"
    #[arg(required = true, trailing_var_arg = true)]
    goal: Vec<String>,

    /// Run Chrome without a visible window
    #[arg(long)]
    headless: bool,

    /// Maximum number of model turns
    #[arg(long, short = 't')]
    max_turns: Option<usize>,

    /// Computer-use model name
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Page to open before the first screenshot
    #[arg(long, conflicts_with = "start_file")]
    start_url: Option<String>,

    /// Local HTML file to open before the first screenshot
    #[arg(long)]
    start_file: Option<PathBuf>,

    /// File holding the Gemini API key
    #[arg(long)]
    api_key_file: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration; a broken config file is reported once logging is up
    let (mut config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Apply CLI overrides
    if args.headless {
        config.browser.headless = true;
    }
    if let Some(max_turns) = args.max_turns {
        config.agent.max_turns = max_turns;
    }
    if let Some(ref model) = args.model {
        config.model.name = model.clone();
    }
    if let Some(ref url) = args.start_url {
        config.browser.start_url = url.clone();
    }
    if let Some(ref path) = args.start_file {
        config.use_start_file(path)?;
    }
    if let Some(ref path) = args.api_key_file {
        config.model.api_key_file = path.clone();
    }
    if args.debug {
        config.agent.debug = true;
    }
    config.validate()?;

    let default_level = if config.agent.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    if let Some(e) = config_error {
        log::warn!(
            "Ignoring config file {}: {}",
            Config::config_file().display(),
            e
        );
    }

    let goal = Goal::from_words(&args.goal).context("the goal must not be empty")?;
    let api_key = load_api_key(&config.model.api_key_file)?;
    let model = GeminiClient::from_config(&config, api_key)?;

    println!("🎯 Goal: {}", goal);
    let mut session = ChromeSession::launch(&config)?;
    let mut confirmer = TerminalConfirmer::stdin();

    let result = TurnOrchestrator::new(&model, &mut session, &mut confirmer, &config)
        .run(&goal)
        .await;

    // The browser goes away on every path out of the session
    if let Err(e) = session.close() {
        log::warn!("Failed to close browser: {}", e);
    }

    let report = result?;
    if report.outcome == SessionOutcome::StoppedDenied {
        println!("\n⛔ Stopped by operator after {} turn(s).", report.turns);
    }
    log::info!(
        "Session {} after {} turn(s), {} action(s)",
        report.outcome,
        report.turns,
        report.actions_executed
    );
    Ok(())
}
