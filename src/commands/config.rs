//! Config and status command handlers.

use super::CliSession;
use aiveno::Dashboard;
use aiveno::cli::render;
use aiveno::config::AivenoConfig;
use aiveno::storage::StateStore;

/// Upcoming reminders shown by `status`.
const STATUS_UPCOMING: usize = 5;

/// Config command.
pub fn cmd_config(config: &AivenoConfig, show: bool) {
    if !show {
        println!("Use --show to display current configuration");
        return;
    }

    println!("Current Configuration");
    println!("=====================");
    println!();
    match &config.source {
        Some(path) => println!("Config File: {}", path.display()),
        None => println!("Config File: (none - using defaults)"),
    }
    match config.resolved_data_dir() {
        Ok(dir) => println!("Data Directory: {}", dir.display()),
        Err(e) => println!("Data Directory: (unavailable: {e})"),
    }
    println!();

    println!("LLM Configuration:");
    println!("  Provider: {}", config.llm.provider.as_str());
    println!(
        "  Model: {}",
        config.llm.model.as_deref().unwrap_or("(default)")
    );
    println!(
        "  Base URL: {}",
        config.llm.base_url.as_deref().unwrap_or("(default)")
    );
    println!(
        "  API Key: {}",
        if config.llm.api_key.is_some() {
            "(set in config)"
        } else {
            "(from environment)"
        }
    );
    let http = aiveno::cli::build_http_config(&config.llm);
    println!("  Timeout: {}ms", http.timeout_ms);
    println!("  Connect Timeout: {}ms", http.connect_timeout_ms);
    println!();

    println!("Logging:");
    println!(
        "  Level: {}",
        config.logging.level.as_deref().unwrap_or("(default)")
    );
    println!(
        "  Format: {}",
        config.logging.format.as_deref().unwrap_or("pretty")
    );
    println!(
        "  File: {}",
        config.logging.file.as_deref().unwrap_or("(stderr)")
    );
}

/// Status command.
pub fn cmd_status(session: &CliSession) {
    println!("Aiveno Status");
    println!("=============");
    println!("Hello, {}!", session.state().memory.name);
    println!();
    print!(
        "{}",
        render::format_dashboard(&Dashboard::now(session.state()), STATUS_UPCOMING)
    );
    println!();
    println!("State: {}", session.store().describe());
}
