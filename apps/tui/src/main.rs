use clap::Parser;
use color_eyre::Result;
use family_tree_tui::api::ApiClient;
use family_tree_tui::app::App;
use family_tree_tui::cli::CliArgs;
use family_tree_tui::config::init_app_config;
use family_tree_tui::logging::{init_logging, LogTarget};
use family_tree_tui::{event, terminal};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let config = match init_app_config(args.zoom_limits(), args.request_timeout()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}\n");
            eprintln!("{}", CliArgs::help_text());
            return Err(e);
        }
    };

    // Check if we're running in a terminal
    if args.headless || !is_terminal() {
        init_logging(LogTarget::Stderr, config.debug)?;
        return event::run_headless(&config, args.json).await;
    }

    init_logging(LogTarget::File(&config.log_file), config.debug)?;
    tracing::info!(
        base_url = config.endpoints.base_url(),
        tree_id = %config.tree_id,
        "starting family tree viewer"
    );

    let client = Arc::new(ApiClient::new(config.endpoints.clone(), config.request_timeout)?);
    let mut app = App::new(config);

    // Setup terminal
    let mut terminal = terminal::setup_terminal()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app, client).await;

    // Restore terminal
    terminal::cleanup_terminal_state(true, true);

    if let Err(e) = &result {
        tracing::error!(error = %e, "event loop failed");
    }
    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
