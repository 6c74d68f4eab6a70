// Cercanos - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Platform path resolution and config.toml loading
// 3. Logging initialisation (debug mode support)
// 4. Command dispatch (see cli.rs)

mod cli;

use cercanos::platform;
use cercanos::util;
use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();

    // --data-dir replaces both the config and data directories
    let platform_paths = match cli.data_dir.as_deref() {
        Some(dir) => platform::config::PlatformPaths::in_dir(dir),
        None => platform::config::PlatformPaths::resolve(),
    };

    // Config is read before logging so `[logging] level` can take effect.
    // Its warnings go straight to stderr, once each, whatever the log level.
    let (config, config_warnings) = platform::config::load_config(&platform_paths.config_dir);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "Cercanos starting"
    );

    cli::report_config_warnings(&mut std::io::stderr(), &config_warnings);

    if let Err(e) = cli::run(cli, &platform_paths, &config) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
