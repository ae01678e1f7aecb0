//! Command-line argument definition.

use std::path::PathBuf;

use clap::Parser;

/// earthview - set a random Earth View image as the desktop wallpaper
#[derive(Parser, Debug)]
#[command(name = "earthview")]
#[command(version)]
#[command(about = "Set a random Earth View image as the desktop wallpaper", long_about = None)]
pub struct Args {
    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Read settings from this file instead of ~/.config/earthview/settings.conf
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fetch and cache an image but leave the desktop background alone
    #[arg(long)]
    pub no_wallpaper: bool,
}

/// What: Determine the log level from command-line arguments.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Log level string (trace, debug, info, warn, error).
///
/// Details:
/// - Verbose flag overrides `--log-level`.
#[must_use]
pub fn determine_log_level(args: &Args) -> String {
    if args.verbose {
        "debug".to_string()
    } else {
        args.log_level.clone()
    }
}
