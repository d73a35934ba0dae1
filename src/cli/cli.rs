use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Scaffold a microservice project skeleton.
///
/// Without arguments the application name and target folder are asked for
/// interactively.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Name of the application, used as the project's root directory
    #[clap(long)]
    pub app_name: Option<String>,

    /// Existing directory under which the project is created
    #[clap(long)]
    pub folder_path: Option<String>,

    /// YAML layout to materialize instead of the built-in one
    #[clap(long)]
    pub layout: Option<PathBuf>,

    /// Report what would be created without writing anything
    #[clap(long)]
    pub dry_run: bool,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}
