use std::path::PathBuf;

use snafu::prelude::*;
use tracing::{debug, warn};

use crate::application::RuntimeConfig;
use crate::cli::Cli;
use crate::console;
use crate::ext::ResolvedPathExt;
use crate::filesystem::{MaterializationReport, MaterializeError, Materializer, TreeError};
use crate::layout::{AppName, Layout, LayoutError};
use crate::prompt::{PromptError, TerminalPrompter};

pub struct Application;

impl Application {
    pub fn run(cli_args: Cli) -> Result<(), ApplicationError> {
        let config =
            RuntimeConfig::resolve(cli_args, &TerminalPrompter).context(PromptInputSnafu)?;
        debug!("Resolved runtime config: {:?}", config);

        let Some(report) = Self::scaffold(&config)? else {
            return Ok(());
        };
        for entry in report.entries() {
            if entry.outcome.is_creation() || entry.outcome.is_planned() {
                console::print_entry(entry.outcome, &entry.path.resolved());
            }
        }
        console::print_summary(&report);
        Ok(())
    }

    /// Validates the answers, assembles the layout and materializes it.
    ///
    /// Returns `None` without touching the filesystem when no application
    /// name was given.
    pub fn scaffold(
        config: &RuntimeConfig,
    ) -> Result<Option<MaterializationReport>, ApplicationError> {
        if config.app_name.is_empty() {
            warn!("No application name given, nothing to create");
            return Ok(None);
        }
        let name = config.app_name.as_str();
        let app_name = AppName::try_from(name).context(InvalidAppNameSnafu { name })?;

        ensure!(
            config.folder_path.is_dir(),
            InvalidFolderSnafu {
                path: config.folder_path.clone()
            }
        );

        let layout = match &config.layout {
            Some(path) => Layout::read(path).context(LayoutAssemblySnafu)?,
            None => Layout::built_in(),
        };
        let descriptor = layout.assemble(&app_name).context(LayoutAssemblySnafu)?;
        let (directories, files) = descriptor.counts();
        debug!(
            "Assembled {} for '{}': {} directories, {} files",
            layout.origin(),
            app_name,
            directories,
            files
        );

        let report = Materializer::new(config.mode)
            .materialize(&config.folder_path, &descriptor)
            .context(MaterializationSnafu)?;
        Ok(Some(report))
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Could not collect the project details"))]
    PromptInputError { source: PromptError },
    #[snafu(display("Invalid application name '{}'", name))]
    InvalidAppNameError { name: String, source: TreeError },
    #[snafu(display("Enter a valid path: '{}' is not an existing directory", path.display()))]
    InvalidFolderError { path: PathBuf },
    #[snafu(display("Critical failure encountered while assembling the layout"))]
    LayoutAssemblyError { source: LayoutError },
    #[snafu(display("Critical failure encountered while creating the project"))]
    MaterializationError { source: MaterializeError },
}
