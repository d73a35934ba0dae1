use std::path::PathBuf;

use crate::{
    cli::Cli,
    filesystem::MaterializeMode,
    prompt::{Answers, PromptError, Prompter},
};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub app_name: String,
    pub folder_path: PathBuf,
    pub layout: Option<PathBuf>,
    pub mode: MaterializeMode,
}

impl RuntimeConfig {
    /// Fills in whatever the command line left out by asking `prompter`.
    pub fn resolve(cli: Cli, prompter: &impl Prompter) -> Result<Self, PromptError> {
        let answers = Answers::collect(cli.app_name, cli.folder_path, prompter)?;
        let mode = if cli.dry_run {
            MaterializeMode::DryRun
        } else {
            MaterializeMode::Write
        };

        Ok(Self {
            app_name: answers.app_name,
            folder_path: PathBuf::from(answers.folder_path),
            layout: cli.layout,
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::Question;
    use clap::Parser;

    struct Unreachable;

    impl Prompter for Unreachable {
        fn ask(&self, question: Question) -> Result<String, PromptError> {
            panic!("unexpected prompt: {}", question);
        }
    }

    #[test]
    fn flags_skip_the_prompt() {
        let cli = Cli::try_parse_from([
            "scaffold",
            "--app-name",
            "user-service",
            "--folder-path",
            "/tmp/out",
            "--dry-run",
        ])
        .unwrap();

        let config = RuntimeConfig::resolve(cli, &Unreachable).unwrap();

        assert_eq!(config.app_name, "user-service");
        assert_eq!(config.folder_path, PathBuf::from("/tmp/out"));
        assert_eq!(config.layout, None);
        assert_eq!(config.mode, MaterializeMode::DryRun);
    }
}
