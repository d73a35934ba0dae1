use derive_more::Display;
use dialoguer::Input;
use snafu::{ResultExt, Snafu};
use tracing::debug;

/// The two values the scaffolder needs from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Question {
    #[display("Name of the application?")]
    AppName,
    #[display("Where would you like to create the project folder?")]
    FolderPath,
}

pub trait Prompter {
    /// Asks `question` and returns the raw answer, which may be empty.
    fn ask(&self, question: Question) -> Result<String, PromptError>;
}

/// Reads answers from the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&self, question: Question) -> Result<String, PromptError> {
        let answer: String = Input::new()
            .with_prompt(question.to_string())
            .allow_empty(true)
            .interact_text()
            .context(InputSnafu { question })?;
        Ok(answer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub app_name: String,
    pub folder_path: String,
}

impl Answers {
    /// Uses the values already given and asks only for the missing ones, in
    /// the order application name, then folder.
    pub fn collect(
        app_name: Option<String>,
        folder_path: Option<String>,
        prompter: &impl Prompter,
    ) -> Result<Self, PromptError> {
        let app_name = match app_name {
            Some(name) => name,
            None => prompter.ask(Question::AppName)?,
        };
        let folder_path = match folder_path {
            Some(path) => path,
            None => prompter.ask(Question::FolderPath)?,
        };

        let answers = Answers {
            app_name: app_name.trim().to_string(),
            folder_path: folder_path.trim().to_string(),
        };
        debug!("Collected answers: {:?}", answers);
        Ok(answers)
    }
}

#[derive(Debug, Snafu)]
pub enum PromptError {
    #[snafu(display("Failed to read an answer to '{}'", question))]
    InputError {
        question: Question,
        source: dialoguer::Error,
    },
}
