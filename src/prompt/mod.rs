mod prompter;

pub use prompter::{Answers, PromptError, Prompter, Question, TerminalPrompter};
