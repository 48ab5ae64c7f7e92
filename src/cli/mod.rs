//! Command-line interface: arguments and interactive prompts.

pub mod args;
pub mod prompt;

pub use args::{Args, PreAnswers};
pub use prompt::{parse_choice, print_menu, prompt_credentials, read_credentials, Selector};
