//! Interactive prompts: catalog and module selection, login credentials.

use std::io::{self, BufRead};

use console::{style, Term};

use crate::error::{Error, Result};

const CHOICE_HINT: &str = "Enter 0 for everything or numbers separated by commas (e.g. 1, 3, 5):";

/// Parse a menu answer into zero-based indices.
///
/// `0` selects all `count` entries. Otherwise the answer is a comma-separated
/// list of one-based positions; duplicates are dropped, order is kept.
pub fn parse_choice(input: &str, count: usize) -> Result<Vec<usize>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::Selection("no option entered".into()));
    }
    if input == "0" {
        return Ok((0..count).collect());
    }

    let mut indices = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        let position: usize = part
            .parse()
            .map_err(|_| Error::Selection(format!("'{}' is not a number", part)))?;

        if position == 0 || position > count {
            return Err(Error::Selection(format!(
                "{} is out of range (1-{})",
                position, count
            )));
        }
        if !indices.contains(&(position - 1)) {
            indices.push(position - 1);
        }
    }

    Ok(indices)
}

/// Picks entries from a numbered menu, either from a preset answer or by
/// asking on the terminal.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    select_all: bool,
    answer: Option<String>,
}

impl Selector {
    pub fn new(select_all: bool, answer: Option<String>) -> Self {
        Self { select_all, answer }
    }

    /// Choose from `labels`. Returns zero-based indices.
    ///
    /// A preset answer that does not parse is an error; interactive input is
    /// asked again until it parses or input ends.
    pub fn select(&self, heading: &str, labels: &[String]) -> Result<Vec<usize>> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }
        if self.select_all {
            return Ok((0..labels.len()).collect());
        }
        if let Some(answer) = &self.answer {
            return parse_choice(answer, labels.len());
        }

        print_menu(heading, labels);
        let term = Term::stdout();
        if !term.is_term() {
            return self.select_from(labels, &mut io::stdin().lock());
        }

        loop {
            term.write_str(&format!("{} ", style(CHOICE_HINT).bold()))?;
            let line = term.read_line()?;

            match parse_choice(&line, labels.len()) {
                Ok(indices) => return Ok(indices),
                Err(e) => term.write_line(&format!("{} {}", style("Invalid choice:").red(), e))?,
            }
        }
    }

    /// Choose from `labels` by reading answers from `input`, one per line.
    ///
    /// Used when stdout is not a terminal. Invalid lines are reported and the
    /// next one is read; end of input is an error.
    pub fn select_from<R: BufRead>(&self, labels: &[String], input: &mut R) -> Result<Vec<usize>> {
        loop {
            println!("{}", CHOICE_HINT);
            let line = read_answer(input)?
                .ok_or_else(|| Error::Selection("no input".into()))?;

            match parse_choice(&line, labels.len()) {
                Ok(indices) => return Ok(indices),
                Err(e) => println!("Invalid choice: {}", e),
            }
        }
    }
}

/// Read one line from `input`. `None` at end of input.
fn read_answer<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Print a numbered menu with the `0` entry on top.
pub fn print_menu(heading: &str, labels: &[String]) {
    println!();
    println!("{}", style(heading).bold());
    println!("[0] - All");
    for (i, label) in labels.iter().enumerate() {
        println!("[{}] - {}", i + 1, label);
    }
}

/// Fill in missing login credentials from the terminal. The password is not echoed.
///
/// When stdout is not a terminal both values are read as plain lines from stdin.
pub fn prompt_credentials(email: Option<String>, password: Option<String>) -> Result<(String, String)> {
    let email = email.filter(|e| !e.trim().is_empty());
    let password = password.filter(|p| !p.is_empty());
    if let (Some(email), Some(password)) = (&email, &password) {
        return Ok((email.clone(), password.clone()));
    }

    let term = Term::stdout();
    if !term.is_term() {
        return read_credentials(email, password, &mut io::stdin().lock());
    }

    let email = match email {
        Some(email) => email,
        None => {
            term.write_str("Email: ")?;
            term.read_line()?.trim().to_string()
        }
    };

    let password = match password {
        Some(password) => password,
        None => {
            term.write_str("Password: ")?;
            term.read_secure_line()?
        }
    };

    require_credentials(email, password)
}

/// Fill in missing credentials from `input`, email line first.
pub fn read_credentials<R: BufRead>(
    email: Option<String>,
    password: Option<String>,
    input: &mut R,
) -> Result<(String, String)> {
    let email = match email {
        Some(email) => email,
        None => read_answer(input)?.unwrap_or_default().trim().to_string(),
    };
    let password = match password {
        Some(password) => password,
        None => read_answer(input)?.unwrap_or_default(),
    };

    require_credentials(email, password)
}

fn require_credentials(email: String, password: String) -> Result<(String, String)> {
    if email.is_empty() || password.is_empty() {
        return Err(Error::MissingConfig("email and password are required to log in".into()));
    }
    Ok((email, password))
}
