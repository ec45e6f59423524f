//! Confirmation prompts for destructive actions

use std::io::{self, BufRead, Write};

/// Asks the user to confirm an action
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, question: &str) -> bool {
        self(question)
    }
}

/// Reads a y/N answer from the terminal
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, question: &str) -> bool {
        let mut stderr = io::stderr();
        if write!(stderr, "{question} [y/N] ")
            .and_then(|_| stderr.flush())
            .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

/// Accepts every confirmation (`--yes`)
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _question: &str) -> bool {
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn test_closure_confirm_sees_question() {
        let mut asked = Vec::new();
        let mut confirm = |question: &str| {
            asked.push(question.to_string());
            false
        };
        assert!(!confirm.confirm("Delete?"));
        assert!(AssumeYes.confirm("Delete?"));
        assert_eq!(asked, vec!["Delete?".to_string()]);
    }
}
