//! Interactive confirmation prompt.

use std::io::{self, BufRead, Write};

use crate::error::Result;

/// Ask a yes/no question on the terminal. Only an explicit affirmative
/// answer returns true; anything else (including EOF) declines.
pub fn confirm(question: &str) -> Result<bool> {
    let mut stderr = io::stderr().lock();
    write!(stderr, "{} [y/N] ", question)?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y" | "yes" | "Yes" | "YES")
}
