use std::io::{self, BufRead, Write};
use threadpick_core::{CoreError, InputProvider};

/// Asks questions on stderr and reads answers from stdin, leaving stdout
/// free for payloads.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl InputProvider for StdinPrompt {
    fn prompt(&self, message: &str) -> Result<String, CoreError> {
        let mut stderr = io::stderr();
        write!(stderr, "{}", message)?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().to_string())
    }
}

/// Reads the current code from the user's authenticator app.
pub fn two_factor_code(input: &dyn InputProvider) -> Result<String, CoreError> {
    let code = input.prompt(
        "\nEnter your two-factor authentication code from your authenticator app.\n> ",
    )?;
    if code.is_empty() {
        return Err(CoreError::InvalidInput {
            message: "two-factor authentication code is empty".to_string(),
        });
    }
    Ok(code)
}
