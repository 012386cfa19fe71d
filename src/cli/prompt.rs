//! Interactive prompts
//!
//! Passwords are read without echo via `rpassword`. End of input on a prompt
//! is treated as the user backing out.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::crypto::SecureString;
use crate::error::{PorterError, PorterResult};

/// Environment variable that supplies the backup password non-interactively
pub const PASSWORD_ENV: &str = "PORTER_PASSWORD";

fn read_error(e: io::Error) -> PorterError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        PorterError::UserCancelled("no password entered".to_string())
    } else {
        PorterError::Io(format!("Failed to read password: {}", e))
    }
}

/// Prompt for a password (hidden input)
pub fn prompt_password(prompt: &str) -> PorterResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::from)
        .map_err(read_error)
}

/// Prompt for a new password twice until both entries match
pub fn prompt_new_password() -> PorterResult<SecureString> {
    loop {
        let first = prompt_password("Backup password: ")?;
        let second = prompt_password("Confirm password: ")?;

        if first.as_str() == second.as_str() {
            return Ok(first);
        }
        println!("Passwords do not match. Please try again.");
    }
}

/// Use the supplied password or ask for one
pub fn password_or_prompt(supplied: Option<String>, confirm: bool) -> PorterResult<SecureString> {
    match supplied {
        Some(password) => Ok(SecureString::from(password)),
        None if confirm => prompt_new_password(),
        None => prompt_password("Backup password: "),
    }
}

/// Ask where to save the artifact
///
/// An empty answer takes `suggested`; end of input returns `None`.
pub fn prompt_destination(suggested: &str) -> PorterResult<Option<PathBuf>> {
    let stdin = io::stdin();
    prompt_destination_from(&mut stdin.lock(), suggested)
}

fn prompt_destination_from<R: BufRead>(
    input: &mut R,
    suggested: &str,
) -> PorterResult<Option<PathBuf>> {
    print!("Save backup to [{}]: ", suggested);
    io::stdout().flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        println!();
        return Ok(None);
    }

    let answer = answer.trim();
    if answer.is_empty() {
        Ok(Some(PathBuf::from(suggested)))
    } else {
        Ok(Some(PathBuf::from(answer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_destination_default_on_empty_answer() {
        let mut input = Cursor::new("\n");
        let chosen = prompt_destination_from(&mut input, "backup.enc").unwrap();
        assert_eq!(chosen, Some(PathBuf::from("backup.enc")));
    }

    #[test]
    fn test_destination_custom_answer() {
        let mut input = Cursor::new("  /tmp/out.enc \n");
        let chosen = prompt_destination_from(&mut input, "backup.enc").unwrap();
        assert_eq!(chosen, Some(PathBuf::from("/tmp/out.enc")));
    }

    #[test]
    fn test_destination_eof_is_none() {
        let mut input = Cursor::new("");
        assert_eq!(prompt_destination_from(&mut input, "backup.enc").unwrap(), None);
    }

    #[test]
    fn test_supplied_password_skips_prompt() {
        let password = password_or_prompt(Some("from-env-password".into()), true).unwrap();
        assert_eq!(password.as_str(), "from-env-password");
    }

    #[test]
    fn test_eof_reads_as_cancel() {
        let err = read_error(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(err.is_cancelled());
    }
}
