//! Collecting a passphrase from the user.

use crate::domain::{KeyId, Passphrase};
use crate::foundation::UnlockError;

/// What the user is being asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub key_id: KeyId,
    /// Master key of the ring when it differs from `key_id`.
    pub master_key_id: Option<KeyId>,
}

impl PromptRequest {
    pub fn message(&self) -> String {
        match (self.key_id, self.master_key_id) {
            (KeyId::Symmetric, _) => "Passphrase for symmetric encryption: ".to_string(),
            (key_id, Some(master)) if master != key_id => format!("Passphrase for key {key_id} (master {master}): "),
            (key_id, _) => format!("Passphrase for key {key_id}: "),
        }
    }
}

/// Blocking source of passphrases; `Ok(None)` means the user cancelled.
pub trait PassphrasePrompter: Send + Sync {
    fn prompt(&self, request: &PromptRequest) -> Result<Option<Passphrase>, UnlockError>;
}

/// Reads a passphrase from the controlling terminal with echo disabled.
///
/// An empty line or end of input counts as cancellation.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl PassphrasePrompter for TerminalPrompter {
    fn prompt(&self, request: &PromptRequest) -> Result<Option<Passphrase>, UnlockError> {
        let input = prompt_hidden_input(&request.message())?;
        if input.is_empty() {
            return Ok(None);
        }
        Ok(Some(Passphrase::new(input)))
    }
}

pub fn prompt_hidden_input(prompt: &str) -> Result<String, UnlockError> {
    #[cfg(target_family = "unix")]
    {
        prompt_hidden_input_unix(prompt)
    }
    #[cfg(not(target_family = "unix"))]
    {
        prompt_visible_input(prompt)
    }
}

#[cfg(not(target_family = "unix"))]
fn prompt_visible_input(prompt: &str) -> Result<String, UnlockError> {
    use std::io::{self, Write};

    eprint!("{prompt}");
    io::stderr().flush().map_err(|e| UnlockError::prompt_failed(format!("failed to flush stderr: {e}")))?;

    read_line()
}

fn read_line() -> Result<String, UnlockError> {
    use std::io;
    use zeroize::Zeroize;

    let mut input = String::new();
    io::stdin().read_line(&mut input).map_err(|e| UnlockError::prompt_failed(format!("failed to read input: {e}")))?;

    let line = input.trim_end_matches(&['\r', '\n'][..]).to_string();
    input.zeroize();
    Ok(line)
}

#[cfg(target_family = "unix")]
fn prompt_hidden_input_unix(prompt: &str) -> Result<String, UnlockError> {
    use libc::{tcgetattr, tcsetattr, ECHO, STDIN_FILENO, TCSANOW};
    use std::io::{self, Write};
    use std::mem::MaybeUninit;

    struct EchoGuard {
        original: libc::termios,
    }

    impl Drop for EchoGuard {
        fn drop(&mut self) {
            let rc = unsafe { tcsetattr(STDIN_FILENO, TCSANOW, &self.original) };
            if rc != 0 {
                log::warn!("failed to restore terminal echo after passphrase input");
            }
        }
    }

    eprint!("{prompt}");
    io::stderr().flush().map_err(|e| UnlockError::prompt_failed(format!("failed to flush stderr: {e}")))?;

    let mut termios = MaybeUninit::<libc::termios>::uninit();
    let rc = unsafe { tcgetattr(STDIN_FILENO, termios.as_mut_ptr()) };
    if rc != 0 {
        // Not a tty (piped input); read as-is.
        return read_line();
    }
    let mut termios = unsafe { termios.assume_init() };
    let original = termios;
    termios.c_lflag &= !ECHO;

    if unsafe { tcsetattr(STDIN_FILENO, TCSANOW, &termios) } != 0 {
        return read_line();
    }
    let _guard = EchoGuard { original };

    let input = read_line()?;
    // Newline was not echoed while ECHO was disabled.
    eprintln!();
    Ok(input)
}
