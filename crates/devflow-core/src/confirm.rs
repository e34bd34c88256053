use crate::error::Result;

/// Yes/no questions asked before replacing or deleting user files.
pub trait Confirm {
    /// False when no terminal is attached. Callers proceed without asking.
    fn is_interactive(&self) -> bool;
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Non-interactive answerer that accepts everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn is_interactive(&self) -> bool {
        false
    }

    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Ask `prompt` when interactive; otherwise answer yes without blocking.
pub fn confirm_or_proceed(confirm: &dyn Confirm, prompt: &str) -> Result<bool> {
    if confirm.is_interactive() {
        confirm.confirm(prompt)
    } else {
        Ok(true)
    }
}
