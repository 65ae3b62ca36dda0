//! Confirm port: synchronous yes/no gate before destructive actions.

pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Always answers the same way. Used for `--yes` and in tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticConfirm(pub bool);

impl Confirm for StaticConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
