use std::io::{self, BufRead, Write};

use taskdeck_core::ports::{Confirm, Notifier};

/// Notifications go to stderr so stdout stays the rendered output.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        eprintln!("✔ {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("✖ {message}");
    }
}

/// Asks on the terminal. Anything but y/yes declines.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        if io::stderr().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}
