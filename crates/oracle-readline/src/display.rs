//! Terminal rendering: colored output, the typing effect, and retry notices.

use colored::{ColoredString, Colorize};
use oracle_core::output::{OutputSink, Style, Tone};
use oracle_interaction::AttemptObserver;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// Writes to stdout, revealing typed styles one character at a time.
pub struct TerminalSink {
    typing_delay: Duration,
}

impl TerminalSink {
    pub fn new(typing_delay: Duration) -> Self {
        Self { typing_delay }
    }
}

impl OutputSink for TerminalSink {
    fn write(&mut self, text: &str, style: Style) {
        if !style.typed {
            println!("{}", paint(text, style));
            return;
        }

        let mut stdout = io::stdout().lock();
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            let _ = write!(stdout, "{}", paint(ch.encode_utf8(&mut buf), style));
            let _ = stdout.flush();
            thread::sleep(self.typing_delay);
        }
        let _ = writeln!(stdout);
    }
}

pub fn paint(text: &str, style: Style) -> ColoredString {
    let colored = match style.tone {
        Tone::Plain => text.normal(),
        Tone::Oracle => text.bright_cyan(),
        Tone::Mystic => text.bright_magenta(),
        Tone::Success => text.bright_green(),
        Tone::Warning => text.bright_yellow(),
        Tone::Error => text.bright_red(),
        Tone::Menu => text.bright_blue(),
    };
    if style.bold { colored.bold() } else { colored }
}

/// Prints executor retry/failure notices as they happen.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleObserver;

impl AttemptObserver for ConsoleObserver {
    fn on_retry(&self, attempt: u32, reason: &str, wait: Duration) {
        tracing::warn!(attempt, wait_secs = wait.as_secs(), "Network error: {reason}");
        println!(
            "{}",
            format!("Network Error (Attempt {attempt}): {reason}. Retrying...").bright_yellow()
        );
    }

    fn on_give_up(&self, attempt: u32, reason: &str) {
        tracing::warn!(attempt, "Network error: {reason}. Giving up");
        println!(
            "{}",
            format!("Network Error (Attempt {attempt}): {reason}.").bright_yellow()
        );
    }

    fn on_permanent_failure(&self, status: u16, body: &str) {
        tracing::error!(status, "API HTTPError: {body}");
        println!("{}", format!("API HTTPError: {body}").bright_red());
    }
}
