//! The interactive menu loop.
//!
//! A small state machine: the key is resolved once, then every menu choice
//! runs to completion and lands back in `MenuIdle` until the dreamer exits.
//! Executor and journal failures are shown and the loop continues; only a
//! missing API key ends the session early.

use crate::api_key::{ApiKeySources, resolve_api_key};
use crate::prompter::Prompter;
use oracle_core::config::OracleConfig;
use oracle_core::journal::{ClearOutcome, Confirmation, DreamEntry, JournalRepository};
use oracle_core::output::{OutputSink, Style, Tone};
use oracle_interaction::{GeminiClient, RequestExecutor};
use std::sync::Arc;

const RULE_WIDTH: usize = 60;

pub const WELCOME: &str = "🔮 Welcome, Dreamer... The Dream Oracle awaits your vision. 🌙";
pub const FAREWELL: &str = "May your waking life be as insightful as your dreams. Farewell. 🌌";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    AwaitingApiKey,
    MenuIdle,
    Interpreting,
    Saving(DreamEntry),
    Viewing,
    Clearing,
    Exiting,
}

pub struct Session<P, S> {
    config: OracleConfig,
    key_sources: ApiKeySources,
    executor: RequestExecutor,
    journal: Arc<dyn JournalRepository>,
    client: Option<GeminiClient>,
    prompter: P,
    sink: S,
}

impl<P: Prompter, S: OutputSink> Session<P, S> {
    pub fn new(
        config: OracleConfig,
        key_sources: ApiKeySources,
        executor: RequestExecutor,
        journal: Arc<dyn JournalRepository>,
        prompter: P,
        sink: S,
    ) -> Self {
        Self {
            config,
            key_sources,
            executor,
            journal,
            client: None,
            prompter,
            sink,
        }
    }

    #[cfg(test)]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs until the dreamer exits or no API key can be obtained.
    pub async fn run(&mut self) {
        self.say(WELCOME, Style::new(Tone::Mystic).typed());

        let mut state = SessionState::AwaitingApiKey;
        loop {
            tracing::debug!(?state, "Session state");
            state = match state {
                SessionState::AwaitingApiKey => self.await_api_key(),
                SessionState::MenuIdle => self.menu(),
                SessionState::Interpreting => self.interpret().await,
                SessionState::Saving(entry) => self.save(entry).await,
                SessionState::Viewing => self.view().await,
                SessionState::Clearing => self.clear().await,
                SessionState::Exiting => break,
            };
        }
    }

    fn say(&mut self, text: &str, style: Style) {
        self.sink.write(text, style);
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        self.prompter.read_line(prompt)
    }

    /// "Press Enter" pause between an action and the next menu.
    fn back_to_menu(&mut self) -> SessionState {
        let _ = self.ask("\nPress Enter to return to the menu...");
        SessionState::MenuIdle
    }

    fn await_api_key(&mut self) -> SessionState {
        match resolve_api_key(&self.key_sources, &mut self.prompter, &mut self.sink) {
            Some((key, source)) => {
                tracing::info!(?source, "API key resolved");
                self.client = Some(GeminiClient::new(self.executor.clone(), key, &self.config));
                SessionState::MenuIdle
            }
            None => {
                tracing::info!("No API key provided");
                self.say("No API key provided. Exiting.", Style::new(Tone::Error));
                SessionState::Exiting
            }
        }
    }

    fn menu(&mut self) -> SessionState {
        self.say("", Style::plain());
        self.say("--- Dream Oracle Menu ---", Style::new(Tone::Oracle).bold());
        self.say("1. Interpret a New Dream", Style::new(Tone::Success));
        self.say("2. View Your Dream Journal", Style::new(Tone::Menu));
        self.say("3. Clear Your Dream Journal", Style::new(Tone::Error));
        self.say("4. Exit", Style::new(Tone::Warning));

        let Some(choice) = self.ask("\nChoose an option (1-4): ") else {
            return SessionState::Exiting;
        };

        match choice.trim() {
            "1" => SessionState::Interpreting,
            "2" => SessionState::Viewing,
            "3" => SessionState::Clearing,
            "4" => {
                self.say(FAREWELL, Style::new(Tone::Mystic).typed());
                SessionState::Exiting
            }
            other => {
                tracing::debug!(choice = other, "Invalid menu choice");
                self.say(
                    "Invalid choice. Please select a number from 1 to 4.",
                    Style::new(Tone::Error),
                );
                self.back_to_menu()
            }
        }
    }

    async fn interpret(&mut self) -> SessionState {
        let Some(client) = self.client.clone() else {
            return SessionState::AwaitingApiKey;
        };

        self.say("", Style::plain());
        self.say("Describe your dream in detail:", Style::new(Tone::Oracle));
        let dream = self.ask("> ").unwrap_or_default();
        if dream.trim().is_empty() {
            self.say(
                "You must provide a dream to be interpreted.",
                Style::new(Tone::Warning),
            );
            return SessionState::MenuIdle;
        }

        self.say(
            "\nThe Oracle is gazing into the ether... please wait.",
            Style::new(Tone::Mystic),
        );
        let interpretation = match client.interpret_dream(&dream).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!("Interpretation failed: {}", err);
                self.say("API call failed after all retries.", Style::new(Tone::Error));
                format!("The Oracle is silent. {err}")
            }
        };

        self.say("", Style::plain());
        self.say("--- The Oracle Speaks ---", Style::new(Tone::Mystic).bold());
        self.say(&interpretation, Style::new(Tone::Oracle).typed());

        let answer = self
            .ask("\nWould you like to record this vision in your journal? (y/n): ")
            .unwrap_or_default();
        if Confirmation::from_answer(&answer) == Confirmation::Confirmed {
            SessionState::Saving(DreamEntry::new(&dream, &interpretation))
        } else {
            self.back_to_menu()
        }
    }

    async fn save(&mut self, entry: DreamEntry) -> SessionState {
        match self.journal.append(&entry).await {
            Ok(()) => self.say(
                "Your dream has been etched into memory.",
                Style::new(Tone::Success).typed(),
            ),
            Err(err) => {
                tracing::error!("Failed to save dream: {}", err);
                self.say(&format!("Failed to save dream: {err}"), Style::new(Tone::Error));
            }
        }
        self.back_to_menu()
    }

    async fn view(&mut self) -> SessionState {
        match self.journal.read_all().await {
            Ok(None) => self.say(
                "Your dream journal is empty. Time to start dreaming!",
                Style::new(Tone::Warning).typed(),
            ),
            Ok(Some(content)) => {
                let rule = "-".repeat(RULE_WIDTH);
                self.say("", Style::plain());
                self.say("📜 Your Dream Journal 📜", Style::new(Tone::Mystic).bold());
                self.say(&rule, Style::new(Tone::Menu));
                self.say(&content, Style::new(Tone::Oracle));
                self.say(&rule, Style::new(Tone::Menu));
            }
            Err(err) => {
                tracing::error!("Could not read the journal file: {}", err);
                self.say(
                    &format!("Could not read the journal file: {err}"),
                    Style::new(Tone::Error),
                );
            }
        }
        self.back_to_menu()
    }

    async fn clear(&mut self) -> SessionState {
        match self.journal.exists().await {
            Ok(true) => {}
            Ok(false) => {
                self.say("No journal found to clear.", Style::new(Tone::Warning).typed());
                return self.back_to_menu();
            }
            Err(err) => {
                tracing::error!("Could not check the journal file: {}", err);
                self.say(
                    &format!("Could not check the journal file: {err}"),
                    Style::new(Tone::Error),
                );
                return self.back_to_menu();
            }
        }

        let answer = self
            .ask("Are you sure you want to erase all saved dreams? This cannot be undone. (y/n): ")
            .unwrap_or_default();

        match self.journal.clear(Confirmation::from_answer(&answer)).await {
            Ok(ClearOutcome::Cleared) => self.say(
                "The old memories have faded into mist. Your journal is clear.",
                Style::new(Tone::Error).typed(),
            ),
            Ok(ClearOutcome::Declined) => self.say(
                "The journal remains untouched.",
                Style::new(Tone::Success).typed(),
            ),
            Ok(ClearOutcome::NothingToClear) => {
                self.say("No journal found to clear.", Style::new(Tone::Warning).typed())
            }
            Err(err) => {
                tracing::error!("Failed to clear journal: {}", err);
                self.say(
                    &format!("Failed to clear journal: {err}"),
                    Style::new(Tone::Error),
                );
            }
        }
        self.back_to_menu()
    }
}
