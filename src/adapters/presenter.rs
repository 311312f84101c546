use crate::domain::model::Character;
use crate::domain::ports::Presenter;
use serde::Serialize;

/// Prints reports to stdout for the CLI host.
#[derive(Debug, Default)]
pub struct ConsolePresenter {
    quiet: bool,
}

impl ConsolePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps stdout clean, e.g. when the report is printed as JSON instead.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl Presenter for ConsolePresenter {
    fn show_ambient_message(&mut self, text: &str) {
        tracing::debug!("Ambient message: {}", text);
        if !self.quiet {
            println!("📢 {}", text);
        }
    }

    fn show_character_dialogue(&mut self, character: &Character, text: &str) {
        tracing::debug!("Dialogue from {}: {}", character.name, text);
        if self.quiet {
            return;
        }
        println!("💬 {}:", character.name);
        for line in dialogue_lines(text) {
            println!("   {}", line);
        }
    }
}

/// 把對話標記拆成可以直接顯示的句子
fn dialogue_lines(text: &str) -> Vec<String> {
    text.split("#$e#")
        .flat_map(|block| block.split("#$b#"))
        .map(strip_portrait)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_portrait(line: &str) -> &str {
    let without_digits = line.trim_end_matches(|c: char| c.is_ascii_digit());
    without_digits.strip_suffix('$').unwrap_or(line)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum Presented {
    Ambient { text: String },
    Dialogue { speaker: String, text: String },
}

/// Keeps everything it was asked to show. Used by tests and the JSON report.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub dispatched: Vec<Presented>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Presented> {
        self.dispatched.last()
    }
}

impl Presenter for RecordingPresenter {
    fn show_ambient_message(&mut self, text: &str) {
        self.dispatched.push(Presented::Ambient {
            text: text.to_string(),
        });
    }

    fn show_character_dialogue(&mut self, character: &Character, text: &str) {
        self.dispatched.push(Presented::Dialogue {
            speaker: character.name.clone(),
            text: text.to_string(),
        });
    }
}
