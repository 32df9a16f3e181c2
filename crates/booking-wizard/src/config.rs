//! Wizard configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// What happens to an answer that arrived by voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceAnswerPolicy {
    /// Run the step's normal checks before moving on
    #[default]
    Validate,
    /// Move on without re-checking text, date and time answers
    Trust,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WizardConfig {
    /// Pause between writing a voice answer and advancing
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    #[serde(default)]
    pub voice_answers: VoiceAnswerPolicy,

    #[serde(default)]
    pub locale: Locale,

    /// Suppress prompt read-out
    #[serde(default)]
    pub muted: bool,
}

fn default_settle_delay_ms() -> u64 {
    150
}

impl WizardConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_voice_answers(mut self, policy: VoiceAnswerPolicy) -> Self {
        self.voice_answers = policy;
        self
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            voice_answers: VoiceAnswerPolicy::default(),
            locale: Locale::default(),
            muted: false,
        }
    }
}
