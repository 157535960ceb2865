//! Menu logic for the two-level DTMF call flow.
//!
//! Unlike an in-process state machine, each webhook request carries all the
//! state it needs (the language lives in the URL path, the pressed digit in
//! the form body), so the transitions here are pure functions over the
//! posted digits.
//!
//! ```text
//! welcome ── 1 → main menu (en) ── 1 → play message, hang up
//!         ── 2 → main menu (es) ── 2 → dial associate, hang up
//!         └─ other/none → replay   └─ other/none → replay menu
//! ```

use std::fmt;

pub mod prompts;

/// Seconds a caller has to press a digit before the document falls through
/// to the no-input elements.
pub const DIGIT_TIMEOUT_SECS: u32 = 10;
/// Both menu levels accept exactly these digits.
pub const VALID_DIGITS: &str = "12";
/// How many times Plivo re-plays the prompt before giving up on input.
pub const DIGIT_RETRIES: u32 = 2;
/// Ring time allowed when bridging the caller to an associate.
pub const DIAL_TIMEOUT_SECS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Spanish,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::English),
            "es" => Some(Language::Spanish),
            _ => None,
        }
    }

    /// Plivo TTS voice used for this language.
    pub fn voice(&self) -> &'static str {
        match self {
            Language::English => "Polly.Joanna",
            Language::Spanish => "Polly.Conchita",
        }
    }

    pub fn locale(&self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Spanish => "es-ES",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Outcome of the language selection level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageChoice {
    Menu(Language),
    Retry,
}

/// Maps the digits posted after the welcome prompt to the next step.
/// Anything other than a lone 1 or 2 sends the caller back to the prompt.
pub fn language_transition(digits: Option<&str>) -> LanguageChoice {
    match digits {
        Some("1") => LanguageChoice::Menu(Language::English),
        Some("2") => LanguageChoice::Menu(Language::Spanish),
        _ => LanguageChoice::Retry,
    }
}

/// Outcome of the per-language main menu level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    PlayMessage,
    ConnectAssociate,
    Retry,
}

pub fn menu_transition(digits: Option<&str>) -> MenuChoice {
    match digits {
        Some("1") => MenuChoice::PlayMessage,
        Some("2") => MenuChoice::ConnectAssociate,
        _ => MenuChoice::Retry,
    }
}
