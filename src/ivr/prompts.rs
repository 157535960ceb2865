//! Spoken prompt catalog for both menu levels.
//!
//! The welcome prompt is intentionally bilingual since the caller has not
//! picked a language yet. Everything after that is looked up per language.

use super::Language;

/// Level one greeting, played before any language is known.
pub fn welcome() -> &'static str {
    "Thank you for calling. For English, press 1. Para Español, oprima 2."
}

pub fn main_menu(lang: Language) -> &'static str {
    match lang {
        Language::English => {
            "You have selected English. Press 1 to hear a short audio message. \
             Press 2 to speak with a live associate."
        }
        Language::Spanish => {
            "Ha seleccionado Español. Oprima 1 para escuchar un mensaje de audio. \
             Oprima 2 para hablar con un asociado."
        }
    }
}

pub fn playing_audio(lang: Language) -> &'static str {
    match lang {
        Language::English => "Now playing your audio message.",
        Language::Spanish => "Reproduciendo su mensaje de audio.",
    }
}

pub fn connecting(lang: Language) -> &'static str {
    match lang {
        Language::English => "Please wait while we connect you to a live associate.",
        Language::Spanish => "Por favor espere mientras lo conectamos con un asociado.",
    }
}

pub fn invalid_input(lang: Language) -> &'static str {
    match lang {
        Language::English => "Sorry, that is not a valid option. Please try again.",
        Language::Spanish => "Lo siento, esa no es una opción válida. Por favor intente de nuevo.",
    }
}

pub fn no_input(lang: Language) -> &'static str {
    match lang {
        Language::English => "We did not receive any input.",
        Language::Spanish => "No recibimos ninguna entrada.",
    }
}

pub fn goodbye(lang: Language) -> &'static str {
    match lang {
        Language::English => "Thank you for calling. Goodbye!",
        Language::Spanish => "Gracias por llamar. ¡Adiós!",
    }
}
