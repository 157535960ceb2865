use crate::app::AppState;
use crate::handler::DigitsForm;
use crate::ivr::{
    self, language_transition, menu_transition, prompts, Language, LanguageChoice, MenuChoice,
};
use crate::plivo::xml::{Dial, GetDigits, Response, Speak, Xml};
use axum::extract::{Form, Path, State};
use tracing::info;

fn speak(lang: Language, text: &str) -> Speak {
    Speak::new(text).voice(lang.voice()).language(lang.locale())
}

/// Plivo only calls the action URL when digits arrive. The elements after
/// `</GetDigits>` are what a silent caller hears before the line drops, after
/// the retries are used up.
fn with_no_input_fallback(doc: Response, lang: Language) -> Response {
    doc.speak(speak(
        lang,
        &format!("{} {}", prompts::no_input(lang), prompts::goodbye(lang)),
    ))
    .hangup()
}

fn welcome_doc(state: &AppState) -> Response {
    let gather = GetDigits::new(state.config.callback_url("/ivr/language-handler"))
        .method("POST")
        .timeout(ivr::DIGIT_TIMEOUT_SECS)
        .num_digits(1)
        .retries(ivr::DIGIT_RETRIES)
        .valid_digits(ivr::VALID_DIGITS)
        .speak(speak(Language::English, prompts::welcome()));
    with_no_input_fallback(Response::new().get_digits(gather), Language::English)
}

/// Answer URL of the outbound call, level one of the menu.
pub async fn welcome(State(state): State<AppState>) -> Xml {
    info!("serving welcome menu");
    Xml(welcome_doc(&state))
}

pub async fn language_handler(
    State(state): State<AppState>,
    Form(form): Form<DigitsForm>,
) -> Xml {
    let digits = form.digits.as_deref();
    match language_transition(digits) {
        LanguageChoice::Menu(lang) => {
            info!(digits, lang = %lang, "language selected");
            Xml(Response::new().redirect(
                state
                    .config
                    .callback_url(&format!("/ivr/main-menu/{}", lang.code())),
                "GET",
            ))
        }
        LanguageChoice::Retry => {
            info!(digits, "invalid language selection, replaying welcome");
            Xml(Response::new()
                .speak(speak(
                    Language::English,
                    prompts::invalid_input(Language::English),
                ))
                .redirect(state.config.callback_url("/ivr/welcome"), "GET"))
        }
    }
}

fn main_menu_doc(state: &AppState, lang: Language) -> Response {
    let gather = GetDigits::new(
        state
            .config
            .callback_url(&format!("/ivr/menu-handler/{}", lang.code())),
    )
    .method("POST")
    .timeout(ivr::DIGIT_TIMEOUT_SECS)
    .num_digits(1)
    .retries(ivr::DIGIT_RETRIES)
    .valid_digits(ivr::VALID_DIGITS)
    .speak(speak(lang, prompts::main_menu(lang)));
    with_no_input_fallback(Response::new().get_digits(gather), lang)
}

/// Level two of the menu. An unknown language code falls back to English
/// rather than failing the call.
pub async fn main_menu(State(state): State<AppState>, Path(lang): Path<String>) -> Xml {
    let lang = Language::from_code(&lang).unwrap_or(Language::English);
    info!(lang = %lang, "serving main menu");
    Xml(main_menu_doc(&state, lang))
}

pub async fn menu_handler(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    Form(form): Form<DigitsForm>,
) -> Xml {
    let lang = Language::from_code(&lang).unwrap_or(Language::English);
    let digits = form.digits.as_deref();
    match menu_transition(digits) {
        MenuChoice::PlayMessage => {
            info!(digits, lang = %lang, "playing audio message");
            Xml(Response::new()
                .speak(speak(lang, prompts::playing_audio(lang)))
                .play(state.config.audio_url(lang))
                .speak(speak(lang, prompts::goodbye(lang)))
                .hangup())
        }
        MenuChoice::ConnectAssociate => {
            info!(digits, lang = %lang, "connecting caller to associate");
            Xml(Response::new()
                .speak(speak(lang, prompts::connecting(lang)))
                .dial(
                    Dial::new()
                        .caller_id(state.config.caller_id.as_str())
                        .timeout(ivr::DIAL_TIMEOUT_SECS)
                        .number(state.config.associate_number.as_str()),
                )
                // heard only if the associate leg ends or never connects
                .speak(speak(lang, prompts::goodbye(lang)))
                .hangup())
        }
        MenuChoice::Retry => {
            info!(digits, lang = %lang, "invalid menu selection, replaying menu");
            Xml(Response::new()
                .speak(speak(lang, prompts::invalid_input(lang)))
                .redirect(
                    state
                        .config
                        .callback_url(&format!("/ivr/main-menu/{}", lang.code())),
                    "GET",
                ))
        }
    }
}
