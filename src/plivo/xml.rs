//! Builder for Plivo XML webhook documents.
//!
//! Plivo drives a call by fetching an XML document from the application and
//! executing its elements top to bottom. Only the elements this flow needs
//! are modeled: `Speak`, `Play`, `GetDigits`, `Redirect`, `Dial` and
//! `Hangup`. Documents are rendered compact, without pretty printing.

use axum::http::header;
use axum::response::IntoResponse;
use std::fmt;

/// A `<Response>` document, built by chaining element methods.
#[derive(Debug, Clone, Default)]
pub struct Response {
    elements: Vec<Element>,
}

#[derive(Debug, Clone)]
enum Element {
    Speak(Speak),
    Play { url: String },
    GetDigits(GetDigits),
    Redirect { url: String, method: &'static str },
    Dial(Dial),
    Hangup,
}

/// A `<Speak>` element, TTS with an optional voice and language.
#[derive(Debug, Clone)]
pub struct Speak {
    text: String,
    voice: Option<String>,
    language: Option<String>,
}

impl Speak {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
            language: None,
        }
    }

    pub fn voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// A `<GetDigits>` element collecting DTMF and posting it to `action`.
///
/// Nested prompts keep playing while Plivo waits for input. When the caller
/// presses nothing at all, Plivo does not call `action`; it falls through to
/// the elements after `</GetDigits>` instead.
#[derive(Debug, Clone)]
pub struct GetDigits {
    action: String,
    method: &'static str,
    timeout: u32,
    num_digits: u32,
    retries: u32,
    valid_digits: Option<String>,
    children: Vec<Element>,
}

impl GetDigits {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: "POST",
            timeout: 5,
            num_digits: 1,
            retries: 1,
            valid_digits: None,
            children: Vec::new(),
        }
    }

    pub fn method(mut self, method: &'static str) -> Self {
        self.method = method;
        self
    }

    pub fn timeout(mut self, seconds: u32) -> Self {
        self.timeout = seconds;
        self
    }

    pub fn num_digits(mut self, count: u32) -> Self {
        self.num_digits = count;
        self
    }

    pub fn retries(mut self, count: u32) -> Self {
        self.retries = count;
        self
    }

    pub fn valid_digits(mut self, digits: impl Into<String>) -> Self {
        self.valid_digits = Some(digits.into());
        self
    }

    pub fn speak(mut self, speak: Speak) -> Self {
        self.children.push(Element::Speak(speak));
        self
    }

    pub fn play(mut self, url: impl Into<String>) -> Self {
        self.children.push(Element::Play { url: url.into() });
        self
    }
}

/// A `<Dial>` element bridging the caller to one or more numbers.
#[derive(Debug, Clone, Default)]
pub struct Dial {
    caller_id: Option<String>,
    timeout: Option<u32>,
    numbers: Vec<String>,
}

impl Dial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn caller_id(mut self, caller_id: impl Into<String>) -> Self {
        self.caller_id = Some(caller_id.into());
        self
    }

    pub fn timeout(mut self, seconds: u32) -> Self {
        self.timeout = Some(seconds);
        self
    }

    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.numbers.push(number.into());
        self
    }
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speak(mut self, speak: Speak) -> Self {
        self.elements.push(Element::Speak(speak));
        self
    }

    pub fn play(mut self, url: impl Into<String>) -> Self {
        self.elements.push(Element::Play { url: url.into() });
        self
    }

    pub fn get_digits(mut self, get_digits: GetDigits) -> Self {
        self.elements.push(Element::GetDigits(get_digits));
        self
    }

    /// The target URL goes in the element body, not an attribute.
    pub fn redirect(mut self, url: impl Into<String>, method: &'static str) -> Self {
        self.elements.push(Element::Redirect {
            url: url.into(),
            method,
        });
        self
    }

    pub fn dial(mut self, dial: Dial) -> Self {
        self.elements.push(Element::Dial(dial));
        self
    }

    pub fn hangup(mut self) -> Self {
        self.elements.push(Element::Hangup);
        self
    }

    pub fn to_xml(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<?xml version=\"1.0\" encoding=\"utf-8\"?>")?;
        write!(f, "<Response>")?;
        for element in &self.elements {
            element.render(f)?;
        }
        write!(f, "</Response>")
    }
}

impl Element {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Speak(speak) => {
                write!(f, "<Speak")?;
                if let Some(ref voice) = speak.voice {
                    write!(f, " voice=\"{}\"", escape_attr(voice))?;
                }
                if let Some(ref language) = speak.language {
                    write!(f, " language=\"{}\"", escape_attr(language))?;
                }
                write!(f, ">{}</Speak>", escape_text(&speak.text))
            }
            Element::Play { url } => {
                write!(f, "<Play>{}</Play>", escape_text(url))
            }
            Element::GetDigits(gd) => {
                write!(
                    f,
                    "<GetDigits action=\"{}\" method=\"{}\" timeout=\"{}\" numDigits=\"{}\" retries=\"{}\"",
                    escape_attr(&gd.action),
                    gd.method,
                    gd.timeout,
                    gd.num_digits,
                    gd.retries
                )?;
                if let Some(ref valid_digits) = gd.valid_digits {
                    write!(f, " validDigits=\"{}\"", escape_attr(valid_digits))?;
                }
                write!(f, ">")?;
                for child in &gd.children {
                    child.render(f)?;
                }
                write!(f, "</GetDigits>")
            }
            Element::Redirect { url, method } => {
                write!(
                    f,
                    "<Redirect method=\"{}\">{}</Redirect>",
                    method,
                    escape_text(url)
                )
            }
            Element::Dial(dial) => {
                write!(f, "<Dial")?;
                if let Some(ref caller_id) = dial.caller_id {
                    write!(f, " callerId=\"{}\"", escape_attr(caller_id))?;
                }
                if let Some(timeout) = dial.timeout {
                    write!(f, " timeout=\"{}\"", timeout)?;
                }
                write!(f, ">")?;
                for number in &dial.numbers {
                    write!(f, "<Number>{}</Number>", escape_text(number))?;
                }
                write!(f, "</Dial>")
            }
            Element::Hangup => write!(f, "<Hangup/>"),
        }
    }
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Axum response wrapper serving a document as `text/xml`.
pub struct Xml(pub Response);

impl IntoResponse for Xml {
    fn into_response(self) -> axum::response::Response {
        (
            [(header::CONTENT_TYPE, "text/xml")],
            self.0.to_xml(),
        )
            .into_response()
    }
}
