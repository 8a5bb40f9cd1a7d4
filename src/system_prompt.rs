//! System prompt construction with persona injection
//!
//! The system message is the user-configurable instruction text, optionally
//! followed by a blank line and a sentence naming the bot and its age.

use std::fmt::Write;

/// Used when the request carries no (or a blank) system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = "A friendly AI chatbot";

/// Persona fields supplied alongside a chat request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Persona<'a> {
    pub name: Option<&'a str>,
    pub age: Option<&'a str>,
}

impl<'a> Persona<'a> {
    /// Blank fields count as absent
    pub fn new(name: Option<&'a str>, age: Option<&'a str>) -> Self {
        Self {
            name: non_blank(name),
            age: non_blank(age),
        }
    }

    fn clause(&self) -> Option<String> {
        match (self.name, self.age) {
            (Some(name), Some(age)) => Some(format!(
                "You are a chatbot named {name} and you are {age} years old."
            )),
            (Some(name), None) => Some(format!("You are a chatbot named {name}.")),
            (None, Some(age)) => Some(format!("You are a chatbot who is {age} years old.")),
            (None, None) => None,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Build the system message text for one turn
pub fn build_system_prompt(system_prompt: Option<&str>, persona: Persona<'_>) -> String {
    let mut prompt = system_prompt
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
        .to_string();

    if let Some(clause) = persona.clause() {
        let _ = write!(prompt, "\n\n{clause}");
    }

    prompt
}
