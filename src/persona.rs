//! Suggested personas offered before the first message
//!
//! Picking a preset sets the system prompt and draws a random name and age
//! for the bot.

use rand::seq::SliceRandom;
use rand::Rng;

const FEMALE_NAMES: &[&str] = &[
    "Olivia", "Emma", "Ava", "Charlotte", "Sophia", "Amelia", "Isabella", "Mia", "Evelyn",
    "Harper",
];

const MALE_NAMES: &[&str] = &[
    "Liam", "Noah", "Oliver", "Elijah", "James", "William", "Benjamin", "Lucas", "Henry",
    "Theodore",
];

const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 35;

/// Which name list a preset draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePool {
    Female,
    Male,
    Any,
}

#[derive(Debug, Clone, Copy)]
pub struct PersonaPreset {
    pub label: &'static str,
    pub prompt: &'static str,
    pub names: NamePool,
}

pub const PRESETS: &[PersonaPreset] = &[
    PersonaPreset {
        label: "Act as a girlfriend",
        prompt: "You are my caring and loving girlfriend. You are empathetic and always here for me.",
        names: NamePool::Female,
    },
    PersonaPreset {
        label: "Act as a boyfriend",
        prompt: "You are my caring and supportive boyfriend. You are a great listener and give great advice.",
        names: NamePool::Male,
    },
    PersonaPreset {
        label: "Act as a counsellor",
        prompt: "You are a trained counsellor. Listen to my problems without judgment and help me find solutions.",
        names: NamePool::Any,
    },
    PersonaPreset {
        label: "Act as a fitness coach",
        prompt: "You are a certified personal trainer. Create a workout plan for me based on my goals.",
        names: NamePool::Any,
    },
    PersonaPreset {
        label: "Act as a chef",
        prompt: "You are a world-class chef. I will give you ingredients, and you will give me a recipe.",
        names: NamePool::Any,
    },
    PersonaPreset {
        label: "Act as a code expert",
        prompt: "You are a coding expert that specializes in rendering code for frontend interfaces. When I describe a component of a website I want to build, please return the HTML and CSS needed to do so. Do not give an explanation for this code. Also offer some UI design suggestions.",
        names: NamePool::Any,
    },
];

/// Concrete persona settings produced from a preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaChoice {
    pub system_prompt: String,
    pub name: String,
    pub age: String,
}

impl PersonaPreset {
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> PersonaChoice {
        let name = match self.names {
            NamePool::Female => FEMALE_NAMES.choose(rng).copied(),
            NamePool::Male => MALE_NAMES.choose(rng).copied(),
            NamePool::Any => {
                let all: Vec<&str> = FEMALE_NAMES.iter().chain(MALE_NAMES).copied().collect();
                all.choose(rng).copied()
            }
        };

        PersonaChoice {
            system_prompt: self.prompt.to_string(),
            name: name.unwrap_or_default().to_string(),
            age: rng.gen_range(MIN_AGE..=MAX_AGE).to_string(),
        }
    }
}

/// Look up a preset by its zero-based position in the list
pub fn preset(index: usize) -> Option<&'static PersonaPreset> {
    PRESETS.get(index)
}
