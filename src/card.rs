use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};


pub const JOKER_EMOJI: &str = "🃏";

// Wire names are the French role names, capitalized: "Mage", "Chevalier", "Loup".
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Debug,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Card {
    Mage,
    Chevalier,
    Loup,
}

impl Card {
    pub fn name(self) -> &'static str { self.into() }

    pub fn emoji(self) -> &'static str {
        match self {
            Card::Mage => "🔮",
            Card::Chevalier => "⚔️",
            Card::Loup => "🐺",
        }
    }

    // CSS class of a revealed card, e.g. "card-mage".
    pub fn css_class(self) -> String { format!("card-{}", self.name().to_lowercase()) }

    // Parses user input: full name in any case or the first letter.
    pub fn from_user_input(input: &str) -> Option<Card> {
        let input = input.trim();
        match input.to_ascii_lowercase().as_str() {
            "m" => Some(Card::Mage),
            "c" => Some(Card::Chevalier),
            "l" => Some(Card::Loup),
            _ => input.parse().ok(),
        }
    }
}
