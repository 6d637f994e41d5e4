use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;


// Server-side user ID. Only ever compared, never interpreted.
pub type UserId = u64;

// Seat at the table. The server calls them "player 1" and "player 2" and uses the numbers on the
// wire, so that's how they are serialized.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Enum,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum PlayerNum {
    One,
    Two,
}

impl PlayerNum {
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(PlayerNum::One),
            2 => Some(PlayerNum::Two),
            _ => None,
        }
    }

    pub fn to_number(self) -> u8 {
        match self {
            PlayerNum::One => 1,
            PlayerNum::Two => 2,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            PlayerNum::One => PlayerNum::Two,
            PlayerNum::Two => PlayerNum::One,
        }
    }
}

impl TryFrom<u8> for PlayerNum {
    type Error = String;
    fn try_from(number: u8) -> Result<Self, Self::Error> {
        PlayerNum::from_number(number).ok_or_else(|| format!("invalid player number: {number}"))
    }
}

impl From<PlayerNum> for u8 {
    fn from(player: PlayerNum) -> u8 { player.to_number() }
}
