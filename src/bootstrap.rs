use std::fmt;

use crate::api::GameId;
use crate::player::PlayerNum;


// The game page carries its parameters as data attributes on this element.
pub const GAME_DATA_ELEMENT_ID: &str = "game-data";
pub const GAME_ID_ATTRIBUTE: &str = "data-game-id";
pub const PLAYER_NUM_ATTRIBUTE: &str = "data-player-num";
pub const IS_GUEST_ATTRIBUTE: &str = "data-is-guest";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GameBootstrap {
    pub game_id: GameId,
    pub me: PlayerNum,
    pub is_guest: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum BootstrapError {
    MissingAttribute(&'static str),
    InvalidGameId(String),
    InvalidPlayerNum(String),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::MissingAttribute(name) => write!(f, "missing attribute {name}"),
            BootstrapError::InvalidGameId(value) => write!(f, "invalid game id: {value:?}"),
            BootstrapError::InvalidPlayerNum(value) => {
                write!(f, "invalid player number: {value:?}")
            }
        }
    }
}

impl GameBootstrap {
    // Takes raw attribute values. The guest flag is only set by the exact string "true"; a missing
    // guest attribute means a registered user.
    pub fn from_attributes(
        game_id: Option<&str>, player_num: Option<&str>, is_guest: Option<&str>,
    ) -> Result<Self, BootstrapError> {
        let game_id = game_id.ok_or(BootstrapError::MissingAttribute(GAME_ID_ATTRIBUTE))?;
        let player_num =
            player_num.ok_or(BootstrapError::MissingAttribute(PLAYER_NUM_ATTRIBUTE))?;
        let game_id = game_id
            .trim()
            .parse()
            .map_err(|_| BootstrapError::InvalidGameId(game_id.to_owned()))?;
        let me = player_num
            .trim()
            .parse()
            .ok()
            .and_then(PlayerNum::from_number)
            .ok_or_else(|| BootstrapError::InvalidPlayerNum(player_num.to_owned()))?;
        Ok(GameBootstrap {
            game_id,
            me,
            is_guest: is_guest == Some("true"),
        })
    }
}
