// Game state as reported by the server. The client never mutates it: every poll replaces the
// snapshot wholesale.

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::player::{PlayerNum, UserId};


// Score a player needs to win the game.
pub const VICTORY_SCORE: u32 = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    // Opponent hasn't joined yet.
    Waiting,
    #[serde(alias = "ongoing")]
    Active,
    Finished,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "WaitingForRepr", into = "WaitingForRepr")]
pub enum WaitingFor {
    Player(PlayerNum),
    Both,
}

// Wire format: either a player number or the string "both".
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum WaitingForRepr {
    Number(u8),
    Text(String),
}

impl TryFrom<WaitingForRepr> for WaitingFor {
    type Error = String;
    fn try_from(repr: WaitingForRepr) -> Result<Self, Self::Error> {
        match repr {
            WaitingForRepr::Number(n) => PlayerNum::try_from(n).map(WaitingFor::Player),
            WaitingForRepr::Text(s) if s == "both" => Ok(WaitingFor::Both),
            WaitingForRepr::Text(s) => Err(format!("invalid waiting_for: {s:?}")),
        }
    }
}

impl From<WaitingFor> for WaitingForRepr {
    fn from(waiting_for: WaitingFor) -> Self {
        match waiting_for {
            WaitingFor::Player(player) => WaitingForRepr::Number(player.to_number()),
            WaitingFor::Both => WaitingForRepr::Text("both".to_owned()),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LastTurn {
    pub turn_number: u32,
    pub player1_card: Option<Card>,
    pub player2_card: Option<Card>,
    // `None` means a tie (or, for an incomplete turn, no result yet).
    pub winner_id: Option<UserId>,
    #[serde(default)]
    pub joker_used: bool,
}

impl LastTurn {
    pub fn card(&self, player: PlayerNum) -> Option<Card> {
        match player {
            PlayerNum::One => self.player1_card,
            PlayerNum::Two => self.player2_card,
        }
    }

    // Both players committed a card, so the server has resolved the turn.
    pub fn is_complete(&self) -> bool { self.player1_card.is_some() && self.player2_card.is_some() }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub status: GameStatus,
    pub score1: u32,
    pub score2: u32,
    pub joker_used_p1: bool,
    pub joker_used_p2: bool,
    pub player1: String,
    pub player2: String,
    pub player1_id: Option<UserId>,
    pub player2_id: Option<UserId>,
    pub waiting_for: Option<WaitingFor>,
    pub last_turn: Option<LastTurn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub your_player_num: Option<PlayerNum>,
}

impl GameStateSnapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> { serde_json::from_str(json) }

    pub fn is_finished(&self) -> bool { self.status == GameStatus::Finished }

    pub fn score(&self, player: PlayerNum) -> u32 {
        match player {
            PlayerNum::One => self.score1,
            PlayerNum::Two => self.score2,
        }
    }

    pub fn joker_used(&self, player: PlayerNum) -> bool {
        match player {
            PlayerNum::One => self.joker_used_p1,
            PlayerNum::Two => self.joker_used_p2,
        }
    }

    pub fn player_name(&self, player: PlayerNum) -> &str {
        match player {
            PlayerNum::One => &self.player1,
            PlayerNum::Two => &self.player2,
        }
    }

    // Missing IDs compare as 0, matching how the server web page always treated them.
    pub fn player_id(&self, player: PlayerNum) -> UserId {
        match player {
            PlayerNum::One => self.player1_id.unwrap_or(0),
            PlayerNum::Two => self.player2_id.unwrap_or(0),
        }
    }

    pub fn can_play(&self, player: PlayerNum) -> bool {
        match self.waiting_for {
            Some(WaitingFor::Both) => true,
            Some(WaitingFor::Player(p)) => p == player,
            None => false,
        }
    }

    // Player whose ID matches the turn winner. Player 1 takes precedence if both IDs coincide.
    pub fn turn_winner(&self, turn: &LastTurn) -> Option<PlayerNum> {
        let winner_id = turn.winner_id?;
        if winner_id == self.player_id(PlayerNum::One) {
            Some(PlayerNum::One)
        } else if winner_id == self.player_id(PlayerNum::Two) {
            Some(PlayerNum::Two)
        } else {
            None
        }
    }

    pub fn game_winner(&self) -> Option<PlayerNum> {
        if self.score1 >= VICTORY_SCORE {
            Some(PlayerNum::One)
        } else if self.score2 >= VICTORY_SCORE {
            Some(PlayerNum::Two)
        } else {
            None
        }
    }
}

// Whether `current` shows a completed turn that `previous` didn't know about.
pub fn is_new_completed_turn(
    previous: Option<&GameStateSnapshot>, current: &GameStateSnapshot,
) -> bool {
    let Some(turn) = &current.last_turn else {
        return false;
    };
    if !turn.is_complete() {
        return false;
    }
    match previous.and_then(|p| p.last_turn.as_ref()) {
        None => true,
        Some(prev_turn) => prev_turn.turn_number != turn.turn_number || !prev_turn.is_complete(),
    }
}
