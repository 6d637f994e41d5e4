// Everything the player sees, derived from a single snapshot. Surfaces (DOM, terminal) only map
// these structures to their output; they never look at the snapshot directly.

use enum_map::{EnumMap, enum_map};

use crate::card::{Card, JOKER_EMOJI};
use crate::player::PlayerNum;
use crate::snapshot::{GameStateSnapshot, LastTurn, WaitingFor};


pub const FIRST_TURN_MESSAGE: &str = "Jouez votre première carte !";
pub const NEW_TURN_MESSAGE: &str = "Nouveau tour ! Jouez votre carte";
pub const YOUR_TURN_MESSAGE: &str = "À votre tour !";
pub const WAITING_FOR_OPPONENT_MESSAGE: &str = "En attente de l'adversaire...";
pub const CARD_PLAYED_MESSAGE: &str = "Carte jouée ! En attente de l'adversaire...";

pub const JOKER_AVAILABLE_TEXT: &str = "Disponible";
pub const JOKER_USED_TEXT: &str = "Utilisé";

pub const TIE_MESSAGE: &str = "⚖️ Égalité !";
pub const VICTORY_MESSAGE: &str = "🎉 Victoire ! 🎉";
pub const DEFEAT_MESSAGE: &str = "😢 Défaite";

// Semantic color. Each surface picks the actual color.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CardSlot {
    Hidden,
    Revealed { card: Card, winner: bool },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct JokerStatus {
    pub available: bool,
}

impl JokerStatus {
    pub fn text(&self) -> &'static str {
        if self.available { JOKER_AVAILABLE_TEXT } else { JOKER_USED_TEXT }
    }
    pub fn tone(&self) -> Tone { if self.available { Tone::Positive } else { Tone::Negative } }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ScoreboardView {
    pub names: EnumMap<PlayerNum, String>,
    pub scores: EnumMap<PlayerNum, u32>,
    pub jokers: EnumMap<PlayerNum, JokerStatus>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PlayAreaView {
    pub slots: EnumMap<PlayerNum, CardSlot>,
    pub status_message: &'static str,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TurnResultView {
    pub turn_number: u32,
    pub message: String,
    pub tone: Tone,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct HandView {
    pub cards_enabled: bool,
    pub joker_enabled: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameOverView {
    pub victory: bool,
    pub final_scores: EnumMap<PlayerNum, u32>,
}

impl GameOverView {
    pub fn message(&self) -> &'static str {
        if self.victory { VICTORY_MESSAGE } else { DEFEAT_MESSAGE }
    }
    pub fn tone(&self) -> Tone { if self.victory { Tone::Positive } else { Tone::Negative } }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameView {
    pub me: PlayerNum,
    pub scoreboard: ScoreboardView,
    pub play_area: PlayAreaView,
    // Result of the latest complete turn. `None` while a turn is half-played: the previous result
    // should stay on screen then.
    pub turn_result: Option<TurnResultView>,
    pub hand: HandView,
    pub game_over: Option<GameOverView>,
}

pub fn game_view(snapshot: &GameStateSnapshot, me: PlayerNum) -> GameView {
    GameView {
        me,
        scoreboard: scoreboard_view(snapshot),
        play_area: play_area_view(snapshot, me),
        turn_result: snapshot
            .last_turn
            .as_ref()
            .filter(|turn| turn.is_complete())
            .map(|turn| turn_result_view(snapshot, turn, me)),
        hand: hand_view(snapshot, me),
        game_over: game_over_view(snapshot, me),
    }
}

pub fn scoreboard_view(snapshot: &GameStateSnapshot) -> ScoreboardView {
    ScoreboardView {
        names: enum_map! { p => snapshot.player_name(p).to_owned() },
        scores: enum_map! { p => snapshot.score(p) },
        jokers: enum_map! { p => JokerStatus { available: !snapshot.joker_used(p) } },
    }
}

pub fn play_area_view(snapshot: &GameStateSnapshot, me: PlayerNum) -> PlayAreaView {
    let Some(turn) = &snapshot.last_turn else {
        return PlayAreaView {
            slots: enum_map! { _ => CardSlot::Hidden },
            status_message: FIRST_TURN_MESSAGE,
        };
    };
    if turn.is_complete() {
        let winner = snapshot.turn_winner(turn);
        let slots = enum_map! { p => match turn.card(p) {
            Some(card) => CardSlot::Revealed { card, winner: winner == Some(p) },
            None => CardSlot::Hidden,
        }};
        let status_message = match snapshot.waiting_for {
            Some(WaitingFor::Both) => NEW_TURN_MESSAGE,
            Some(WaitingFor::Player(p)) if p == me => YOUR_TURN_MESSAGE,
            _ => WAITING_FOR_OPPONENT_MESSAGE,
        };
        PlayAreaView { slots, status_message }
    } else {
        // Never reveal the opponent's card before the turn is resolved.
        let slots = enum_map! { p => match turn.card(p) {
            Some(card) if p == me => CardSlot::Revealed { card, winner: false },
            _ => CardSlot::Hidden,
        }};
        let status_message = if snapshot.waiting_for == Some(WaitingFor::Player(me)) {
            YOUR_TURN_MESSAGE
        } else {
            WAITING_FOR_OPPONENT_MESSAGE
        };
        PlayAreaView { slots, status_message }
    }
}

// Requires a complete turn.
pub fn turn_result_view(
    snapshot: &GameStateSnapshot, turn: &LastTurn, me: PlayerNum,
) -> TurnResultView {
    let (mut message, tone) = match turn.winner_id {
        None => (TIE_MESSAGE.to_owned(), Tone::Neutral),
        Some(winner_id) => {
            // An ID matching neither player is credited to player 2, same as the web page did.
            let winner = if winner_id == snapshot.player_id(PlayerNum::One) {
                PlayerNum::One
            } else {
                PlayerNum::Two
            };
            let i_won = snapshot.turn_winner(turn) == Some(me);
            let message = format!("🏆 {} remporte le tour !", snapshot.player_name(winner));
            (message, if i_won { Tone::Positive } else { Tone::Negative })
        }
    };
    if turn.joker_used {
        message.push_str(&format!(" {JOKER_EMOJI} (Ordre inversé)"));
    }
    TurnResultView {
        turn_number: turn.turn_number,
        message,
        tone,
    }
}

pub fn hand_view(snapshot: &GameStateSnapshot, me: PlayerNum) -> HandView {
    HandView {
        cards_enabled: snapshot.can_play(me),
        joker_enabled: !snapshot.joker_used(me),
    }
}

pub fn game_over_view(snapshot: &GameStateSnapshot, me: PlayerNum) -> Option<GameOverView> {
    if !snapshot.is_finished() {
        return None;
    }
    Some(GameOverView {
        victory: snapshot.game_winner() == Some(me),
        final_scores: enum_map! { p => snapshot.score(p) },
    })
}
