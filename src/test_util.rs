// Test utilities shared by unit tests and integration tests.

use crate::api::GameId;
use crate::bootstrap::GameBootstrap;
use crate::card::Card;
use crate::player::{PlayerNum, UserId};
use crate::snapshot::{GameStateSnapshot, GameStatus, LastTurn, WaitingFor};


pub const ALICE_ID: UserId = 7;
pub const BOB_ID: UserId = 9;
pub const SAMPLE_GAME_ID: GameId = 42;

// Fresh active game between Alice (player 1) and Bob (player 2): no turns yet.
pub fn sample_snapshot() -> GameStateSnapshot {
    GameStateSnapshot {
        status: GameStatus::Active,
        score1: 0,
        score2: 0,
        joker_used_p1: false,
        joker_used_p2: false,
        player1: "Alice".to_owned(),
        player2: "Bob".to_owned(),
        player1_id: Some(ALICE_ID),
        player2_id: Some(BOB_ID),
        waiting_for: Some(WaitingFor::Both),
        last_turn: None,
        your_player_num: None,
    }
}

pub fn sample_bootstrap(me: PlayerNum) -> GameBootstrap {
    GameBootstrap {
        game_id: SAMPLE_GAME_ID,
        me,
        is_guest: false,
    }
}

// Turn where only player 1 has committed a card.
pub fn half_turn(turn_number: u32, player1_card: Card) -> LastTurn {
    LastTurn {
        turn_number,
        player1_card: Some(player1_card),
        player2_card: None,
        winner_id: None,
        joker_used: false,
    }
}

pub fn complete_turn(
    turn_number: u32, player1_card: Card, player2_card: Card, winner_id: Option<UserId>,
) -> LastTurn {
    LastTurn {
        turn_number,
        player1_card: Some(player1_card),
        player2_card: Some(player2_card),
        winner_id,
        joker_used: false,
    }
}

// Sets the last turn and derives `waiting_for` the same way the server does.
pub fn with_turn(mut snapshot: GameStateSnapshot, turn: LastTurn) -> GameStateSnapshot {
    snapshot.waiting_for = match (turn.player1_card, turn.player2_card) {
        (Some(_), None) => Some(WaitingFor::Player(PlayerNum::Two)),
        (None, Some(_)) => Some(WaitingFor::Player(PlayerNum::One)),
        _ => Some(WaitingFor::Both),
    };
    snapshot.last_turn = Some(turn);
    snapshot
}

pub fn finished(mut snapshot: GameStateSnapshot, score1: u32, score2: u32) -> GameStateSnapshot {
    snapshot.status = GameStatus::Finished;
    snapshot.score1 = score1;
    snapshot.score2 = score2;
    snapshot.waiting_for = None;
    snapshot
}
