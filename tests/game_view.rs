use battle_of_roles::card::Card;
use battle_of_roles::player::PlayerNum;
use battle_of_roles::snapshot::WaitingFor;
use battle_of_roles::test_util::*;
use battle_of_roles::view::*;
use enum_map::enum_map;
use pretty_assertions::assert_eq;
use PlayerNum::{One, Two};


fn revealed(card: Card, winner: bool) -> CardSlot { CardSlot::Revealed { card, winner } }

#[test]
fn first_turn() {
    let view = game_view(&sample_snapshot(), One);
    assert_eq!(view.play_area, PlayAreaView {
        slots: enum_map! { _ => CardSlot::Hidden },
        status_message: FIRST_TURN_MESSAGE,
    });
    assert_eq!(view.turn_result, None);
    assert_eq!(view.hand, HandView { cards_enabled: true, joker_enabled: true });
    assert_eq!(view.game_over, None);
}

#[test]
fn scoreboard() {
    let mut snapshot = sample_snapshot();
    snapshot.score1 = 2;
    snapshot.score2 = 1;
    snapshot.joker_used_p2 = true;
    let scoreboard = game_view(&snapshot, Two).scoreboard;
    assert_eq!(scoreboard.scores[One], 2);
    assert_eq!(scoreboard.scores[Two], 1);
    assert_eq!(scoreboard.names[Two], "Bob");
    assert_eq!(scoreboard.jokers[One].text(), JOKER_AVAILABLE_TEXT);
    assert_eq!(scoreboard.jokers[One].tone(), Tone::Positive);
    assert_eq!(scoreboard.jokers[Two].text(), JOKER_USED_TEXT);
    assert_eq!(scoreboard.jokers[Two].tone(), Tone::Negative);
}

#[test]
fn half_played_turn_hides_opponent_card() {
    let snapshot = with_turn(sample_snapshot(), half_turn(1, Card::Chevalier));

    let view = game_view(&snapshot, One);
    assert_eq!(view.play_area.slots[One], revealed(Card::Chevalier, false));
    assert_eq!(view.play_area.slots[Two], CardSlot::Hidden);
    assert_eq!(view.play_area.status_message, WAITING_FOR_OPPONENT_MESSAGE);
    assert!(!view.hand.cards_enabled);

    let view = game_view(&snapshot, Two);
    assert_eq!(view.play_area.slots, enum_map! { _ => CardSlot::Hidden });
    assert_eq!(view.play_area.status_message, YOUR_TURN_MESSAGE);
    assert!(view.hand.cards_enabled);
    assert_eq!(view.turn_result, None);
}

#[test]
fn complete_turn_reveals_both_cards() {
    let snapshot =
        with_turn(sample_snapshot(), complete_turn(1, Card::Loup, Card::Mage, Some(ALICE_ID)));
    let view = game_view(&snapshot, Two);
    assert_eq!(view.play_area.slots[One], revealed(Card::Loup, true));
    assert_eq!(view.play_area.slots[Two], revealed(Card::Mage, false));
    assert_eq!(view.play_area.status_message, NEW_TURN_MESSAGE);
    assert!(view.hand.cards_enabled);
}

#[test]
fn complete_turn_status_follows_waiting_for() {
    let mut snapshot =
        with_turn(sample_snapshot(), complete_turn(1, Card::Loup, Card::Mage, Some(ALICE_ID)));
    snapshot.waiting_for = Some(WaitingFor::Player(Two));
    assert_eq!(play_area_view(&snapshot, Two).status_message, YOUR_TURN_MESSAGE);
    assert_eq!(play_area_view(&snapshot, One).status_message, WAITING_FOR_OPPONENT_MESSAGE);
    snapshot.waiting_for = None;
    assert_eq!(play_area_view(&snapshot, One).status_message, WAITING_FOR_OPPONENT_MESSAGE);
}

#[test]
fn turn_result_winner_and_loser() {
    let snapshot =
        with_turn(sample_snapshot(), complete_turn(4, Card::Mage, Card::Chevalier, Some(ALICE_ID)));
    let for_alice = game_view(&snapshot, One).turn_result.unwrap();
    let for_bob = game_view(&snapshot, Two).turn_result.unwrap();
    assert_eq!(for_alice.message, "🏆 Alice remporte le tour !");
    assert_eq!(for_alice.tone, Tone::Positive);
    assert_eq!(for_alice.turn_number, 4);
    assert_eq!(for_bob.message, for_alice.message);
    assert_eq!(for_bob.tone, Tone::Negative);
}

#[test]
fn turn_result_tie() {
    let snapshot = with_turn(sample_snapshot(), complete_turn(1, Card::Loup, Card::Loup, None));
    let result = game_view(&snapshot, One).turn_result.unwrap();
    assert_eq!(result.message, TIE_MESSAGE);
    assert_eq!(result.tone, Tone::Neutral);
    assert_eq!(game_view(&snapshot, One).play_area.slots, enum_map! {
        _ => revealed(Card::Loup, false)
    });
}

#[test]
fn turn_result_with_joker() {
    let mut turn = complete_turn(2, Card::Loup, Card::Chevalier, Some(BOB_ID));
    turn.joker_used = true;
    let snapshot = with_turn(sample_snapshot(), turn);
    let result = game_view(&snapshot, Two).turn_result.unwrap();
    assert_eq!(result.message, "🏆 Bob remporte le tour ! 🃏 (Ordre inversé)");
    assert_eq!(result.tone, Tone::Positive);

    let mut turn = complete_turn(3, Card::Loup, Card::Loup, None);
    turn.joker_used = true;
    let snapshot = with_turn(sample_snapshot(), turn);
    let result = game_view(&snapshot, One).turn_result.unwrap();
    assert_eq!(result.message, "⚖️ Égalité ! 🃏 (Ordre inversé)");
}

#[test]
fn joker_checkbox_follows_own_joker() {
    let mut snapshot = sample_snapshot();
    snapshot.joker_used_p1 = true;
    assert!(!game_view(&snapshot, One).hand.joker_enabled);
    assert!(game_view(&snapshot, Two).hand.joker_enabled);
}

#[test]
fn game_over() {
    let snapshot = finished(
        with_turn(sample_snapshot(), complete_turn(5, Card::Mage, Card::Chevalier, Some(ALICE_ID))),
        3,
        1,
    );
    let winner = game_view(&snapshot, One).game_over.unwrap();
    assert!(winner.victory);
    assert_eq!(winner.message(), VICTORY_MESSAGE);
    assert_eq!(winner.tone(), Tone::Positive);
    assert_eq!(winner.final_scores, enum_map! { One => 3, Two => 1 });

    let loser = game_view(&snapshot, Two).game_over.unwrap();
    assert!(!loser.victory);
    assert_eq!(loser.message(), DEFEAT_MESSAGE);
    assert!(!game_view(&snapshot, Two).hand.cards_enabled);
}
