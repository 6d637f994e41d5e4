use std::sync::mpsc;
use std::time::Duration;

use battle_of_roles::api::{ApiError, ClientRequest, PlayRequest, PlayResponse};
use battle_of_roles::bootstrap::GameBootstrap;
use battle_of_roles::card::Card;
use battle_of_roles::client::*;
use battle_of_roles::config::ClientConfig;
use battle_of_roles::player::PlayerNum;
use battle_of_roles::poller::PollOutcome;
use battle_of_roles::snapshot::GameStateSnapshot;
use battle_of_roles::test_util::*;
use battle_of_roles::view::{CARD_PLAYED_MESSAGE, FIRST_TURN_MESSAGE, Tone};
use instant::Instant;
use pretty_assertions::assert_eq;


struct Harness {
    t0: Instant,
    client: ClientState,
    requests_rx: mpsc::Receiver<ClientRequest>,
}

impl Harness {
    fn new(bootstrap: GameBootstrap) -> Self {
        let t0 = Instant::now();
        let (requests_tx, requests_rx) = mpsc::channel();
        let client = ClientState::new(bootstrap, ClientConfig::default(), requests_tx, t0);
        Harness { t0, client, requests_rx }
    }

    fn at(&self, millis: u64) -> Instant { self.t0 + Duration::from_millis(millis) }

    fn sent_requests(&self) -> Vec<ClientRequest> { self.requests_rx.try_iter().collect() }

    fn events(&mut self) -> Vec<NotableEvent> {
        std::iter::from_fn(|| self.client.next_notable_event()).collect()
    }

    fn receive_state(&mut self, snapshot: GameStateSnapshot) {
        self.client.process_state_response(Ok(snapshot)).unwrap();
    }

    // Polls at `millis`, expecting a state request, and answers it with `snapshot`.
    fn poll(&mut self, millis: u64, snapshot: GameStateSnapshot) {
        assert_eq!(self.client.tick(self.at(millis)), PollOutcome::Fetch);
        assert_eq!(self.sent_requests(), vec![ClientRequest::FetchState {
            game_id: SAMPLE_GAME_ID
        }]);
        self.receive_state(snapshot);
    }
}

#[test]
fn polls_every_two_seconds() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::One));
    h.poll(0, sample_snapshot());
    assert_eq!(h.client.tick(h.at(1000)), PollOutcome::Wait);
    assert_eq!(h.sent_requests(), vec![]);
    h.poll(2000, sample_snapshot());
    assert_eq!(h.client.view().unwrap().play_area.status_message, FIRST_TURN_MESSAGE);
}

#[test]
fn no_view_before_first_state() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::One));
    assert_eq!(h.client.view(), None);
    assert_eq!(h.client.play_card(Card::Mage), Err(PlayCardError::NoGameState));
}

#[test]
fn failed_poll_keeps_last_state() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::One));
    h.poll(0, sample_snapshot());
    assert_eq!(h.client.tick(h.at(2000)), PollOutcome::Fetch);
    h.client.process_state_response(Err(ApiError::Network("offline".to_owned()))).unwrap();
    assert_eq!(h.client.snapshot(), Some(&sample_snapshot()));
    // The failed request no longer counts as in flight.
    assert_eq!(h.client.tick(h.at(4000)), PollOutcome::Fetch);
}

#[test]
fn play_card_with_joker() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::Two));
    h.poll(0, sample_snapshot());
    h.client.set_joker_selected(true);
    h.client.play_card(Card::Loup).unwrap();
    assert_eq!(h.sent_requests(), vec![ClientRequest::PlayCard {
        game_id: SAMPLE_GAME_ID,
        request: PlayRequest { card: Card::Loup, use_joker: true },
    }]);
    assert!(!h.client.view().unwrap().hand.cards_enabled);
    assert_eq!(h.client.play_card(Card::Mage), Err(PlayCardError::PlayPending));

    let accepted = PlayResponse { success: true, message: None };
    h.client.process_play_response(Ok(accepted), h.at(500)).unwrap();
    assert_eq!(h.events(), vec![NotableEvent::CardAccepted]);
    assert!(!h.client.joker_selected());
    let view = h.client.view().unwrap();
    assert_eq!(view.play_area.status_message, CARD_PLAYED_MESSAGE);
    assert!(!view.hand.cards_enabled);

    // Refresh comes 100ms after acceptance rather than at the regular 2s mark.
    assert_eq!(h.client.tick(h.at(599)), PollOutcome::Wait);
    let mut after_play = sample_snapshot();
    after_play.joker_used_p2 = true;
    let after_play = with_turn(after_play, {
        let mut turn = half_turn(1, Card::Mage);
        turn.player1_card = None;
        turn.player2_card = Some(Card::Loup);
        turn
    });
    h.poll(600, after_play);
    let view = h.client.view().unwrap();
    assert_eq!(view.play_area.status_message, "En attente de l'adversaire...");
    assert!(!view.hand.cards_enabled);
    assert!(!view.hand.joker_enabled);
}

#[test]
fn rejected_card_reenables_hand() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::One));
    h.poll(0, sample_snapshot());
    h.client.play_card(Card::Mage).unwrap();
    h.sent_requests();
    let rejection = ApiError::Http {
        status: 400,
        message: Some("Vous avez déjà joué dans ce tour".to_owned()),
    };
    h.client.process_play_response(Err(rejection), h.at(100)).unwrap();
    assert_eq!(h.events(), vec![NotableEvent::CardRejected(
        "Vous avez déjà joué dans ce tour".to_owned()
    )]);
    assert!(h.client.view().unwrap().hand.cards_enabled);
    h.client.play_card(Card::Chevalier).unwrap();
}

#[test]
fn rejection_messages_fall_back() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::One));
    h.poll(0, sample_snapshot());

    h.client.play_card(Card::Mage).unwrap();
    let bare = ApiError::Http { status: 500, message: None };
    h.client.process_play_response(Err(bare), h.at(100)).unwrap();

    h.client.play_card(Card::Mage).unwrap();
    let offline = ApiError::Network("connection refused".to_owned());
    h.client.process_play_response(Err(offline), h.at(200)).unwrap();

    assert_eq!(h.events(), vec![
        NotableEvent::CardRejected(PLAY_FAILED_MESSAGE.to_owned()),
        NotableEvent::CardRejected(PLAY_CONNECTION_ERROR_MESSAGE.to_owned()),
    ]);
}

#[test]
fn cannot_play_out_of_turn() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::One));
    h.poll(0, with_turn(sample_snapshot(), half_turn(1, Card::Mage)));
    assert_eq!(h.client.play_card(Card::Loup), Err(PlayCardError::NotYourTurn));
    assert_eq!(h.sent_requests(), vec![]);
}

#[test]
fn cannot_reuse_joker() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::One));
    let mut snapshot = sample_snapshot();
    snapshot.joker_used_p1 = true;
    h.poll(0, snapshot);
    h.client.set_joker_selected(true);
    assert_eq!(h.client.play_card(Card::Loup), Err(PlayCardError::JokerAlreadyUsed));
    h.client.set_joker_selected(false);
    h.client.play_card(Card::Loup).unwrap();
}

#[test]
fn state_arriving_mid_play_keeps_play_pending() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::One));
    h.poll(0, sample_snapshot());
    assert_eq!(h.client.tick(h.at(2000)), PollOutcome::Fetch);
    h.client.play_card(Card::Mage).unwrap();
    h.sent_requests();
    // Stale state from the poll that started before the play.
    h.receive_state(sample_snapshot());
    assert!(!h.client.view().unwrap().hand.cards_enabled);
    let accepted = PlayResponse { success: true, message: None };
    h.client.process_play_response(Ok(accepted), h.at(2100)).unwrap();
    assert_eq!(h.events(), vec![NotableEvent::CardAccepted]);
}

#[test]
fn state_requested_before_acceptance_keeps_hand_disabled() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::One));
    h.poll(0, sample_snapshot());
    assert_eq!(h.client.tick(h.at(2000)), PollOutcome::Fetch);
    h.client.play_card(Card::Mage).unwrap();
    h.sent_requests();
    let accepted = PlayResponse { success: true, message: None };
    h.client.process_play_response(Ok(accepted), h.at(2050)).unwrap();

    // Answer to the poll sent at 2000: still shows me as expected to play.
    h.receive_state(sample_snapshot());
    let view = h.client.view().unwrap();
    assert!(!view.hand.cards_enabled);
    assert_eq!(view.play_area.status_message, CARD_PLAYED_MESSAGE);
    assert_eq!(h.client.play_card(Card::Loup), Err(PlayCardError::PlayPending));
    assert_eq!(h.sent_requests(), vec![]);

    // The refresh requested after acceptance is the one that counts.
    h.poll(2150, with_turn(sample_snapshot(), half_turn(1, Card::Mage)));
    let view = h.client.view().unwrap();
    assert_eq!(view.play_area.status_message, "En attente de l'adversaire...");
    assert!(!view.hand.cards_enabled);
    assert_eq!(h.client.play_card(Card::Loup), Err(PlayCardError::NotYourTurn));
}

#[test]
fn unexpected_play_response() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::One));
    h.poll(0, sample_snapshot());
    let accepted = PlayResponse { success: true, message: None };
    assert!(matches!(
        h.client.process_play_response(Ok(accepted), h.at(10)),
        Err(EventError::UnexpectedResponse(_))
    ));
}

#[test]
fn turn_completion_is_reported_once() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::Two));
    h.poll(0, with_turn(sample_snapshot(), half_turn(1, Card::Mage)));
    assert_eq!(h.events(), vec![]);

    let complete = with_turn(sample_snapshot(), complete_turn(1, Card::Mage, Card::Loup, None));
    h.poll(2000, complete.clone());
    let events = h.events();
    assert_eq!(events.len(), 1);
    let NotableEvent::TurnCompleted(result) = &events[0] else {
        panic!("unexpected event: {:?}", events[0]);
    };
    assert_eq!(result.turn_number, 1);
    assert_eq!(result.tone, Tone::Neutral);

    h.poll(4000, complete);
    assert_eq!(h.events(), vec![]);
    assert!(h.client.view().unwrap().turn_result.is_some());
    assert!(h.client.previous_snapshot().is_some());
}

#[test]
fn game_over_stops_polling() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::Two));
    h.poll(0, sample_snapshot());
    let last = with_turn(sample_snapshot(), complete_turn(5, Card::Mage, Card::Loup, Some(BOB_ID)));
    h.poll(2000, finished(last.clone(), 1, 3));
    let events = h.events();
    assert!(matches!(events[0], NotableEvent::TurnCompleted(_)));
    assert_eq!(events[1], NotableEvent::GameOver { victory: true });
    assert!(!h.client.is_polling());
    assert_eq!(h.client.tick(h.at(10_000)), PollOutcome::Stopped);
    assert_eq!(h.sent_requests(), vec![]);
    assert_eq!(h.client.play_card(Card::Mage), Err(PlayCardError::GameOver));

    // Late state (e.g. from a refresh that was already in flight) doesn't resurrect the game.
    h.receive_state(last);
    assert!(h.client.snapshot().unwrap().is_finished());
}

#[test]
fn stop_on_unload() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::One));
    h.client.stop();
    assert_eq!(h.client.tick(h.at(0)), PollOutcome::Stopped);
    assert_eq!(h.client.refresh(h.at(0)), PollOutcome::Stopped);
    assert_eq!(h.sent_requests(), vec![]);
}

#[test]
fn raw_responses_are_routed() {
    let mut h = Harness::new(sample_bootstrap(PlayerNum::One));
    assert_eq!(h.client.tick(h.at(0)), PollOutcome::Fetch);
    let request = h.sent_requests().remove(0);
    let body = serde_json::to_string(&sample_snapshot()).unwrap();
    h.client.process_response(&request, Ok((200, body)), h.at(50)).unwrap();
    assert_eq!(h.client.snapshot(), Some(&sample_snapshot()));

    h.client.play_card(Card::Mage).unwrap();
    let request = h.sent_requests().remove(0);
    let body = r#"{"error": "La partie n'est pas en cours"}"#.to_owned();
    h.client.process_response(&request, Ok((400, body)), h.at(100)).unwrap();
    assert_eq!(h.events(), vec![NotableEvent::CardRejected(
        "La partie n'est pas en cours".to_owned()
    )]);
}

#[test]
fn guest_conversion() {
    let mut bootstrap = sample_bootstrap(PlayerNum::One);
    bootstrap.is_guest = true;
    let mut h = Harness::new(bootstrap);
    assert_eq!(
        h.client.convert_guest("", "secret"),
        Err(GuestConversionError::MissingFields(CONVERSION_MISSING_FIELDS_MESSAGE.to_owned()))
    );
    h.client.convert_guest("alice", "secret").unwrap();
    assert_eq!(
        h.client.convert_guest("alice", "secret"),
        Err(GuestConversionError::AlreadyPending)
    );
    let requests = h.sent_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path(), "/convert-guest");

    let taken = ApiError::Http {
        status: 400,
        message: Some("Ce nom d'utilisateur existe déjà".to_owned()),
    };
    h.client.process_convert_guest_response(Err(taken)).unwrap();
    h.client.convert_guest("alice2", "secret").unwrap();
    let body = r#"{"success": true, "message": "Compte créé"}"#.to_owned();
    h.client.process_response(&requests[0], Ok((200, body)), h.at(0)).unwrap();
    assert_eq!(h.events(), vec![
        NotableEvent::GuestConversionFailed("Ce nom d'utilisateur existe déjà".to_owned()),
        NotableEvent::GuestConverted(CONVERSION_SUCCEEDED_MESSAGE.to_owned()),
    ]);
    assert!(!h.client.is_guest());
    assert_eq!(h.client.convert_guest("alice3", "secret"), Err(GuestConversionError::NotGuest));
}
