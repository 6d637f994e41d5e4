use std::collections::VecDeque;
use std::fmt;
use std::sync::mpsc;
use std::time::Duration;

use instant::Instant;
use log::{debug, info, warn};

use crate::api::{
    self, ApiError, ClientRequest, ConvertGuestRequest, ConvertGuestResponse, PlayRequest,
    PlayResponse,
};
use crate::bootstrap::GameBootstrap;
use crate::card::Card;
use crate::config::ClientConfig;
use crate::internal_error_message;
use crate::player::PlayerNum;
use crate::poller::{PollOutcome, Poller};
use crate::snapshot::{GameStateSnapshot, is_new_completed_turn};
use crate::view::{CARD_PLAYED_MESSAGE, GameView, TurnResultView, game_view, turn_result_view};


pub const PLAY_FAILED_MESSAGE: &str = "Erreur lors du jeu de la carte";
pub const PLAY_CONNECTION_ERROR_MESSAGE: &str = "Erreur de connexion au serveur";
pub const CONVERSION_MISSING_FIELDS_MESSAGE: &str = "Veuillez remplir tous les champs";
pub const CONVERSION_SUCCEEDED_MESSAGE: &str = "Compte créé avec succès !";
pub const CONVERSION_FAILED_MESSAGE: &str = "Erreur lors de la création du compte";
pub const CONVERSION_CONNECTION_ERROR_MESSAGE: &str = "Erreur de connexion";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlayCardError {
    NoGameState,
    GameOver,
    NotYourTurn,
    PlayPending,
    JokerAlreadyUsed,
}

impl fmt::Display for PlayCardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            PlayCardError::NoGameState => "game state not loaded yet",
            PlayCardError::GameOver => "the game is over",
            PlayCardError::NotYourTurn => "not your turn",
            PlayCardError::PlayPending => "previous card is still being submitted",
            PlayCardError::JokerAlreadyUsed => "joker already used",
        };
        f.write_str(message)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GuestConversionError {
    NotGuest,
    // Carries the message to show to the user.
    MissingFields(String),
    AlreadyPending,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EventError {
    // Response to a request we never sent.
    UnexpectedResponse(String),
    CannotApplyResponse(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum PlayState {
    Idle,
    // Play request sent, no response yet.
    Submitting,
    // Server accepted the card; waiting for a state that reflects it. If a state request was
    // already in flight on acceptance, its response predates the play and doesn't count.
    Submitted { stale_fetch_pending: bool },
}

// One-shot happenings that a surface may want to react to beyond re-rendering.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    // A turn has just been resolved. Good moment for an animation.
    TurnCompleted(TurnResultView),
    // Final state received; polling has stopped.
    GameOver { victory: bool },
    CardAccepted,
    // Payload is the message to show to the user.
    CardRejected(String),
    GuestConverted(String),
    GuestConversionFailed(String),
}

// Client-side game state. Does no I/O: outgoing requests are sent to `requests_tx`, and the
// owner feeds responses back via `process_*` functions.
pub struct ClientState {
    bootstrap: GameBootstrap,
    config: ClientConfig,
    requests_tx: mpsc::Sender<ClientRequest>,
    poller: Poller,
    latest: Option<GameStateSnapshot>,
    previous: Option<GameStateSnapshot>,
    joker_selected: bool,
    play_state: PlayState,
    // Overrides the status message until the next snapshot arrives.
    transient_status: Option<&'static str>,
    conversion_pending: bool,
    notable_events: VecDeque<NotableEvent>,
}

impl ClientState {
    pub fn new(
        bootstrap: GameBootstrap, config: ClientConfig, requests_tx: mpsc::Sender<ClientRequest>,
        now: Instant,
    ) -> Self {
        info!(
            "Starting client for game {} as player {} (guest: {})",
            bootstrap.game_id,
            bootstrap.me.to_number(),
            bootstrap.is_guest
        );
        let poller = Poller::new(config.poll_interval, config.request_timeout, now);
        ClientState {
            bootstrap,
            config,
            requests_tx,
            poller,
            latest: None,
            previous: None,
            joker_selected: false,
            play_state: PlayState::Idle,
            transient_status: None,
            conversion_pending: false,
            notable_events: VecDeque::new(),
        }
    }

    pub fn bootstrap(&self) -> &GameBootstrap { &self.bootstrap }
    pub fn config(&self) -> &ClientConfig { &self.config }
    pub fn me(&self) -> PlayerNum { self.bootstrap.me }
    pub fn is_guest(&self) -> bool { self.bootstrap.is_guest }
    pub fn snapshot(&self) -> Option<&GameStateSnapshot> { self.latest.as_ref() }
    pub fn joker_selected(&self) -> bool { self.joker_selected }
    pub fn is_polling(&self) -> bool { !self.poller.is_stopped() }

    // Call periodically. Sends a state request when one is due.
    pub fn tick(&mut self, now: Instant) -> PollOutcome {
        let outcome = self.poller.tick(now);
        if outcome == PollOutcome::Fetch {
            self.send(ClientRequest::FetchState { game_id: self.bootstrap.game_id });
        }
        outcome
    }

    // Requests a state update as soon as possible.
    pub fn refresh(&mut self, now: Instant) -> PollOutcome {
        self.poller.schedule_refresh(now, Duration::ZERO);
        self.tick(now)
    }

    // Stops polling, e.g. when the page is being closed.
    pub fn stop(&mut self) {
        if self.is_polling() {
            info!("Polling stopped");
        }
        self.poller.stop();
    }

    pub fn set_joker_selected(&mut self, selected: bool) { self.joker_selected = selected; }

    pub fn view(&self) -> Option<GameView> {
        let snapshot = self.latest.as_ref()?;
        let mut view = game_view(snapshot, self.me());
        if self.play_state != PlayState::Idle {
            view.hand.cards_enabled = false;
        }
        if let Some(status) = self.transient_status {
            view.play_area.status_message = status;
        }
        Some(view)
    }

    pub fn play_card(&mut self, card: Card) -> Result<(), PlayCardError> {
        let snapshot = self.latest.as_ref().ok_or(PlayCardError::NoGameState)?;
        if snapshot.is_finished() {
            return Err(PlayCardError::GameOver);
        }
        if self.play_state != PlayState::Idle {
            return Err(PlayCardError::PlayPending);
        }
        if !snapshot.can_play(self.me()) {
            return Err(PlayCardError::NotYourTurn);
        }
        if self.joker_selected && snapshot.joker_used(self.me()) {
            return Err(PlayCardError::JokerAlreadyUsed);
        }
        info!("Playing {} (joker: {})", card.name(), self.joker_selected);
        self.play_state = PlayState::Submitting;
        self.send(ClientRequest::PlayCard {
            game_id: self.bootstrap.game_id,
            request: PlayRequest { card, use_joker: self.joker_selected },
        });
        Ok(())
    }

    pub fn convert_guest(
        &mut self, username: &str, password: &str,
    ) -> Result<(), GuestConversionError> {
        if !self.is_guest() {
            return Err(GuestConversionError::NotGuest);
        }
        if username.is_empty() || password.is_empty() {
            return Err(GuestConversionError::MissingFields(
                CONVERSION_MISSING_FIELDS_MESSAGE.to_owned(),
            ));
        }
        if self.conversion_pending {
            return Err(GuestConversionError::AlreadyPending);
        }
        self.conversion_pending = true;
        self.send(ClientRequest::ConvertGuest(ConvertGuestRequest {
            username: username.to_owned(),
            password: password.to_owned(),
        }));
        Ok(())
    }

    // Routes a raw response to the matching `process_*` function. `result` is `(status, body)`.
    pub fn process_response(
        &mut self, request: &ClientRequest, result: Result<(u16, String), ApiError>, now: Instant,
    ) -> Result<(), EventError> {
        match request {
            ClientRequest::FetchState { .. } => {
                let result = result.and_then(|(status, body)| {
                    api::parse_response::<GameStateSnapshot>(status, &body)
                });
                self.process_state_response(result)
            }
            ClientRequest::PlayCard { .. } => {
                let result = result
                    .and_then(|(status, body)| api::parse_response::<PlayResponse>(status, &body));
                self.process_play_response(result, now)
            }
            ClientRequest::ConvertGuest(_) => {
                let result = result.and_then(|(status, body)| {
                    api::parse_response::<ConvertGuestResponse>(status, &body)
                });
                self.process_convert_guest_response(result)
            }
        }
    }

    pub fn process_state_response(
        &mut self, result: Result<GameStateSnapshot, ApiError>,
    ) -> Result<(), EventError> {
        self.poller.register_response();
        let reflects_play = match self.play_state {
            PlayState::Submitted { stale_fetch_pending: true } => {
                debug!("State response was requested before the play was accepted");
                self.play_state = PlayState::Submitted { stale_fetch_pending: false };
                false
            }
            PlayState::Submitted { stale_fetch_pending: false } => true,
            PlayState::Idle | PlayState::Submitting => false,
        };
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(err) => {
                // Keep showing the last known state; the next poll will retry.
                warn!("Cannot fetch game state: {err}");
                return Ok(());
            }
        };
        if self.poller.is_stopped() && self.latest.as_ref().is_some_and(|s| s.is_finished()) {
            debug!("Ignoring game state received after the game was over");
            return Ok(());
        }
        debug!("Game state: {snapshot:?}");
        if is_new_completed_turn(self.latest.as_ref(), &snapshot) {
            let Some(turn) = &snapshot.last_turn else {
                return Err(EventError::CannotApplyResponse(internal_error_message!()));
            };
            let view = turn_result_view(&snapshot, turn, self.me());
            info!("Turn {} completed: {}", turn.turn_number, view.message);
            self.notable_events.push_back(NotableEvent::TurnCompleted(view));
        }
        let game_over = snapshot.is_finished();
        let victory = snapshot.game_winner() == Some(self.me());
        self.previous = self.latest.replace(snapshot);
        if reflects_play {
            self.play_state = PlayState::Idle;
        }
        if self.play_state == PlayState::Idle {
            self.transient_status = None;
        }
        if game_over {
            info!("Game over ({})", if victory { "victory" } else { "defeat" });
            self.stop();
            self.notable_events.push_back(NotableEvent::GameOver { victory });
        }
        Ok(())
    }

    pub fn process_play_response(
        &mut self, result: Result<PlayResponse, ApiError>, now: Instant,
    ) -> Result<(), EventError> {
        if self.play_state != PlayState::Submitting {
            return Err(EventError::UnexpectedResponse("play response without a play".to_owned()));
        }
        match result {
            Ok(_) => {
                self.play_state =
                    PlayState::Submitted { stale_fetch_pending: self.poller.is_in_flight() };
                self.joker_selected = false;
                self.transient_status = Some(CARD_PLAYED_MESSAGE);
                self.poller.schedule_refresh(now, self.config.refresh_after_play);
                self.notable_events.push_back(NotableEvent::CardAccepted);
            }
            Err(err) => {
                warn!("Card rejected: {err}");
                self.play_state = PlayState::Idle;
                let message = if err.is_network() {
                    PLAY_CONNECTION_ERROR_MESSAGE.to_owned()
                } else {
                    err.server_message().unwrap_or(PLAY_FAILED_MESSAGE).to_owned()
                };
                self.notable_events.push_back(NotableEvent::CardRejected(message));
            }
        }
        Ok(())
    }

    pub fn process_convert_guest_response(
        &mut self, result: Result<ConvertGuestResponse, ApiError>,
    ) -> Result<(), EventError> {
        if !self.conversion_pending {
            return Err(EventError::UnexpectedResponse(
                "guest conversion response without a request".to_owned(),
            ));
        }
        self.conversion_pending = false;
        match result {
            Ok(_) => {
                info!("Guest account converted");
                self.bootstrap.is_guest = false;
                self.notable_events.push_back(NotableEvent::GuestConverted(
                    CONVERSION_SUCCEEDED_MESSAGE.to_owned(),
                ));
            }
            Err(err) => {
                warn!("Guest conversion failed: {err}");
                let message = if err.is_network() {
                    CONVERSION_CONNECTION_ERROR_MESSAGE.to_owned()
                } else {
                    err.server_message().unwrap_or(CONVERSION_FAILED_MESSAGE).to_owned()
                };
                self.notable_events.push_back(NotableEvent::GuestConversionFailed(message));
            }
        }
        Ok(())
    }

    pub fn next_notable_event(&mut self) -> Option<NotableEvent> { self.notable_events.pop_front() }

    // Previous snapshot, kept only to detect newly completed turns.
    pub fn previous_snapshot(&self) -> Option<&GameStateSnapshot> { self.previous.as_ref() }

    fn send(&self, request: ClientRequest) {
        debug!("Sending {} {}", request.method().as_str(), request.path());
        if self.requests_tx.send(request).is_err() {
            warn!("{}", internal_error_message!("request channel closed"));
        }
    }
}
