// Browser client for the game page. The page provides the markup (scoreboard, play area, card
// buttons, end-game modal); this module fills it in and talks to the server.

mod net;
mod render;
mod web_document;
mod web_element_ext;
mod web_error_handling;
mod web_iterators;
mod web_logger;

use std::cell::RefCell;
use std::iter;
use std::mem;
use std::str::FromStr;
use std::sync::mpsc;

use battle_of_roles::api::{ApiError, ClientRequest};
use battle_of_roles::bootstrap::{
    GAME_DATA_ELEMENT_ID, GAME_ID_ATTRIBUTE, GameBootstrap, IS_GUEST_ATTRIBUTE,
    PLAYER_NUM_ATTRIBUTE,
};
use battle_of_roles::card::Card;
use battle_of_roles::client::{ClientState, GuestConversionError, NotableEvent};
use battle_of_roles::config::ClientConfig;
use battle_of_roles::poller::PollOutcome;
use battle_of_roles::view::GameView;
use instant::Instant;
use log::{debug, error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use crate::web_document::{web_document, web_window};
use crate::web_element_ext::{WebElementExt, add_event_listener_and_forget};
use crate::web_error_handling::{JsResult, set_panic_hook};


// How often the poller is consulted. Much finer than the poll interval so that the post-play
// refresh is not delayed.
const TICK_INTERVAL_MS: i32 = 50;

struct WebClient {
    state: ClientState,
    requests_rx: mpsc::Receiver<ClientRequest>,
    ticker: Option<i32>,
    needs_render: bool,
}

// Everything `pump` needs to act upon once the client is no longer borrowed.
struct PendingWork {
    config: ClientConfig,
    requests: Vec<ClientRequest>,
    events: Vec<NotableEvent>,
    view: Option<GameView>,
}

impl WebClient {
    fn take_pending_work(&mut self) -> PendingWork {
        let requests = self.requests_rx.try_iter().collect();
        let events = iter::from_fn(|| self.state.next_notable_event()).collect();
        let view = if mem::take(&mut self.needs_render) { self.state.view() } else { None };
        PendingWork {
            config: self.state.config().clone(),
            requests,
            events,
            view,
        }
    }
}

thread_local! {
    static CLIENT: RefCell<Option<WebClient>> = const { RefCell::new(None) };
}

// Returns `None` if the client has not been initialized (e.g. not a game page).
fn with_client<T>(f: impl FnOnce(&mut WebClient) -> JsResult<T>) -> JsResult<Option<T>> {
    CLIENT.with(|cell| match cell.borrow_mut().as_mut() {
        Some(client) => f(client).map(Some),
        None => Ok(None),
    })
}

#[wasm_bindgen(start)]
pub fn start() -> JsResult<()> {
    set_panic_hook();
    web_logger::init(log::LevelFilter::Info);
    let document = web_document()?;
    if document.is_loading() {
        document.add_event_listener_and_forget("DOMContentLoaded", |_: web_sys::Event| init_game())
    } else {
        init_game()
    }
}

fn init_game() -> JsResult<()> {
    let document = web_document()?;
    let Some(game_data) = document.get_element_by_id(GAME_DATA_ELEMENT_ID) else {
        error!("Cannot find #{GAME_DATA_ELEMENT_ID}");
        return Ok(());
    };
    let bootstrap = GameBootstrap::from_attributes(
        game_data.get_attribute(GAME_ID_ATTRIBUTE).as_deref(),
        game_data.get_attribute(PLAYER_NUM_ATTRIBUTE).as_deref(),
        game_data.get_attribute(IS_GUEST_ATTRIBUTE).as_deref(),
    );
    let bootstrap = match bootstrap {
        Ok(bootstrap) => bootstrap,
        Err(err) => {
            error!("Cannot read game parameters: {err}");
            return Ok(());
        }
    };
    let (requests_tx, requests_rx) = mpsc::channel();
    let state = ClientState::new(bootstrap, ClientConfig::default(), requests_tx, Instant::now());
    CLIENT.with(|cell| {
        *cell.borrow_mut() = Some(WebClient {
            state,
            requests_rx,
            ticker: None,
            needs_render: false,
        })
    });
    attach_listeners()?;
    start_ticker()?;
    tick()
}

fn attach_listeners() -> JsResult<()> {
    let document = web_document()?;
    let mut num_buttons = 0;
    for node in document.query_selector_all(render::CARD_BUTTON_SELECTOR)? {
        let button: web_sys::HtmlButtonElement = node.dyn_into()?;
        let card_name = button.get_attribute(render::CARD_ATTRIBUTE).unwrap_or_default();
        let Ok(card) = Card::from_str(&card_name) else {
            warn!("Card button with unknown card {card_name:?}");
            continue;
        };
        let target = button.clone();
        button.add_event_listener_and_forget("click", move |event: web_sys::Event| {
            event.prevent_default();
            if target.disabled() {
                debug!("Ignoring click on disabled {}", card.name());
                return Ok(());
            }
            play_card(card)
        })?;
        num_buttons += 1;
    }
    debug!("Attached {num_buttons} card buttons");

    if let Some(checkbox) = document.get_element_by_id(render::USE_JOKER_ID) {
        checkbox.add_event_listener_and_forget("change", |_: web_sys::Event| {
            let selected = render::joker_checked()?;
            with_client(|client| {
                client.state.set_joker_selected(selected);
                Ok(())
            })?;
            Ok(())
        })?;
    }
    if let Some(button) = document.get_element_by_id(render::CONVERT_ACCOUNT_BUTTON_ID) {
        button.add_event_listener_and_forget("click", |event: web_sys::Event| {
            event.prevent_default();
            convert_account()
        })?;
    }
    add_event_listener_and_forget(&web_window()?.into(), "beforeunload", |_: web_sys::Event| {
        with_client(|client| {
            client.state.stop();
            Ok(())
        })?;
        stop_ticker()
    })?;
    Ok(())
}

fn start_ticker() -> JsResult<()> {
    let closure = Closure::<dyn FnMut() -> JsResult<()>>::new(tick);
    let ticker = web_window()?.set_interval_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        TICK_INTERVAL_MS,
    )?;
    closure.forget();
    with_client(|client| {
        client.ticker = Some(ticker);
        Ok(())
    })?;
    Ok(())
}

fn stop_ticker() -> JsResult<()> {
    if let Some(Some(ticker)) = with_client(|client| Ok(client.ticker.take()))? {
        web_window()?.clear_interval_with_handle(ticker);
        info!("Polling timer cleared");
    }
    Ok(())
}

fn tick() -> JsResult<()> {
    let outcome = with_client(|client| Ok(client.state.tick(Instant::now())))?;
    if outcome == Some(PollOutcome::Stopped) {
        stop_ticker()?;
    }
    pump()
}

fn play_card(card: Card) -> JsResult<()> {
    let use_joker = render::joker_checked()?;
    with_client(|client| {
        client.state.set_joker_selected(use_joker);
        match client.state.play_card(card) {
            Ok(()) => client.needs_render = true,
            Err(err) => warn!("Cannot play {}: {err}", card.name()),
        }
        Ok(())
    })?;
    pump()
}

// Executes outgoing requests, applies the view and reacts to notable events. Must be called after
// anything that may have changed the client state.
fn pump() -> JsResult<()> {
    let Some(work) = with_client(|client| Ok(client.take_pending_work()))? else {
        return Ok(());
    };
    for request in work.requests {
        spawn_request(&work.config, request);
    }
    if let Some(view) = &work.view {
        render::render_game(view)?;
    }
    for event in work.events {
        handle_notable_event(event)?;
    }
    Ok(())
}

fn spawn_request(config: &ClientConfig, request: ClientRequest) {
    let url = config.url(&request.path());
    wasm_bindgen_futures::spawn_local(async move {
        let result = net::execute(&url, &request).await;
        if let Err(err) = process_response(&request, result) {
            error!("Cannot process response to {} {url}: {err:?}", request.method().as_str());
        }
    });
}

fn process_response(
    request: &ClientRequest, result: Result<(u16, String), ApiError>,
) -> JsResult<()> {
    with_client(|client| {
        client
            .state
            .process_response(request, result, Instant::now())
            .map_err(|err| rust_error!("{err}"))?;
        client.needs_render = true;
        Ok(())
    })?;
    pump()
}

fn handle_notable_event(event: NotableEvent) -> JsResult<()> {
    match event {
        NotableEvent::TurnCompleted(result) => render::render_turn_result(&result)?,
        NotableEvent::GameOver { .. } => stop_ticker()?,
        NotableEvent::CardAccepted => render::set_joker_checked(false)?,
        NotableEvent::CardRejected(message) | NotableEvent::GuestConversionFailed(message) => {
            web_window()?.alert_with_message(&message)?;
        }
        NotableEvent::GuestConverted(message) => {
            let window = web_window()?;
            window.alert_with_message(&message)?;
            window.location().set_href("/")?;
        }
    }
    Ok(())
}

#[wasm_bindgen]
pub fn show_conversion_form() -> JsResult<()> { render::show_conversion_form() }

#[wasm_bindgen]
pub fn convert_account() -> JsResult<()> {
    let username = render::input_value(render::NEW_USERNAME_ID)?;
    let password = render::input_value(render::NEW_PASSWORD_ID)?;
    let outcome = with_client(|client| Ok(client.state.convert_guest(&username, &password)))?;
    match outcome {
        None => warn!("Game client is not running"),
        Some(Ok(())) => {}
        Some(Err(GuestConversionError::MissingFields(message))) => {
            web_window()?.alert_with_message(&message)?;
        }
        Some(Err(err)) => warn!("Cannot convert guest account: {err}"),
    }
    pump()
}
