// HTTP API of the game server, as seen by the client.
//
// Transport is up to the caller: `ClientState` only produces `ClientRequest`s and consumes raw
// `(status, body)` pairs, so the same logic runs on top of `fetch` in the browser and `reqwest`
// in the terminal.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::card::Card;


pub type GameId = u64;

pub const CONVERT_GUEST_PATH: &str = "/convert-guest";

pub fn state_path(game_id: GameId) -> String { format!("/api/game/{game_id}/state") }
pub fn play_path(game_id: GameId) -> String { format!("/api/game/{game_id}/play") }
pub fn game_ready_path(game_id: GameId) -> String { format!("/api/check-game-ready/{game_id}") }

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PlayRequest {
    pub card: Card,
    pub use_joker: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PlayResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ConvertGuestRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ConvertGuestResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

// Lobby poll result: whether an opponent has joined.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GameReadiness {
    pub ready: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub game_id: Option<GameId>,
    #[serde(default)]
    pub error: Option<String>,
}

// Body of any non-2xx response.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ClientRequest {
    FetchState { game_id: GameId },
    PlayCard { game_id: GameId, request: PlayRequest },
    ConvertGuest(ConvertGuestRequest),
}

impl ClientRequest {
    pub fn method(&self) -> HttpMethod {
        match self {
            ClientRequest::FetchState { .. } => HttpMethod::Get,
            ClientRequest::PlayCard { .. } | ClientRequest::ConvertGuest(_) => HttpMethod::Post,
        }
    }

    pub fn path(&self) -> String {
        match self {
            ClientRequest::FetchState { game_id } => state_path(*game_id),
            ClientRequest::PlayCard { game_id, .. } => play_path(*game_id),
            ClientRequest::ConvertGuest(_) => CONVERT_GUEST_PATH.to_owned(),
        }
    }

    // JSON body, if the request has one.
    pub fn body(&self) -> Result<Option<String>, serde_json::Error> {
        match self {
            ClientRequest::FetchState { .. } => Ok(None),
            ClientRequest::PlayCard { request, .. } => serde_json::to_string(request).map(Some),
            ClientRequest::ConvertGuest(request) => serde_json::to_string(request).map(Some),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ApiError {
    // Server responded with a non-2xx status. `message` is the `error` field of the body.
    Http { status: u16, message: Option<String> },
    // Request never got a response.
    Network(String),
    // Response body could not be decoded.
    Parse(String),
}

impl ApiError {
    // Message the server meant to show to the user, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } => message.as_deref(),
            ApiError::Network(_) | ApiError::Parse(_) => None,
        }
    }

    pub fn is_network(&self) -> bool { matches!(self, ApiError::Network(_)) }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status, message: Some(message) } => {
                write!(f, "HTTP {status}: {message}")
            }
            ApiError::Http { status, message: None } => write!(f, "HTTP {status}"),
            ApiError::Network(message) => write!(f, "network error: {message}"),
            ApiError::Parse(message) => write!(f, "cannot parse response: {message}"),
        }
    }
}

pub fn is_success_status(status: u16) -> bool { (200..300).contains(&status) }

pub fn parse_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if is_success_status(status) {
        serde_json::from_str(body).map_err(|err| ApiError::Parse(err.to_string()))
    } else {
        // Error pages are not always JSON; the status alone is still meaningful.
        let error_body: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        Err(ApiError::Http { status, message: error_body.error })
    }
}
