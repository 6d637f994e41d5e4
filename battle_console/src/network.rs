// Blocking HTTP transport for `ClientRequest`s.

use battle_of_roles::api::{self, ApiError, ClientRequest, GameId, GameReadiness, HttpMethod};
use battle_of_roles::config::ClientConfig;
use log::debug;
use reqwest::blocking::Client;
use reqwest::header;
use url::Url;


pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
    // Raw `Cookie` header value, e.g. "session=...". The server identifies the player by it.
    cookie: Option<String>,
}

impl HttpTransport {
    pub fn new(config: ClientConfig, cookie: Option<String>) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        anyhow::ensure!(
            matches!(base_url.scheme(), "http" | "https"),
            "Unsupported server URL scheme: {}",
            base_url.scheme()
        );
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(HttpTransport { client, config, cookie })
    }

    pub fn config(&self) -> &ClientConfig { &self.config }

    // Returns `(status, body)`; only transport failures are errors.
    pub fn execute(&self, request: &ClientRequest) -> Result<(u16, String), ApiError> {
        let body = request.body().map_err(|err| ApiError::Parse(err.to_string()))?;
        self.send(request.method(), &request.path(), body)
    }

    pub fn check_ready(&self, game_id: GameId) -> Result<GameReadiness, ApiError> {
        let (status, body) = self.send(HttpMethod::Get, &api::game_ready_path(game_id), None)?;
        api::parse_response(status, &body)
    }

    fn send(
        &self, method: HttpMethod, path: &str, body: Option<String>,
    ) -> Result<(u16, String), ApiError> {
        let url = self.config.url(path);
        debug!("{} {url}", method.as_str());
        let mut builder = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(body) = body {
            builder = builder.header(header::CONTENT_TYPE, "application/json").body(body);
        }
        let response = builder.send().map_err(|err| ApiError::Network(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|err| ApiError::Network(err.to_string()))?;
        Ok((status, body))
    }
}
