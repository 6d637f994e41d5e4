// Executes `ClientRequest`s with `window.fetch`.

use battle_of_roles::api::{ApiError, ClientRequest};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::web_document::web_window;
use crate::web_error_handling::JsResult;


// Returns `(status, body)`. Non-2xx statuses are not errors at this level: `ClientState` decodes
// the error body itself.
pub async fn execute(url: &str, request: &ClientRequest) -> Result<(u16, String), ApiError> {
    let body = request.body().map_err(|err| ApiError::Parse(err.to_string()))?;
    fetch(url, request.method().as_str(), body.as_deref())
        .await
        .map_err(|err| ApiError::Network(describe_js_error(&err)))
}

async fn fetch(url: &str, method: &str, body: Option<&str>) -> JsResult<(u16, String)> {
    let init = web_sys::RequestInit::new();
    init.set_method(method);
    // Session cookie identifies the player.
    init.set_credentials(web_sys::RequestCredentials::SameOrigin);
    if let Some(body) = body {
        let headers = web_sys::Headers::new()?;
        headers.set("Content-Type", "application/json")?;
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(body));
    }
    let request = web_sys::Request::new_with_str_and_init(url, &init)?;
    let response = JsFuture::from(web_window()?.fetch_with_request(&request)).await?;
    let response: web_sys::Response = response.dyn_into()?;
    let text = JsFuture::from(response.text()?).await?;
    Ok((response.status(), text.as_string().unwrap_or_default()))
}

fn describe_js_error(err: &JsValue) -> String {
    if let Some(err) = err.dyn_ref::<js_sys::Error>() {
        String::from(err.message())
    } else if let Some(message) = err.as_string() {
        message
    } else {
        format!("{err:?}")
    }
}
