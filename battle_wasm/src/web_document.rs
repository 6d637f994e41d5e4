use wasm_bindgen::JsCast;

use crate::rust_error;
use crate::web_element_ext::add_event_listener_and_forget;
use crate::web_error_handling::JsResult;
use crate::web_iterators::NodeListIterator;


pub struct WebDocument(web_sys::Document);

impl WebDocument {
    // `document.readyState` is "loading" until the HTML is parsed, then "interactive" and
    // "complete".
    pub fn is_loading(&self) -> bool { self.0.ready_state() == "loading" }

    pub fn get_element_by_id(&self, element_id: &str) -> Option<web_sys::Element> {
        self.0.get_element_by_id(element_id)
    }

    // The game page may omit some widgets (e.g. the guest conversion form), so missing elements
    // are not an error here.
    pub fn get_element_by_id_as<T: JsCast>(&self, element_id: &str) -> JsResult<Option<T>> {
        let Some(element) = self.get_element_by_id(element_id) else {
            return Ok(None);
        };
        let element = element
            .dyn_into::<T>()
            .map_err(|_| rust_error!("Element \"{}\" has unexpected type", element_id))?;
        Ok(Some(element))
    }

    pub fn query_selector(&self, selectors: &str) -> JsResult<Option<web_sys::Element>> {
        self.0.query_selector(selectors)
    }
    pub fn query_selector_all(&self, selectors: &str) -> JsResult<NodeListIterator> {
        self.0.query_selector_all(selectors).map(|iter| iter.into())
    }

    pub fn create_element(&self, local_name: &str) -> JsResult<web_sys::Element> {
        self.0.create_element(local_name)
    }

    pub fn add_event_listener_and_forget<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
        &self, event_type: &str, listener: impl FnMut(E) -> JsResult<()> + 'static,
    ) -> JsResult<()> {
        add_event_listener_and_forget(&self.0, event_type, listener)
    }
}

pub fn web_window() -> JsResult<web_sys::Window> {
    web_sys::window().ok_or_else(|| rust_error!("Cannot access window"))
}

pub fn web_document() -> JsResult<WebDocument> {
    let document = web_window()?.document().ok_or_else(|| rust_error!("Cannot access document"))?;
    Ok(WebDocument(document))
}
