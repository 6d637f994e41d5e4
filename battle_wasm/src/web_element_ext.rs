use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;

use crate::rust_error;
use crate::web_document::web_document;
use crate::web_error_handling::JsResult;


pub trait WebElementExt {
    fn with_classes<'a>(
        self, classes: impl IntoIterator<Item = &'a str>,
    ) -> JsResult<web_sys::Element>;

    // Inline style; the element must be an `HtmlElement`.
    fn set_style(&self, property: &str, value: &str) -> JsResult<()>;

    fn add_event_listener_and_forget<E: FromWasmAbi + 'static>(
        &self, event_type: &str, listener: impl FnMut(E) -> JsResult<()> + 'static,
    ) -> JsResult<()>;

    fn remove_all_children(&self);
    fn set_child(&self, child: web_sys::Element) -> JsResult<()>;

    fn append_new_element(&self, local_name: &str) -> JsResult<web_sys::Element>;
}

impl WebElementExt for web_sys::Element {
    fn with_classes<'a>(
        self, classes: impl IntoIterator<Item = &'a str>,
    ) -> JsResult<web_sys::Element> {
        for class in classes {
            self.class_list().add_1(class)?;
        }
        Ok(self)
    }

    fn set_style(&self, property: &str, value: &str) -> JsResult<()> {
        let element = self
            .dyn_ref::<web_sys::HtmlElement>()
            .ok_or_else(|| rust_error!("Cannot style non-HTML element \"{}\"", self.id()))?;
        element.style().set_property(property, value)
    }

    fn add_event_listener_and_forget<E: FromWasmAbi + 'static>(
        &self, event_type: &str, listener: impl FnMut(E) -> JsResult<()> + 'static,
    ) -> JsResult<()> {
        add_event_listener_and_forget(self, event_type, listener)
    }

    fn remove_all_children(&self) { self.replace_children_with_node_0() }

    fn set_child(&self, child: web_sys::Element) -> JsResult<()> {
        self.remove_all_children();
        self.append_child(&child)?;
        Ok(())
    }

    fn append_new_element(&self, local_name: &str) -> JsResult<web_sys::Element> {
        let node = web_document()?.create_element(local_name)?;
        self.append_child(&node)?;
        Ok(node)
    }
}

// Listeners live as long as the page: the game page never removes its widgets, so leaking the
// closure is fine.
pub fn add_event_listener_and_forget<E: FromWasmAbi + 'static>(
    target: &web_sys::EventTarget, event_type: &str,
    listener: impl FnMut(E) -> JsResult<()> + 'static,
) -> JsResult<()> {
    let closure = Closure::new(listener);
    target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
