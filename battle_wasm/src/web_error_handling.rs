use std::cell::RefCell;

use wasm_bindgen::prelude::*;


pub type JsResult<T> = Result<T, JsValue>;

// The client is single-threaded, so wrapping all mutable singletons in `thread_local!` seems ok.
thread_local! {
    static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

// Copied from console_error_panic_hook
#[wasm_bindgen]
extern "C" {
    type Error;
    #[wasm_bindgen(constructor)]
    fn new() -> Error;
    #[wasm_bindgen(structural, method, getter)]
    fn stack(error: &Error) -> String;
}

pub fn set_panic_hook() {
    use std::panic;
    use std::sync::Once;
    static SET_HOOK: Once = Once::new();
    SET_HOOK.call_once(|| {
        panic::set_hook(Box::new(|panic_info| {
            // Log to the browser developer console. For more details see
            // https://github.com/rustwasm/console_error_panic_hook#readme
            console_error_panic_hook::hook(panic_info);

            // Keep a copy around so that the page can show it or attach it to a bug report.
            let backtrace = Error::new().stack();
            let report = format!("{panic_info}\n\n{backtrace}");
            LAST_PANIC.with(|cell| *cell.borrow_mut() = report);
        }));
    });
}

#[wasm_bindgen]
pub fn last_panic() -> String { LAST_PANIC.with(|cell| cell.borrow().clone()) }

#[wasm_bindgen(getter_with_clone)]
#[derive(Debug)]
pub struct RustError {
    pub message: String,
}

#[macro_export]
macro_rules! rust_error {
    ($($arg:tt)*) => {
        wasm_bindgen::JsValue::from(
            $crate::web_error_handling::RustError{ message: format!($($arg)*) }
        )
    };
}
