//! Shared helpers for WASM API operations
//!
//! Serialization and error conversion shared by the exported functions.
//! Logging goes through the `log` facade; in the browser `console_log`
//! forwards it to the console.

use serde::Serialize;
use wasm_bindgen::prelude::*;

// ============================================================================
// Logging Macros
// ============================================================================

/// Log a debug message with [WASM] prefix
#[macro_export]
macro_rules! wasm_log {
    ($($arg:tt)*) => {
        log::debug!("[WASM] {}", format!($($arg)*))
    };
}

/// Log an info message with [WASM] prefix
#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        log::info!("[WASM] {}", format!($($arg)*))
    };
}

/// Log an error message with [WASM] ❌ prefix
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        log::error!("[WASM] ❌ {}", format!($($arg)*))
    };
}

// ============================================================================
// Serialization Helpers
// ============================================================================

/// Serialize a value to a JavaScript object with automatic error handling
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| js_error(error_context, e))
}

/// Serialize a value to a JSON string with automatic error handling
pub fn to_json<T: Serialize>(value: &T, error_context: &str) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| js_error(error_context, e))
}

/// Log `error` and turn it into a JavaScript string value
pub fn js_error(context: &str, error: impl std::fmt::Display) -> JsValue {
    let msg = format!("{}: {}", context, error);
    wasm_error!("{}", msg);
    JsValue::from_str(&msg)
}
