//! Host Page Settings
//!
//! Reads `window.KANBAN_CONFIG` and installs the console-backed logger.
//! `window.kanbanLogs()` returns the buffered log lines for bug reports.

use log::{Level, LevelFilter};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;

use kanban_dnd::Config;

const CONFIG_GLOBAL: &str = "KANBAN_CONFIG";
const LOGS_GLOBAL: &str = "kanbanLogs";

/// Config from the host page, defaults when absent or invalid
pub fn load_config() -> Config {
    let Some(window) = web_sys::window() else {
        return Config::default();
    };
    let raw = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)).unwrap_or(JsValue::UNDEFINED);
    if raw.is_undefined() || raw.is_null() {
        return Config::default();
    }
    let parsed = serde_wasm_bindgen::from_value::<Config>(raw)
        .map_err(|e| e.to_string())
        .and_then(|config| config.validated().map_err(|e| e.to_string()));
    match parsed {
        Ok(config) => config,
        Err(err) => {
            web_sys::console::warn_1(&format!("[APP] invalid {}: {}", CONFIG_GLOBAL, err).into());
            Config::default()
        }
    }
}

fn console_sink(level: Level, line: &str) {
    let line = JsValue::from_str(line);
    match level {
        Level::Error => web_sys::console::error_1(&line),
        Level::Warn => web_sys::console::warn_1(&line),
        _ => web_sys::console::log_1(&line),
    }
}

pub fn init_logging(config: &Config) {
    let level = if cfg!(debug_assertions) { LevelFilter::Debug } else { LevelFilter::Info };
    if let Err(err) = rolling_logger::init_logger(config.log_capacity, level, console_sink) {
        web_sys::console::warn_1(&format!("[APP] logger already installed: {}", err).into());
        return;
    }
    expose_recent_logs();
    rolling_logger::info(&format!("[APP] logging at {} into {} lines", level, config.log_capacity));
}

fn expose_recent_logs() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let recent = Closure::<dyn Fn() -> JsValue>::new(|| JsValue::from_str(&rolling_logger::recent().join("\n")));
    if js_sys::Reflect::set(&window, &JsValue::from_str(LOGS_GLOBAL), recent.as_ref()).is_err() {
        log::warn!("[APP] could not expose {}", LOGS_GLOBAL);
    }
    // Lives for the whole page
    recent.forget();
}
