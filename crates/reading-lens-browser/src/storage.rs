//! `chrome.storage.sync` bindings.
//!
//! The store is optional: outside an extension context every call reports
//! [`StorageError::Unavailable`] and callers fall back to defaults.

use std::collections::HashMap;

use reading_lens_core::{ConfigSchema, RawConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = get)]
    fn sync_get(keys: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"], js_name = set)]
    fn sync_set(items: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync", "onChanged"], js_name = addListener)]
    fn on_changed_add_listener(callback: &js_sys::Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync", "onChanged"], js_name = removeListener)]
    fn on_changed_remove_listener(callback: &js_sys::Function) -> Result<(), JsValue>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("chrome.storage.sync is not available")]
    Unavailable,

    #[error("storage call failed: {0}")]
    Js(String),

    #[error("could not decode stored values: {0}")]
    Decode(String),
}

impl From<JsValue> for StorageError {
    fn from(e: JsValue) -> Self {
        StorageError::Js(format!("{:?}", e))
    }
}

impl From<serde_wasm_bindgen::Error> for StorageError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        StorageError::Decode(e.to_string())
    }
}

/// One entry of an `onChanged` notification.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageChange {
    /// Absent when the key was removed; that reads as `null`.
    #[serde(default, rename = "newValue")]
    pub new_value: Value,
}

/// Whether `chrome.storage.sync` exists in this context.
pub fn is_available() -> bool {
    let mut current: JsValue = js_sys::global().into();
    for key in ["chrome", "storage", "sync"] {
        match js_sys::Reflect::get(&current, &JsValue::from_str(key)) {
            Ok(next) if next.is_object() => current = next,
            _ => return false,
        }
    }
    true
}

/// Read `keys` from the sync store as a raw JSON map.
pub async fn get_raw(keys: &[&str]) -> Result<RawConfig, StorageError> {
    if !is_available() {
        return Err(StorageError::Unavailable);
    }
    let keys = serde_wasm_bindgen::to_value(keys)?;
    let stored = JsFuture::from(sync_get(&keys)?).await?;
    if stored.is_undefined() || stored.is_null() {
        return Ok(RawConfig::new());
    }
    Ok(serde_wasm_bindgen::from_value(stored)?)
}

/// Load a configuration snapshot, merging stored values over defaults.
pub async fn load_config<T: ConfigSchema>() -> Result<T, StorageError> {
    let raw = get_raw(T::KEYS).await?;
    tracing::debug!(target: "reading_lens::storage", keys = raw.len(), "loaded stored config");
    Ok(T::from_raw(&raw))
}

/// [`load_config`], logging failures and using defaults instead.
pub async fn load_config_or_default<T: ConfigSchema>() -> T {
    match load_config::<T>().await {
        Ok(config) => config,
        Err(StorageError::Unavailable) => T::default(),
        Err(e) => {
            tracing::warn!(target: "reading_lens::storage", "using default config: {}", e);
            T::default()
        }
    }
}

/// Collect the new values of a change notification.
pub fn new_values(changes: impl IntoIterator<Item = (String, StorageChange)>) -> RawConfig {
    changes
        .into_iter()
        .map(|(key, change)| (key, change.new_value))
        .collect()
}

fn decode_changes(changes: JsValue) -> Result<RawConfig, StorageError> {
    let changes: HashMap<String, StorageChange> = serde_wasm_bindgen::from_value(changes)?;
    Ok(new_values(changes))
}

/// A registered `onChanged` listener. Dropping it unregisters the listener.
pub struct ChangeSubscription {
    callback: Closure<dyn FnMut(JsValue)>,
}

impl ChangeSubscription {
    fn function(&self) -> &js_sys::Function {
        self.callback.as_ref().unchecked_ref()
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        if let Err(e) = on_changed_remove_listener(self.function()) {
            tracing::debug!(target: "reading_lens::storage", "removeListener failed: {:?}", e);
        }
    }
}

/// Call `on_change` with the new values of every change notification.
pub fn subscribe(
    mut on_change: impl FnMut(RawConfig) + 'static,
) -> Result<ChangeSubscription, StorageError> {
    if !is_available() {
        return Err(StorageError::Unavailable);
    }

    let callback = Closure::<dyn FnMut(JsValue)>::new(move |changes: JsValue| {
        match decode_changes(changes) {
            Ok(raw) if raw.is_empty() => {}
            Ok(raw) => {
                tracing::debug!(target: "reading_lens::storage", keys = raw.len(), "config changed");
                on_change(raw);
            }
            Err(e) => {
                tracing::warn!(target: "reading_lens::storage", "ignoring change notification: {}", e);
            }
        }
    });

    let subscription = ChangeSubscription { callback };
    on_changed_add_listener(subscription.function())?;
    Ok(subscription)
}

#[derive(Serialize)]
struct EnabledPatch {
    enabled: bool,
}

/// Flip the stored spotlight `enabled` flag. Returns the new value.
pub async fn toggle_enabled() -> Result<bool, StorageError> {
    let raw = get_raw(&["enabled"]).await?;
    let enabled = !raw.get("enabled").and_then(Value::as_bool).unwrap_or(true);

    let items = serde_wasm_bindgen::to_value(&EnabledPatch { enabled })?;
    JsFuture::from(sync_set(&items)?).await?;
    tracing::debug!(target: "reading_lens::storage", enabled, "toggled spotlight");
    Ok(enabled)
}
