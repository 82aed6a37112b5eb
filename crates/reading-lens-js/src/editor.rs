//! Editor line spotlight binding.
//!
//! The extension host owns the editor API; it passes in a plain JS object
//! that turns line spans into decorations.

use reading_lens_browser::{
    ConfigSchema, DecorationHost, LineSpan, LineSpotlight, LineSpotlightConfig, RawConfig,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Decoration host provided by the editor extension.
    ///
    /// Expected shape: `{ setStyles(litCss, dimCss), setLines(litStart,
    /// litEnd, dimRanges), clear(), dispose(), notify(message) }` where
    /// `dimRanges` is an array of inclusive `[first, last]` line pairs.
    pub type JsDecorationHost;

    #[wasm_bindgen(method, catch, js_name = setStyles)]
    fn set_styles(this: &JsDecorationHost, lit_css: &str, dim_css: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = setLines)]
    fn set_lines_js(
        this: &JsDecorationHost,
        lit_start: u32,
        lit_end: u32,
        dim_ranges: JsValue,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = clear)]
    fn clear_js(this: &JsDecorationHost) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = dispose)]
    fn dispose_js(this: &JsDecorationHost) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = notify)]
    fn notify_js(this: &JsDecorationHost, message: &str) -> Result<(), JsValue>;
}

fn log_host_error(call: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        tracing::warn!(target: "reading_lens::lines", "decoration host {} threw: {:?}", call, e);
    }
}

impl DecorationHost for JsDecorationHost {
    fn create_styles(&mut self, lit_css: &str, dim_css: &str) {
        log_host_error("setStyles", self.set_styles(lit_css, dim_css));
    }

    fn dispose_styles(&mut self) {
        log_host_error("dispose", self.dispose_js());
    }

    fn set_lines(&mut self, lit: LineSpan, dim: &[LineSpan]) {
        let pairs: Vec<[u32; 2]> = dim
            .iter()
            .map(|span| [span.first as u32, span.last as u32])
            .collect();
        let dim_ranges = match serde_wasm_bindgen::to_value(&pairs) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(target: "reading_lens::lines", "could not encode dim ranges: {}", e);
                return;
            }
        };
        log_host_error(
            "setLines",
            self.set_lines_js(lit.first as u32, lit.last as u32, dim_ranges),
        );
    }

    fn clear(&mut self) {
        log_host_error("clear", self.clear_js());
    }

    fn notify(&mut self, message: &str) {
        log_host_error("notify", self.notify_js(message));
    }
}

fn decode_config(value: JsValue) -> Result<RawConfig, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(RawConfig::new());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid configuration object: {}", e)))
}

/// Line spotlight for one editor extension activation.
#[wasm_bindgen(js_name = LineSpotlight)]
pub struct JsLineSpotlight {
    engine: LineSpotlight,
    host: JsDecorationHost,
}

#[wasm_bindgen(js_class = LineSpotlight)]
impl JsLineSpotlight {
    /// Create styles on `host` from `config` (the `readingSpotlight` section
    /// as a plain object).
    #[wasm_bindgen(constructor)]
    pub fn new(host: JsDecorationHost, config: JsValue) -> Result<JsLineSpotlight, JsError> {
        let config = LineSpotlightConfig::from_raw(&decode_config(config)?);
        let mut this = Self {
            engine: LineSpotlight::new(config),
            host,
        };
        this.engine.activate(&mut this.host);
        Ok(this)
    }

    /// The active editor's selection moved, or another editor became active.
    #[wasm_bindgen(js_name = selectionChanged)]
    pub fn selection_changed(&mut self, cursor_line: u32, total_lines: u32) {
        self.engine
            .selection_changed(&mut self.host, cursor_line as usize, total_lines as usize);
    }

    /// The configuration section changed.
    #[wasm_bindgen(js_name = configChanged)]
    pub fn config_changed(&mut self, config: JsValue) -> Result<(), JsError> {
        let next = self.engine.config().merge(&decode_config(config)?);
        self.engine.config_changed(&mut self.host, next);
        Ok(())
    }

    /// Flip the runtime switch; returns whether the spotlight is now active.
    pub fn toggle(&mut self) -> bool {
        self.engine.toggle(&mut self.host)
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.engine.is_active()
    }

    /// Dispose decoration styles.
    pub fn deactivate(&mut self) {
        self.engine.deactivate(&mut self.host);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen(inline_js = "
        export function recordingHost() {
            const calls = [];
            return {
                calls,
                setStyles(lit, dim) { calls.push(`setStyles ${lit} ${dim}`); },
                setLines(start, end, dim) { calls.push(`setLines ${start}-${end} ${JSON.stringify(dim)}`); },
                clear() { calls.push('clear'); },
                dispose() { calls.push('dispose'); },
                notify(message) { calls.push(`notify ${message}`); },
            };
        }
        export function recordedCalls(host) { return host.calls.join('\\n'); }
    ")]
    extern "C" {
        fn recordingHost() -> JsDecorationHost;
        fn recordedCalls(host: &JsDecorationHost) -> String;
    }

    #[wasm_bindgen_test]
    fn test_band_reaches_host() {
        let host = recordingHost();
        let recorder: JsDecorationHost = host.clone();
        let config = js_sys::JSON::parse(r#"{"lineCount": 3}"#).unwrap();
        let mut spot = JsLineSpotlight::new(host, config).unwrap();

        spot.selection_changed(4, 8);
        assert!(!spot.toggle());
        spot.deactivate();

        let calls = recordedCalls(&recorder);
        let lines: Vec<&str> = calls.lines().collect();
        assert_eq!(
            lines,
            vec![
                "setStyles rgba(255,255,0,.22) rgba(0,0,0,0.25)",
                "setLines 3-5 [[0,2],[6,7]]",
                "clear",
                "notify Reading Spotlight: Disabled",
                "dispose",
            ]
        );
    }
}
