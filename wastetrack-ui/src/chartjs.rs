//! Chart.js host
//!
//! Hands chart configurations to the page's global `Chart` constructor.
//! The created chart belongs to Chart.js from then on.

use wasm_bindgen::prelude::*;

use wastetrack::{BehaviorError, BehaviorResult, ChartConfig, ChartHost};

use crate::dom::WebElement;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = Chart)]
    type ChartJs;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(item: &JsValue, config: &JsValue) -> Result<ChartJs, JsValue>;
}

/// Renders through Chart.js loaded by the page
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartJsHost;

impl ChartJsHost {
    /// Whether the page loaded Chart.js
    pub fn available() -> bool {
        js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("Chart")).unwrap_or(false)
    }
}

impl ChartHost<WebElement> for ChartJsHost {
    fn render(&self, mount: &WebElement, config: &ChartConfig) -> BehaviorResult<()> {
        if !Self::available() {
            return Err(BehaviorError::Chart("Chart.js is not loaded".to_string()));
        }

        let json = config.to_json()?;
        let options = js_sys::JSON::parse(&json)
            .map_err(|e| BehaviorError::Serialization(format!("{:?}", e)))?;

        ChartJs::new(mount.raw().as_ref(), &options)
            .map(|_| ())
            .map_err(|e| BehaviorError::Chart(format!("{:?}", e)))
    }
}
