//! WebAssembly bindings
//!
//! Lets a page filter diagram text before handing it to Mermaid itself,
//! which is how the browser front end uses the filter.

use wasm_bindgen::prelude::*;

use crate::core::{ExclusionSet, FilterMode, RenderConfig, SecurityLevel};
use crate::plugins::er::{inspect, DiagramFilter};

/// Set up the panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

/// Filter diagram text
///
/// # Arguments
/// * `text` - combined diagram text
/// * `exclude` - comma-separated entity names, as found in an `exclude` query parameter
/// * `prune_orphans` - also drop entities left without relationships
#[wasm_bindgen]
pub fn filter_diagram(text: &str, exclude: &str, prune_orphans: bool) -> String {
    let mode = if prune_orphans {
        FilterMode::PruneOrphans
    } else {
        FilterMode::ExclusionOnly
    };
    DiagramFilter::new(mode).filter(text, &ExclusionSet::from_csv(exclude))
}

/// Entities and relationships of a diagram as JSON
#[wasm_bindgen]
pub fn list_entities(text: &str) -> Result<String, JsValue> {
    serde_json::to_string(&inspect(text)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `mermaid.initialize` options as JSON
#[wasm_bindgen]
pub fn render_config_json(
    start_on_load: bool,
    security_level: &str,
    diagram_padding: u32,
) -> Result<String, JsValue> {
    let level: SecurityLevel = security_level
        .parse()
        .map_err(|e: crate::core::FilterError| JsValue::from_str(&e.to_string()))?;
    RenderConfig::new(start_on_load, level, diagram_padding)
        .to_json()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
