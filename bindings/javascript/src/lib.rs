//! JavaScript/TypeScript bindings for the articulation tree normalizer
//!
//! Thin wrapper around `articulate-core` compiled to WebAssembly.
//! No logic of its own; all behavior comes from the core crate.

use wasm_bindgen::prelude::*;

fn parse_json(text: &str) -> Result<serde_json::Value, JsError> {
    serde_json::from_str(text).map_err(|e| JsError::new(&format!("Parse error: {}", e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Normalize one sending articulation (either upstream schema).
///
/// @param text - JSON text of a sending articulation node
/// @returns JSON string of the canonical group
/// @throws Error if the text is not valid JSON
#[wasm_bindgen(js_name = "normalizeSendingNode")]
pub fn normalize_sending_node(text: &str) -> Result<String, JsError> {
    let value = parse_json(text)?;
    to_json(&articulate_core::normalize_sending_node(&value))
}

/// Normalize a course record's articulations, grouped by sending college.
///
/// @param text - JSON text of one course record
/// @returns JSON string: [{ college, groupJoin: "or", groups }]
/// @throws Error if the text is not valid JSON
#[wasm_bindgen(js_name = "normalizeArticulations")]
pub fn normalize_articulations(text: &str) -> Result<String, JsError> {
    let value = parse_json(text)?;
    let record = articulate_core::CourseRecord::from_value(&value);
    to_json(&articulate_core::normalize_articulations(&record))
}

/// Render a canonical group into render instructions.
///
/// @param text - JSON text of a canonical group
/// @returns JSON string of the instruction list
/// @throws Error if the text is not a canonical group
#[wasm_bindgen(js_name = "renderCourseGroup")]
pub fn render_course_group(text: &str) -> Result<String, JsError> {
    let group: articulate_core::Group =
        serde_json::from_str(text).map_err(|e| JsError::new(&format!("Parse error: {}", e)))?;
    to_json(&articulate_core::render_course_group(&group))
}

/// Render a course record's articulation cards as HTML.
///
/// @param text - JSON text of one course record
/// @returns Markup for every college card
/// @throws Error if the text is not valid JSON
#[wasm_bindgen(js_name = "renderMarkup")]
pub fn render_markup(text: &str) -> Result<String, JsError> {
    let value = parse_json(text)?;
    let record = articulate_core::CourseRecord::from_value(&value);
    let colleges = articulate_core::normalize_articulations(&record);
    let cards = articulate_core::renderer::render_cards(&colleges);
    Ok(articulate_core::html::cards_markup(&cards))
}

/// Convert an upstream sendingArticulation object to the tree schema.
///
/// @param text - JSON text of a sendingArticulation object
/// @returns JSON string of the tree, or "null" when there is no articulation
/// @throws Error if the text is not valid JSON
#[wasm_bindgen(js_name = "convertAssist")]
pub fn convert_assist(text: &str) -> Result<String, JsError> {
    let value = parse_json(text)?;
    to_json(&articulate_core::assist::build_tree(&value))
}
