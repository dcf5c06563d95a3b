//! Python bindings for the articulation tree normalizer
//!
//! Thin wrapper around `articulate-core`, no logic of its own.
//! All behavior comes from the core crate.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn parse_json(text: &str) -> PyResult<serde_json::Value> {
    serde_json::from_str(text).map_err(|e| PyValueError::new_err(format!("Parse error: {}", e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| PyValueError::new_err(format!("Serialization error: {}", e)))
}

/// Normalize one sending articulation (either upstream schema) to a canonical group.
///
/// Args:
///     text: JSON text of a sending articulation node
///
/// Returns:
///     JSON string of the canonical group ({"type": "single" | "and" | "or" | "nested", ...})
///
/// Raises:
///     ValueError: If the text is not valid JSON
#[pyfunction]
fn normalize_sending_node(text: &str) -> PyResult<String> {
    let value = parse_json(text)?;
    to_json(&articulate_core::normalize_sending_node(&value))
}

/// Normalize a receiving-course record's articulations, grouped by college.
///
/// Args:
///     text: JSON text of one course record
///
/// Returns:
///     JSON string: [{"college": ..., "groupJoin": "or", "groups": [...]}, ...]
///
/// Raises:
///     ValueError: If the text is not valid JSON
#[pyfunction]
fn normalize_articulations(text: &str) -> PyResult<String> {
    let value = parse_json(text)?;
    let record = articulate_core::CourseRecord::from_value(&value);
    to_json(&articulate_core::normalize_articulations(&record))
}

/// Render a course record's articulation cards as HTML.
///
/// Raises:
///     ValueError: If the text is not valid JSON
#[pyfunction]
fn render_markup(text: &str) -> PyResult<String> {
    let value = parse_json(text)?;
    let record = articulate_core::CourseRecord::from_value(&value);
    let colleges = articulate_core::normalize_articulations(&record);
    let cards = articulate_core::renderer::render_cards(&colleges);
    Ok(articulate_core::html::cards_markup(&cards))
}

/// Convert an upstream sendingArticulation object to the tree schema.
///
/// Returns:
///     JSON string of the tree, or "null" when there is no articulation
///
/// Raises:
///     ValueError: If the text is not valid JSON
#[pyfunction]
fn convert_assist(text: &str) -> PyResult<String> {
    let value = parse_json(text)?;
    to_json(&articulate_core::assist::build_tree(&value))
}

/// articulate Python module: articulation tree normalizer
#[pymodule]
fn articulate(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(normalize_sending_node, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_articulations, m)?)?;
    m.add_function(wrap_pyfunction!(render_markup, m)?)?;
    m.add_function(wrap_pyfunction!(convert_assist, m)?)?;
    Ok(())
}
