use canvas_layout::{
    GraphDocument, LayoutConfig, LayoutType, calculate_positions, config::parse_config,
    suggest_layout, validate_layout,
};
use wasm_bindgen::prelude::*;

fn parse_graph(graph_json: &str) -> Result<GraphDocument, String> {
    GraphDocument::parse(graph_json).map_err(|error| error.to_string())
}

fn layout_json(graph_json: &str, config_json: Option<&str>) -> Result<String, String> {
    let graph = parse_graph(graph_json)?;
    let config = match config_json {
        Some(raw) => parse_config(raw).map_err(|error| error.to_string())?,
        None => LayoutConfig::default(),
    };
    let nodes = calculate_positions(&graph.nodes, &graph.edges, &config);
    serde_json::to_string(&nodes).map_err(|error| error.to_string())
}

fn suggestions_json(graph_json: &str) -> Result<String, String> {
    let graph = parse_graph(graph_json)?;
    let suggestions = suggest_layout(&graph.nodes, &graph.edges);
    serde_json::to_string(&suggestions).map_err(|error| error.to_string())
}

fn layout_fits(graph_json: &str, layout: &str) -> Result<bool, String> {
    let graph = parse_graph(graph_json)?;
    let layout = layout
        .parse::<LayoutType>()
        .map_err(|error| error.to_string())?;
    Ok(validate_layout(&graph.nodes, &graph.edges, layout))
}

/// Positioned nodes for `{nodes, edges}` as a JSON array.
#[wasm_bindgen(js_name = calculatePositions)]
pub fn calculate_positions_json(
    graph_json: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    layout_json(graph_json, config_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen(js_name = suggestLayout)]
pub fn suggest_layout_json(graph_json: &str) -> Result<String, JsValue> {
    suggestions_json(graph_json).map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen(js_name = validateLayout)]
pub fn validate_layout_json(graph_json: &str, layout: &str) -> Result<bool, JsValue> {
    layout_fits(graph_json, layout).map_err(|error| JsValue::from_str(&error))
}
