use serde::{Deserialize, Serialize};
use std::path::Path;

const CENTER_WIDTH: f64 = 600.0;
const CENTER_HEIGHT: f64 = 400.0;
const CARD_WIDTH: f64 = 400.0;
const CARD_HEIGHT: f64 = 400.0;
const RADIUS: f64 = 800.0;

/// JSON Canvas document: the source note in the center, one file node per
/// card on a surrounding circle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasData {
    pub nodes: Vec<CanvasNode>,
    pub edges: Vec<CanvasEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub file: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasEdge {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
}

fn file_node(path: &Path, x: f64, y: f64, width: f64, height: f64) -> CanvasNode {
    CanvasNode {
        id: nanoid::nanoid!(16),
        node_type: "file".to_string(),
        file: path.to_string_lossy().into_owned(),
        x: x.round() as i64,
        y: y.round() as i64,
        width: width as i64,
        height: height as i64,
    }
}

/// Build a star-layout canvas: the source note at the origin, cards evenly
/// spaced on a circle around its geometric center, one edge per card.
pub fn generate_canvas(source_path: &Path, card_paths: &[impl AsRef<Path>]) -> CanvasData {
    let center = file_node(source_path, 0.0, 0.0, CENTER_WIDTH, CENTER_HEIGHT);
    let center_id = center.id.clone();
    let mut nodes = vec![center];
    let mut edges = Vec::new();

    if card_paths.is_empty() {
        return CanvasData { nodes, edges };
    }

    // Radiate from the center node's geometric center.
    let origin_x = CENTER_WIDTH / 2.0;
    let origin_y = CENTER_HEIGHT / 2.0;

    for (i, path) in card_paths.iter().enumerate() {
        let angle = 2.0 * std::f64::consts::PI * i as f64 / card_paths.len() as f64;
        let card_center_x = origin_x + RADIUS * angle.cos();
        let card_center_y = origin_y + RADIUS * angle.sin();

        let node = file_node(
            path.as_ref(),
            card_center_x - CARD_WIDTH / 2.0,
            card_center_y - CARD_HEIGHT / 2.0,
            CARD_WIDTH,
            CARD_HEIGHT,
        );
        edges.push(CanvasEdge {
            id: nanoid::nanoid!(16),
            from_node: center_id.clone(),
            to_node: node.id.clone(),
        });
        nodes.push(node);
    }

    CanvasData { nodes, edges }
}
