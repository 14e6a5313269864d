use axum::{Json, extract::State};
use serde_json::{Value, json};

use super::super::AppState;
use crate::core::store::{Priority, TaskStatus};

const QUADRANT_LABELS: [(u8, &str); 4] = [
    (1, "Urgent & important"),
    (2, "Important, not urgent"),
    (3, "Urgent, not important"),
    (4, "Neither urgent nor important"),
];

const QUADRANT_FACES: [(u8, &str, &str); 4] = [
    (1, "\u{1F525}", "Do now"),
    (2, "\u{1F9E0}", "Plan it"),
    (3, "\u{26A0}", "Delegate"),
    (4, "\u{1F33F}", "Eliminate/Relax"),
];

/// Static board metadata for the page: labels, faces, badge classes and the
/// option lists for the task form.
pub async fn get_board(State(state): State<AppState>) -> Json<Value> {
    let labels: serde_json::Map<String, Value> = QUADRANT_LABELS
        .iter()
        .map(|(q, label)| (q.to_string(), json!(label)))
        .collect();
    let faces: serde_json::Map<String, Value> = QUADRANT_FACES
        .iter()
        .map(|(q, emoji, caption)| (q.to_string(), json!({ "emoji": emoji, "caption": caption })))
        .collect();
    let status_colors: serde_json::Map<String, Value> = TaskStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), json!(s.badge())))
        .collect();
    let status_options: Vec<Value> = TaskStatus::ALL
        .iter()
        .map(|s| json!({ "value": s.as_str(), "label": s.label() }))
        .collect();
    let priority_options: Vec<Value> = Priority::ALL
        .iter()
        .map(|p| json!({ "value": p.as_str(), "label": p.label() }))
        .collect();

    Json(json!({
        "title": "Eisenhower Matrix TODO Board",
        "quadrant_labels": labels,
        "quadrant_faces": faces,
        "status_colors": status_colors,
        "status_options": status_options,
        "priority_options": priority_options,
        "avatars_enabled": state.avatars.is_some(),
    }))
}
