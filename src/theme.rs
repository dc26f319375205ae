use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub connected_node_color: String,
    pub isolated_node_color: String,
    pub edge_color: String,
    pub component_fill: String,
    pub component_border: String,
    pub outer_border: String,
    pub label_color: String,
}

impl Theme {
    pub fn night() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            background: "#0B1026".to_string(),
            connected_node_color: "#F4F1DE".to_string(),
            isolated_node_color: "#8EA4D2".to_string(),
            edge_color: "rgba(244,241,222,0.25)".to_string(),
            component_fill: "rgba(120,140,220,0.12)".to_string(),
            component_border: "#3D4F8F".to_string(),
            outer_border: "#C0392B".to_string(),
            label_color: "#D7DCEB".to_string(),
        }
    }

    pub fn day() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 13.0,
            background: "#FFFFFF".to_string(),
            connected_node_color: "#1C2430".to_string(),
            isolated_node_color: "#7A8AA6".to_string(),
            edge_color: "rgba(28,36,48,0.3)".to_string(),
            component_fill: "rgba(147,112,219,0.15)".to_string(),
            component_border: "#9370DB".to_string(),
            outer_border: "#FF0000".to_string(),
            label_color: "#333333".to_string(),
        }
    }
}
