use super::ChartConfig;
use serde_json::json;

/// Categorical fills, assigned by segment position and wrapped past the end.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#DF6766", "#1DA486", "#FF6633", "#FFB399", "#FF33FF", "#FFFF99",
];

pub fn default_chart_config() -> ChartConfig {
    ChartConfig::from_value(json!({
        "bullet": {
            "margin": { "top": 20, "right": 10, "bottom": 20, "left": 10 },
            "barHeight": 10,
            "cornerRadius": 5,
            "legend": {
                "rowSpacing": 25,
                "dotRadius": 5,
                "labelX": 25,
                "countInset": 55,
                "titleCountInset": 45,
                "titleOffset": 50,
                "titleFontSize": 15,
                "countFontSize": 13,
                "labelFontSize": 12,
                "fontWeight": "500",
                "textColor": "#000000"
            },
            "palette": DEFAULT_PALETTE,
        }
    }))
}
