use serde::{Deserialize, Serialize};

/// A horizontal length that is either absolute or relative to the container width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    /// Resolves against a container width.
    pub fn resolve(self, container: f64) -> f64 {
        match self {
            Length::Px(v) => v,
            Length::Percent(p) => container * p / 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub class: String,
    pub x: Length,
    pub y: f64,
    pub width: Length,
    pub height: f64,
    pub rx: f64,
    pub ry: f64,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub class: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
    pub font_size: f64,
    pub font_weight: String,
    pub fill: String,
    pub alignment_baseline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendRowLayout {
    pub dot: CirclePrimitive,
    pub label: TextPrimitive,
    pub count: TextPrimitive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendLayout {
    pub title: TextPrimitive,
    pub title_count: TextPrimitive,
    pub rows: Vec<LegendRowLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletChartLayout {
    /// Root canvas width; this is the margin-reduced width, matching the widget's `<svg>`.
    pub svg_width: f64,
    pub svg_height: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub inner_width: f64,
    pub inner_height: f64,
    pub bars: Vec<RectPrimitive>,
    pub legend: Option<LegendLayout>,
}
