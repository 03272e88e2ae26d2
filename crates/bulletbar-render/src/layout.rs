use crate::model::{
    BulletChartLayout, CirclePrimitive, LegendLayout, LegendRowLayout, Length, RectPrimitive,
    TextAnchor, TextPrimitive,
};
use crate::number::fmt_js;
use crate::{Error, Result};
use bulletbar_core::{ChartConfig, DEFAULT_PALETTE, Segment};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Typed layout constants, extracted from a [`ChartConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub margin: Margin,
    pub bar_height: f64,
    pub corner_radius: f64,
    pub legend_row_spacing: f64,
    pub legend_dot_radius: f64,
    pub legend_label_x: f64,
    /// Distance of the row count labels from the full width.
    pub legend_count_inset: f64,
    /// Distance of the title count from the full width.
    pub legend_title_count_inset: f64,
    /// Distance of the title row above the vertical center.
    pub legend_title_offset: f64,
    pub title_font_size: f64,
    pub count_font_size: f64,
    pub label_font_size: f64,
    pub font_weight: String,
    pub text_color: String,
    pub palette: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: Margin {
                top: 20.0,
                right: 10.0,
                bottom: 20.0,
                left: 10.0,
            },
            bar_height: 10.0,
            corner_radius: 5.0,
            legend_row_spacing: 25.0,
            legend_dot_radius: 5.0,
            legend_label_x: 25.0,
            legend_count_inset: 55.0,
            legend_title_count_inset: 45.0,
            legend_title_offset: 50.0,
            title_font_size: 15.0,
            count_font_size: 13.0,
            label_font_size: 12.0,
            font_weight: "500".to_string(),
            text_color: "#000000".to_string(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl LayoutConfig {
    /// Reads `bullet.*` keys, falling back to the defaults for anything missing.
    pub fn from_config(config: &ChartConfig) -> Result<Self> {
        let d = Self::default();

        let num = |path: &str, fallback: f64| -> Result<f64> {
            let Some(v) = config.get(path) else {
                return Ok(fallback);
            };
            match v.as_f64() {
                Some(n) if n.is_finite() && n >= 0.0 => Ok(n),
                _ => Err(Error::InvalidConfig {
                    message: format!("`{path}` must be a non-negative number, got {v}"),
                }),
            }
        };
        let text = |path: &str, fallback: &str| -> Result<String> {
            let Some(v) = config.get(path) else {
                return Ok(fallback.to_string());
            };
            match v {
                serde_json::Value::String(s) => Ok(s.clone()),
                serde_json::Value::Number(n) => Ok(n.to_string()),
                other => Err(Error::InvalidConfig {
                    message: format!("`{path}` must be a string, got {other}"),
                }),
            }
        };

        let palette = match config.get("bullet.palette") {
            None => d.palette.clone(),
            Some(_) => config
                .get_str_list("bullet.palette")
                .ok_or_else(|| Error::InvalidConfig {
                    message: "`bullet.palette` must be a list of color strings".to_string(),
                })?,
        };
        if palette.is_empty() {
            return Err(Error::InvalidConfig {
                message: "`bullet.palette` must not be empty".to_string(),
            });
        }

        Ok(Self {
            margin: Margin {
                top: num("bullet.margin.top", d.margin.top)?,
                right: num("bullet.margin.right", d.margin.right)?,
                bottom: num("bullet.margin.bottom", d.margin.bottom)?,
                left: num("bullet.margin.left", d.margin.left)?,
            },
            bar_height: num("bullet.barHeight", d.bar_height)?,
            corner_radius: num("bullet.cornerRadius", d.corner_radius)?,
            legend_row_spacing: num("bullet.legend.rowSpacing", d.legend_row_spacing)?,
            legend_dot_radius: num("bullet.legend.dotRadius", d.legend_dot_radius)?,
            legend_label_x: num("bullet.legend.labelX", d.legend_label_x)?,
            legend_count_inset: num("bullet.legend.countInset", d.legend_count_inset)?,
            legend_title_count_inset: num(
                "bullet.legend.titleCountInset",
                d.legend_title_count_inset,
            )?,
            legend_title_offset: num("bullet.legend.titleOffset", d.legend_title_offset)?,
            title_font_size: num("bullet.legend.titleFontSize", d.title_font_size)?,
            count_font_size: num("bullet.legend.countFontSize", d.count_font_size)?,
            label_font_size: num("bullet.legend.labelFontSize", d.label_font_size)?,
            font_weight: text("bullet.legend.fontWeight", &d.font_weight)?,
            text_color: text("bullet.legend.textColor", &d.text_color)?,
            palette,
        })
    }

    /// Palette entry for position `index`, wrapping past the end. Empty for an empty palette.
    pub fn color(&self, index: usize) -> &str {
        let len = self.palette.len().max(1);
        self.palette.get(index % len).map_or("", String::as_str)
    }
}

/// Lays out the stacked bar and its legend.
///
/// `category` labels the legend; pass `None` to omit the legend entirely. Legend rows mirror
/// `segments` one-to-one so dot colors line up with bar fills.
pub fn layout_bullet_chart(
    category: Option<&str>,
    segments: &[Segment],
    width: f64,
    height: f64,
    config: &LayoutConfig,
) -> Result<BulletChartLayout> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(Error::InvalidViewport { width, height });
    }
    let m = config.margin;
    let w = width - m.left - m.right;
    let h = height - m.top - m.bottom;
    if w <= 0.0 {
        return Err(Error::InvalidViewport { width, height });
    }
    if config.palette.is_empty() {
        return Err(Error::InvalidConfig {
            message: "palette must not be empty".to_string(),
        });
    }

    let last = segments.len().saturating_sub(1);
    let bars: Vec<RectPrimitive> = segments
        .iter()
        .enumerate()
        .map(|(i, seg)| RectPrimitive {
            class: "rect-stacked".to_string(),
            // Offsets by the previous segment's own percent, not the running sum.
            x: if i == 0 {
                Length::Px(0.0)
            } else {
                Length::Percent(segments[i - 1].percent)
            },
            y: h / 2.0 - config.bar_height,
            width: Length::Percent(seg.percent),
            height: config.bar_height,
            rx: if i == 0 { config.corner_radius } else { 0.0 },
            ry: if i == last { config.corner_radius } else { 0.0 },
            fill: config.color(i).to_string(),
        })
        .collect();

    let legend = category.map(|name| layout_legend(name, segments, width, height, config));

    tracing::debug!(
        width,
        height,
        bars = bars.len(),
        legend_rows = legend.as_ref().map_or(0, |l| l.rows.len()),
        "laid out bullet chart"
    );

    Ok(BulletChartLayout {
        svg_width: w,
        svg_height: height,
        translate_x: m.left,
        translate_y: m.top,
        inner_width: w,
        inner_height: h,
        bars,
        legend,
    })
}

// The legend is anchored on the full height, not the margin-reduced one.
fn layout_legend(
    name: &str,
    segments: &[Segment],
    width: f64,
    height: f64,
    config: &LayoutConfig,
) -> LegendLayout {
    let center = height / 2.0;
    let title_y = center - config.legend_title_offset;
    let total: f64 = segments.iter().map(|s| s.counts).sum();

    let title = TextPrimitive {
        class: "legend-title".to_string(),
        text: name.to_string(),
        x: 0.0,
        y: title_y,
        anchor: TextAnchor::Start,
        font_size: config.title_font_size,
        font_weight: config.font_weight.clone(),
        fill: config.text_color.clone(),
        alignment_baseline: None,
    };
    let title_count = TextPrimitive {
        class: "legend-title-count".to_string(),
        text: fmt_js(total),
        x: width - config.legend_title_count_inset,
        y: title_y,
        anchor: TextAnchor::Middle,
        font_size: config.count_font_size,
        font_weight: config.font_weight.clone(),
        fill: config.text_color.clone(),
        alignment_baseline: None,
    };

    let row_text = |class: &str, text: String, x: f64, y: f64| TextPrimitive {
        class: class.to_string(),
        text,
        x,
        y,
        anchor: TextAnchor::Start,
        font_size: config.label_font_size,
        font_weight: config.font_weight.clone(),
        fill: config.text_color.clone(),
        alignment_baseline: Some("middle".to_string()),
    };

    let rows = segments
        .iter()
        .enumerate()
        .map(|(i, seg)| {
            let y = center + i as f64 * config.legend_row_spacing;
            LegendRowLayout {
                dot: CirclePrimitive {
                    cx: config.legend_dot_radius,
                    cy: y,
                    r: config.legend_dot_radius,
                    fill: config.color(i).to_string(),
                },
                label: row_text("legend-labels", seg.status.clone(), config.legend_label_x, y),
                count: row_text(
                    "legend-labels-count",
                    fmt_js(seg.counts),
                    width - config.legend_count_inset,
                    y,
                ),
            }
        })
        .collect();

    LegendLayout {
        title,
        title_count,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulletbar_core::{Record, aggregate};
    use serde_json::json;

    fn segments() -> Vec<Segment> {
        let records = vec![
            Record::new("A", "Occupied", 30.0),
            Record::new("A", "Free", 70.0),
            Record::new("B", "X", 50.0),
        ];
        aggregate(&records, 150.0).unwrap()
    }

    #[test]
    fn bars_use_previous_percent_as_offset() {
        let segs = segments();
        let layout =
            layout_bullet_chart(Some("A"), &segs, 400.0, 200.0, &LayoutConfig::default()).unwrap();

        assert_eq!(layout.svg_width, 380.0);
        assert_eq!(layout.inner_height, 160.0);
        assert_eq!(layout.bars[0].x, Length::Px(0.0));
        assert_eq!(layout.bars[1].x, Length::Percent(segs[0].percent));
        assert_eq!(layout.bars[1].width, Length::Percent(segs[1].percent));
        assert!(layout.bars.iter().all(|b| b.y == 70.0 && b.height == 10.0));
        assert_eq!((layout.bars[0].rx, layout.bars[0].ry), (5.0, 0.0));
        assert_eq!((layout.bars[1].rx, layout.bars[1].ry), (0.0, 5.0));
        assert_eq!(layout.bars[0].fill, "#DF6766");
        assert_eq!(layout.bars[1].fill, "#1DA486");
    }

    #[test]
    fn legend_rows_follow_segments() {
        let segs = segments();
        let layout =
            layout_bullet_chart(Some("A"), &segs, 400.0, 200.0, &LayoutConfig::default()).unwrap();
        let legend = layout.legend.unwrap();

        assert_eq!(legend.title.text, "A");
        assert_eq!((legend.title.x, legend.title.y), (0.0, 50.0));
        assert_eq!(legend.title_count.text, "100");
        assert_eq!(legend.title_count.x, 355.0);
        assert_eq!(legend.title_count.anchor, TextAnchor::Middle);

        assert_eq!(legend.rows.len(), 2);
        assert_eq!(legend.rows[1].dot.cy, 125.0);
        assert_eq!(legend.rows[1].label.text, "Free");
        assert_eq!(legend.rows[1].count.text, "70");
        assert_eq!(legend.rows[1].count.x, 345.0);
        assert_eq!(legend.rows[1].dot.fill, layout.bars[1].fill);
    }

    #[test]
    fn single_segment_is_rounded_on_both_sides() {
        let segs = aggregate(&[Record::new("ICU", "Occupied", 3.0)], 3.0).unwrap();
        let layout =
            layout_bullet_chart(Some("ICU"), &segs, 300.0, 120.0, &LayoutConfig::default())
                .unwrap();
        let bar = &layout.bars[0];
        assert_eq!(bar.x, Length::Px(0.0));
        assert_eq!(bar.width, Length::Percent(100.0));
        assert_eq!((bar.rx, bar.ry), (5.0, 5.0));
        assert_eq!(bar.width.resolve(layout.svg_width), 280.0);
    }

    #[test]
    fn palette_wraps() {
        let records: Vec<Record> = (0..8)
            .map(|i| Record::new("A", format!("s{i}"), 1.0))
            .collect();
        let segs = aggregate(&records, 8.0).unwrap();
        let layout =
            layout_bullet_chart(Some("A"), &segs, 400.0, 400.0, &LayoutConfig::default()).unwrap();
        assert_eq!(layout.bars[6].fill, layout.bars[0].fill);
        assert_eq!(layout.bars[7].fill, "#1DA486");
    }

    #[test]
    fn rejects_degenerate_viewports() {
        let segs = segments();
        let cfg = LayoutConfig::default();
        for (w, h) in [(0.0, 100.0), (100.0, -1.0), (f64::NAN, 10.0), (20.0, 100.0)] {
            assert!(matches!(
                layout_bullet_chart(Some("A"), &segs, w, h, &cfg),
                Err(Error::InvalidViewport { .. })
            ));
        }
    }

    #[test]
    fn config_overrides_flow_into_layout() {
        let mut cfg = ChartConfig::default();
        cfg.set_value("bullet.barHeight", json!(16));
        cfg.set_value("bullet.palette", json!(["red"]));
        let cfg = LayoutConfig::from_config(&cfg).unwrap();
        assert_eq!(cfg.bar_height, 16.0);
        assert_eq!(cfg.color(3), "red");
        assert_eq!(cfg.margin, LayoutConfig::default().margin);
    }

    #[test]
    fn config_rejects_bad_values() {
        let mut cfg = ChartConfig::default();
        cfg.set_value("bullet.palette", json!([]));
        assert!(LayoutConfig::from_config(&cfg).is_err());

        let mut cfg = ChartConfig::default();
        cfg.set_value("bullet.margin.top", json!(-3));
        assert!(LayoutConfig::from_config(&cfg).is_err());

        let mut cfg = ChartConfig::default();
        cfg.set_value("bullet.palette", json!(["red", 3]));
        assert!(LayoutConfig::from_config(&cfg).is_err());
    }

    #[test]
    fn empty_palette_is_a_config_error() {
        let cfg = LayoutConfig {
            palette: Vec::new(),
            ..LayoutConfig::default()
        };
        assert_eq!(cfg.color(2), "");
        assert!(matches!(
            layout_bullet_chart(Some("A"), &segments(), 400.0, 200.0, &cfg),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn default_config_matches_default_chart_config() {
        let from_json = LayoutConfig::from_config(&ChartConfig::default()).unwrap();
        assert_eq!(from_json, LayoutConfig::default());
    }
}
