#![forbid(unsafe_code)]

//! Headless layout and drawing for the stacked-bar bullet chart.
//!
//! Every render is a full replace: the target [`Surface`] is cleared, then the bar and legend
//! are drawn from scratch. On failure the surface is left cleared rather than holding geometry
//! computed from bad input.

pub mod draw;
pub mod layout;
pub mod model;
pub mod number;
pub mod surface;
pub mod svg;

pub use layout::{LayoutConfig, Margin, layout_bullet_chart};
pub use model::BulletChartLayout;
pub use surface::{Primitive, RecordingSurface, Surface};
pub use svg::{SvgRenderOptions, SvgSurface, render_layout_svg};

use bulletbar_core::{Aggregation, Record, Segment, summarize};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] bulletbar_core::Error),
    #[error("invalid viewport: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("invalid chart config: {message}")]
    InvalidConfig { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Draws `segments` with the default layout constants.
///
/// The legend title is the first segment's category.
pub fn render(
    segments: &[Segment],
    surface: &mut dyn Surface,
    width: f64,
    height: f64,
) -> Result<BulletChartLayout> {
    render_with_config(segments, surface, width, height, &LayoutConfig::default())
}

pub fn render_with_config(
    segments: &[Segment],
    surface: &mut dyn Surface,
    width: f64,
    height: f64,
    config: &LayoutConfig,
) -> Result<BulletChartLayout> {
    let category = segments.first().map(|s| s.bed_type.as_str());
    render_category(category, segments, surface, width, height, config)
}

/// Draws an aggregation; unlike [`render`], the legend title survives a category whose rows
/// are all zero.
pub fn render_aggregation(
    aggregation: &Aggregation,
    surface: &mut dyn Surface,
    width: f64,
    height: f64,
    config: &LayoutConfig,
) -> Result<BulletChartLayout> {
    render_category(
        aggregation.category.as_deref(),
        &aggregation.segments,
        surface,
        width,
        height,
        config,
    )
}

/// Aggregates validated records and draws them.
pub fn render_records(
    records: &[Record],
    surface: &mut dyn Surface,
    width: f64,
    height: f64,
    config: &LayoutConfig,
) -> Result<BulletChartLayout> {
    match summarize(records) {
        Ok(aggregation) => render_aggregation(&aggregation, surface, width, height, config),
        Err(err) => {
            surface.clear();
            tracing::warn!(%err, "skipping bullet chart render");
            Err(err.into())
        }
    }
}

fn render_category(
    category: Option<&str>,
    segments: &[Segment],
    surface: &mut dyn Surface,
    width: f64,
    height: f64,
    config: &LayoutConfig,
) -> Result<BulletChartLayout> {
    match layout_bullet_chart(category, segments, width, height, config) {
        Ok(layout) => {
            draw::draw_layout(&layout, surface);
            Ok(layout)
        }
        Err(err) => {
            surface.clear();
            tracing::warn!(%err, "skipping bullet chart render");
            Err(err)
        }
    }
}
