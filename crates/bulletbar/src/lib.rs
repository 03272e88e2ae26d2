#![forbid(unsafe_code)]

//! `bulletbar` renders a single horizontal stacked bar with a one-column legend from a flat list
//! of categorized counts.
//!
//! Only the first category found in the data is drawn. Its counts are normalized to percents
//! that sum to 100 and laid out left to right with a fixed categorical palette.
//!
//! # Features
//!
//! - `render` (default): layout + SVG rendering (`bulletbar::render`)
//! - `raster`: PNG output via pure-Rust SVG rasterization

pub use bulletbar_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use bulletbar_render::model::{
        BulletChartLayout, CirclePrimitive, LegendLayout, LegendRowLayout, Length,
        RectPrimitive, TextAnchor, TextPrimitive,
    };
    pub use bulletbar_render::{
        LayoutConfig, Margin, Primitive, RecordingSurface, Surface, SvgRenderOptions, SvgSurface,
        layout_bullet_chart, render_layout_svg,
    };

    use bulletbar_core::{ChartConfig, Record, records_from_value};

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum ChartError {
        #[error(transparent)]
        Input(#[from] bulletbar_core::Error),
        #[error(transparent)]
        Render(#[from] bulletbar_render::Error),
    }

    pub type Result<T> = std::result::Result<T, ChartError>;

    /// Normalizes a host-provided name into an SVG `id` token.
    ///
    /// Characters outside `[A-Za-z0-9_:.-]` become `-`, dash runs collapse, and ids that do not
    /// start with an ASCII letter get a `b-` prefix. Blank input maps to `b-untitled`.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + 2);
        for ch in raw.trim().chars() {
            let keep = ch.is_ascii_alphanumeric() || matches!(ch, '_' | ':' | '.');
            if keep {
                out.push(ch);
            } else if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        }
        while out.ends_with('-') {
            out.pop();
        }

        if out.is_empty() {
            return "b-untitled".to_string();
        }
        if !out.starts_with(|c: char| c.is_ascii_alphabetic()) {
            out.insert_str(0, "b-");
        }
        out
    }

    /// Synchronous SVG render helper (executor-free).
    pub fn render_svg_sync(
        records: &[Record],
        width: f64,
        height: f64,
        layout: &LayoutConfig,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let mut surface = SvgSurface::new(svg_options.clone());
        bulletbar_render::render_records(records, &mut surface, width, height, layout)?;
        Ok(surface.to_svg_string())
    }

    pub async fn render_svg(
        records: &[Record],
        width: f64,
        height: f64,
        layout: &LayoutConfig,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        render_svg_sync(records, width, height, layout, svg_options)
    }

    /// Host-facing chart handle.
    ///
    /// It holds configuration only; the drawing target is passed on every update, so the same
    /// chart can drive several surfaces and nothing is looked up by id.
    #[derive(Debug, Clone, Default)]
    pub struct BulletChart {
        pub layout: LayoutConfig,
        pub svg: SvgRenderOptions,
    }

    impl BulletChart {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_config(config: &ChartConfig) -> Result<Self> {
            Ok(Self {
                layout: LayoutConfig::from_config(config)?,
                svg: SvgRenderOptions::default(),
            })
        }

        pub fn with_chart_id(mut self, chart_id: &str) -> Self {
            self.svg.chart_id = Some(sanitize_svg_id(chart_id));
            self
        }

        /// Redraws `surface` for a new `(data, width, height)` triple.
        ///
        /// On error the surface is left cleared.
        pub fn update(
            &self,
            records: &[Record],
            width: f64,
            height: f64,
            surface: &mut dyn Surface,
        ) -> Result<BulletChartLayout> {
            Ok(bulletbar_render::render_records(
                records,
                surface,
                width,
                height,
                &self.layout,
            )?)
        }

        /// Like [`BulletChart::update`], validating loosely-typed rows first.
        pub fn update_json(
            &self,
            data: &serde_json::Value,
            width: f64,
            height: f64,
            surface: &mut dyn Surface,
        ) -> Result<BulletChartLayout> {
            let records = match records_from_value(data) {
                Ok(records) => records,
                Err(err) => {
                    surface.clear();
                    tracing::warn!(%err, "rejecting bullet chart data");
                    return Err(err.into());
                }
            };
            self.update(&records, width, height, surface)
        }

        pub fn render_svg_sync(&self, records: &[Record], width: f64, height: f64) -> Result<String> {
            render_svg_sync(records, width, height, &self.layout, &self.svg)
        }

        #[cfg(feature = "raster")]
        pub fn render_png_sync(
            &self,
            records: &[Record],
            width: f64,
            height: f64,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg_sync(records, width, height)?;
            raster::svg_to_png(&svg, raster)
        }
    }
}
