use crate::model::{BulletChartLayout, CirclePrimitive, Length, RectPrimitive, TextPrimitive};
use crate::number::fmt_js;
use crate::surface::Surface;
use std::fmt::Write as _;

#[derive(Debug, Clone, Default)]
pub struct SvgRenderOptions {
    /// Root `<svg id="...">`. Hosts that inline several charts should pass distinct ids.
    pub chart_id: Option<String>,
}

/// An SVG document the renderer draws into.
///
/// The surface itself is the mount point: hosts keep the handle and read the document back with
/// [`SvgSurface::to_svg_string`] after each render.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    options: SvgRenderOptions,
    viewport: Option<(f64, f64)>,
    body: String,
    open_groups: usize,
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new(SvgRenderOptions::default())
    }
}

impl SvgSurface {
    pub fn new(options: SvgRenderOptions) -> Self {
        Self {
            options,
            viewport: None,
            body: String::new(),
            open_groups: 0,
        }
    }

    pub fn options(&self) -> &SvgRenderOptions {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn to_svg_string(&self) -> String {
        let (w, h) = self.viewport.unwrap_or((0.0, 0.0));
        let (w, h) = (num(w), num(h));

        let mut out = String::with_capacity(self.body.len() + 256);
        out.push_str("<svg");
        if let Some(id) = self.options.chart_id.as_deref() {
            let _ = write!(&mut out, r#" id="{}""#, escape_xml(id));
        }
        let _ = write!(
            &mut out,
            r#" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="graphics-document document" aria-roledescription="bullet">"#
        );
        out.push_str(&self.body);
        for _ in 0..self.open_groups {
            out.push_str("</g>");
        }
        out.push_str("</svg>\n");
        out
    }
}

fn num(v: f64) -> String {
    fmt_js(v)
}

fn length(v: Length) -> String {
    match v {
        Length::Px(px) => fmt_js(px),
        Length::Percent(p) => format!("{}%", fmt_js(p)),
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self) {
        self.viewport = None;
        self.body.clear();
        self.open_groups = 0;
    }

    fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Some((width, height));
    }

    fn begin_group(&mut self, translate_x: f64, translate_y: f64) {
        let x = num(translate_x);
        let y = num(translate_y);
        let _ = write!(&mut self.body, r#"<g transform="translate({x}, {y})">"#);
        self.open_groups += 1;
    }

    fn end_group(&mut self) {
        if self.open_groups > 0 {
            self.body.push_str("</g>");
            self.open_groups -= 1;
        }
    }

    fn rect(&mut self, rect: &RectPrimitive) {
        let x = length(rect.x);
        let y = num(rect.y);
        let rx = num(rect.rx);
        let ry = num(rect.ry);
        let height = num(rect.height);
        let width = length(rect.width);
        let _ = write!(
            &mut self.body,
            r#"<rect class="{class}" x="{x}" y="{y}" rx="{rx}" ry="{ry}" height="{height}" width="{width}" style="fill: {fill};"/>"#,
            class = escape_xml(&rect.class),
            fill = escape_xml(&rect.fill),
        );
    }

    fn circle(&mut self, circle: &CirclePrimitive) {
        let r = num(circle.r);
        let cx = num(circle.cx);
        let cy = num(circle.cy);
        let _ = write!(
            &mut self.body,
            r#"<circle r="{r}" cx="{cx}" cy="{cy}" style="fill: {fill};"/>"#,
            fill = escape_xml(&circle.fill),
        );
    }

    fn text(&mut self, text: &TextPrimitive) {
        let x = num(text.x);
        let y = num(text.y);
        let font_size = num(text.font_size);
        let style = match text.alignment_baseline.as_deref() {
            Some(b) => format!(r#" style="alignment-baseline: {};""#, escape_xml(b)),
            None => String::new(),
        };
        let _ = write!(
            &mut self.body,
            r#"<text class="{class}" x="{x}" y="{y}" text-anchor="{anchor}" font-size="{font_size}" font-weight="{weight}" fill="{fill}"{style}>{content}</text>"#,
            class = escape_xml(&text.class),
            anchor = text.anchor.as_str(),
            weight = escape_xml(&text.font_weight),
            fill = escape_xml(&text.fill),
            content = escape_xml(&text.text),
        );
    }
}

/// Lays a computed layout into a fresh SVG document.
pub fn render_layout_svg(layout: &BulletChartLayout, options: &SvgRenderOptions) -> String {
    let mut surface = SvgSurface::new(options.clone());
    crate::draw::draw_layout(layout, &mut surface);
    surface.to_svg_string()
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
