#![forbid(unsafe_code)]

use crate::render::ChartError;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("unsupported background color `{0}`")]
    InvalidBackground(String),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
        }
    }
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options.scale, options.background.as_deref())?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

fn svg_to_pixmap(svg: &str, scale: f32, background: Option<&str>) -> Result<tiny_skia::Pixmap> {
    let fill = background
        .map(|text| {
            parse_background(text).ok_or_else(|| RasterError::InvalidBackground(text.to_string()))
        })
        .transpose()?;

    let mut opt = usvg::Options::default();
    // Legend text needs real glyphs.
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    // Chart documents always carry explicit width/height, so the tree size is the canvas.
    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;

    if let Some(color) = fill {
        pixmap.fill(color);
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

/// Named `transparent`/`white`/`black`, or `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`.
fn parse_background(text: &str) -> Option<tiny_skia::Color> {
    let text = text.trim().to_ascii_lowercase();
    let [r, g, b, a] = match text.as_str() {
        "transparent" => [0, 0, 0, 0],
        "white" => [255, 255, 255, 255],
        "black" => [0, 0, 0, 255],
        other => hex_rgba(other.strip_prefix('#')?)?,
    };
    Some(tiny_skia::Color::from_rgba8(r, g, b, a))
}

fn hex_rgba(hex: &str) -> Option<[u8; 4]> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digits: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };
    let packed = u32::from_str_radix(&digits, 16).ok()?;
    Some(if digits.len() == 6 {
        ((packed << 8) | 0xff).to_be_bytes()
    } else {
        packed.to_be_bytes()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;
    use crate::render::BulletChart;

    #[test]
    fn chart_png_has_png_signature() {
        let records = vec![
            Record::new("ICU", "Occupied", 3.0),
            Record::new("ICU", "Free", 1.0),
        ];
        let options = RasterOptions {
            scale: 2.0,
            background: Some("white".to_string()),
        };
        let bytes = BulletChart::new()
            .render_png_sync(&records, 200.0, 100.0, &options)
            .unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn parses_every_hex_form() {
        let rgba = |text| parse_background(text).map(|c| c.to_color_u8());
        let white = tiny_skia::ColorU8::from_rgba(255, 255, 255, 255);
        assert_eq!(rgba("#fff"), Some(white));
        assert_eq!(rgba("#FFFFFF"), Some(white));
        assert_eq!(
            rgba("#fff8"),
            Some(tiny_skia::ColorU8::from_rgba(255, 255, 255, 0x88))
        );
        assert_eq!(
            rgba("#DF676680"),
            Some(tiny_skia::ColorU8::from_rgba(0xdf, 0x67, 0x66, 0x80))
        );
        assert_eq!(rgba("tomato"), None);
        assert_eq!(rgba("#12345"), None);
        assert_eq!(rgba("#+fff"), None);
    }

    #[test]
    fn unknown_background_is_an_error() {
        let svg = BulletChart::new()
            .render_svg_sync(&[Record::new("ICU", "Free", 1.0)], 100.0, 60.0)
            .unwrap();
        let options = RasterOptions {
            scale: 1.0,
            background: Some("tomato".to_string()),
        };
        assert!(matches!(
            svg_to_png(&svg, &options),
            Err(RasterError::InvalidBackground(_))
        ));
    }
}
