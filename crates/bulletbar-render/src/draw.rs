use crate::model::BulletChartLayout;
use crate::surface::Surface;

/// Replaces everything on `surface` with `layout`.
///
/// Draw order: bars, legend title, title count, then dots, labels and counts as three passes.
pub fn draw_layout(layout: &BulletChartLayout, surface: &mut dyn Surface) {
    surface.clear();
    surface.set_viewport(layout.svg_width, layout.svg_height);
    surface.begin_group(layout.translate_x, layout.translate_y);

    for bar in &layout.bars {
        surface.rect(bar);
    }

    if let Some(legend) = &layout.legend {
        surface.text(&legend.title);
        surface.text(&legend.title_count);
        for row in &legend.rows {
            surface.circle(&row.dot);
        }
        for row in &legend.rows {
            surface.text(&row.label);
        }
        for row in &legend.rows {
            surface.text(&row.count);
        }
    }

    surface.end_group();
}
