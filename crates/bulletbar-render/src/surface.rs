use crate::model::{CirclePrimitive, RectPrimitive, TextPrimitive};
use serde::{Deserialize, Serialize};

/// A drawing target the renderer owns between two renders.
///
/// The renderer always calls [`Surface::clear`] first, so implementations only need to append.
pub trait Surface {
    fn clear(&mut self);
    fn set_viewport(&mut self, width: f64, height: f64);
    fn begin_group(&mut self, translate_x: f64, translate_y: f64);
    fn end_group(&mut self);
    fn rect(&mut self, rect: &RectPrimitive);
    fn circle(&mut self, circle: &CirclePrimitive);
    fn text(&mut self, text: &TextPrimitive);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    BeginGroup { translate_x: f64, translate_y: f64 },
    EndGroup,
    Rect(RectPrimitive),
    Circle(CirclePrimitive),
    Text(TextPrimitive),
}

/// Keeps the draw calls of the latest render as plain data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordingSurface {
    pub viewport: Option<(f64, f64)>,
    pub primitives: Vec<Primitive>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Rect(r) => Some(r),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = &CirclePrimitive> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Circle(c) => Some(c),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.viewport = None;
        self.primitives.clear();
    }

    fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Some((width, height));
    }

    fn begin_group(&mut self, translate_x: f64, translate_y: f64) {
        self.primitives.push(Primitive::BeginGroup {
            translate_x,
            translate_y,
        });
    }

    fn end_group(&mut self) {
        self.primitives.push(Primitive::EndGroup);
    }

    fn rect(&mut self, rect: &RectPrimitive) {
        self.primitives.push(Primitive::Rect(rect.clone()));
    }

    fn circle(&mut self, circle: &CirclePrimitive) {
        self.primitives.push(Primitive::Circle(circle.clone()));
    }

    fn text(&mut self, text: &TextPrimitive) {
        self.primitives.push(Primitive::Text(text.clone()));
    }
}
