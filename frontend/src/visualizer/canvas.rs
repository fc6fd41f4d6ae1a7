//! Frame primitives to Fast2D objects.

use fast2d::{Circle, Family, Line, Object2d, Rectangle, Text};
use shared::{Frame, Point, Primitive, Rect, Rgba, TextAlign};

const FONT_FAMILY: &str = "Inter";
/// Average glyph advance relative to the font size, used to place aligned text.
const GLYPH_WIDTH_RATIO: f64 = 0.6;
const TEXT_BOX_HEIGHT_RATIO: f64 = 1.4;

pub fn frame_objects(frame: &Frame) -> Vec<Object2d> {
    let mut objects = Vec::with_capacity(frame.primitives.len());
    for primitive in &frame.primitives {
        push_primitive(&mut objects, primitive);
    }
    objects
}

fn push_primitive(objects: &mut Vec<Object2d>, primitive: &Primitive) {
    match primitive {
        Primitive::Rect {
            bounds,
            fill,
            corner_radius,
        } => {
            if bounds.width <= 0.0 || bounds.height <= 0.0 {
                return;
            }
            let radius = corner_radius.min(bounds.width / 2.0).min(bounds.height / 2.0) as f32;
            let mut rectangle = Rectangle::new()
                .position(bounds.x as f32, bounds.y as f32)
                .size(bounds.width as f32, bounds.height as f32)
                .color(fill.r, fill.g, fill.b, fill.a);
            if radius > 0.0 {
                rectangle = rectangle.rounded_corners(radius, radius, radius, radius);
            }
            objects.push(rectangle.into());
        }
        Primitive::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            if *radius <= 0.0 {
                return;
            }
            let mut circle = Circle::new()
                .center(center.x as f32, center.y as f32)
                .radius(*radius as f32)
                .color(fill.r, fill.g, fill.b, fill.a);
            if let Some(stroke) = stroke {
                let color = stroke.color;
                circle = circle.inner_border(stroke.width as f32, color.r, color.g, color.b, color.a);
            }
            objects.push(circle.into());
        }
        Primitive::Polyline { points, stroke } => {
            if points.len() < 2 {
                return;
            }
            let points: Vec<(f32, f32)> = points.iter().map(|p| (p.x as f32, p.y as f32)).collect();
            let color = stroke.color;
            objects.push(
                Line::new()
                    .points(&points)
                    .color(color.r, color.g, color.b, color.a)
                    .width(stroke.width as f32)
                    .into(),
            );
        }
        Primitive::Area {
            outline,
            baseline,
            fill,
        } => {
            for column in area_columns(outline, *baseline) {
                objects.push(filled_rect(column, *fill));
            }
        }
        Primitive::Text {
            text,
            anchor,
            size,
            color,
            align,
        } => {
            let bounds = text_bounds(text, *anchor, *size, *align);
            objects.push(
                Text::new()
                    .text(text.clone())
                    .position(bounds.x as f32, bounds.y as f32)
                    .size(bounds.width as f32, bounds.height as f32)
                    .color(color.r, color.g, color.b, color.a)
                    .font_size(*size as f32)
                    .family(Family::name(FONT_FAMILY))
                    .into(),
            );
        }
    }
}

fn filled_rect(bounds: Rect, fill: Rgba) -> Object2d {
    Rectangle::new()
        .position(bounds.x as f32, bounds.y as f32)
        .size(bounds.width as f32, bounds.height as f32)
        .color(fill.r, fill.g, fill.b, fill.a)
        .into()
}

/// Fast2D has no polygon fill, so an area is drawn as adjacent columns
/// between each outline segment and the baseline.
pub(crate) fn area_columns(outline: &[Point], baseline: f64) -> Vec<Rect> {
    outline
        .windows(2)
        .filter_map(|segment| {
            let (start, end) = (segment[0], segment[1]);
            let width = end.x - start.x;
            if width <= 0.0 {
                return None;
            }
            let top = ((start.y + end.y) / 2.0).min(baseline);
            Some(Rect::new(start.x, top, width, baseline - top))
        })
        .filter(|column| column.height > 0.0)
        .collect()
}

/// Box for a text whose vertical center sits on `anchor`.
pub(crate) fn text_bounds(text: &str, anchor: Point, size: f64, align: TextAlign) -> Rect {
    let width = text.chars().count() as f64 * size * GLYPH_WIDTH_RATIO;
    let height = size * TEXT_BOX_HEIGHT_RATIO;
    let x = match align {
        TextAlign::Start => anchor.x,
        TextAlign::Center => anchor.x - width / 2.0,
        TextAlign::End => anchor.x - width,
    };
    // Extra width keeps the renderer from wrapping the last glyph.
    Rect::new(x, anchor.y - height / 2.0, width + size, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_becomes_columns_down_to_the_baseline() {
        let outline = [
            Point::new(10.0, 50.0),
            Point::new(20.0, 30.0),
            Point::new(30.0, 30.0),
        ];
        let columns = area_columns(&outline, 100.0);
        assert_eq!(
            columns,
            vec![
                Rect::new(10.0, 40.0, 10.0, 60.0),
                Rect::new(20.0, 30.0, 10.0, 70.0),
            ]
        );
    }

    #[test]
    fn degenerate_area_segments_are_skipped() {
        let outline = [
            Point::new(10.0, 50.0),
            Point::new(10.0, 40.0),
            Point::new(20.0, 120.0),
        ];
        assert!(area_columns(&outline, 100.0).is_empty());
    }

    #[test]
    fn text_is_placed_around_its_anchor() {
        let anchor = Point::new(100.0, 50.0);
        let start = text_bounds("65", anchor, 10.0, TextAlign::Start);
        let center = text_bounds("65", anchor, 10.0, TextAlign::Center);
        let end = text_bounds("65", anchor, 10.0, TextAlign::End);

        assert_eq!(start.x, 100.0);
        assert_eq!(center.x, 94.0);
        assert_eq!(end.x, 88.0);
        assert_eq!(start.y, 43.0);
        assert_eq!(start.height, 14.0);
    }
}
