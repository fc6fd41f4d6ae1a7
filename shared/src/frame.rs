//! Time sampling of a `Scene` into flat drawing primitives.
//!
//! Sampling is pure: the same scene, time and hover history always resolve to
//! the same frame, so the canvas layer only has to redraw what it is given.

use crate::curve::{Point, polyline_prefix};
use crate::scene::{
    HOVER_TRANSITION_MS, InteractiveRegion, Mark, MarkGeometry, MarkStyle, Rect, Rgba, Scene,
    palette,
};

pub const TICK_FONT_SIZE: f64 = 11.0;
pub const TITLE_FONT_SIZE: f64 = 12.0;
const TICK_LENGTH: f64 = 6.0;
const TICK_LABEL_GAP: f64 = 9.0;
const DOT_STROKE_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        bounds: Rect,
        fill: Rgba,
        corner_radius: f64,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: Rgba,
        stroke: Option<Stroke>,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
    /// Region between `outline` and the horizontal `baseline`.
    Area {
        outline: Vec<Point>,
        baseline: f64,
        fill: Rgba,
    },
    Text {
        text: String,
        /// Vertical center of the text; horizontal position depends on `align`.
        anchor: Point,
        size: f64,
        color: Rgba,
        align: TextAlign,
    },
}

/// Last hover transition of one mark, timed on the same clock as reveals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverPhase {
    pub mark_index: usize,
    pub entered: bool,
    pub changed_at_ms: f64,
}

impl HoverPhase {
    /// `0` fully at rest, `1` fully hovered.
    pub fn amount(&self, elapsed_ms: f64) -> f64 {
        let t = ((elapsed_ms - self.changed_at_ms) / HOVER_TRANSITION_MS).clamp(0.0, 1.0);
        if self.entered { t } else { 1.0 - t }
    }

    pub fn end_ms(&self) -> f64 {
        self.changed_at_ms + HOVER_TRANSITION_MS
    }
}

/// Drawable state of a scene at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub generation: u64,
    pub primitives: Vec<Primitive>,
    /// No reveal or hover transition is still running.
    pub settled: bool,
}

pub fn sample_frame(scene: &Scene, elapsed_ms: f64, hover: &[HoverPhase]) -> Frame {
    let mut primitives = Vec::new();
    let settled = elapsed_ms >= scene.settle_ms()
        && hover.iter().all(|phase| elapsed_ms >= phase.end_ms());

    let Some(chart) = &scene.chart else {
        let plot = scene.layout.plot_area();
        primitives.push(Primitive::Text {
            text: "No data for this period".to_string(),
            anchor: Point::new(plot.center_x(), plot.y + plot.height / 2.0),
            size: TITLE_FONT_SIZE,
            color: palette::AXIS_TITLE,
            align: TextAlign::Center,
        });
        return Frame {
            generation: scene.generation,
            primitives,
            settled,
        };
    };

    let plot = chart.plot;
    let baseline = plot.y + plot.height;
    let axis_stroke = Stroke {
        color: palette::AXIS,
        width: 1.0,
    };

    for y in &chart.grid_lines {
        primitives.push(Primitive::Polyline {
            points: vec![Point::new(plot.x, *y), Point::new(plot.x + plot.width, *y)],
            stroke: Stroke {
                color: palette::GRID,
                width: 1.0,
            },
        });
    }

    if let Some(trend) = &chart.trend {
        let outline = trend.line.flatten();
        primitives.push(Primitive::Area {
            outline: outline.clone(),
            baseline,
            fill: palette::ACCENT.with_alpha(trend.area_opacity),
        });
        let drawn = polyline_prefix(&outline, trend.reveal.progress(elapsed_ms));
        if drawn.len() > 1 {
            primitives.push(Primitive::Polyline {
                points: drawn,
                stroke: Stroke {
                    color: palette::ACCENT,
                    width: trend.line_width,
                },
            });
        }
    }

    for (mark, region) in chart.marks.iter().zip(&chart.regions) {
        let amount = hover
            .iter()
            .rev()
            .find(|phase| phase.mark_index == mark.index)
            .map_or(0.0, |phase| phase.amount(elapsed_ms));
        push_mark(&mut primitives, mark, region, elapsed_ms, amount, baseline);
    }

    // Axes
    primitives.push(Primitive::Polyline {
        points: vec![Point::new(plot.x, baseline), Point::new(plot.x + plot.width, baseline)],
        stroke: axis_stroke,
    });
    primitives.push(Primitive::Polyline {
        points: vec![Point::new(plot.x, plot.y), Point::new(plot.x, baseline)],
        stroke: axis_stroke,
    });
    for tick in &chart.category_axis.ticks {
        primitives.push(Primitive::Polyline {
            points: vec![
                Point::new(tick.position, baseline),
                Point::new(tick.position, baseline + TICK_LENGTH),
            ],
            stroke: axis_stroke,
        });
        primitives.push(Primitive::Text {
            text: tick.label.clone(),
            anchor: Point::new(tick.position, baseline + TICK_LENGTH + TICK_LABEL_GAP),
            size: TICK_FONT_SIZE,
            color: palette::TICK_TEXT,
            align: TextAlign::Center,
        });
    }
    for tick in &chart.value_axis.ticks {
        primitives.push(Primitive::Polyline {
            points: vec![
                Point::new(plot.x - TICK_LENGTH, tick.position),
                Point::new(plot.x, tick.position),
            ],
            stroke: axis_stroke,
        });
        primitives.push(Primitive::Text {
            text: tick.label.clone(),
            anchor: Point::new(plot.x - TICK_LENGTH - 3.0, tick.position),
            size: TICK_FONT_SIZE,
            color: palette::TICK_TEXT,
            align: TextAlign::End,
        });
    }
    // Canvas text is not rotated; the title sits above the value axis instead.
    primitives.push(Primitive::Text {
        text: chart.value_axis.title.to_string(),
        anchor: Point::new(plot.x - 45.0, plot.y - 20.0),
        size: TITLE_FONT_SIZE,
        color: palette::AXIS_TITLE,
        align: TextAlign::Start,
    });

    // Tooltips last so they stay on top.
    for phase in hover {
        let amount = phase.amount(elapsed_ms);
        if amount <= 0.0 {
            continue;
        }
        let Some(region) = chart.regions.get(phase.mark_index) else {
            continue;
        };
        let tooltip = &region.tooltip;
        primitives.push(Primitive::Rect {
            bounds: tooltip.bounds,
            fill: palette::TOOLTIP.with_alpha(palette::TOOLTIP.a * amount as f32),
            corner_radius: 4.0,
        });
        primitives.push(Primitive::Text {
            text: tooltip.text.clone(),
            anchor: Point::new(tooltip.text_anchor.x, tooltip.bounds.y + tooltip.bounds.height / 2.0),
            size: TICK_FONT_SIZE,
            color: palette::WHITE.with_alpha(amount as f32),
            align: TextAlign::Center,
        });
    }

    Frame {
        generation: scene.generation,
        primitives,
        settled,
    }
}

fn blend(rest: MarkStyle, hovered: MarkStyle, amount: f64) -> MarkStyle {
    let amount = amount.clamp(0.0, 1.0);
    MarkStyle {
        fill: rest.fill.mix(hovered.fill, amount),
        opacity: rest.opacity + (hovered.opacity - rest.opacity) * amount as f32,
        radius: match (rest.radius, hovered.radius) {
            (Some(a), Some(b)) => Some(a + (b - a) * amount),
            (radius, _) => radius,
        },
    }
}

fn push_mark(
    primitives: &mut Vec<Primitive>,
    mark: &Mark,
    region: &InteractiveRegion,
    elapsed_ms: f64,
    hover_amount: f64,
    baseline: f64,
) {
    let reveal = mark.reveal.progress(elapsed_ms);
    let style = blend(region.on_leave, region.on_enter, hover_amount);
    let fill = style.fill.with_alpha(style.fill.a * style.opacity);

    match mark.geometry {
        MarkGeometry::Dot { center, radius } => {
            // Hover only scales a fully grown dot.
            let hovered_radius = style.radius.unwrap_or(radius);
            let radius = hovered_radius * reveal;
            if radius > 0.0 {
                primitives.push(Primitive::Circle {
                    center,
                    radius,
                    fill,
                    stroke: Some(Stroke {
                        color: palette::WHITE,
                        width: DOT_STROKE_WIDTH,
                    }),
                });
            }
        }
        MarkGeometry::Bar {
            bounds,
            corner_radius,
        } => {
            let height = bounds.height * reveal;
            if height > 0.0 {
                primitives.push(Primitive::Rect {
                    bounds: Rect::new(bounds.x, baseline - height, bounds.width, height),
                    fill,
                    corner_radius: corner_radius.min(height / 2.0),
                });
            }
        }
    }

    if let Some(label) = &mark.label {
        let t = label.reveal.progress(elapsed_ms);
        if t > 0.0 {
            let anchor = Point::new(
                label.from.x + (label.anchor.x - label.from.x) * t,
                label.from.y + (label.anchor.y - label.from.y) * t,
            );
            primitives.push(Primitive::Text {
                text: label.text.clone(),
                anchor,
                size: TICK_FONT_SIZE,
                color: palette::TICK_TEXT.with_alpha(t as f32),
                align: TextAlign::Center,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DataCatalog, SeriesPoint, VisualizationKind};
    use crate::config::DashboardConfig;
    use crate::curve::polyline_length;
    use crate::scene::{
        BAR_GROW_MS, BAR_STAGGER_MS, ChartLayout, ChartRenderer, LINE_REVEAL_MS, build_scene,
    };

    fn scene(kind: VisualizationKind, period: &str) -> Scene {
        let catalog = DataCatalog::from_config(DashboardConfig::sample().unwrap()).unwrap();
        ChartRenderer::default().render(&catalog, kind, period).unwrap()
    }

    fn circles(frame: &Frame) -> Vec<(Point, f64, Rgba)> {
        frame
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Circle {
                    center,
                    radius,
                    fill,
                    ..
                } => Some((*center, *radius, *fill)),
                _ => None,
            })
            .collect()
    }

    fn bars(frame: &Frame) -> Vec<Rect> {
        frame
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Rect { bounds, fill, .. } if fill.r == palette::ACCENT.r => Some(*bounds),
                _ => None,
            })
            .collect()
    }

    fn accent_line(frame: &Frame) -> Option<&Vec<Point>> {
        frame.primitives.iter().find_map(|p| match p {
            Primitive::Polyline { points, stroke } if stroke.color == palette::ACCENT => Some(points),
            _ => None,
        })
    }

    #[test]
    fn line_draws_progressively() {
        let scene = scene(VisualizationKind::Trend, "2024");
        let total = scene.chart.as_ref().unwrap().trend.as_ref().unwrap().line_length;

        assert!(accent_line(&sample_frame(&scene, 0.0, &[])).is_none());
        let half = sample_frame(&scene, LINE_REVEAL_MS / 2.0, &[]);
        let drawn = polyline_length(accent_line(&half).unwrap());
        assert!(drawn > total * 0.5 && drawn < total);

        let done = sample_frame(&scene, LINE_REVEAL_MS, &[]);
        assert!((polyline_length(accent_line(&done).unwrap()) - total).abs() < 1e-6);
        assert!(done.settled);
    }

    #[test]
    fn dots_grow_in_sequence() {
        let scene = scene(VisualizationKind::Trend, "2024");
        let frame = sample_frame(&scene, 150.0, &[]);
        let dots = circles(&frame);
        // Dots 0, 1 and 2 have started; dot 3 starts at 180ms.
        assert_eq!(dots.len(), 3);
        assert!(dots[0].1 > dots[1].1 && dots[1].1 > dots[2].1);
        assert!(!frame.settled);

        let settled = sample_frame(&scene, 5000.0, &[]);
        assert!(circles(&settled).iter().all(|(_, r, _)| (*r - 3.0).abs() < 1e-9));
    }

    #[test]
    fn bars_grow_from_the_baseline() {
        let scene = scene(VisualizationKind::Breakdown, "2022");
        let plot = scene.layout.plot_area();
        let baseline = plot.y + plot.height;

        let frame = sample_frame(&scene, BAR_GROW_MS / 2.0, &[]);
        let early = bars(&frame);
        assert!(!early.is_empty());
        for bar in &early {
            assert!((bar.y + bar.height - baseline).abs() < 1e-9);
        }

        let done = sample_frame(&scene, 4.0 * BAR_STAGGER_MS + BAR_GROW_MS, &[]);
        let full = bars(&done);
        assert_eq!(full.len(), 5);
        let unit = plot.height / 75.0;
        assert!((full[4].height - 65.0 * unit).abs() < 1e-9);
    }

    #[test]
    fn hovered_dot_enlarges_and_shows_tooltip() {
        let scene = scene(VisualizationKind::Trend, "2024");
        let hover = [HoverPhase {
            mark_index: 0,
            entered: true,
            changed_at_ms: 2000.0,
        }];

        let during = sample_frame(&scene, 2075.0, &hover);
        assert!(!during.settled);
        let after = sample_frame(&scene, 2200.0, &hover);
        assert!(after.settled);

        let dots = circles(&after);
        assert!((dots[0].1 - 5.0).abs() < 1e-9);
        assert_eq!(dots[0].2, palette::ACCENT_HOVER);
        assert!((dots[1].1 - 3.0).abs() < 1e-9);

        let tooltip = after.primitives.iter().any(|p| {
            matches!(p, Primitive::Text { text, color, .. } if text == "65" && *color == palette::WHITE)
        });
        assert!(tooltip);
    }

    #[test]
    fn leaving_fades_the_tooltip_out() {
        let scene = scene(VisualizationKind::Breakdown, "2024");
        let hover = [HoverPhase {
            mark_index: 1,
            entered: false,
            changed_at_ms: 2000.0,
        }];
        let tooltip_count = |frame: &Frame| {
            frame
                .primitives
                .iter()
                .filter(|p| matches!(p, Primitive::Rect { corner_radius, .. } if *corner_radius == 4.0))
                .count()
        };
        assert_eq!(tooltip_count(&sample_frame(&scene, 2050.0, &hover)), 1);
        assert_eq!(tooltip_count(&sample_frame(&scene, 2150.0, &hover)), 0);
    }

    #[test]
    fn empty_scene_shows_message() {
        let scene = build_scene(
            7,
            ChartLayout::default(),
            VisualizationKind::Trend,
            "2024",
            &[] as &[SeriesPoint],
        );
        let frame = sample_frame(&scene, 0.0, &[]);
        assert_eq!(frame.generation, 7);
        assert!(frame.settled);
        assert_eq!(frame.primitives.len(), 1);
    }
}
