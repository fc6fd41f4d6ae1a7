//! Chart scene description.
//!
//! A `Scene` is the complete, time-independent description of one chart:
//! scales, mark geometry, reveal timings and hover regions. It is rebuilt
//! from scratch whenever the visualization or the period changes; executing
//! its animations is the job of `frame::sample_frame` and the frontend.

use crate::catalog::{DataCatalog, SeriesPoint, VisualizationKind};
use crate::curve::{Path, Point};
use crate::error::DashboardError;
use crate::scale::{BandScale, LinearScale};

/// Space added above the largest value on the value axis.
pub const VALUE_HEADROOM: f64 = 10.0;
pub const VALUE_TICK_COUNT: usize = 5;
pub const TREND_BAND_PADDING: f64 = 0.2;
pub const BREAKDOWN_BAND_PADDING: f64 = 0.4;
pub const AXIS_TITLE: &str = "Performance Score";

pub const LINE_REVEAL_MS: f64 = 1200.0;
pub const DOT_GROW_MS: f64 = 300.0;
pub const DOT_STAGGER_MS: f64 = 60.0;
pub const BAR_GROW_MS: f64 = 600.0;
pub const BAR_STAGGER_MS: f64 = 100.0;
pub const LABEL_DELAY_MS: f64 = 300.0;
pub const LABEL_FADE_MS: f64 = 300.0;
pub const HOVER_TRANSITION_MS: f64 = 150.0;

const DOT_RADIUS: f64 = 3.0;
const DOT_HOVER_RADIUS: f64 = 5.0;
const DOT_HIT_RADIUS: f64 = 8.0;
const BAR_HOVER_OPACITY: f32 = 0.8;
const LABEL_OFFSET: f64 = 8.0;
const TOOLTIP_WIDTH: f64 = 40.0;
const TOOLTIP_HEIGHT: f64 = 20.0;
const TOOLTIP_OFFSET: f64 = 30.0;
const TOOLTIP_TEXT_OFFSET: f64 = 16.0;

// ===== COLORS =====

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Channel-wise interpolation, `t` clamped to `0..=1`.
    pub fn mix(self, other: Rgba, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: self.a + (other.a - self.a) * t as f32,
        }
    }
}

pub mod palette {
    use super::Rgba;

    pub const ACCENT: Rgba = Rgba::rgb(99, 102, 241); // #6366f1
    pub const ACCENT_HOVER: Rgba = Rgba::rgb(79, 70, 229); // #4f46e5
    pub const GRID: Rgba = Rgba::rgb(248, 250, 252); // #f8fafc
    pub const AXIS: Rgba = Rgba::rgb(229, 231, 235); // #e5e7eb
    pub const TICK_TEXT: Rgba = Rgba::rgb(107, 114, 128); // #6b7280
    pub const AXIS_TITLE: Rgba = Rgba::rgb(156, 163, 175); // #9ca3af
    pub const TOOLTIP: Rgba = Rgba::rgb(31, 41, 55).with_alpha(0.9); // #1f2937
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
}

// ===== GEOMETRY =====

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Canvas size and the margins reserved for axes around the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margin: Margins,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 680.0,
            height: 400.0,
            margin: Margins {
                top: 40.0,
                right: 40.0,
                bottom: 60.0,
                left: 70.0,
            },
        }
    }
}

impl ChartLayout {
    pub fn plot_area(&self) -> Rect {
        Rect::new(
            self.margin.left,
            self.margin.top,
            (self.width - self.margin.left - self.margin.right).max(0.0),
            (self.height - self.margin.top - self.margin.bottom).max(0.0),
        )
    }
}

// ===== TIMING =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => t * (2.0 - t),
        }
    }
}

/// A time-driven transition relative to the moment the scene is shown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reveal {
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Reveal {
    pub const fn new(delay_ms: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            delay_ms,
            duration_ms,
            easing,
        }
    }

    /// Eased progress in `0..=1` at `elapsed_ms`.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return if elapsed_ms >= self.delay_ms { 1.0 } else { 0.0 };
        }
        self.easing
            .apply((elapsed_ms - self.delay_ms) / self.duration_ms)
    }

    pub fn end_ms(&self) -> f64 {
        self.delay_ms + self.duration_ms
    }
}

// ===== SCENE =====

#[derive(Debug, Clone, PartialEq)]
pub enum MarkGeometry {
    Dot { center: Point, radius: f64 },
    Bar { bounds: Rect, corner_radius: f64 },
}

/// Visual state of a mark at rest or under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkStyle {
    pub fill: Rgba,
    pub opacity: f32,
    /// Dot radius; `None` for bars.
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueLabel {
    pub text: String,
    /// Where the label starts its rise.
    pub from: Point,
    /// Where the label settles.
    pub anchor: Point,
    pub reveal: Reveal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub index: usize,
    pub category: String,
    pub value: f64,
    /// Period the mark's value was taken from.
    pub period: String,
    pub geometry: MarkGeometry,
    pub style: MarkStyle,
    pub reveal: Reveal,
    pub label: Option<ValueLabel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub bounds: Rect,
    pub text_anchor: Point,
}

/// Pointer target bound to one mark.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveRegion {
    pub mark_index: usize,
    pub bounds: Rect,
    pub on_enter: MarkStyle,
    pub on_leave: MarkStyle,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub label: String,
    /// Canvas coordinate along the axis.
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAxis {
    pub scale: BandScale,
    pub ticks: Vec<AxisTick>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueAxis {
    pub scale: LinearScale,
    pub ticks: Vec<AxisTick>,
    pub title: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendPaths {
    pub line: Path,
    pub area: Path,
    pub line_length: f64,
    pub line_width: f64,
    pub area_opacity: f32,
    pub reveal: Reveal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub plot: Rect,
    pub category_axis: CategoryAxis,
    pub value_axis: ValueAxis,
    /// Canvas y of each horizontal grid line.
    pub grid_lines: Vec<f64>,
    pub trend: Option<TrendPaths>,
    pub marks: Vec<Mark>,
    pub regions: Vec<InteractiveRegion>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Increases with every rebuild; animations of older scenes are stale.
    pub generation: u64,
    pub kind: VisualizationKind,
    pub period: String,
    pub title: String,
    pub layout: ChartLayout,
    /// `None` renders the empty state.
    pub chart: Option<ChartScene>,
    /// Why the chart is empty, when it is.
    pub issue: Option<DashboardError>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.chart.is_none()
    }

    pub fn marks(&self) -> &[Mark] {
        self.chart.as_ref().map_or(&[], |chart| &chart.marks)
    }

    pub fn regions(&self) -> &[InteractiveRegion] {
        self.chart.as_ref().map_or(&[], |chart| &chart.regions)
    }

    /// Topmost region under `point`.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.regions()
            .iter()
            .rev()
            .find(|region| region.bounds.contains(point))
            .map(|region| region.mark_index)
    }

    /// Time after which no reveal animation is running.
    pub fn settle_ms(&self) -> f64 {
        let Some(chart) = &self.chart else {
            return 0.0;
        };
        let marks = chart.marks.iter().flat_map(|mark| {
            std::iter::once(mark.reveal.end_ms())
                .chain(mark.label.as_ref().map(|label| label.reveal.end_ms()))
        });
        let line = chart.trend.as_ref().map(|trend| trend.reveal.end_ms());
        marks.chain(line).fold(0.0, f64::max)
    }
}

/// Builds scenes from catalog data; every call produces a fresh scene with
/// a new generation.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    layout: ChartLayout,
    generation: u64,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(ChartLayout::default())
    }
}

impl ChartRenderer {
    pub fn new(layout: ChartLayout) -> Self {
        Self::starting_after(layout, 0)
    }

    /// Renderer whose first scene follows `generation`, so scenes of a
    /// replaced renderer are never mistaken for its own.
    pub fn starting_after(layout: ChartLayout, generation: u64) -> Self {
        Self { layout, generation }
    }

    pub fn layout(&self) -> ChartLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: ChartLayout) {
        self.layout = layout;
    }

    /// Fails only for an unknown period; empty data yields an empty scene.
    pub fn render(
        &mut self,
        catalog: &DataCatalog,
        kind: VisualizationKind,
        period: &str,
    ) -> Result<Scene, DashboardError> {
        let points = catalog.get_series(kind, period)?;
        self.generation += 1;
        Ok(build_scene(self.generation, self.layout, kind, period, points))
    }
}

/// Deterministic scene for `points`.
pub fn build_scene(
    generation: u64,
    layout: ChartLayout,
    kind: VisualizationKind,
    period: &str,
    points: &[SeriesPoint],
) -> Scene {
    let chart = build_chart(layout, kind, period, points);
    let issue = chart.is_none().then(|| DashboardError::EmptySeries {
        kind,
        period: period.to_string(),
    });
    Scene {
        generation,
        kind,
        period: period.to_string(),
        title: format!("{} • {}", kind.title(), period),
        layout,
        chart,
        issue,
    }
}

fn build_chart(
    layout: ChartLayout,
    kind: VisualizationKind,
    period: &str,
    points: &[SeriesPoint],
) -> Option<ChartScene> {
    let plot = layout.plot_area();
    let baseline = plot.y + plot.height;

    let padding = match kind {
        VisualizationKind::Trend => TREND_BAND_PADDING,
        VisualizationKind::Breakdown => BREAKDOWN_BAND_PADDING,
    };
    // Non-finite values are reported by `DataCatalog::integrity_issues`.
    let points: Vec<&SeriesPoint> = points.iter().filter(|p| p.value.is_finite()).collect();
    let categories = points.iter().map(|p| p.category.clone()).collect();
    let band = BandScale::new(categories, (plot.x, plot.x + plot.width), padding)?;

    let max_value = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    let domain_top = (max_value + VALUE_HEADROOM).max(VALUE_HEADROOM);
    let linear = LinearScale::new((0.0, domain_top), (baseline, plot.y))?;

    let category_ticks = band
        .domain()
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            band.center(index).map(|position| AxisTick {
                label: label.clone(),
                position,
            })
        })
        .collect();
    let value_ticks: Vec<AxisTick> = linear
        .ticks(VALUE_TICK_COUNT)
        .into_iter()
        .map(|value| AxisTick {
            label: format_plain(value),
            position: linear.apply(value),
        })
        .collect();
    let grid_lines = value_ticks.iter().map(|tick| tick.position).collect();

    let mut marks = Vec::with_capacity(points.len());
    let mut regions = Vec::with_capacity(points.len());
    for (index, point) in points.iter().enumerate() {
        let Some(x) = band.position(index) else {
            continue;
        };
        let center_x = x + band.bandwidth() / 2.0;
        let top = linear.apply(point.value);
        let text = format_plain(point.value);

        let (mark, region) = match kind {
            VisualizationKind::Trend => {
                let center = Point::new(center_x, top);
                let rest = MarkStyle {
                    fill: palette::ACCENT,
                    opacity: 1.0,
                    radius: Some(DOT_RADIUS),
                };
                let mark = Mark {
                    index,
                    category: point.category.clone(),
                    value: point.value,
                    period: period.to_string(),
                    geometry: MarkGeometry::Dot {
                        center,
                        radius: DOT_RADIUS,
                    },
                    style: rest,
                    reveal: Reveal::new(index as f64 * DOT_STAGGER_MS, DOT_GROW_MS, Easing::Linear),
                    label: None,
                };
                let region = InteractiveRegion {
                    mark_index: index,
                    bounds: Rect::new(
                        center.x - DOT_HIT_RADIUS,
                        center.y - DOT_HIT_RADIUS,
                        DOT_HIT_RADIUS * 2.0,
                        DOT_HIT_RADIUS * 2.0,
                    ),
                    on_enter: MarkStyle {
                        fill: palette::ACCENT_HOVER,
                        opacity: 1.0,
                        radius: Some(DOT_HOVER_RADIUS),
                    },
                    on_leave: rest,
                    tooltip: tooltip_above(center_x, top, text),
                };
                (mark, region)
            }
            VisualizationKind::Breakdown => {
                let bounds = Rect::new(x, top.min(baseline), band.bandwidth(), (baseline - top).abs());
                let rest = MarkStyle {
                    fill: palette::ACCENT,
                    opacity: 1.0,
                    radius: None,
                };
                let stagger = index as f64 * BAR_STAGGER_MS;
                let mark = Mark {
                    index,
                    category: point.category.clone(),
                    value: point.value,
                    period: period.to_string(),
                    geometry: MarkGeometry::Bar {
                        bounds,
                        corner_radius: 2.0,
                    },
                    style: rest,
                    reveal: Reveal::new(stagger, BAR_GROW_MS, Easing::QuadOut),
                    label: Some(ValueLabel {
                        text: text.clone(),
                        from: Point::new(center_x, baseline),
                        anchor: Point::new(center_x, top - LABEL_OFFSET),
                        reveal: Reveal::new(stagger + LABEL_DELAY_MS, LABEL_FADE_MS, Easing::Linear),
                    }),
                };
                let region = InteractiveRegion {
                    mark_index: index,
                    bounds,
                    on_enter: MarkStyle {
                        fill: palette::ACCENT_HOVER,
                        opacity: BAR_HOVER_OPACITY,
                        radius: None,
                    },
                    on_leave: rest,
                    tooltip: tooltip_above(center_x, top, text),
                };
                (mark, region)
            }
        };
        marks.push(mark);
        regions.push(region);
    }

    let trend = (kind == VisualizationKind::Trend).then(|| {
        let centers: Vec<Point> = marks
            .iter()
            .filter_map(|mark| match mark.geometry {
                MarkGeometry::Dot { center, .. } => Some(center),
                MarkGeometry::Bar { .. } => None,
            })
            .collect();
        let line = Path::catmull_rom(&centers);
        TrendPaths {
            line_length: line.length(),
            area: Path::area_to_baseline(&centers, baseline),
            line,
            line_width: 2.0,
            area_opacity: 0.03,
            reveal: Reveal::new(0.0, LINE_REVEAL_MS, Easing::QuadOut),
        }
    });

    Some(ChartScene {
        plot,
        category_axis: CategoryAxis {
            scale: band,
            ticks: category_ticks,
        },
        value_axis: ValueAxis {
            scale: linear,
            ticks: value_ticks,
            title: AXIS_TITLE,
        },
        grid_lines,
        trend,
        marks,
        regions,
    })
}

fn tooltip_above(center_x: f64, top: f64, text: String) -> Tooltip {
    Tooltip {
        text,
        bounds: Rect::new(
            center_x - TOOLTIP_WIDTH / 2.0,
            top - TOOLTIP_OFFSET,
            TOOLTIP_WIDTH,
            TOOLTIP_HEIGHT,
        ),
        text_anchor: Point::new(center_x, top - TOOLTIP_TEXT_OFFSET),
    }
}

/// `65.0` → `65`, `72.5` → `72.5`.
pub fn format_plain(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

// ===== HOVER =====

/// Enter/leave transition produced by a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverChange {
    pub left: Option<usize>,
    pub entered: Option<usize>,
}

impl HoverChange {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.entered.is_none()
    }
}

/// Tracks which mark is under the pointer for one scene generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoverTracker {
    generation: u64,
    hovered: Option<usize>,
}

impl HoverTracker {
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn pointer_moved(&mut self, scene: &Scene, point: Point) -> HoverChange {
        if scene.generation != self.generation {
            self.reset(scene.generation);
        }
        let target = scene.hit_test(point);
        if target == self.hovered {
            return HoverChange::default();
        }
        let change = HoverChange {
            left: self.hovered,
            entered: target,
        };
        self.hovered = target;
        change
    }

    pub fn pointer_left(&mut self) -> HoverChange {
        HoverChange {
            left: self.hovered.take(),
            entered: None,
        }
    }

    /// Forgets the hovered mark; regions of an older scene are gone.
    pub fn reset(&mut self, generation: u64) {
        self.generation = generation;
        self.hovered = None;
    }
}
