use serde::Serialize;

use crate::models::{GraphData, GraphPoint};

/// More than this many points are drawn as a line.
pub const LINE_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Scatter,
}

pub fn chart_kind(graph: &GraphData) -> Option<ChartKind> {
    match graph.data_points.len() {
        0 => None,
        n if n > LINE_THRESHOLD => Some(ChartKind::Line),
        _ => Some(ChartKind::Scatter),
    }
}

/// Graph points mapped into a `width` x `height` SVG box, y growing downward.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub kind: ChartKind,
    pub points: Vec<(f64, f64)>,
}

pub fn plot(graph: &GraphData, width: f64, height: f64) -> Option<Plot> {
    let kind = chart_kind(graph)?;
    let finite: Vec<GraphPoint> = graph
        .data_points
        .iter()
        .copied()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    if finite.is_empty() {
        return None;
    }

    let (min_x, max_x) = bounds(finite.iter().map(|p| p.x));
    let (min_y, max_y) = bounds(finite.iter().map(|p| p.y));
    let span_x = if max_x > min_x { max_x - min_x } else { 1.0 };
    let span_y = if max_y > min_y { max_y - min_y } else { 1.0 };

    let mut points: Vec<(f64, f64)> = finite
        .iter()
        .map(|p| {
            let sx = (p.x - min_x) / span_x * width;
            let sy = height - (p.y - min_y) / span_y * height;
            (sx, sy)
        })
        .collect();
    if kind == ChartKind::Line {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    Some(Plot { kind, points })
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
