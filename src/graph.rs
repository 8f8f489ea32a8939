#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]
use crate::error::{DashboardError, Result};
use crate::loader::ScoreRow;
use plotters::prelude::*;
use plotters::style::PaletteColor;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;
use std::path::Path;

/// Upper bound of the radar chart's radial axis
pub const RADAR_MAX: f64 = 10.0;

/// Available graph types for the score table
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphType {
    /// One bar per method, colored by method and labelled with its score
    Bar,

    /// One closed polygon with a vertex per method on a fixed 0-10 radial axis
    Radar,
}

/// Configuration options for graph generation
#[derive(Clone, Debug)]
pub struct GraphOptions {
    /// Title displayed at the top of the graph
    pub title: String,

    /// Label for the X-axis (bar graph only)
    pub x_label: String,

    /// Label for the Y-axis (bar graph only)
    pub y_label: String,

    /// Width of the graph in pixels
    pub width: u32,

    /// Height of the graph in pixels
    pub height: u32,

    /// Type of graph to generate
    pub graph_type: GraphType,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self::bar()
    }
}

impl GraphOptions {
    pub fn bar() -> Self {
        Self {
            title: "Final Scores by EOR Method".to_string(),
            x_label: "EOR Method".to_string(),
            y_label: "Final Score".to_string(),
            width: 800,
            height: 500,
            graph_type: GraphType::Bar,
        }
    }

    pub fn radar() -> Self {
        Self {
            title: "EOR Scores".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            width: 600,
            height: 600,
            graph_type: GraphType::Radar,
        }
    }
}

/// Draws the score table as an SVG document
///
/// This is the entry point for both charts: it refuses a table with nothing
/// to plot and delegates to the bar or radar renderer.
///
/// # Arguments
/// * `rows` - Score rows in display order; rows without a final score keep
///   their slot but draw nothing
/// * `options` - Size, labels and graph type
///
/// # Returns
/// * A Result containing the SVG document as a string or an error
///
/// # Errors
/// * `Chart` if no row has a final score, or if plotters fails to draw
///
/// # Examples
/// ```
/// use eor_dashboard::graph::{GraphOptions, create_graph};
/// use eor_dashboard::loader::ScoreRow;
///
/// let rows = vec![ScoreRow {
///     method: "Polymer".to_string(),
///     validation: Some(1.0),
///     final_score: Some(7.4),
/// }];
///
/// let svg = create_graph(&rows, &GraphOptions::radar()).unwrap();
/// assert!(svg.starts_with("<svg"));
/// ```
pub fn create_graph(rows: &[ScoreRow], options: &GraphOptions) -> Result<String> {
    if !has_plottable_scores(rows) {
        return Err(DashboardError::Chart("no final scores to plot".to_string()));
    }

    match options.graph_type {
        GraphType::Bar => create_bar_graph(rows, options),
        GraphType::Radar => create_radar_graph(rows, options),
    }
}

/// Whether at least one row has a final score to draw
pub fn has_plottable_scores(rows: &[ScoreRow]) -> bool {
    rows.iter().any(|r| r.final_score.is_some())
}

/// Text shown for a final score: always one decimal
pub fn score_label(score: f64) -> String {
    format!("{:.1}", score)
}

/// Writes a rendered graph to disk
pub fn save_graph(svg: &str, path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(path, svg)?;
    Ok(())
}

fn chart_error<E: std::error::Error>(e: E) -> DashboardError {
    DashboardError::Chart(e.to_string())
}

// Same method, same color: index of the method's first appearance
fn method_color(rows: &[ScoreRow], index: usize) -> PaletteColor<Palette99> {
    let method = &rows[index].method;
    let first = rows
        .iter()
        .position(|r| &r.method == method)
        .unwrap_or(index);
    Palette99::pick(first)
}

fn create_bar_graph(rows: &[ScoreRow], options: &GraphOptions) -> Result<String> {
    let count = rows.len() as u32;
    let y_max = rows
        .iter()
        .filter_map(|r| r.final_score)
        .fold(RADAR_MAX, f64::max)
        * 1.1;
    let y_min = rows
        .iter()
        .filter_map(|r| r.final_score)
        .fold(0.0, f64::min);

    let label_style = TextStyle::from(("sans-serif", 12).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 20).into_font())
            .margin(40)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0u32..count).into_segmented(), y_min..y_max)
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(rows.len())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => rows
                    .get(*i as usize)
                    .map(|r| r.method.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc(&options.x_label)
            .y_desc(&options.y_label)
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(rows.iter().enumerate().filter_map(|(i, row)| {
                let score = row.final_score?;
                let i = i as u32;
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), score)],
                    method_color(rows, i as usize).filled(),
                );
                bar.set_margin(0, 0, 8, 8);
                Some(bar)
            }))
            .map_err(chart_error)?;

        chart
            .draw_series(rows.iter().enumerate().filter_map(|(i, row)| {
                let score = row.final_score?;
                Some(Text::new(
                    score_label(score),
                    (SegmentValue::CenterOf(i as u32), score),
                    label_style.clone(),
                ))
            }))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}

/// Unit vector of the `index`-th of `count` radar axes, counterclockwise from
/// the positive x axis
pub fn radar_direction(index: usize, count: usize) -> (f64, f64) {
    let angle = 2.0 * PI * index as f64 / count.max(1) as f64;
    (angle.cos(), angle.sin())
}

/// Polygon of the radar chart in unit coordinates (radius 1 = `RADAR_MAX`).
///
/// Rows without a final score keep their axis but get no vertex. The first
/// vertex is repeated at the end to close the polygon.
pub fn radar_vertices(rows: &[ScoreRow]) -> Vec<(f64, f64)> {
    let mut vertices: Vec<(f64, f64)> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let radius = row.final_score?.clamp(0.0, RADAR_MAX) / RADAR_MAX;
            let (x, y) = radar_direction(i, rows.len());
            Some((x * radius, y * radius))
        })
        .collect();

    if let Some(&first) = vertices.first() {
        vertices.push(first);
    }
    vertices
}

fn create_radar_graph(rows: &[ScoreRow], options: &GraphOptions) -> Result<String> {
    let grid_style = RGBColor(200, 200, 200).stroke_width(1);
    let tick_style = TextStyle::from(("sans-serif", 10).into_font().color(&RGBColor(120, 120, 120)));
    let axis_style = TextStyle::from(("sans-serif", 13).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 20).into_font())
            .margin(40)
            .build_cartesian_2d(-1.35f64..1.35f64, -1.35f64..1.35f64)
            .map_err(chart_error)?;

        // Rings every 2 points of the radial axis
        for step in 1..=5 {
            let radius = step as f64 * 2.0 / RADAR_MAX;
            let ring: Vec<(f64, f64)> = (0..=72)
                .map(|k| {
                    let angle = 2.0 * PI * k as f64 / 72.0;
                    (radius * angle.cos(), radius * angle.sin())
                })
                .collect();
            chart
                .draw_series(std::iter::once(PathElement::new(ring, grid_style)))
                .map_err(chart_error)?;
            chart
                .draw_series(std::iter::once(Text::new(
                    format!("{}", step * 2),
                    (0.02, radius),
                    tick_style.clone(),
                )))
                .map_err(chart_error)?;
        }

        for (i, row) in rows.iter().enumerate() {
            let (x, y) = radar_direction(i, rows.len());
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(0.0, 0.0), (x, y)],
                    grid_style,
                )))
                .map_err(chart_error)?;
            chart
                .draw_series(std::iter::once(Text::new(
                    row.method.clone(),
                    (x * 1.18, y * 1.18),
                    axis_style.clone(),
                )))
                .map_err(chart_error)?;
        }

        let vertices = radar_vertices(rows);
        chart
            .draw_series(std::iter::once(Polygon::new(
                vertices.clone(),
                BLUE.mix(0.6).filled(),
            )))
            .map_err(chart_error)?;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vertices,
                BLUE.stroke_width(2),
            )))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    Ok(svg)
}

/// Renders both graphs for a fixed set of scores
///
/// Used by the `graph_test` binary to eyeball the charts without a workbook.
pub fn create_example_graphs() -> Result<Vec<(String, String)>> {
    let rows: Vec<ScoreRow> = [
        ("Polymer", 0.0, 7.4),
        ("CO2 Miscible", 1.0, 8.2),
        ("Steam", 1.0, 3.1),
        ("Surfactant", 1.0, 6.0),
        ("In-situ Combustion", 0.0, 2.5),
    ]
    .into_iter()
    .map(|(method, validation, score)| ScoreRow {
        method: method.to_string(),
        validation: Some(validation),
        final_score: Some(score),
    })
    .collect();

    Ok(vec![
        ("bar".to_string(), create_graph(&rows, &GraphOptions::bar())?),
        ("radar".to_string(), create_graph(&rows, &GraphOptions::radar())?),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(method: &str, score: Option<f64>) -> ScoreRow {
        ScoreRow {
            method: method.to_string(),
            validation: Some(1.0),
            final_score: score,
        }
    }

    #[test]
    fn radar_polygon_is_closed() {
        let rows = vec![row("A", Some(5.0)), row("B", Some(10.0)), row("C", Some(2.0))];
        let v = radar_vertices(&rows);
        assert_eq!(v.len(), rows.len() + 1);
        assert_eq!(v.first(), v.last());
        assert!((v[0].0 - 0.5).abs() < 1e-12);
        assert!(v[0].1.abs() < 1e-12);
    }

    #[test]
    fn radar_clamps_to_axis_range() {
        let v = radar_vertices(&[row("A", Some(14.0)), row("B", Some(-3.0))]);
        assert!((v[0].0 - 1.0).abs() < 1e-12);
        assert!(v[1].0.abs() < 1e-12 && v[1].1.abs() < 1e-12);
    }

    #[test]
    fn radar_skips_missing_scores() {
        let v = radar_vertices(&[row("A", None), row("B", Some(4.0))]);
        assert_eq!(v.len(), 2);
        assert!((v[0].0 + 0.4).abs() < 1e-12);
    }

    #[test]
    fn labels_have_one_decimal() {
        assert_eq!(score_label(8.0), "8.0");
        assert_eq!(score_label(7.4), "7.4");
    }

    #[test]
    fn empty_table_is_not_plotted() {
        let err = create_graph(&[row("A", None)], &GraphOptions::bar()).unwrap_err();
        assert!(matches!(err, DashboardError::Chart(_)));
    }

    #[test]
    fn both_graphs_render_svg() {
        let graphs = create_example_graphs().unwrap();
        for (name, svg) in &graphs {
            assert!(svg.starts_with("<svg"), "{} graph is not svg", name);
        }
        // Value labels on the bars, method names around the radar
        assert!(graphs[0].1.contains("7.4"));
        assert!(graphs[1].1.contains("Polymer"));
    }
}
