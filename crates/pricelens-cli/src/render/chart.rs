//! SVG chart writers: closing-price line chart and correlation heatmap.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

use pricelens_core::{CorrelationMatrix, PriceTable, TradingDate};

use super::text::format_number;

const WIDTH: i32 = 900;
const HEIGHT: i32 = 480;
const PADDING: f64 = 50.0;

const PALETTE: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#17becf",
];

/// Line chart of closing prices, one polyline per ticker on a shared date axis.
pub fn price_chart(table: &PriceTable) -> String {
    let dates: Vec<TradingDate> = table
        .series()
        .iter()
        .flat_map(|series| series.points().iter().map(|point| point.date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut svg = svg_header(WIDTH, HEIGHT);
    push_title(&mut svg, "Stock Prices");

    let Some((min_v, max_v)) = extent(table.series().iter().flat_map(|s| s.closes())) else {
        svg.push_str(&empty_message("No price data"));
        svg.push_str(svg_footer());
        return svg;
    };

    let width = f64::from(WIDTH);
    let height = f64::from(HEIGHT);
    let xs = x_positions(dates.len(), width);

    push_value_axis(&mut svg, min_v, max_v, height);

    for (index, series) in table.series().iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        let coords: Vec<(f64, f64)> = series
            .points()
            .iter()
            .filter_map(|point| {
                let position = dates.binary_search(&point.date).ok()?;
                Some((xs[position], scale_value(point.close, min_v, max_v, height)))
            })
            .collect();
        svg.push_str(&polyline(&coords, color));

        let legend_y = PADDING + 14.0 + index as f64 * 16.0;
        let _ = write!(
            svg,
            r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="1.5" /><text x="{tx:.2}" y="{ty:.2}" text-anchor="start" fill="#333">{label}</text>"##,
            x1 = PADDING + 10.0,
            x2 = PADDING + 30.0,
            y = legend_y - 4.0,
            tx = PADDING + 36.0,
            ty = legend_y,
            label = escape(series.symbol.as_str()),
        );
    }

    push_date_axis(&mut svg, &dates, &xs, width, height);
    svg.push_str(svg_footer());
    svg
}

/// Annotated heatmap of a correlation matrix on a blue (-1) to red (+1) scale.
pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> String {
    let mut svg = svg_header(WIDTH, HEIGHT);
    push_title(&mut svg, "Correlation Matrix");

    let n = matrix.len();
    if n == 0 {
        svg.push_str(&empty_message("No correlations"));
        svg.push_str(svg_footer());
        return svg;
    }

    let left_pad = 90.0;
    let top_pad = 40.0;
    let bottom_pad = 40.0;
    let grid = (f64::from(HEIGHT) - top_pad - bottom_pad).min(f64::from(WIDTH) - left_pad - 20.0);
    let cell = grid / n as f64;

    for (row, symbol) in matrix.symbols.iter().enumerate() {
        let y_center = top_pad + (row as f64 + 0.5) * cell;
        let _ = write!(
            svg,
            r##"<text x="{x:.2}" y="{y:.2}" text-anchor="end" fill="#808080">{label}</text>"##,
            x = left_pad - 6.0,
            y = y_center + 3.0,
            label = escape(symbol.as_str()),
        );
        let _ = write!(
            svg,
            r##"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" fill="#808080">{label}</text>"##,
            x = left_pad + (row as f64 + 0.5) * cell,
            y = top_pad + grid + 14.0,
            label = escape(symbol.as_str()),
        );

        for (column, value) in matrix.values[row].iter().enumerate() {
            let x_left = left_pad + column as f64 * cell;
            let y_top = y_center - cell / 2.0;
            let (r, g, b) = diverging_color(*value);
            let _ = write!(
                svg,
                r##"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{w:.2}" fill="rgb({r},{g},{b})" stroke="#ffffff" stroke-width="1" />"##,
                x = x_left,
                y = y_top,
                w = cell,
            );
            let text_color = if value.is_finite() && value.abs() > 0.6 {
                "#ffffff"
            } else {
                "#262626"
            };
            let _ = write!(
                svg,
                r##"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="11" fill="{text_color}">{label}</text>"##,
                x = x_left + cell / 2.0,
                y = y_center + 4.0,
                label = format_number(*value, 2),
            );
        }
    }

    svg.push_str(svg_footer());
    svg
}

pub fn write_svg(path: &Path, svg: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, svg)
}

fn svg_header(width: i32, height: i32) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}"><style>text{{font-family:Arial,sans-serif;font-size:10px;fill:#666}}</style>"#,
        w = width,
        h = height
    )
}

fn svg_footer() -> &'static str {
    "</svg>"
}

fn push_title(svg: &mut String, title: &str) {
    let _ = write!(
        svg,
        r##"<text x="{x:.2}" y="20" text-anchor="middle" font-size="14" fill="#333">{title}</text>"##,
        x = f64::from(WIDTH) / 2.0,
    );
}

fn empty_message(message: &str) -> String {
    format!(
        r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{message}</text>"#,
        x = f64::from(WIDTH) / 2.0,
        y = f64::from(HEIGHT) / 2.0,
    )
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for value in values.filter(|v| v.is_finite()) {
        min_v = min_v.min(value);
        max_v = max_v.max(value);
    }
    if !min_v.is_finite() || !max_v.is_finite() {
        return None;
    }
    if min_v == max_v {
        // Widen flat ranges so the line sits mid-chart.
        let adjust = if min_v == 0.0 { 1.0 } else { min_v.abs() * 0.1 };
        return Some((min_v - adjust, max_v + adjust));
    }
    Some((min_v, max_v))
}

fn scale_value(value: f64, min_v: f64, max_v: f64, height: f64) -> f64 {
    let inner_height = height - 2.0 * PADDING;
    let norm = (value - min_v) / (max_v - min_v);
    PADDING + (1.0 - norm) * inner_height
}

fn x_positions(len: usize, width: f64) -> Vec<f64> {
    match len {
        0 => Vec::new(),
        1 => vec![width / 2.0],
        _ => {
            let inner_width = width - 2.0 * PADDING;
            (0..len)
                .map(|i| PADDING + inner_width * (i as f64 / (len - 1) as f64))
                .collect()
        }
    }
}

fn polyline(points: &[(f64, f64)], stroke: &str) -> String {
    if points.is_empty() {
        return String::new();
    }

    let coords = points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ");

    format!(r#"<polyline fill="none" stroke="{stroke}" stroke-width="1.5" points="{coords}" />"#)
}

fn push_value_axis(svg: &mut String, min_v: f64, max_v: f64, height: f64) {
    for step in 0..=4 {
        let value = min_v + (max_v - min_v) * f64::from(step) / 4.0;
        let y = scale_value(value, min_v, max_v, height);
        let _ = write!(
            svg,
            r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#eeeeee" stroke-width="0.5" /><text x="{tx:.2}" y="{ty:.2}" text-anchor="end">{label}</text>"##,
            x1 = PADDING,
            x2 = f64::from(WIDTH) - PADDING,
            tx = PADDING - 4.0,
            ty = y + 3.0,
            label = format_number(value, 2),
        );
    }
}

/// Axis line with one label per calendar month.
fn push_date_axis(svg: &mut String, dates: &[TradingDate], xs: &[f64], width: f64, height: f64) {
    if dates.is_empty() {
        return;
    }
    let axis_y = height - PADDING + 5.0;
    let _ = write!(
        svg,
        r##"<line x1="{x1:.2}" y1="{axis_y:.2}" x2="{x2:.2}" y2="{axis_y:.2}" stroke="#000" stroke-width="1" />"##,
        x1 = PADDING,
        x2 = width - PADDING,
    );

    let mut last_month = None;
    for (date, x) in dates.iter().zip(xs) {
        let inner = date.into_inner();
        let key = (inner.year(), inner.month());
        if last_month == Some(key) {
            continue;
        }
        last_month = Some(key);
        let _ = write!(
            svg,
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{year:04}-{month:02}</text>"#,
            y = axis_y + 16.0,
            year = key.0,
            month = u8::from(key.1),
        );
    }
}

/// Blue for -1, white for 0, red for +1; light grey for undefined.
fn diverging_color(value: f64) -> (u8, u8, u8) {
    if !value.is_finite() {
        return (235, 235, 235);
    }
    let t = value.clamp(-1.0, 1.0).abs();
    let (br, bg, bb) = if value >= 0.0 {
        (180.0, 4.0, 38.0)
    } else {
        (59.0, 76.0, 192.0)
    };
    let mix = |base: f64| (255.0 * (1.0 - t) + base * t).round() as u8;
    (mix(br), mix(bg), mix(bb))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricelens_core::{PricePoint, PriceSeries, Symbol};

    fn table() -> PriceTable {
        let mut table = PriceTable::new();
        for (name, closes) in [("AAPL", [125.0, 126.0, 124.0]), ("MSFT", [240.0, 229.0, 222.0])] {
            let points = ["2023-01-03", "2023-01-04", "2023-02-01"]
                .iter()
                .zip(closes)
                .map(|(date, close)| PricePoint {
                    date: TradingDate::parse(date).expect("date"),
                    close,
                })
                .collect();
            table.insert(PriceSeries::new(Symbol::parse(name).expect("symbol"), points));
        }
        table
    }

    #[test]
    fn price_chart_draws_one_line_per_ticker() {
        let svg = price_chart(&table());

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(">AAPL</text>"));
        assert!(svg.contains(">2023-01</text>"));
        assert!(svg.contains(">2023-02</text>"));
    }

    #[test]
    fn empty_table_still_renders_valid_svg() {
        let svg = price_chart(&PriceTable::new());
        assert!(svg.contains("No price data"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn heatmap_annotates_every_cell() {
        let matrix = CorrelationMatrix {
            symbols: vec![
                Symbol::parse("AAPL").expect("symbol"),
                Symbol::parse("^GSPC").expect("symbol"),
            ],
            values: vec![vec![1.0, -0.25], vec![-0.25, f64::NAN]],
        };

        let svg = correlation_heatmap(&matrix);
        assert_eq!(svg.matches("<rect").count(), 4);
        assert!(svg.contains(">1.00</text>"));
        assert_eq!(svg.matches(">-0.25</text>").count(), 2);
        assert!(svg.contains(">N/A</text>"));
        assert!(svg.contains("rgb(235,235,235)"));
    }

    #[test]
    fn diverging_scale_saturates_at_the_ends() {
        assert_eq!(diverging_color(1.0), (180, 4, 38));
        assert_eq!(diverging_color(-1.0), (59, 76, 192));
        assert_eq!(diverging_color(0.0), (255, 255, 255));
    }

    #[test]
    fn writes_svg_into_nested_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("charts").join("prices.svg");

        write_svg(&path, "<svg></svg>").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "<svg></svg>");
    }
}
