//! Text rendering of the dashboard view

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use pricescope_core::{
    ChartPoint, CompanyDirectory, DashboardView, Direction, LabelGranularity, PointKind, SelectionView,
};

/// Rows shown for a plain history chart
const SERIES_ROWS: usize = 12;
/// Companies listed before truncating
const DIRECTORY_ROWS: usize = 40;

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Full dashboard: header, suggestions or selection, chart
pub fn dashboard(view: &DashboardView) -> String {
    let mut out = header(view);

    if !view.suggestions.is_empty() {
        out.push_str("\nDid you mean:\n");
        for (i, company) in view.suggestions.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, company));
        }
        out.push_str("Use /pick <n> to choose.\n");
    }

    if let Some(selection) = &view.selection {
        out.push('\n');
        out.push_str(&metrics(selection).to_string());
        out.push('\n');
        out.push_str(&chart(view, selection).to_string());
        out.push('\n');
    }

    out
}

fn header(view: &DashboardView) -> String {
    let mut out = format!("[{}]", view.state);

    match &view.selection {
        Some(selection) => {
            out.push_str(&format!(" {}", selection.company));
            if let Some(price) = selection.current_price {
                out.push_str(&format!("  ${price:.2}"));
            }
            if let (Some(change), Some(label)) = (selection.price_change, selection.change_label()) {
                let arrow = match change.direction {
                    Direction::Up => "▲",
                    Direction::Down => "▼",
                    Direction::Flat => "■",
                };
                out.push_str(&format!("  {arrow} {label}"));
            }
        }
        None if view.suggestions.is_empty() => out.push_str(" No company selected"),
        None => {}
    }

    out.push_str(&format!(
        "\nModel: {}  Horizon: {}  [{}]\n",
        view.model.label(),
        view.horizon,
        view.predict_label()
    ));

    if let Some(overlay) = &view.overlay {
        let note = if overlay.stale { " (settings changed, /predict to refresh)" } else { "" };
        out.push_str(&format!(
            "Forecast: {} over {}{}\n",
            overlay.model.label(),
            overlay.horizon,
            note
        ));
    }

    out
}

fn metrics(selection: &SelectionView) -> Table {
    let mut table = table();
    table.set_header(vec!["Statistic", "Value"]);
    for (label, value) in selection.metrics.rows() {
        table.add_row(vec![label, value]);
    }
    table
}

fn chart(view: &DashboardView, selection: &SelectionView) -> Table {
    let granularity = view
        .chart
        .label_granularity(selection.timeframe.label_granularity());

    let mut table = table();
    table.set_header(vec!["Date", "Close", ""]);

    let points = &view.chart.points;
    let rows = if view.chart.has_forecast() {
        (0..points.len()).collect()
    } else {
        sample_indices(points.len(), SERIES_ROWS)
    };
    for i in rows {
        table.add_row(chart_row(&points[i], granularity, view.chart.boundary == Some(points[i].date)));
    }
    table
}

fn chart_row(point: &ChartPoint, granularity: LabelGranularity, is_boundary: bool) -> Vec<Cell> {
    let marker = match point.kind {
        PointKind::Historical => "",
        PointKind::Predicted if is_boundary => "◆ forecast",
        PointKind::Predicted => "◇",
    };
    vec![
        Cell::new(granularity.format(&point.date)),
        Cell::new(format!("{:.2}", point.close)),
        Cell::new(marker),
    ]
}

/// Up to `max` indices spread over `0..len`, always keeping the first and last
pub fn sample_indices(len: usize, max: usize) -> Vec<usize> {
    if len <= max {
        return (0..len).collect();
    }
    if max < 2 {
        return (0..max).map(|_| len - 1).collect();
    }
    let step = (len - 1) as f64 / (max - 1) as f64;
    (0..max).map(|i| (i as f64 * step).round() as usize).collect()
}

/// Numbered company list
pub fn companies(directory: &CompanyDirectory, filter: Option<&str>) -> String {
    let names = directory.filter(filter.unwrap_or(""));
    if names.is_empty() {
        return "No matching companies.\n".to_string();
    }

    let mut out = String::new();
    for name in names.iter().take(DIRECTORY_ROWS) {
        out.push_str(&format!("  {name}\n"));
    }
    if names.len() > DIRECTORY_ROWS {
        out.push_str(&format!(
            "  ... and {} more (narrow with /companies <filter>)\n",
            names.len() - DIRECTORY_ROWS
        ));
    }
    out
}
