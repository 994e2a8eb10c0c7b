//! UI rendering for the live stats dashboard
//!
//! ```text
//! ┌ CONTAINERS ┐┌ CPU ─────────────────────────────┐
//! │web-1       ││                                  │
//! │web-2       │└──────────────────────────────────┘
//! │worker-1    │┌ Memory ──────────────────────────┐
//! │            ││                                  │
//! └────────────┘└──────────────────────────────────┘
//! ```

use appctl_api::units::to_human;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, ListState, Paragraph},
};

use crate::session::{SeriesBuffer, Snapshot};

/// Areas of the three dashboard panes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panes {
    /// Container list, left column.
    pub selector: Rect,
    /// CPU chart, top right.
    pub cpu: Rect,
    /// Memory and swap chart, bottom right.
    pub memory: Rect,
}

/// Split the terminal: selector on the left 20%, CPU over memory on the right.
pub fn panes(area: Rect) -> Panes {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(20), Constraint::Percentage(80)])
        .split(area);

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    Panes {
        selector: columns[0],
        cpu: charts[0],
        memory: charts[1],
    }
}

/// Main UI rendering function
pub fn draw(frame: &mut Frame, view: &Snapshot) {
    let panes = panes(frame.area());
    let series = view.series();
    let title = view.selected_container().unwrap_or("-");

    draw_selector(frame, view, panes.selector);
    draw_cpu(frame, title, series, panes.cpu);
    draw_memory(frame, title, series, panes.memory);
}

fn draw_selector(frame: &mut Frame, view: &Snapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" CONTAINERS ")
        .title_alignment(Alignment::Center)
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (list_area, status_area) = if view.is_stale() && inner.height > 1 {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);
        (chunks[0], Some(chunks[1]))
    } else {
        (inner, None)
    };

    if view.containers().is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "no containers",
                Style::default().fg(Color::DarkGray),
            ))),
            list_area,
        );
    } else {
        let items: Vec<ListItem> = view
            .containers()
            .iter()
            .map(|id| ListItem::new(id.as_str()))
            .collect();
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(Color::Green)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );

        let mut list_state = ListState::default().with_selected(Some(view.selected()));
        frame.render_stateful_widget(list, list_area, &mut list_state);

        let row = view.selected().saturating_sub(list_state.offset()) as u16;
        if row < list_area.height {
            frame.set_cursor_position((list_area.x, list_area.y + row));
        }
    }

    if let Some(status_area) = status_area {
        let status = Paragraph::new(Line::from(Span::styled(
            "● stale data",
            Style::default().fg(Color::Red),
        )));
        frame.render_widget(status, status_area);
    }
}

fn draw_cpu(frame: &mut Frame, container: &str, series: Option<&SeriesBuffer>, area: Rect) {
    let data = series.map_or(&[][..], SeriesBuffer::cpu);
    let (x_min, x_max) = time_bounds(data);
    let y_max = data.iter().map(|&(_, y)| y).fold(100.0, f64::max);

    let dataset = Dataset::default()
        .name("cpu %")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(data);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" CPU ({container}) "))
                .title_style(Style::default().fg(Color::Green)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([x_min, x_max])
                .labels(time_labels(x_min, x_max)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, y_max])
                .labels(vec![
                    "0%".to_string(),
                    format!("{:.0}%", y_max / 2.0),
                    format!("{y_max:.0}%"),
                ]),
        );

    frame.render_widget(chart, area);
}

fn draw_memory(frame: &mut Frame, container: &str, series: Option<&SeriesBuffer>, area: Rect) {
    let memory = series.map_or(&[][..], SeriesBuffer::memory);
    let swap = series.map_or(&[][..], SeriesBuffer::swap);
    let (x_min, x_max) = time_bounds(memory);
    let peak = memory
        .iter()
        .chain(swap)
        .map(|&(_, y)| y)
        .fold(0.0, f64::max);
    let y_max = (peak * 1.1).max(1024.0);

    let datasets = vec![
        Dataset::default()
            .name("memory")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(memory),
        Dataset::default()
            .name("swap")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(swap),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Memory ({container}) "))
                .title_style(Style::default().fg(Color::Yellow)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([x_min, x_max])
                .labels(time_labels(x_min, x_max)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, y_max])
                .labels(vec![
                    byte_label(0.0),
                    byte_label(y_max / 2.0),
                    byte_label(y_max),
                ]),
        );

    frame.render_widget(chart, area);
}

/// X axis range of a series, at least one second wide.
fn time_bounds(data: &[(f64, f64)]) -> (f64, f64) {
    let (Some(first), Some(last)) = (data.first(), data.last()) else {
        return (0.0, 1.0);
    };
    let min = first.0;
    let max = last.0.max(min + 1.0);
    (min, max)
}

fn time_labels(min: f64, max: f64) -> Vec<String> {
    [min, (min + max) / 2.0, max]
        .iter()
        .map(|&ts| {
            chrono::DateTime::from_timestamp(ts as i64, 0)
                .map(|dt| dt.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
                .unwrap_or_else(|| "??:??:??".to_string())
        })
        .collect()
}

fn byte_label(value: f64) -> String {
    to_human(value.max(0.0) as u64).trim_start().to_string()
}
