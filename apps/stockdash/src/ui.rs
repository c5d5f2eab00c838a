use crate::app::{App, Focus};
use chrono::NaiveDate;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap};
use ratatui::Frame;
use stockdash_application::layout::Dropdown;
use stockdash_domain::value_objects::candle::SyntheticCandle;
use stockdash_domain::value_objects::figure::{Figure, Series};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(12),
                Constraint::Length(8),
            ]
            .as_ref(),
        )
        .split(size);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(20)].as_ref())
        .split(outer[1]);

    draw_title(frame, outer[0], app);
    draw_sidebar(frame, body[0], app);
    draw_grid(frame, body[1], app);
    draw_bottom(frame, outer[2], app);
}

fn draw_title(frame: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(
            app.layout.title,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  Tab focus · ↑/↓ change · PgUp/PgDn logs · q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn dropdown_lines(dropdown: &Dropdown, focused: bool) -> Vec<Line<'static>> {
    let heading_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let selected = dropdown.selected_index();

    let mut lines = vec![Line::from(Span::styled(dropdown.label, heading_style))];
    for (idx, option) in dropdown.options.iter().enumerate() {
        let (marker, style) = if idx == selected {
            ("> ", Style::default().fg(Color::Cyan))
        } else {
            ("  ", Style::default())
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}", option.label),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let selection = app.session.selection();

    let mut stock = app.layout.stock_dropdown.clone();
    stock.value = selection.stock.to_string();
    let mut chart_type = app.layout.chart_type_dropdown.clone();
    chart_type.value = selection.chart_type.as_str().to_string();
    let mut theme = app.layout.theme_dropdown.clone();
    theme.value = selection.theme.as_str().to_string();

    let mut lines = Vec::new();
    lines.extend(dropdown_lines(&stock, app.focus == Focus::Stock));
    lines.extend(dropdown_lines(&chart_type, app.focus == Focus::ChartType));
    lines.extend(dropdown_lines(&theme, app.focus == Focus::Theme));
    lines.push(Line::from(format!(
        "every {} ms",
        app.layout.interval.interval_ms
    )));
    lines.push(Line::from(format!(
        "n_intervals={}",
        app.session.n_intervals()
    )));
    lines.push(Line::from(format!("refreshes={}", app.session.refreshes())));

    frame.render_widget(
        Paragraph::new(lines).block(Block::default().title("Controls").borders(Borders::ALL)),
        area,
    );
}

fn draw_grid(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);

    let Some(bundle) = app.session.bundle() else {
        frame.render_widget(
            Paragraph::new("Waiting for first refresh...")
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    };

    for (row_idx, row) in app.layout.grid.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
            .split(rows[row_idx]);
        for (col_idx, pane) in row.iter().enumerate() {
            draw_figure(frame, cells[col_idx], bundle.get(*pane));
        }
    }
}

fn draw_figure(frame: &mut Frame, area: Rect, figure: &Figure) {
    let block = Block::default()
        .title(figure.title.clone())
        .borders(Borders::ALL);
    match &figure.series {
        Series::Bar { x, y } => draw_xy(frame, area, block, figure, x, y, Shape::Bar),
        Series::Line { x, y } => draw_xy(frame, area, block, figure, x, y, Shape::Line),
        Series::Area { x, y } => draw_xy(frame, area, block, figure, x, y, Shape::Area),
        Series::Candlestick { x, candles } => {
            draw_candles(frame, area, block, figure, x, candles)
        }
        Series::Pie { labels, values } => draw_pie(frame, area, block, labels, values),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Shape {
    Bar,
    Line,
    Area,
}

fn draw_xy(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    figure: &Figure,
    x: &[NaiveDate],
    y: &[f64],
    shape: Shape,
) {
    let points: Vec<(f64, f64)> = y
        .iter()
        .enumerate()
        .map(|(idx, v)| (idx as f64, *v))
        .collect();
    let (x_min, x_max) = x_bounds(&points);
    let (y_min, y_max) = match shape {
        Shape::Line => y_bounds(&points),
        Shape::Bar | Shape::Area => (0.0, y_bounds(&points).1),
    };

    let mut datasets = Vec::new();
    if shape != Shape::Line {
        datasets.push(
            Dataset::default()
                .marker(Marker::Block)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(if shape == Shape::Area {
                    Color::Blue
                } else {
                    Color::Cyan
                }))
                .data(&points),
        );
    }
    if shape != Shape::Bar {
        datasets.push(
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&points),
        );
    }

    let mut x_axis = Axis::default()
        .bounds([x_min - 0.5, x_max + 0.5])
        .labels(date_labels(x));
    if let Some(title) = figure.x_title.clone() {
        x_axis = x_axis.title(title);
    }
    let mut y_axis = Axis::default()
        .bounds([y_min, y_max])
        .labels(axis_labels(y_min, y_max));
    if let Some(title) = figure.y_title.clone() {
        y_axis = y_axis.title(title);
    }

    frame.render_widget(
        Chart::new(datasets).block(block).x_axis(x_axis).y_axis(y_axis),
        area,
    );
}

fn draw_candles(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    figure: &Figure,
    x: &[NaiveDate],
    candles: &[SyntheticCandle],
) {
    // One two-point dataset per wick and per body; GraphType::Line draws each as a vertical stroke.
    let wicks: Vec<[(f64, f64); 2]> = candles
        .iter()
        .enumerate()
        .map(|(idx, c)| [(idx as f64, c.low as f64), (idx as f64, c.high as f64)])
        .collect();
    let bodies: Vec<[(f64, f64); 2]> = candles
        .iter()
        .enumerate()
        .map(|(idx, c)| [(idx as f64, c.open as f64), (idx as f64, c.close as f64)])
        .collect();

    let extremes: Vec<(f64, f64)> = wicks.iter().flatten().copied().collect();
    let (y_min, y_max) = y_bounds(&extremes);
    let (x_min, x_max) = x_bounds(&extremes);

    let mut datasets = Vec::with_capacity(candles.len() * 2);
    for ((candle, wick), body) in candles.iter().zip(&wicks).zip(&bodies) {
        let color = if candle.close >= candle.open {
            Color::Green
        } else {
            Color::Red
        };
        datasets.push(
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(wick),
        );
        datasets.push(
            Dataset::default()
                .marker(Marker::Block)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(body),
        );
    }

    let mut x_axis = Axis::default()
        .bounds([x_min - 0.5, x_max + 0.5])
        .labels(date_labels(x));
    if let Some(title) = figure.x_title.clone() {
        x_axis = x_axis.title(title);
    }
    let mut y_axis = Axis::default()
        .bounds([y_min, y_max])
        .labels(axis_labels(y_min, y_max));
    if let Some(title) = figure.y_title.clone() {
        y_axis = y_axis.title(title);
    }

    frame.render_widget(
        Chart::new(datasets).block(block).x_axis(x_axis).y_axis(y_axis),
        area,
    );
}

fn draw_pie(frame: &mut Frame, area: Rect, block: Block, labels: &[String], values: &[f64]) {
    let total: f64 = values.iter().sum();
    let width = area.width.saturating_sub(24).max(4) as usize;

    let lines: Vec<Line> = labels
        .iter()
        .zip(values)
        .map(|(label, value)| {
            let share = if total > 0.0 { value / total } else { 0.0 };
            let filled = (share * width as f64).round() as usize;
            Line::from(vec![
                Span::raw(format!("{label:<8} ")),
                Span::styled("█".repeat(filled), Style::default().fg(Color::Magenta)),
                Span::raw(format!(" {:.1}%", share * 100.0)),
            ])
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn x_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let x_min = points.first().map(|p| p.0).unwrap_or(0.0);
    let mut x_max = points.last().map(|p| p.0).unwrap_or(x_min + 1.0);
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    (x_min, x_max)
}

fn y_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (_, y) in points {
        min = min.min(*y);
        max = max.max(*y);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if max <= min {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

fn axis_labels(min: f64, max: f64) -> Vec<Line<'static>> {
    let mid = (min + max) / 2.0;
    vec![
        Line::from(format!("{min:.0}")),
        Line::from(format!("{mid:.0}")),
        Line::from(format!("{max:.0}")),
    ]
}

fn date_labels(x: &[NaiveDate]) -> Vec<Line<'static>> {
    let fmt = |d: Option<&NaiveDate>| d.map(|d| d.format("%m-%d").to_string()).unwrap_or_default();
    vec![
        Line::from(fmt(x.first())),
        Line::from(fmt(x.get(x.len() / 2))),
        Line::from(fmt(x.last())),
    ]
}

fn draw_bottom(frame: &mut Frame, area: Rect, app: &App) {
    let max_lines = area.height.saturating_sub(2) as usize;
    let visible = app.logs.lock().window(app.log_scroll, max_lines);

    let text: Vec<Line> = visible.into_iter().map(Line::from).collect();
    frame.render_widget(
        Paragraph::new(text)
            .block(Block::default().title("Logs").borders(Borders::ALL))
            .wrap(Wrap { trim: false }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::{axis_labels, date_labels, draw, y_bounds};
    use crate::app::App;
    use crate::logging::LogStore;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;
    use stockdash_application::config::UiConfig;
    use stockdash_domain::value_objects::chart_type::ChartType;
    use stockdash_infrastructure::market_data::random::RandomTickSource;

    fn rendered_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 48)).expect("terminal");
        terminal.draw(|frame| draw(frame, app)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    #[test]
    fn draws_every_pane_title() {
        for chart_type in [ChartType::Bar, ChartType::Line, ChartType::Candlestick] {
            let ui = UiConfig {
                default_chart_type: chart_type,
                ..UiConfig::default()
            };
            let mut app = App::start(
                &ui,
                Arc::new(RandomTickSource::with_seed(3)),
                LogStore::shared(10),
            )
            .expect("app");
            let text = rendered_text(&mut app);
            assert!(text.contains("Apple Trading Volume"));
            assert!(text.contains("Market Share Distribution"));
            assert!(text.contains("Apple KPI - Moving Average"));
            assert!(text.contains("100.0%"));
        }
    }

    #[test]
    fn y_bounds_pad_flat_series() {
        assert_eq!(y_bounds(&[(0.0, 5.0), (1.0, 5.0)]), (4.0, 6.0));
        assert_eq!(y_bounds(&[]), (0.0, 1.0));
        assert_eq!(axis_labels(0.0, 10.0).len(), 3);
    }

    #[test]
    fn date_labels_use_first_middle_last() {
        let days: Vec<NaiveDate> = (1..=5)
            .filter_map(|d| NaiveDate::from_ymd_opt(2023, 1, d))
            .collect();
        let labels: Vec<String> = date_labels(&days).iter().map(|l| l.to_string()).collect();
        assert_eq!(labels, vec!["01-01", "01-03", "01-05"]);
    }
}
