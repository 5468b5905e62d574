//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Cell, Chart, Dataset, Paragraph, Row, Table};

use super::runtime::App;
use super::style;
use crate::model::formula_description;
use crate::season::Parameter;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // header
            Constraint::Length(4),  // season card
            Constraint::Length(4),  // metrics
            Constraint::Min(10),    // chart
            Constraint::Length(9),  // monthly table + formula
            Constraint::Length(1),  // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_season_card(frame, app, chunks[1]);
    render_metrics(frame, app, chunks[2]);
    render_chart(frame, app, chunks[3]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(chunks[4]);
    render_monthly(frame, app, bottom[0]);
    render_ranges(frame, app, bottom[1]);
    render_formula(frame, app, bottom[2]);
    render_footer(frame, chunks[5]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mode = if app.use_custom { "CUSTOM" } else { "DEFAULT" };
    let mode_color = if app.use_custom {
        style::CUSTOM_ACTIVE
    } else {
        style::FOOTER_FG
    };
    let header = Line::from(vec![
        Span::styled(
            " ☀️ SOLAR ENERGY CALCULATOR ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" │ seed={} │ ranges: ", app.seed)),
        Span::styled(mode, Style::default().fg(mode_color).add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_season_card(frame: &mut Frame, app: &App, area: Rect) {
    let months: Vec<&str> = app.season.months().iter().map(|m| m.name()).collect();
    let lines = vec![
        Line::from(Span::styled(
            format!("{} {} Season Analysis", app.season.icon(), app.season.title()),
            Style::default()
                .fg(style::season_color(app.season))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Months: {}   Year: {}", months.join(", "), app.year)),
    ];
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_metrics(frame: &mut Frame, app: &App, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let values: [(&str, String); 4] = match &app.metrics {
        Some(m) => [
            ("Total Energy", format!("{:.1} kWh", m.total_kwh)),
            ("Average Daily", format!("{:.1} kWh", m.mean_kwh)),
            ("Peak Day", format!("{:.1} kWh", m.peak_kwh)),
            ("Total Days", m.days.to_string()),
        ],
        None => [
            ("Total Energy", "—".to_string()),
            ("Average Daily", "—".to_string()),
            ("Peak Day", "—".to_string()),
            ("Total Days", "—".to_string()),
        ],
    };

    for ((title, value), area) in values.into_iter().zip(cards.iter()) {
        let p = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default()
                .fg(style::METRIC_FG)
                .add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().title(format!(" {title} ")).borders(Borders::ALL));
        frame.render_widget(p, *area);
    }
}

fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(
            " {} Season - Daily Energy Production ",
            app.season.title()
        ))
        .borders(Borders::ALL);

    let Some(run) = &app.run else {
        let hint = Paragraph::new(Line::from("  Press g to generate solar data")).block(block);
        frame.render_widget(hint, area);
        return;
    };

    let data = app.series();
    let y_bounds = style::auto_bounds_y(&data);
    let x_hi = data.last().map_or(1.0, |p| p.0).max(1.0);

    let datasets = vec![
        Dataset::default()
            .name("kWh")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::season_color(app.season)))
            .data(&data),
    ];

    let first = run.records.first().map(|r| r.date.clone()).unwrap_or_default();
    let last = run.records.last().map(|r| r.date.clone()).unwrap_or_default();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Date")
                .bounds([0.0, x_hi])
                .labels(vec![first, last]),
        )
        .y_axis(
            Axis::default()
                .title("Energy (kWh)")
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_monthly(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(["Month", "Total kWh", "Avg", "Max", "Min", "Days"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = app
        .monthly
        .iter()
        .map(|m| {
            Row::new(vec![
                Cell::from(m.month.clone()),
                Cell::from(format!("{:.2}", m.total_kwh)),
                Cell::from(format!("{:.2}", m.mean_kwh)),
                Cell::from(format!("{:.2}", m.max_kwh)),
                Cell::from(format!("{:.2}", m.min_kwh)),
                Cell::from(m.days.to_string()),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(5),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Monthly Breakdown ")
            .borders(Borders::ALL),
    );
    frame.render_widget(table, area);
}

fn render_ranges(frame: &mut Frame, app: &App, area: Rect) {
    let ranges = app.active_ranges();
    let rows: Vec<Row> = Parameter::ALL
        .iter()
        .map(|&p| {
            let r = ranges.get(p);
            let row = Row::new(vec![
                Cell::from(p.label()),
                Cell::from(format!("{}–{} {}", r.low(), r.high(), p.unit())),
            ]);
            if p == app.selected {
                row.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                row
            }
        })
        .collect();
    let title = if app.use_custom {
        " Parameter Ranges (custom) "
    } else {
        " Parameter Ranges "
    };
    let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(12)])
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_formula(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = formula_description(app.season)
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    let p = Paragraph::new(lines).block(
        Block::default()
            .title(" Calculation Formula ")
            .borders(Borders::ALL),
    );
    frame.render_widget(p, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  1-4:Season  +/-:Year  g:Generate  c:Custom ranges  Tab:Parameter  [/]:Low  {/}:High",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
