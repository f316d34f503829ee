use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, BorderType, Gauge, Padding, Paragraph},
    Frame,
};
use kpi_dashboard_core::{format_date, DashboardView, DataSource, KpiCard, PeriodSummary, ProgressTier};

use crate::tui::app::App;

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    achieved: Color,
    on_track: Color,
    behind: Color,
    area: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    achieved: Color::Green,
    on_track: Color::Blue,
    behind: Color::LightBlue,
    area: Color::Magenta,
};

pub fn draw<S: DataSource>(f: &mut Frame, app: &App<S>) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(17),   // KPI cards
            Constraint::Length(10), // Areas
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    draw_header(f, app, main_layout[0]);

    match &app.view {
        Some(view) => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                ])
                .split(main_layout[1]);

            draw_period(f, " Weekly ", &view.weekly, columns[0]);
            draw_period(f, &format!(" Monthly {}/{:02} ", view.year, view.month), &view.monthly, columns[1]);
            draw_period(f, &format!(" Yearly {} ", view.year), &view.yearly, columns[2]);
            draw_areas(f, view, main_layout[2]);
        }
        None => {
            f.render_widget(
                Paragraph::new("No data available").alignment(Alignment::Center),
                main_layout[1],
            );
        }
    }

    let mut help = vec![
        Span::styled("WEEK: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::styled(" THIS WEEK: ", Style::default().fg(THEME.muted)),
        Span::styled("t ", Style::default().fg(THEME.text)),
        Span::styled(" REFRESH: ", Style::default().fg(THEME.muted)),
        Span::styled("r ", Style::default().fg(THEME.text)),
        Span::styled(" QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ];
    if let Some(status) = &app.status {
        help.push(Span::raw("   "));
        help.push(Span::styled(status.clone(), Style::default().fg(Color::Yellow)));
    }
    let footer = Paragraph::new(Line::from(help)).alignment(Alignment::Center);
    f.render_widget(footer, main_layout[3]);
}

fn draw_header<S: DataSource>(f: &mut Frame, app: &App<S>, area: Rect) {
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // Title
            Constraint::Min(1),     // Spacer
            Constraint::Length(36), // Week selector
        ])
        .split(area);

    let title = Paragraph::new(Span::styled(
        "KPI DASHBOARD",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    f.render_widget(title, header_layout[0]);

    let label = match &app.view {
        Some(view) => view.period_label.clone(),
        None => format_date(app.week_start),
    };
    let nav = Paragraph::new(Line::from(vec![
        Span::styled(" < ", Style::default().fg(THEME.text)),
        Span::styled(label, Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", Style::default().fg(THEME.text)),
    ]))
    .alignment(Alignment::Right)
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    f.render_widget(nav, header_layout[2]);

    let border = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(THEME.muted));
    f.render_widget(border, area);
}

fn draw_period(f: &mut Frame, title: &str, summary: &PeriodSummary, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(summary.cards.iter().map(|_| Constraint::Length(3)))
        .split(inner);

    for (card, row) in summary.cards.iter().zip(rows.iter()) {
        f.render_widget(gauge(card), *row);
    }
}

fn gauge(card: &KpiCard) -> Gauge<'static> {
    let color = match card.tier {
        ProgressTier::Achieved => THEME.achieved,
        ProgressTier::OnTrack => THEME.on_track,
        ProgressTier::Behind => THEME.behind,
    };
    Gauge::default()
        .block(
            Block::default()
                .title(format!(" {}  {} / {} ", card.kpi.label(), card.actual, card.target))
                .borders(Borders::TOP)
                .border_style(Style::default().fg(THEME.muted)),
        )
        .gauge_style(Style::default().fg(color))
        .ratio(card.bar_percent as f64 / 100.0)
        .label(format!("{}%", card.rate))
}

fn draw_areas(f: &mut Frame, view: &DashboardView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(format!(" Areas (week of {}) ", format_date(view.week_start)));

    if view.areas.is_empty() {
        f.render_widget(
            Paragraph::new("No area data for this week")
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    }

    let bars: Vec<Bar> = view
        .areas
        .iter()
        .map(|a| {
            Bar::default()
                .label(a.area.as_str())
                .value(a.ratio.round() as u64)
                .text_value(a.value.to_string())
                .style(Style::default().fg(THEME.area))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(6)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bars))
        .max(100);
    f.render_widget(chart, area);
}
