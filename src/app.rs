use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::weather::{AlertView, Report, Screen};

const MISSING: &str = "--";

const TICK: Duration = Duration::from_millis(250);

/// Draws `load()`'s screen until the user quits. `refresh` of zero never
/// reloads on its own; `r` always does.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    refresh: Duration,
    load: impl Fn() -> Screen,
) -> io::Result<()> {
    let mut screen = load();
    let mut last_load = Instant::now();
    loop {
        terminal.draw(|f| ui(f, &screen))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('r') => {
                        debug!("manual reload");
                        screen = load();
                        last_load = Instant::now();
                    }
                    _ => {}
                }
            }
        }

        if !refresh.is_zero() && last_load.elapsed() >= refresh {
            debug!("scheduled reload");
            screen = load();
            last_load = Instant::now();
        }
    }
}

fn border() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded)
}

fn titled(title: &'static str) -> Block<'static> {
    border()
        .title(Span::styled(title, Style::default().fg(Color::Yellow)))
        .title_alignment(Alignment::Left)
}

fn display_alert(alert: &AlertView) -> Vec<Line> {
    let or_missing = |s: &str| {
        if s.is_empty() {
            MISSING.to_string()
        } else {
            s.to_string()
        }
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(
                or_missing(&alert.headline),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw(format!(" {:11}", "Severity")),
            Span::styled(or_missing(&alert.severity), Style::default().fg(Color::Green)),
        ]),
        Line::from(vec![
            Span::raw(format!(" {:11}", "Effective")),
            Span::styled(or_missing(&alert.effective), Style::default().fg(Color::Green)),
        ]),
    ];
    for text in alert.desc.lines().filter(|l| !l.trim().is_empty()) {
        lines.push(Line::from(format!(" {}", text.trim())));
    }
    lines
}

fn display_current_conditions(report: &Report) -> Table {
    let mut rows = vec![Row::new(vec![Cell::from("")])];

    let condition = if report.condition.is_empty() {
        MISSING.to_string()
    } else {
        report.condition.clone()
    };
    rows.push(Row::new(vec![
        Cell::from(" Conditions"),
        Cell::from(condition).style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    for detail in &report.details {
        rows.push(Row::new(vec![
            Cell::from(format!(" {}", detail.label)),
            Cell::from(detail.value.clone()).style(Style::default().fg(Color::Green)),
        ]));
    }

    rows.push(Row::new(vec![
        Cell::from(" Icon"),
        Cell::from(report.icon.name).style(Style::default().fg(Color::Magenta)),
    ]));

    Table::new(rows, [Constraint::Length(13), Constraint::Min(15)])
        .block(titled(" Current Conditions "))
}

fn display_headline(screen: &Screen) -> Paragraph {
    let mut lines = vec![Line::from(vec![
        Span::raw(" "),
        Span::styled(
            screen.location_name().to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ])];

    if let Screen::Loaded(report) = screen {
        let updated = if report.updated.is_empty() {
            MISSING
        } else {
            report.updated.as_str()
        };
        lines.push(Line::from(format!(" Updated {updated}")));
        lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled(report.icon.url.clone(), Style::default().fg(Color::Blue)),
        ]));
    }

    Paragraph::new(lines).block(border())
}

fn display_message(message: &str) -> Paragraph {
    Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::raw(" "),
            Span::styled(message.to_string(), Style::default().fg(Color::Red)),
        ]),
    ])
    .wrap(Wrap { trim: false })
    .block(titled(" Current Conditions "))
}

fn display_alerts(report: &Report) -> List {
    let mut items = vec![];
    if report.alerts.is_empty() {
        items.push(ListItem::new(format!("\n  {MISSING}")));
    } else {
        for alert in &report.alerts {
            items.push(ListItem::new(display_alert(alert)));
        }
    }
    List::new(items).block(titled(" Alerts "))
}

fn ui(f: &mut Frame, screen: &Screen) {
    let vert_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(display_headline(screen), vert_layout[0]);

    match screen {
        Screen::Loaded(report) => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(vert_layout[1]);
            f.render_widget(display_current_conditions(report), chunks[0]);
            f.render_widget(display_alerts(report), chunks[1]);
        }
        _ => {
            let message = screen.message().unwrap_or(MISSING);
            f.render_widget(display_message(message), vert_layout[1]);
        }
    }

    f.render_widget(
        Paragraph::new(" q quit  r reload").style(Style::default().fg(Color::DarkGray)),
        vert_layout[2],
    );
}
