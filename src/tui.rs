use crate::report;
use ratatui::{
    crossterm::{
        self,
        event::{Event, KeyCode},
    },
    layout::Constraint,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::*,
};

struct App {
    is_running: bool,
    rows: Vec<report::Row>,
    state: ratatui::widgets::TableState,
}

fn country_cell(row: &report::Row) -> String {
    match row.country_code() {
        Some(code) => format!(
            "{} {}",
            code,
            country_emoji::flag(code).unwrap_or_else(|| "?".to_string())
        ),
        None => row.country().to_string(),
    }
}

fn title(summary: &str) -> Line<'_> {
    Line::from(vec!["| ".into(), summary.italic(), " |".into()])
}

pub fn run_tui(summary: String, rows: Vec<report::Row>) -> color_eyre::Result<()> {
    let mut app = App {
        is_running: true,
        rows,
        state: TableState::default(),
    };
    app.state.select(Some(0));
    let mut terminal = ratatui::init();
    while app.is_running {
        terminal.draw(|f| {
            let headers = Row::new(vec![
                "#".cyan(),
                "IP".cyan(),
                "ASN".cyan(),
                "Provider".cyan(),
                "Country".cyan(),
            ]);
            let rows = app
                .rows
                .iter()
                .map(|row| {
                    Row::new(vec![
                        Cell::from(row.index.to_string()),
                        Cell::from(row.addr.to_string()),
                        Cell::from(row.asn()),
                        Cell::from(row.provider().to_string()),
                        Cell::from(country_cell(row)),
                    ])
                })
                .collect::<Vec<_>>();
            let table = Table::new(
                rows,
                [
                    Constraint::Max(4),
                    Constraint::Max(40),
                    Constraint::Max(26),
                    Constraint::Fill(1),
                    Constraint::Max(10),
                ]
                .as_ref(),
            )
            .header(headers)
            .highlight_style(Style::default().bg(Color::White).fg(Color::Black))
            .highlight_symbol("> ")
            .block(
                Block::bordered()
                    .title(title(&summary))
                    .title_top(
                        ratatui::text::Span::from("tracewhois")
                            .yellow()
                            .bold()
                            .into_right_aligned_line(),
                    )
                    .title_bottom(
                        Line::from("q: quit, ↑/↓: select").right_aligned(),
                    ),
            );
            f.render_stateful_widget(table, f.area(), &mut app.state);
        })?;

        let event = crossterm::event::read()?;
        if let Event::Key(key) = event {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    app.is_running = false;
                }
                KeyCode::Down => {
                    app.state.select_next();
                }
                KeyCode::Up => {
                    app.state.select_previous();
                }
                _ => {}
            }
        }
    }
    ratatui::restore();
    Ok(())
}
