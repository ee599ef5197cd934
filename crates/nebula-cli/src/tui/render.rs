use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs};

use super::{App, Tab};

/// Render the whole UI: tabs, input, results and help bar.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(3), // Input
            Constraint::Min(5),    // Results table
            Constraint::Length(3), // Help bar
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);
    render_input(frame, app, chunks[1]);
    render_table(frame, app, chunks[2]);
    render_help(frame, app, chunks[3]);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = Tabs::new(Tab::ALL.iter().map(|tab| tab.title()))
        .select(app.tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title("Nebula Sound"));
    frame.render_widget(tabs, area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.tab == Tab::Playlist {
        format!("{}    Playlist size: {}", app.prompt(), app.playlist_size)
    } else {
        app.prompt().to_string()
    };
    let input = Paragraph::new(format!("{}▏", app.input))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(input, area);
}

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(
        std::iter::once(Cell::from("#").style(Style::default().fg(Color::DarkGray))).chain(
            app.headers()
                .into_iter()
                .map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))),
        ),
    )
    .height(1);

    let rows: Vec<Row> = app
        .results
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Row::new(
                std::iter::once(Cell::from(format!("{}", i + 1)))
                    .chain(row.iter().map(|cell| Cell::from(cell.as_str()))),
            )
        })
        .collect();

    let widths = match app.tab {
        Tab::Recommendations | Tab::Playlist => [
            Constraint::Length(4),
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Percentage(35),
        ],
        Tab::Artist => [
            Constraint::Length(4),
            Constraint::Percentage(45),
            Constraint::Percentage(40),
            Constraint::Length(10),
        ],
    };

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(app.results.caption.as_str()),
    );
    frame.render_widget(table, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let text = if app.tab == Tab::Playlist {
        "  Enter Search  \u{2191}/\u{2193} Size  Tab Switch  Esc/Ctrl-C Quit"
    } else {
        "  Enter Search  Tab Switch  Esc/Ctrl-C Quit"
    };
    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
