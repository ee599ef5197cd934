use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use nebula_etl::Config;
use nebula_search::{Recommender, SearchError};
use ratatui::prelude::*;

use crate::commands::load_recommender;
use crate::commands::query::{artist_rows, track_rows, ARTIST_HEADERS, TRACK_HEADERS};

pub mod render;

pub const MIN_PLAYLIST_SIZE: usize = 1;
pub const MAX_PLAYLIST_SIZE: usize = 20;

/// Which surface the UI is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Recommendations,
    Playlist,
    Artist,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Recommendations, Tab::Playlist, Tab::Artist];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Recommendations => "Song Recommendations",
            Tab::Playlist => "Playlist Generator",
            Tab::Artist => "Search by Artist",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Recommendations => 0,
            Tab::Playlist => 1,
            Tab::Artist => 2,
        }
    }

    fn next(self) -> Self {
        match self {
            Tab::Recommendations => Tab::Playlist,
            Tab::Playlist => Tab::Artist,
            Tab::Artist => Tab::Recommendations,
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            Tab::Recommendations | Tab::Playlist => "Song name",
            Tab::Artist => "Artist name",
        }
    }

    fn headers(self) -> [&'static str; 3] {
        match self {
            Tab::Recommendations | Tab::Playlist => TRACK_HEADERS,
            Tab::Artist => ARTIST_HEADERS,
        }
    }
}

/// Rows shown under the input box, with the caption above them.
#[derive(Debug, Default)]
pub struct Results {
    pub caption: String,
    pub rows: Vec<[String; 3]>,
}

/// Application state for the interactive UI.
#[derive(Debug)]
pub struct App<'a> {
    recommender: &'a Recommender,
    pub tab: Tab,
    pub input: String,
    pub playlist_size: usize,
    pub results: Results,
    pub should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(recommender: &'a Recommender) -> Self {
        let playlist_size = recommender
            .settings()
            .playlist_size
            .clamp(MIN_PLAYLIST_SIZE, MAX_PLAYLIST_SIZE);
        Self {
            recommender,
            tab: Tab::Recommendations,
            input: String::new(),
            playlist_size,
            results: Results::default(),
            should_quit: false,
        }
    }

    pub fn headers(&self) -> [&'static str; 3] {
        self.tab.headers()
    }

    pub fn prompt(&self) -> &'static str {
        self.tab.prompt()
    }

    /// Ctrl-C quits; every other key goes to [`App::handle_key`].
    pub fn handle_event(&mut self, event: KeyEvent) {
        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
        } else {
            self.handle_key(event.code);
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => {
                self.tab = self.tab.next();
                self.input.clear();
                self.results = Results::default();
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Up if self.tab == Tab::Playlist => {
                self.playlist_size = (self.playlist_size + 1).min(MAX_PLAYLIST_SIZE);
            }
            KeyCode::Down if self.tab == Tab::Playlist => {
                self.playlist_size = self
                    .playlist_size
                    .saturating_sub(1)
                    .max(MIN_PLAYLIST_SIZE);
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    /// Run the current tab's query; an unresolved name yields an empty table.
    fn submit(&mut self) {
        let query = self.input.trim().to_string();
        if query.is_empty() {
            return;
        }

        let outcome = match self.tab {
            Tab::Recommendations => self.recommender.recommend(&query, None).map(|tracks| {
                Results {
                    caption: format!("Songs like '{query}'"),
                    rows: track_rows(&tracks),
                }
            }),
            Tab::Playlist => self
                .recommender
                .generate_playlist(&query, Some(self.playlist_size))
                .map(|tracks| Results {
                    caption: format!("Playlist from '{query}'"),
                    rows: track_rows(&tracks),
                }),
            Tab::Artist => self.recommender.songs_by_artist(&query).map(|artist| Results {
                caption: format!("Songs by {}", artist.artist_name),
                rows: artist_rows(&artist.songs),
            }),
        };

        self.results = match outcome {
            Ok(results) => results,
            Err(e @ SearchError::NotFound { .. }) => {
                log::debug!("{e}");
                Results {
                    caption: format!("No match for '{query}'"),
                    rows: Vec::new(),
                }
            }
            Err(e) => {
                log::error!("Query failed: {e}");
                Results {
                    caption: format!("Error: {e}"),
                    rows: Vec::new(),
                }
            }
        };
    }
}

/// Run the interactive UI.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error).
pub fn run_tui(config: &Config) -> Result<()> {
    let recommender = load_recommender(config)?;
    let app = App::new(&recommender);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the event loop, capturing any error so we can restore the terminal
    let result = run_event_loop(&mut terminal, app);

    // Restore terminal regardless of success or failure
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| render::render(frame, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_event(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_search::fixtures::sample_recommender;

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_recommendations_tab_submits_on_enter() {
        let recommender = sample_recommender().unwrap();
        let mut app = App::new(&recommender);

        type_text(&mut app, "Shape of You");
        assert!(app.results.rows.is_empty());
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.results.rows.len(), 5);
        assert!(app.results.rows.iter().all(|row| row[0] != "Shape of You"));
    }

    #[test]
    fn test_unknown_name_shows_empty_table() {
        let recommender = sample_recommender().unwrap();
        let mut app = App::new(&recommender);

        type_text(&mut app, "zzzzqqqq123");
        app.handle_key(KeyCode::Enter);

        assert!(app.results.rows.is_empty());
        assert!(app.results.caption.contains("zzzzqqqq123"));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_tab_cycles_and_clears_input() {
        let recommender = sample_recommender().unwrap();
        let mut app = App::new(&recommender);
        type_text(&mut app, "abc");

        app.handle_key(KeyCode::Tab);
        assert_eq!(app.tab, Tab::Playlist);
        assert!(app.input.is_empty());

        app.handle_key(KeyCode::Tab);
        assert_eq!(app.tab, Tab::Artist);
        assert_eq!(app.headers(), ARTIST_HEADERS);

        app.handle_key(KeyCode::Tab);
        assert_eq!(app.tab, Tab::Recommendations);
    }

    #[test]
    fn test_playlist_size_is_bounded() {
        let recommender = sample_recommender().unwrap();
        let mut app = App::new(&recommender);
        assert_eq!(app.playlist_size, 10);

        // Size keys only apply on the playlist tab
        app.handle_key(KeyCode::Up);
        assert_eq!(app.playlist_size, 10);

        app.handle_key(KeyCode::Tab);
        for _ in 0..30 {
            app.handle_key(KeyCode::Up);
        }
        assert_eq!(app.playlist_size, MAX_PLAYLIST_SIZE);
        for _ in 0..30 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.playlist_size, MIN_PLAYLIST_SIZE);
    }

    #[test]
    fn test_playlist_uses_selected_size() {
        let recommender = sample_recommender().unwrap();
        let mut app = App::new(&recommender);
        app.handle_key(KeyCode::Tab);
        for _ in 0..7 {
            app.handle_key(KeyCode::Down);
        }

        type_text(&mut app, "Starboy");
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.results.rows.len(), 3);
    }

    #[test]
    fn test_artist_tab_resolves_name() {
        let recommender = sample_recommender().unwrap();
        let mut app = App::new(&recommender);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Tab);

        type_text(&mut app, "ed sheeran");
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.results.caption, "Songs by Ed Sheeran");
        assert_eq!(app.results.rows.len(), 3);
    }

    #[test]
    fn test_backspace_and_escape() {
        let recommender = sample_recommender().unwrap();
        let mut app = App::new(&recommender);
        type_text(&mut app, "ab");
        app.handle_key(KeyCode::Backspace);
        assert_eq!(app.input, "a");

        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let recommender = sample_recommender().unwrap();
        let mut app = App::new(&recommender);
        type_text(&mut app, "   ");
        app.handle_key(KeyCode::Enter);
        assert!(app.results.caption.is_empty());
    }

    #[test]
    fn test_ctrl_c_quits_without_typing() {
        let recommender = sample_recommender().unwrap();
        let mut app = App::new(&recommender);
        type_text(&mut app, "ab");

        app.handle_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert_eq!(app.input, "ab");
    }

    #[test]
    fn test_plain_c_is_typed() {
        let recommender = sample_recommender().unwrap();
        let mut app = App::new(&recommender);

        app.handle_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!app.should_quit);
        assert_eq!(app.input, "c");
    }
}
