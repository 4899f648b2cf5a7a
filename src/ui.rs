use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Map, MapResolution, Points},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use trail_atlas::{JoinedTrail, TableRow, TrailDataset, TrailFilter};

/// Contiguous US, the smallest window shown when no state is selected
const US_LNG: [f64; 2] = [-125.0, -66.0];
const US_LAT: [f64; 2] = [24.0, 50.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    State,
    City,
    Difficulty,
}

impl Selector {
    pub fn title(&self) -> &str {
        match self {
            Selector::State => "State",
            Selector::City => "City",
            Selector::Difficulty => "Difficulty",
        }
    }
}

pub struct App<'a> {
    pub dataset: &'a TrailDataset,
    pub filter: TrailFilter,
    pub filtered: Vec<&'a JoinedTrail>,
    pub state: TableState,
    pub show_detail: bool,
}

impl<'a> App<'a> {
    pub fn new(dataset: &'a TrailDataset) -> Self {
        let mut app = Self {
            dataset,
            filter: TrailFilter::default(),
            filtered: Vec::new(),
            state: TableState::default(),
            show_detail: false,
        };
        app.refresh();
        app
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_trail(&self) -> Option<&'a JoinedTrail> {
        self.state.selected().and_then(|i| self.filtered.get(i).copied())
    }

    /// Step a selector through its options; past the last option it clears
    pub fn cycle(&mut self, selector: Selector, forward: bool) {
        match selector {
            Selector::State => {
                let options = self.dataset.region_names();
                self.filter.region_name = cycle_option(&self.filter.region_name, &options, forward);
                // Cities belong to the previous state
                self.filter.city = None;
            }
            Selector::City => {
                let options = self.dataset.cities_in(self.filter.region_name.as_deref());
                self.filter.city = cycle_option(&self.filter.city, &options, forward);
            }
            Selector::Difficulty => {
                let options = self.dataset.difficulties();
                self.filter.difficulty = cycle_option(&self.filter.difficulty, &options, forward);
            }
        }
        self.refresh();
    }

    pub fn clear_filter(&mut self) {
        self.filter = TrailFilter::default();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.filtered = self.dataset.filter(&self.filter);

        // Reset selection to first item
        if !self.filtered.is_empty() {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn next(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + 20).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(20));
        self.state.select(Some(i));
    }

    pub fn first(&mut self) {
        if !self.filtered.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        if !self.filtered.is_empty() {
            self.state.select(Some(self.filtered.len() - 1));
        }
    }

    /// Map window: fitted to the shown trails, never smaller than the US without a state
    pub fn map_bounds(&self) -> ([f64; 2], [f64; 2]) {
        if self.filtered.is_empty() {
            return (US_LNG, US_LAT);
        }

        let (mut lng, mut lat) = if self.filter.region_name.is_none() {
            (US_LNG, US_LAT)
        } else {
            ([f64::MAX, f64::MIN], [f64::MAX, f64::MIN])
        };
        for trail in &self.filtered {
            lng = [lng[0].min(trail.lng), lng[1].max(trail.lng)];
            lat = [lat[0].min(trail.lat), lat[1].max(trail.lat)];
        }

        if self.filter.region_name.is_none() && (lng, lat) == (US_LNG, US_LAT) {
            return (US_LNG, US_LAT);
        }

        // Keep a single city from collapsing to a point
        let pad = 1.0;
        ([lng[0] - pad, lng[1] + pad], [lat[0] - pad, lat[1] + pad])
    }

    /// Trail coordinates grouped by difficulty, (lng, lat) pairs
    pub fn map_points(&self) -> Vec<(Color, Vec<(f64, f64)>)> {
        self.dataset
            .difficulties()
            .iter()
            .map(|difficulty| {
                let coords = self
                    .filtered
                    .iter()
                    .filter(|t| &t.difficulty == difficulty)
                    .map(|t| (t.lng, t.lat))
                    .collect();
                (difficulty_color(difficulty), coords)
            })
            .collect()
    }
}

fn cycle_option(current: &Option<String>, options: &[String], forward: bool) -> Option<String> {
    if options.is_empty() {
        return None;
    }

    let position = current
        .as_ref()
        .and_then(|c| options.iter().position(|o| o == c));

    let next = match (position, forward) {
        (None, true) => Some(0),
        (None, false) => Some(options.len() - 1),
        (Some(i), true) if i + 1 < options.len() => Some(i + 1),
        (Some(i), false) if i > 0 => Some(i - 1),
        _ => None,
    };

    next.map(|i| options[i].clone())
}

fn difficulty_color(difficulty: &str) -> Color {
    match difficulty.to_lowercase().as_str() {
        "easy" => Color::Green,
        "moderate" => Color::Yellow,
        "hard" => Color::Red,
        _ => Color::Cyan,
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Char('s') => app.cycle(Selector::State, true),
                KeyCode::Char('S') => app.cycle(Selector::State, false),
                KeyCode::Char('c') => app.cycle(Selector::City, true),
                KeyCode::Char('C') => app.cycle(Selector::City, false),
                KeyCode::Char('d') => app.cycle(Selector::Difficulty, true),
                KeyCode::Char('D') => app.cycle(Selector::Difficulty, false),
                KeyCode::Char('x') => app.clear_filter(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.first(),
                KeyCode::End => app.last(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title + counts
            Constraint::Length(3), // Selectors
            Constraint::Min(0),    // Map + table
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_selectors(f, chunks[1], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);

    if app.show_detail {
        render_detail_panel(f, content_chunks[0], app);
    } else {
        render_map(f, content_chunks[0], app);
    }
    render_table(f, content_chunks[1], app);

    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(
            "Hiking in USA",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Total: {}", app.dataset.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Shown: {}", app.filtered.len()),
            Style::default().fg(Color::Green),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_selectors(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let selectors = [
        (Selector::State, "s", &app.filter.region_name),
        (Selector::City, "c", &app.filter.city),
        (Selector::Difficulty, "d", &app.filter.difficulty),
    ];

    for (i, (selector, key, value)) in selectors.iter().enumerate() {
        let (text, style) = match value {
            Some(v) => (v.clone(), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            None if *selector == Selector::City && app.filter.region_name.is_none() => {
                ("pick a state first".to_string(), Style::default().fg(Color::DarkGray))
            }
            None => ("All".to_string(), Style::default().fg(Color::DarkGray)),
        };

        let widget = Paragraph::new(Line::from(Span::styled(text, style))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} [{}] ", selector.title(), key)),
        );

        f.render_widget(widget, chunks[i]);
    }
}

fn render_map(f: &mut Frame, area: Rect, app: &App) {
    let (x_bounds, y_bounds) = app.map_bounds();
    let groups = app.map_points();

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Map "),
        )
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();
            for (color, coords) in &groups {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: *color,
                });
            }
        });

    f.render_widget(canvas, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = TableRow::HEADERS.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = TrailDataset::table_rows(&app.filtered).into_iter().map(|row| {
        let color = difficulty_color(&row.difficulty);

        let cells = vec![
            Cell::from(truncate(&row.name, 30)),
            Cell::from(row.region_name),
            Cell::from(truncate(&row.city, 18)),
            Cell::from(row.difficulty).style(Style::default().fg(color)),
            Cell::from(format!("{:.1}", row.length_km)),
            Cell::from(format!("{:.1}", row.review_score)),
            Cell::from(format!("{}", row.number_of_reviews)),
            Cell::from(row.trail_url),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(32),
            Constraint::Length(16),
            Constraint::Length(20),
            Constraint::Length(10),
            Constraint::Length(11),
            Constraint::Length(12),
            Constraint::Length(17),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Trails "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.filtered.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if !app.filter.is_empty() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled("x", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Clear"));
    }

    for (key, label) in [
        ("s/c/d", " Select (shift: back)"),
        ("Enter", " Details"),
        ("↑/↓", " Nav"),
        ("PgUp/PgDn", " Fast"),
    ] {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(label));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Trail Details ");

    let trail = match app.selected_trail() {
        Some(t) => t,
        None => {
            f.render_widget(Paragraph::new("No trail selected").block(block), area);
            return;
        }
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("  {}: ", name), label), Span::raw(value)])
    };

    let content = vec![
        Line::from(""),
        field("Trail", trail.name.clone()),
        field("State", format!("{} ({})", trail.region_name, trail.region_code)),
        field("City", trail.city.clone()),
        Line::from(vec![
            Span::styled("  Difficulty: ", label),
            Span::styled(
                trail.difficulty.clone(),
                Style::default().fg(difficulty_color(&trail.difficulty)),
            ),
        ]),
        field("Length", format!("{:.1} km", trail.length_km)),
        field(
            "Reviews",
            format!("{:.1} ({} reviews)", trail.review_score, trail.number_of_reviews),
        ),
        field("Location", format!("{:.4}, {:.4}", trail.lat, trail.lng)),
        Line::from(""),
        field("More info", trail.trail_url.clone()),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press Enter to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
