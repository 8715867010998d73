use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use hoops_terminal::aggregate::{METRICS, Metric, ft_percentage};
use hoops_terminal::data_feed;
use hoops_terminal::dataset;
use hoops_terminal::demo_feed;
use hoops_terminal::game_file::LoadedGame;
use hoops_terminal::rundown;
use hoops_terminal::state::{self, AppState, MatchdayTab, Screen, apply_delta};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<state::ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('1') => self.state.screen = Screen::Season,
            KeyCode::Char('2') => self.state.screen = Screen::Matchday,
            KeyCode::Char('3') => self.state.screen = Screen::Player,
            KeyCode::Enter | KeyCode::Char('d') if self.state.screen == Screen::Season => {
                self.state.screen = Screen::Matchday;
            }
            KeyCode::Char('b') | KeyCode::Esc => self.state.screen = Screen::Season,
            KeyCode::Char('t') | KeyCode::Tab if self.state.screen == Screen::Matchday => {
                self.state.toggle_matchday_tab();
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Char('r') => self.request_reload(),
            KeyCode::Char('e') => self.request_export(),
            _ => {}
        }
    }

    fn move_down(&mut self) {
        if self.state.screen == Screen::Matchday
            && self.state.matchday_tab == MatchdayTab::PlayByPlay
        {
            self.state.rundown_scroll = self.state.rundown_scroll.saturating_add(1);
        } else {
            self.state.select_next();
        }
    }

    fn move_up(&mut self) {
        if self.state.screen == Screen::Matchday
            && self.state.matchday_tab == MatchdayTab::PlayByPlay
        {
            self.state.rundown_scroll = self.state.rundown_scroll.saturating_sub(1);
        } else {
            self.state.select_prev();
        }
    }

    fn request_reload(&mut self) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Reload unavailable");
            return;
        };
        if tx.send(state::ProviderCommand::Reload).is_err() {
            self.state.push_log("[WARN] Reload request failed");
        } else {
            self.state.push_log("[INFO] Reload requested");
        }
    }

    fn request_export(&mut self) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Export unavailable");
            return;
        };
        let path = env::var("HOOPS_EXPORT").unwrap_or_else(|_| "season_export.xlsx".to_string());
        if tx
            .send(state::ProviderCommand::Export { path: path.clone() })
            .is_err()
        {
            self.state.push_log("[WARN] Export request failed");
        } else {
            self.state.push_log(format!("[INFO] Exporting to {path}"));
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(tx, cmd_rx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn spawn_provider(
    tx: mpsc::Sender<state::Delta>,
    cmd_rx: mpsc::Receiver<state::ProviderCommand>,
) {
    let demo_forced = env::var("HOOPS_DEMO").is_ok_and(|v| v == "1");
    let db_path = env::var("HOOPS_DB")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .or_else(dataset::default_db_path);

    match db_path {
        Some(path) if !demo_forced && path.exists() => {
            data_feed::spawn_db_provider(path, roster_path(), tx, cmd_rx);
        }
        _ => demo_feed::spawn_demo_provider(tx, cmd_rx),
    }
}

fn roster_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("HOOPS_ROSTER") {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    let data_dir = env::var("HOOPS_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    Some(PathBuf::from(data_dir).join("roster.json"))
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Season => render_season(frame, chunks[1], &app.state),
        Screen::Matchday => render_matchday(frame, chunks[1], &app.state),
        Screen::Player => render_player(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match state.screen {
        Screen::Season => "SEASON",
        Screen::Matchday => "MATCHDAY",
        Screen::Player => "PLAYERS",
    };
    let line1 = format!("  .-.  COURTSIDE | {} | {}", state.team, screen);
    let line2 = " (___)".to_string();
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Season => {
            "1 Season | Enter/d Matchday | 3 Players | j/k Move | r Reload | e Export | ? Help | q Quit"
                .to_string()
        }
        Screen::Matchday => {
            "b/Esc Back | t/Tab Stats/Play by Play | j/k Move/Scroll | r Reload | ? Help | q Quit"
                .to_string()
        }
        Screen::Player => "b/Esc Back | j/k Move | r Reload | ? Help | q Quit".to_string(),
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_season(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.loading {
        let loading =
            Paragraph::new("Loading season...").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(loading, area);
        return;
    }
    if let Some(err) = &state.data_error {
        let error = Paragraph::new(format!("Season data unavailable: {err}"))
            .style(Style::default().fg(Color::Red));
        frame.render_widget(error, area);
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    render_season_tiles(frame, sections[0], state);

    let widths = season_columns();
    render_season_header(frame, sections[1], &widths);

    let list_area = sections[2];
    if state.games.is_empty() {
        let empty =
            Paragraph::new("No games recorded yet").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected_game, state.games.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == state.selected_game;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let game = &state.games[idx];
        let date = game.id.date.format("%d.%m.%Y").to_string();
        let score = format!("{}:{}", game.team_score, game.opponent_score);
        let (pts, ft_pct, fouls) = match state.totals.get(idx) {
            Some(t) => (
                t.points.to_string(),
                format!("{:.1}%", t.ft_pct * 100.0),
                t.fouls.to_string(),
            ),
            None => ("-".to_string(), "-".to_string(), "-".to_string()),
        };

        render_cell_text(frame, cols[0], &date, row_style);
        render_cell_text(frame, cols[1], &game.id.opponent, row_style);
        render_cell_text(frame, cols[2], &score, row_style);
        render_cell_text(frame, cols[3], result_label(game), row_style);
        render_cell_text(frame, cols[4], &pts, row_style);
        render_cell_text(frame, cols[5], &ft_pct, row_style);
        render_cell_text(frame, cols[6], &fouls, row_style);
    }
}

fn render_season_tiles(frame: &mut Frame, area: Rect, state: &AppState) {
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let Some(summary) = &state.season else {
        let empty = Paragraph::new("No season summary yet")
            .block(Block::default().title("Season").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    let games_text = format!("{} played\n{} won", summary.games_played, summary.wins);
    let ppg_text = format!(
        "{:.1}\n{}",
        summary.points_per_game,
        match &summary.latest {
            Some(c) => format!("{:+.0} pts vs prev", c.delta(Metric::Points)),
            None => "not enough games yet".to_string(),
        }
    );
    let ft_text = format!(
        "{:.1}%\n{}",
        summary.ft_pct * 100.0,
        match &summary.latest {
            Some(c) => format!(
                "{:+.1} pp vs prev",
                c.delta(Metric::FreethrowPercentage) * 100.0
            ),
            None => "not enough games yet".to_string(),
        }
    );
    let last_text = match state.games.last() {
        Some(game) => format!(
            "{}\n{} {}:{}",
            game.id,
            result_label(game),
            game.team_score,
            game.opponent_score
        ),
        None => "No games yet".to_string(),
    };

    let cells = [
        ("Games", games_text),
        ("PPG", ppg_text),
        ("FT%", ft_text),
        ("Last matchday", last_text),
    ];
    for (idx, (title, text)) in cells.into_iter().enumerate() {
        let tile =
            Paragraph::new(text).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(tile, tiles[idx]);
    }
}

fn season_columns() -> [Constraint; 7] {
    [
        Constraint::Length(12),
        Constraint::Min(16),
        Constraint::Length(9),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(5),
    ]
}

fn render_season_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Date", style);
    render_cell_text(frame, cols[1], "Opponent", style);
    render_cell_text(frame, cols[2], "Score", style);
    render_cell_text(frame, cols[3], "Res", style);
    render_cell_text(frame, cols[4], "PTS", style);
    render_cell_text(frame, cols[5], "FT%", style);
    render_cell_text(frame, cols[6], "PF", style);
}

fn render_matchday(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(40)])
        .split(area);

    let sidebar = Paragraph::new(matchday_list_text(state))
        .block(Block::default().title("Matchdays").borders(Borders::ALL));
    frame.render_widget(sidebar, columns[0]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(columns[1]);

    let tabs_text = match state.matchday_tab {
        MatchdayTab::Stats => "[ Stats ]   Play by Play",
        MatchdayTab::PlayByPlay => "  Stats   [ Play by Play ]",
    };
    let tabs = Paragraph::new(tabs_text).style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, main[0]);

    match state.matchday_tab {
        MatchdayTab::Stats => render_matchday_stats(frame, main[1], state),
        MatchdayTab::PlayByPlay => render_matchday_rundown(frame, main[1], state),
    }
}

fn matchday_list_text(state: &AppState) -> String {
    if state.games.is_empty() {
        return "No games yet".to_string();
    }
    let mut lines = Vec::with_capacity(state.games.len());
    for (idx, game) in state.games.iter().enumerate() {
        let prefix = if idx == state.selected_game {
            "> "
        } else {
            "  "
        };
        lines.push(format!(
            "{prefix}{} {}",
            game.id.date.format("%d.%m."),
            game.id.opponent
        ));
    }
    lines.join("\n")
}

fn render_matchday_stats(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(game) = state.selected_game() else {
        let empty =
            Paragraph::new("No matchday selected").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(1)])
        .split(area);

    let totals_block = Block::default()
        .title(format!("Team Totals | {}", game.id))
        .borders(Borders::ALL);
    let totals = Paragraph::new(team_totals_text(state)).block(totals_block);
    frame.render_widget(totals, rows[0]);

    let box_block = Block::default().title("Box Score").borders(Borders::ALL);
    let box_score = Paragraph::new(box_score_text(game)).block(box_block);
    frame.render_widget(box_score, rows[1]);
}

fn team_totals_text(state: &AppState) -> String {
    let Some(totals) = state.selected_totals() else {
        return "No totals for this matchday".to_string();
    };
    let comparison = state.comparison_for_selected();

    let mut lines = vec![format!(
        "{:<4} {:<22} {:>8} {:>9}",
        "", "", "Total", "vs prev"
    )];
    for metric in METRICS {
        let value = if metric.is_percentage() {
            format!("{:.1}%", totals.metric(metric) * 100.0)
        } else {
            format!("{:.0}", totals.metric(metric))
        };
        let delta = match &comparison {
            Some(c) if metric.is_percentage() => format!("{:+.1} pp", c.delta(metric) * 100.0),
            Some(c) => format!("{:+.0}", c.delta(metric)),
            None => "-".to_string(),
        };
        lines.push(format!(
            "{:<4} {:<22} {:>8} {:>9}",
            metric.abbr(),
            metric.full_name(),
            value,
            delta
        ));
    }
    lines.join("\n")
}

fn box_score_text(game: &LoadedGame) -> String {
    let mut lines = vec![format!(
        "{:<18} {:>4} {:>4} {:>4} {:>7} {:>4} {:>4} {:>3}",
        "Player", "PTS", "FTA", "FTM", "FT%", "FGM", "3PM", "PF"
    )];
    for row in &game.rows {
        let pct = ft_percentage(row.ft_made, row.ft_attempted);
        lines.push(format!(
            "{:<18} {:>4} {:>4} {:>4} {:>6.1}% {:>4} {:>4} {:>3}",
            row.player,
            row.points,
            row.ft_attempted,
            row.ft_made,
            pct * 100.0,
            row.fg_made,
            row.three_made,
            row.fouls
        ));
    }
    lines.join("\n")
}

fn render_matchday_rundown(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Play by Play").borders(Borders::ALL);
    let Some(game) = state.selected_game() else {
        let empty = Paragraph::new("No matchday selected").block(block);
        frame.render_widget(empty, area);
        return;
    };
    if game.rundown.is_empty() {
        let empty = Paragraph::new("No play by play recorded for this matchday").block(block);
        frame.render_widget(empty, area);
        return;
    }

    let lines = rundown::render_lines(
        &state.team,
        &game.id.opponent,
        game.opponent_score,
        &game.rundown,
    );
    let tape = Paragraph::new(lines.join("\n"))
        .block(block)
        .scroll((state.rundown_scroll, 0));
    frame.render_widget(tape, area);
}

fn render_player(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(30)])
        .split(area);

    let roster_text = if state.roster.is_empty() {
        "No roster loaded".to_string()
    } else {
        state
            .roster
            .iter()
            .enumerate()
            .map(|(idx, player)| {
                let prefix = if idx == state.selected_player {
                    "> "
                } else {
                    "  "
                };
                format!("{prefix}#{:>2} {}", player.number, player.name)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    let roster = Paragraph::new(roster_text)
        .block(Block::default().title("Roster").borders(Borders::ALL));
    frame.render_widget(roster, columns[0]);

    let detail = Paragraph::new(player_detail_text(state)).block(
        Block::default()
            .title("Season Averages")
            .borders(Borders::ALL),
    );
    frame.render_widget(detail, columns[1]);
}

fn player_detail_text(state: &AppState) -> String {
    let Some(player) = state.roster.get(state.selected_player) else {
        return "Select a player".to_string();
    };
    let Some(line) = state.selected_player_line() else {
        return format!("No games recorded for {}", player.name);
    };
    [
        format!("{} (#{})", line.player, player.number),
        String::new(),
        format!("Games:                {}", line.games),
        format!(
            "Points:               {} ({:.1} per game)",
            line.points, line.points_per_game
        ),
        format!(
            "Freethrows:           {}/{} ({:.1}%)",
            line.ft_made,
            line.ft_attempted,
            line.ft_pct * 100.0
        ),
        format!("Field Goals Made:     {}", line.fg_made),
        format!("Three Pointers Made:  {}", line.three_made),
        format!(
            "Personal Fouls:       {} ({:.1} per game)",
            line.fouls,
            f64::from(line.fouls) / line.games as f64
        ),
    ]
    .join("\n")
}

fn result_label(game: &LoadedGame) -> &'static str {
    if game.team_score > game.opponent_score {
        "W"
    } else if game.team_score < game.opponent_score {
        "L"
    } else {
        "T"
    }
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Courtside - Help",
        "",
        "Global:",
        "  1            Season",
        "  2 / Enter    Matchday",
        "  3            Players",
        "  b / Esc      Back to Season",
        "  j/k or ↑/↓   Move (scrolls Play by Play)",
        "  t / Tab      Stats / Play by Play",
        "  r            Reload season data",
        "  e            Export season workbook",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
