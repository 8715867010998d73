use std::collections::VecDeque;
use std::env;

use crate::aggregate::{self, GameTotals, MatchdayComparison};
use crate::game_file::{LoadedGame, RosterPlayer};
use crate::season::{PlayerSeasonLine, SeasonSummary};

pub const DEFAULT_TEAM: &str = "Herons";
const LOG_CAP: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Season,
    Matchday,
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchdayTab {
    Stats,
    PlayByPlay,
}

pub struct AppState {
    pub screen: Screen,
    pub team: String,
    pub selected_game: usize,
    pub matchday_tab: MatchdayTab,
    pub rundown_scroll: u16,
    pub selected_player: usize,
    pub games: Vec<LoadedGame>,
    pub totals: Vec<GameTotals>,
    pub season: Option<SeasonSummary>,
    pub player_lines: Vec<PlayerSeasonLine>,
    pub roster: Vec<RosterPlayer>,
    pub data_error: Option<String>,
    pub loading: bool,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let team = env::var("HOOPS_TEAM")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TEAM.to_string());
        Self {
            screen: Screen::Season,
            team,
            selected_game: 0,
            matchday_tab: MatchdayTab::Stats,
            rundown_scroll: 0,
            selected_player: 0,
            games: Vec::with_capacity(32),
            totals: Vec::with_capacity(32),
            season: None,
            player_lines: Vec::new(),
            roster: Vec::new(),
            data_error: None,
            loading: true,
            logs: VecDeque::with_capacity(LOG_CAP),
            help_overlay: false,
        }
    }

    pub fn selected_game(&self) -> Option<&LoadedGame> {
        self.games.get(self.selected_game)
    }

    pub fn selected_totals(&self) -> Option<&GameTotals> {
        self.totals.get(self.selected_game)
    }

    /// Delta of the selected matchday against the game before it, None
    /// for the season opener.
    pub fn comparison_for_selected(&self) -> Option<MatchdayComparison> {
        let idx = self.selected_game;
        if idx == 0 {
            return None;
        }
        let previous = self.totals.get(idx - 1)?;
        let current = self.totals.get(idx)?;
        aggregate::compare_games(previous, current).ok()
    }

    pub fn selected_player_line(&self) -> Option<&PlayerSeasonLine> {
        let player = self.roster.get(self.selected_player)?;
        self.player_lines.iter().find(|l| l.player == player.name)
    }

    pub fn select_next(&mut self) {
        match self.screen {
            Screen::Season | Screen::Matchday => {
                if self.selected_game + 1 < self.games.len() {
                    self.selected_game += 1;
                    self.rundown_scroll = 0;
                }
            }
            Screen::Player => {
                if self.selected_player + 1 < self.roster.len() {
                    self.selected_player += 1;
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.screen {
            Screen::Season | Screen::Matchday => {
                if self.selected_game > 0 {
                    self.selected_game -= 1;
                    self.rundown_scroll = 0;
                }
            }
            Screen::Player => {
                self.selected_player = self.selected_player.saturating_sub(1);
            }
        }
    }

    pub fn toggle_matchday_tab(&mut self) {
        self.matchday_tab = match self.matchday_tab {
            MatchdayTab::Stats => MatchdayTab::PlayByPlay,
            MatchdayTab::PlayByPlay => MatchdayTab::Stats,
        };
        self.rundown_scroll = 0;
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        if self.logs.len() == LOG_CAP {
            self.logs.pop_front();
        }
        self.logs.push_back(msg.into());
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetSeason {
        games: Vec<LoadedGame>,
        totals: Vec<GameTotals>,
        summary: SeasonSummary,
        player_lines: Vec<PlayerSeasonLine>,
    },
    SetRoster(Vec<RosterPlayer>),
    DataError(String),
    ExportFinished {
        path: String,
        games: usize,
        players: usize,
        events: usize,
        errors: usize,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Reload,
    Export { path: String },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetSeason {
            games,
            totals,
            summary,
            player_lines,
        } => {
            state.games = games;
            state.totals = totals;
            state.season = Some(summary);
            state.player_lines = player_lines;
            state.data_error = None;
            state.loading = false;
            if state.selected_game >= state.games.len() {
                state.selected_game = state.games.len().saturating_sub(1);
            }
        }
        Delta::SetRoster(roster) => {
            if state.selected_player >= roster.len() {
                state.selected_player = roster.len().saturating_sub(1);
            }
            state.roster = roster;
        }
        Delta::DataError(message) => {
            state.loading = false;
            state.push_log(format!("[WARN] {message}"));
            state.data_error = Some(message);
        }
        Delta::ExportFinished {
            path,
            games,
            players,
            events,
            errors,
        } => {
            state.push_log(format!(
                "[INFO] Exported {games} games, {players} players, {events} events to {path} ({errors} errors)"
            ));
        }
        Delta::Log(message) => state.push_log(message),
    }
}
