use blockfall_engine::{GamePhase, GameSession};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use super::{BoardDisplay, SessionStatsDisplay, color, style};

/// Board and stats panel side by side, with a banner over the board when
/// the game is not running.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn height(&self) -> u16 {
        self.game_board().height()
    }

    fn border_color(&self) -> ratatui::style::Color {
        match self.session.phase() {
            GamePhase::Idle => color::GRAY,
            GamePhase::Running => color::WHITE,
            GamePhase::Paused => color::YELLOW,
            GamePhase::GameOver => color::RED,
        }
    }

    fn game_board(&self) -> BoardDisplay<'a> {
        BoardDisplay::new(self.session.board())
            .falling_piece(self.session.falling_piece())
            .block(
                Block::bordered()
                    .border_style(self.border_color())
                    .style(style::DEFAULT),
            )
    }

    fn banner(&self) -> Option<(&'static str, Style)> {
        match self.session.phase() {
            GamePhase::Running => None,
            GamePhase::Idle => Some((
                "PRESS S TO START",
                Style::new().fg(color::BLACK).bg(color::WHITE),
            )),
            GamePhase::Paused => Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW))),
            GamePhase::GameOver => Some((
                "GAME OVER!!",
                Style::new().fg(color::WHITE).bg(color::RED),
            )),
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);

        let game_board = self.game_board();
        let session_stats = SessionStatsDisplay::new(self.session).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(self.border_color())
                .style(style::DEFAULT),
        );

        let [left_column, center_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);

        if let Some((text, style)) = self.banner() {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
