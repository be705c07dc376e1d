use crate::entity::Direction;
use crate::game::Game;
use crate::scores::ScoreEntry;
use std::io;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Direction(Direction),
    Pause,
    Quit,
    Restart,
    /// Enter or space; confirms the highlighted menu entry.
    Select,
    /// Ctrl+C delivered as a raw-mode key event.
    Interrupt,
}

/// Abstracts the terminal so the app state machine can be driven by a
/// scripted fake in tests.
pub trait Renderer {
    /// Take over the terminal (raw mode, alternate screen, hidden cursor).
    fn init(&mut self) -> io::Result<()>;

    /// Restore the terminal to its original state.
    fn cleanup(&mut self) -> io::Result<()>;

    /// Current terminal dimensions in character cells.
    fn dimensions(&self) -> io::Result<(u16, u16)>;

    /// Wait up to `timeout` for one decoded key event. A zero timeout polls
    /// without blocking, so callers can drain everything buffered.
    fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<Input>>;

    fn draw_game(&mut self, game: &Game) -> io::Result<()>;
    fn draw_menu(&mut self, selected: usize) -> io::Result<()>;
    fn draw_leaderboard(&mut self, entries: &[ScoreEntry]) -> io::Result<()>;
    fn draw_end_screen(&mut self, score: u32, won: bool, entries: &[ScoreEntry])
        -> io::Result<()>;
    fn draw_resized_notice(&mut self) -> io::Result<()>;
    fn draw_too_small(&mut self) -> io::Result<()>;
}
