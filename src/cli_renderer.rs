use crate::entity::Direction;
use crate::game::{Game, FLASH_FRAMES};
use crate::renderer::{Input, Renderer};
use crate::scores::ScoreEntry;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io::{self, Write};
use std::time::Duration;

// Animation periods, in rendered frames.
const APPLE_BLINK_HALF: u64 = 4;
const HEAD_GLOW_PERIOD: u64 = 3;
const SPARKLE_PERIOD: u64 = 16;

const LEADERBOARD_ROWS: usize = 10;

pub const MENU_ITEMS: [&str; 3] = ["Play", "High Scores", "Quit"];

/// Crossterm-backed renderer. Owns a reusable frame buffer and cell grid;
/// both are cleared, never reallocated, between frames, and each frame is
/// flushed to stdout in a single write.
pub struct CliRenderer {
    buf: Vec<u8>,
    grid: Vec<u8>,
    sparkle_phase: u64,
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(16 * 1024),
            grid: Vec::new(),
            sparkle_phase: 0,
        }
    }

    fn flush_frame(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(&self.buf)?;
        stdout.flush()
    }

    /// Rasterize the snake and apple into the byte grid. Body segments are
    /// bucketed into four shading zones from head to tail.
    fn fill_grid(&mut self, game: &Game) {
        let len = (game.width * game.height) as usize;
        self.grid.resize(len, b' ');
        self.grid.fill(b' ');

        let body_len = game.snake.len().saturating_sub(1);
        for (i, p) in game.snake.iter().enumerate().skip(1) {
            let zone = if body_len <= 1 {
                0
            } else {
                ((i - 1) * 4 / body_len).min(3)
            };
            self.grid[(p.y * game.width + p.x) as usize] = b'a' + zone as u8;
        }
        let head = game.snake[0];
        self.grid[(head.y * game.width + head.x) as usize] = b'H';
        self.grid[(game.apple.y * game.width + game.apple.x) as usize] = b'@';
    }

    fn queue_border_row(&mut self, row: u16, width: i32) -> io::Result<()> {
        queue!(
            self.buf,
            cursor::MoveTo(0, row),
            Print("  "),
            SetForegroundColor(Color::DarkCyan)
        )?;
        for _ in 0..(width * 2 + 4) {
            queue!(self.buf, Print('#'))?;
        }
        queue!(self.buf, ResetColor, Clear(ClearType::UntilNewLine))?;
        Ok(())
    }

    fn queue_centered(
        &mut self,
        row: u16,
        term_width: u16,
        color: Color,
        bold: bool,
        text: &str,
    ) -> io::Result<()> {
        let col = (term_width.saturating_sub(text.len() as u16)) / 2;
        queue!(self.buf, cursor::MoveTo(col, row))?;
        if bold {
            queue!(self.buf, SetAttribute(Attribute::Bold))?;
        }
        queue!(
            self.buf,
            SetForegroundColor(color),
            Print(text),
            SetAttribute(Attribute::Reset)
        )?;
        Ok(())
    }

    fn queue_leaderboard_rows(
        &mut self,
        start_row: u16,
        term_width: u16,
        entries: &[ScoreEntry],
    ) -> io::Result<()> {
        let divider = "-----------------------------";
        self.queue_centered(start_row, term_width, Color::DarkCyan, false, divider)?;
        if entries.is_empty() {
            self.queue_centered(start_row + 1, term_width, Color::Grey, false, "(no scores yet)")?;
        }
        for (i, e) in entries.iter().take(LEADERBOARD_ROWS).enumerate() {
            let line = format!("{:>2}. {}  |  {}", i + 1, e.timestamp, e.score);
            self.queue_centered(start_row + 1 + i as u16, term_width, Color::DarkYellow, false, &line)?;
        }
        let shown = entries.len().clamp(1, LEADERBOARD_ROWS) as u16;
        self.queue_centered(start_row + 1 + shown, term_width, Color::DarkCyan, false, divider)?;
        Ok(())
    }

    fn begin_screen(&mut self) -> io::Result<()> {
        self.buf.clear();
        queue!(self.buf, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        Ok(())
    }
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            Clear(ClearType::All),
            cursor::Hide
        )?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetAttribute(Attribute::Reset),
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn dimensions(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<Input>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        if let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        {
            if kind != KeyEventKind::Press {
                return Ok(None);
            }
            let input = match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Input::Interrupt)
                }
                KeyCode::Char('q') | KeyCode::Char('Q') => Some(Input::Quit),
                KeyCode::Char('r') | KeyCode::Char('R') => Some(Input::Restart),
                KeyCode::Char('p') | KeyCode::Char('P') => Some(Input::Pause),
                KeyCode::Enter | KeyCode::Char(' ') => Some(Input::Select),
                KeyCode::Up
                | KeyCode::Char('w')
                | KeyCode::Char('W')
                | KeyCode::Char('k')
                | KeyCode::Char('K') => Some(Input::Direction(Direction::Up)),
                KeyCode::Down
                | KeyCode::Char('s')
                | KeyCode::Char('S')
                | KeyCode::Char('j')
                | KeyCode::Char('J') => Some(Input::Direction(Direction::Down)),
                KeyCode::Left
                | KeyCode::Char('a')
                | KeyCode::Char('A')
                | KeyCode::Char('h')
                | KeyCode::Char('H') => Some(Input::Direction(Direction::Left)),
                KeyCode::Right
                | KeyCode::Char('d')
                | KeyCode::Char('D')
                | KeyCode::Char('l')
                | KeyCode::Char('L') => Some(Input::Direction(Direction::Right)),
                _ => None,
            };
            return Ok(input);
        }
        Ok(None)
    }

    fn draw_game(&mut self, game: &Game) -> io::Result<()> {
        if !game.paused {
            self.sparkle_phase += 1;
        }

        let apple_flashing = game.apple_flash > 0;
        let apple_flash_bright = game.apple_flash > FLASH_FRAMES / 2;
        let score_flashing = game.score_flash > 0;
        let score_flash_bright = game.score_flash > FLASH_FRAMES / 2;
        let apple_visible = (game.frame_count / APPLE_BLINK_HALF) % 2 == 0;
        let head_glow = (game.frame_count / HEAD_GLOW_PERIOD) % 2 == 0;
        let sparkling = self.sparkle_phase % SPARKLE_PERIOD == 0;

        self.fill_grid(game);
        self.buf.clear();

        // Top border with the score to its right.
        self.queue_border_row(0, game.width)?;
        let score_color = if score_flashing {
            if score_flash_bright {
                Color::White
            } else {
                Color::Green
            }
        } else {
            Color::DarkYellow
        };
        queue!(
            self.buf,
            cursor::MoveTo((game.width * 2 + 6) as u16, 0),
            SetAttribute(Attribute::Bold),
            SetForegroundColor(score_color),
            Print(format!("Score: {}", game.score)),
            SetAttribute(Attribute::Reset),
            Clear(ClearType::UntilNewLine)
        )?;

        for y in 0..game.height {
            queue!(
                self.buf,
                cursor::MoveTo(0, (y + 1) as u16),
                Print("  "),
                SetForegroundColor(Color::DarkCyan),
                Print("##"),
                ResetColor
            )?;
            let base = (y * game.width) as usize;
            for x in 0..game.width as usize {
                match self.grid[base + x] {
                    b'H' => {
                        let color = if head_glow { Color::Green } else { Color::Cyan };
                        queue!(
                            self.buf,
                            SetAttribute(Attribute::Bold),
                            SetForegroundColor(color),
                            Print("OO"),
                            SetAttribute(Attribute::Reset)
                        )?;
                    }
                    b'a' => queue!(
                        self.buf,
                        SetAttribute(Attribute::Bold),
                        SetForegroundColor(Color::Green),
                        Print("oo"),
                        SetAttribute(Attribute::Reset)
                    )?,
                    b'b' => queue!(
                        self.buf,
                        SetForegroundColor(Color::Green),
                        Print("oo"),
                        ResetColor
                    )?,
                    b'c' => queue!(
                        self.buf,
                        SetForegroundColor(Color::DarkGreen),
                        Print("oo"),
                        ResetColor
                    )?,
                    b'd' => queue!(
                        self.buf,
                        SetAttribute(Attribute::Dim),
                        SetForegroundColor(Color::DarkGreen),
                        Print("oo"),
                        SetAttribute(Attribute::Reset)
                    )?,
                    b'@' => {
                        if apple_flashing {
                            // Fresh spawn: a bright two-phase pop.
                            let color = if apple_flash_bright {
                                Color::White
                            } else {
                                Color::DarkYellow
                            };
                            queue!(
                                self.buf,
                                SetAttribute(Attribute::Bold),
                                SetForegroundColor(color),
                                Print("@@"),
                                SetAttribute(Attribute::Reset)
                            )?;
                        } else if apple_visible {
                            let color = if sparkling { Color::White } else { Color::DarkRed };
                            queue!(
                                self.buf,
                                SetAttribute(Attribute::Bold),
                                SetForegroundColor(color),
                                Print("@@"),
                                SetAttribute(Attribute::Reset)
                            )?;
                        } else {
                            queue!(
                                self.buf,
                                SetAttribute(Attribute::Dim),
                                SetForegroundColor(Color::DarkRed),
                                Print("@@"),
                                SetAttribute(Attribute::Reset)
                            )?;
                        }
                    }
                    _ => queue!(self.buf, Print("  "))?,
                }
            }
            queue!(
                self.buf,
                SetForegroundColor(Color::DarkCyan),
                Print("##"),
                ResetColor,
                Clear(ClearType::UntilNewLine)
            )?;
        }

        self.queue_border_row((game.height + 1) as u16, game.width)?;
        queue!(
            self.buf,
            cursor::MoveTo(0, (game.height + 2) as u16),
            SetForegroundColor(Color::DarkCyan),
            Print("  Move: WASD/HJKL/Arrows | P: Pause | R: Restart | Q: Quit"),
            ResetColor,
            Clear(ClearType::UntilNewLine)
        )?;

        if game.paused {
            let msg = "  PAUSED -- Press P to resume  ";
            let row = (1 + game.height / 2) as u16;
            let col = (4 + (game.width * 2 - msg.len() as i32).max(0) / 2) as u16;
            queue!(
                self.buf,
                cursor::MoveTo(col, row),
                SetAttribute(Attribute::Bold),
                SetAttribute(Attribute::Reverse),
                SetForegroundColor(Color::DarkYellow),
                Print(msg),
                SetAttribute(Attribute::Reset)
            )?;
        }

        self.flush_frame()
    }

    fn draw_menu(&mut self, selected: usize) -> io::Result<()> {
        self.begin_screen()?;
        let (tw, _) = self.dimensions()?;
        let border = "=============================";

        self.queue_centered(2, tw, Color::DarkCyan, false, border)?;
        self.queue_centered(3, tw, Color::Green, true, "V  S  N  A  K  E")?;
        self.queue_centered(4, tw, Color::DarkCyan, false, border)?;

        for (i, item) in MENU_ITEMS.iter().enumerate() {
            let row = 7 + 2 * i as u16;
            if i == selected {
                let line = format!("> {item} <");
                let col = (tw.saturating_sub(line.len() as u16)) / 2;
                queue!(
                    self.buf,
                    cursor::MoveTo(col, row),
                    SetAttribute(Attribute::Bold),
                    SetAttribute(Attribute::Reverse),
                    SetForegroundColor(Color::Green),
                    Print(line),
                    SetAttribute(Attribute::Reset)
                )?;
            } else {
                self.queue_centered(row, tw, Color::Grey, false, item)?;
            }
        }

        self.queue_centered(
            14,
            tw,
            Color::DarkCyan,
            false,
            "Up/Down to choose | Enter to select | Q to quit",
        )?;
        self.flush_frame()
    }

    fn draw_leaderboard(&mut self, entries: &[ScoreEntry]) -> io::Result<()> {
        self.begin_screen()?;
        let (tw, _) = self.dimensions()?;

        self.queue_centered(2, tw, Color::DarkCyan, true, "Top Scores")?;
        self.queue_leaderboard_rows(4, tw, entries)?;
        let shown = entries.len().clamp(1, LEADERBOARD_ROWS) as u16;
        self.queue_centered(
            7 + shown,
            tw,
            Color::DarkCyan,
            false,
            "Press any key for the menu | Q to quit",
        )?;
        self.flush_frame()
    }

    fn draw_end_screen(
        &mut self,
        score: u32,
        won: bool,
        entries: &[ScoreEntry],
    ) -> io::Result<()> {
        self.begin_screen()?;
        let (tw, _) = self.dimensions()?;
        let border = "=============================";

        let (title, color) = if won {
            ("Y O U   W I N !", Color::Green)
        } else {
            ("G A M E   O V E R", Color::DarkRed)
        };
        self.queue_centered(2, tw, Color::DarkCyan, false, border)?;
        self.queue_centered(3, tw, color, true, title)?;
        self.queue_centered(4, tw, Color::DarkCyan, false, border)?;

        self.queue_centered(6, tw, Color::DarkYellow, true, &format!("Final Score: {score}"))?;

        self.queue_centered(8, tw, Color::DarkCyan, true, "Top Scores:")?;
        self.queue_leaderboard_rows(9, tw, entries)?;

        let shown = entries.len().clamp(1, LEADERBOARD_ROWS) as u16;
        self.queue_centered(12 + shown, tw, Color::Green, true, "Press [R] for Menu")?;
        self.queue_centered(13 + shown, tw, Color::DarkRed, true, "Press [Q] to Quit")?;
        self.flush_frame()
    }

    fn draw_resized_notice(&mut self) -> io::Result<()> {
        self.begin_screen()?;
        let (tw, _) = self.dimensions()?;
        let border = "==============================";

        self.queue_centered(2, tw, Color::DarkYellow, false, border)?;
        self.queue_centered(3, tw, Color::DarkYellow, true, "Terminal resized during game")?;
        self.queue_centered(4, tw, Color::DarkYellow, false, border)?;
        self.queue_centered(6, tw, Color::Green, false, "Press [R] for Menu")?;
        self.queue_centered(7, tw, Color::DarkRed, false, "Press [Q] to Quit")?;
        self.flush_frame()
    }

    fn draw_too_small(&mut self) -> io::Result<()> {
        self.begin_screen()?;
        queue!(
            self.buf,
            cursor::MoveTo(0, 1),
            SetAttribute(Attribute::Bold),
            SetForegroundColor(Color::DarkRed),
            Print("  Terminal too small!"),
            SetAttribute(Attribute::Reset),
            cursor::MoveTo(0, 2),
            SetForegroundColor(Color::DarkYellow),
            Print(format!(
                "  Minimum size: {} x {}",
                crate::app::MIN_TERM_WIDTH,
                crate::app::MIN_TERM_HEIGHT
            )),
            ResetColor,
            cursor::MoveTo(0, 4),
            Print("  Please resize your terminal,"),
            cursor::MoveTo(0, 5),
            Print("  then press [R] to retry or [Q] to quit.")
        )?;
        self.flush_frame()
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
