use crate::entity::Direction;
use crate::game::{Game, Outcome};
use crate::input::InputDirector;
use crate::renderer::{Input, Renderer};
use crate::scheduler::StepScheduler;
use crate::scores::ScoreStore;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub const MIN_TERM_WIDTH: u16 = 30;
pub const MIN_TERM_HEIGHT: u16 = 16;
pub const MIN_BOARD_WIDTH: i32 = 10;
pub const MIN_BOARD_HEIGHT: i32 = 10;

/// Wall-clock budget for one loop iteration. Caps the render rate and bounds
/// how long an interrupt can go unnoticed; the simulation step rate is
/// governed separately by the scheduler.
pub const FRAME_BUDGET: Duration = Duration::from_millis(33);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Playing,
    Leaderboard,
    Ended { score: u32, won: bool },
    Resized,
    TooSmall,
    Exit,
}

/// Board dimensions carved out of the terminal: two columns per cell, with
/// margins for the border, score line and instructions.
pub fn board_size(term_width: u16, term_height: u16) -> (i32, i32) {
    let width = ((i32::from(term_width) - 6) / 2).max(MIN_BOARD_WIDTH);
    let height = (i32::from(term_height) - 6).max(MIN_BOARD_HEIGHT);
    (width, height)
}

pub struct App<R: Renderer> {
    renderer: R,
    store: ScoreStore,
    interrupted: Arc<AtomicBool>,
    menu_selection: usize,
}

impl<R: Renderer> App<R> {
    pub fn new(renderer: R, store: ScoreStore, interrupted: Arc<AtomicBool>) -> Self {
        Self {
            renderer,
            store,
            interrupted,
            menu_selection: 0,
        }
    }

    fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }

    pub fn run(&mut self) -> io::Result<()> {
        self.renderer.init()?;
        let mut state = AppState::Menu;
        loop {
            state = match state {
                AppState::Menu => self.run_menu()?,
                AppState::Playing => self.run_session()?,
                AppState::Leaderboard => self.run_leaderboard()?,
                AppState::Ended { score, won } => self.run_end_screen(score, won)?,
                AppState::Resized => self.run_resized()?,
                AppState::TooSmall => self.run_too_small()?,
                AppState::Exit => break,
            };
        }
        self.renderer.cleanup()
    }

    fn run_menu(&mut self) -> io::Result<AppState> {
        loop {
            if self.interrupted() {
                return Ok(AppState::Exit);
            }
            self.renderer.draw_menu(self.menu_selection)?;
            match self.renderer.poll_input(FRAME_BUDGET)? {
                Some(Input::Direction(Direction::Up)) => {
                    self.menu_selection =
                        (self.menu_selection + crate::cli_renderer::MENU_ITEMS.len() - 1)
                            % crate::cli_renderer::MENU_ITEMS.len();
                }
                Some(Input::Direction(Direction::Down)) => {
                    self.menu_selection =
                        (self.menu_selection + 1) % crate::cli_renderer::MENU_ITEMS.len();
                }
                Some(Input::Select) => {
                    return Ok(match self.menu_selection {
                        0 => AppState::Playing,
                        1 => AppState::Leaderboard,
                        _ => AppState::Exit,
                    });
                }
                Some(Input::Quit) | Some(Input::Interrupt) => return Ok(AppState::Exit),
                _ => {}
            }
        }
    }

    fn run_leaderboard(&mut self) -> io::Result<AppState> {
        let entries = self.store.load();
        self.renderer.draw_leaderboard(&entries)?;
        loop {
            if self.interrupted() {
                return Ok(AppState::Exit);
            }
            match self.renderer.poll_input(FRAME_BUDGET)? {
                Some(Input::Quit) | Some(Input::Interrupt) => return Ok(AppState::Exit),
                Some(_) => return Ok(AppState::Menu),
                None => {}
            }
        }
    }

    /// One play-through. A fresh session aggregate is built on entry and
    /// nothing of it survives the transition out.
    fn run_session(&mut self) -> io::Result<AppState> {
        let (term_width, term_height) = self.renderer.dimensions()?;
        if term_width < MIN_TERM_WIDTH || term_height < MIN_TERM_HEIGHT {
            return Ok(AppState::TooSmall);
        }
        let (board_width, board_height) = board_size(term_width, term_height);

        let mut game = Game::new(board_width, board_height);
        let mut director = InputDirector::new(game.direction);
        let mut scheduler = StepScheduler::new();
        let mut last_tick = Instant::now();

        loop {
            let frame_start = Instant::now();

            if self.interrupted() {
                return Ok(AppState::Exit);
            }

            // A resize invalidates the board layout; the session ends without
            // finishing the in-flight step.
            if self.renderer.dimensions()? != (term_width, term_height) {
                return Ok(AppState::Resized);
            }

            // Drain everything buffered before any simulation step runs.
            while let Some(input) = self.renderer.poll_input(Duration::ZERO)? {
                match input {
                    Input::Direction(d) => {
                        if !game.paused {
                            director.request(d);
                        }
                    }
                    Input::Pause => {
                        game.paused = !game.paused;
                        if !game.paused {
                            scheduler.reset();
                            last_tick = Instant::now();
                        }
                    }
                    Input::Quit | Input::Restart => return Ok(AppState::Menu),
                    Input::Interrupt => return Ok(AppState::Exit),
                    Input::Select => {}
                }
            }

            let now = Instant::now();
            let elapsed_us = now.duration_since(last_tick).as_micros() as u64;
            last_tick = now;

            if !game.paused {
                let mut interval =
                    StepScheduler::interval_us(game.score, director.pending().is_vertical());
                scheduler.accumulate(elapsed_us, interval);
                while scheduler.consume(interval) {
                    let direction = director.begin_step();
                    game.step(direction);
                    match game.outcome {
                        Outcome::Playing => {}
                        Outcome::Lost | Outcome::Won => {
                            let won = game.outcome == Outcome::Won;
                            let _ = self.store.append(game.score);
                            return Ok(AppState::Ended {
                                score: game.score,
                                won,
                            });
                        }
                    }
                    // Score or heading may have changed on that step.
                    interval =
                        StepScheduler::interval_us(game.score, director.pending().is_vertical());
                }
            }

            game.advance_animation();
            self.renderer.draw_game(&game)?;

            let spent = frame_start.elapsed();
            if spent < FRAME_BUDGET {
                thread::sleep(FRAME_BUDGET - spent);
            }
        }
    }

    fn run_end_screen(&mut self, score: u32, won: bool) -> io::Result<AppState> {
        let entries = self.store.load();
        self.renderer.draw_end_screen(score, won, &entries)?;
        self.wait_for_restart()
    }

    fn run_resized(&mut self) -> io::Result<AppState> {
        self.renderer.draw_resized_notice()?;
        self.wait_for_restart()
    }

    fn run_too_small(&mut self) -> io::Result<AppState> {
        self.renderer.draw_too_small()?;
        self.wait_for_restart()
    }

    /// Terminal screens all exit the same way: restart back to the menu,
    /// quit or interrupt out of the process.
    fn wait_for_restart(&mut self) -> io::Result<AppState> {
        loop {
            if self.interrupted() {
                return Ok(AppState::Exit);
            }
            match self.renderer.poll_input(FRAME_BUDGET)? {
                Some(Input::Restart) | Some(Input::Select) => return Ok(AppState::Menu),
                Some(Input::Quit) | Some(Input::Interrupt) => return Ok(AppState::Exit),
                _ => {}
            }
        }
    }
}
