pub mod app;
pub mod cli_renderer;
pub mod entity;
pub mod game;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod scores;

pub use app::{App, AppState};
pub use cli_renderer::CliRenderer;
pub use entity::{Direction, Point};
pub use game::{Game, Outcome};
pub use input::InputDirector;
pub use renderer::{Input, Renderer};
pub use scheduler::StepScheduler;
pub use scores::{ScoreEntry, ScoreStore};
