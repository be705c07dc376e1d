use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use vsnake::{App, CliRenderer, ScoreStore};

fn main() -> io::Result<()> {
    // Shared cancellation flag: set by SIGINT/SIGTERM here, and by a Ctrl+C
    // key event once the terminal is in raw mode. Every loop polls it.
    let interrupted = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed))
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let renderer = CliRenderer::new();
    let store = ScoreStore::open_default();
    App::new(renderer, store, interrupted).run()
}
