//! Interactive terminal UI.

mod app;
mod browser;
mod theme;
mod view;

use std::io::{self, Stdout};
use std::sync::mpsc::{self, Sender};
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use self::app::{App, Job, Message};
use crate::config::Config;

const TICK: Duration = Duration::from_millis(100);

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Run the TUI until the user quits.
pub fn run() -> anyhow::Result<()> {
    let mut app = App::new(Config::load_or_default(), None);

    install_panic_hook();
    let mut terminal = enter().context("initializing terminal")?;
    if let Ok(size) = terminal.size() {
        app.height = size.height;
    }

    let result = event_loop(&mut terminal, &mut app);

    leave().context("restoring terminal")?;
    terminal.show_cursor()?;
    result
}

fn enter() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn leave() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

/// Restore the terminal before the default hook prints the panic.
fn install_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = leave();
        hook(info);
    }));
}

fn event_loop(terminal: &mut Tui, app: &mut App) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal.draw(|frame| view::render(frame, app))?;

        let timeout = TICK.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(job) = app.handle_key(key) {
                        spawn(job, tx.clone());
                    }
                }
                Event::Resize(_, height) => app.height = height,
                _ => {}
            }
        }

        while let Ok(message) = rx.try_recv() {
            app.on_message(message);
        }

        if last_tick.elapsed() >= TICK {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

fn spawn(job: Job, tx: Sender<Message>) {
    tracing::debug!(?job, "starting conversion");
    std::thread::spawn(move || {
        // The receiver is gone only if the UI already quit.
        let _ = tx.send(job.run());
    });
}
