mod driver;
mod settings;
mod terminal;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use driver::SharedWorld;
use settings::Settings;
use shared::SimConfig;
use sim::{FileStorage, World};
use std::fs::OpenOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const INPUT_POLL: Duration = Duration::from_millis(100);
const FPS_STEP: u32 = 5;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env()?;
    std::fs::create_dir_all(&settings.data_dir)
        .with_context(|| format!("Failed to create {}", settings.data_dir.display()))?;

    // Log to a file; stdout belongs to the UI
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(settings.data_dir.join("snakefield.log"))
        .context("Failed to open log file")?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snakefield=info,sim=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(log_file)),
        )
        .init();

    tracing::info!("Starting snakefield");
    tracing::info!("Data directory: {}", settings.data_dir.display());

    let terminal = terminal::enter()?;
    let result = run(settings, terminal).await;
    terminal::leave();

    if let Err(e) = &result {
        tracing::error!("Exiting with error: {:#}", e);
    }
    result
}

async fn run(
    settings: Settings,
    terminal: ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
) -> Result<()> {
    let storage = FileStorage::new(&settings.data_dir);

    let (cols, rows) = crossterm::terminal::size().context("Failed to read terminal size")?;
    let (width, height) = terminal::field_size(cols, rows);
    let world: SharedWorld = Arc::new(Mutex::new(World::load(
        settings.sim.clone(),
        width,
        height,
        &storage,
    )));

    let mut screen = terminal::Screen::new(terminal);
    let frames = driver::spawn_frames(Arc::clone(&world), move |world| {
        if let Err(e) = screen.show(world) {
            tracing::error!("Failed to draw frame: {}", e);
        }
    });
    let saver = driver::spawn_saver(Arc::clone(&world), storage.clone(), settings.save_interval);

    let mut resume_fps = settings.sim.fps.max(1);
    let outcome = loop {
        let event = match next_event().await {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => break Err(e),
        };

        match event {
            Event::Resize(cols, rows) => {
                let (width, height) = terminal::field_size(cols, rows);
                world.lock().await.resize(width, height);
            }
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let mut world = world.lock().await;
                match command_for(key) {
                    Some(Command::Quit) => break Ok(()),
                    Some(Command::TogglePause) => {
                        let mut config = world.config().clone();
                        if config.fps == 0 {
                            config.fps = resume_fps;
                        } else {
                            resume_fps = config.fps;
                            config.fps = 0;
                        }
                        tracing::info!(fps = config.fps, "Pause toggled");
                        world.update_config(config);
                    }
                    Some(Command::Faster) => {
                        let config = with_fps(world.config(), |fps| {
                            (fps + FPS_STEP).min(SimConfig::MAX_FPS)
                        });
                        world.update_config(config);
                    }
                    Some(Command::Slower) => {
                        let config = with_fps(world.config(), |fps| fps.saturating_sub(FPS_STEP));
                        world.update_config(config);
                    }
                    Some(Command::Save) => {
                        let mut storage = storage.clone();
                        match world.save(&mut storage) {
                            Ok(()) => tracing::info!("Saved on request"),
                            Err(e) => tracing::warn!("Save failed: {}", e),
                        }
                    }
                    Some(Command::Reset) => {
                        tracing::info!("Resetting world");
                        world.clear();
                    }
                    None => {}
                }
            }
            _ => {}
        }
    };

    frames.cancel();
    saver.cancel();

    // Final save so the next start picks up where this one left off
    let mut storage = storage;
    if let Err(e) = world.lock().await.save(&mut storage) {
        tracing::warn!("Final save failed: {}", e);
    }

    outcome
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quit,
    TogglePause,
    Faster,
    Slower,
    Save,
    Reset,
}

fn command_for(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char(' ') => Some(Command::TogglePause),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::Faster),
        KeyCode::Char('-') => Some(Command::Slower),
        KeyCode::Char('s') => Some(Command::Save),
        KeyCode::Char('r') => Some(Command::Reset),
        _ => None,
    }
}

fn with_fps(config: &SimConfig, change: impl FnOnce(u32) -> u32) -> SimConfig {
    let mut config = config.clone();
    config.fps = change(config.fps);
    config
}

/// Wait briefly for a terminal event without blocking the runtime
async fn next_event() -> Result<Option<Event>> {
    tokio::task::spawn_blocking(|| -> Result<Option<Event>> {
        if event::poll(INPUT_POLL).context("Failed to poll terminal events")? {
            Ok(Some(event::read().context("Failed to read terminal event")?))
        } else {
            Ok(None)
        }
    })
    .await
    .context("Input task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(command_for(key(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(command_for(key(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(
            command_for(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(command_for(key(KeyCode::Char('c'))), None);
        assert_eq!(command_for(key(KeyCode::Char(' '))), Some(Command::TogglePause));
        assert_eq!(command_for(key(KeyCode::Char('+'))), Some(Command::Faster));
        assert_eq!(command_for(key(KeyCode::Char('-'))), Some(Command::Slower));
        assert_eq!(command_for(key(KeyCode::Char('s'))), Some(Command::Save));
        assert_eq!(command_for(key(KeyCode::Char('r'))), Some(Command::Reset));
    }

    #[test]
    fn test_with_fps() {
        let config = SimConfig::default();
        assert_eq!(with_fps(&config, |fps| fps + 5).fps, 20);
        assert_eq!(with_fps(&config, |fps| fps.saturating_sub(50)).fps, 0);
        assert_eq!(with_fps(&config, |fps| fps + 5).snake_count, config.snake_count);
    }
}
