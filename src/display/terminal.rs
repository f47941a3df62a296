use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::frame_loop::{FrameLoop, FrameStep, FrameTick, LoopStats, StepControl};
use crate::app::{AppState, InputEvent, KeyAction};
use crate::config::Config;
use crate::visualizer::render_app;

/// How long the reader thread waits for an event before rechecking cancellation
const INPUT_POLL: Duration = Duration::from_millis(50);
const INPUT_QUEUE: usize = 256;

/// Runs the interactive session. `config_path` is where the save key writes preferences.
pub async fn run(config: Config, config_path: Option<PathBuf>) -> Result<LoopStats> {
    let mut terminal = match setup_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture);
            return Err(e);
        }
    };

    let result = run_app(&mut terminal, config, config_path).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.clear()?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    config: Config,
    config_path: Option<PathBuf>,
) -> Result<LoopStats> {
    let mut state = AppState::new(&config);
    state.set_config_path(config_path);
    let size = terminal.size()?;
    state.resize(Rect::new(0, 0, size.width, size.height));

    let (input_tx, input_rx) = mpsc::channel(INPUT_QUEUE);
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let reader = spawn_input_reader(input_tx, cancel_rx.clone());

    let frame_loop = FrameLoop::new(config.display.fps);
    let mut step = TerminalStep { terminal, state };
    let result = frame_loop.run(&mut step, input_rx, cancel_rx).await;

    let _ = cancel_tx.send(true);
    if let Err(e) = reader.await {
        warn!("Input reader failed: {}", e);
    }
    result
}

/// Reads terminal events on a blocking thread and forwards them to the loop
fn spawn_input_reader(
    tx: mpsc::Sender<InputEvent>,
    cancel: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || loop {
        if *cancel.borrow() || tx.is_closed() {
            break;
        }
        match event::poll(INPUT_POLL) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if let Some(input) = translate(ev) {
                        if tx.blocking_send(input).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    warn!("Failed to read terminal event: {}", e);
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                warn!("Failed to poll terminal events: {}", e);
                break;
            }
        }
    })
}

/// Maps a crossterm event to application input. Events the app does not use map to `None`.
pub fn translate(ev: Event) -> Option<InputEvent> {
    match ev {
        Event::Key(key) if key.kind != KeyEventKind::Release => translate_key(key).map(InputEvent::Key),
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<KeyAction> {
    let action = match key {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } => KeyAction::Quit,
        KeyEvent { code, .. } => match code {
            KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') => KeyAction::Reset,
            KeyCode::Char('t') => KeyAction::ToggleTheme,
            KeyCode::Char('h') => KeyAction::ToggleHelp,
            KeyCode::Char('s') => KeyAction::SavePrefs,
            KeyCode::Left => KeyAction::Orbit { left: 1, up: 0 },
            KeyCode::Right => KeyAction::Orbit { left: -1, up: 0 },
            KeyCode::Up => KeyAction::Orbit { left: 0, up: 1 },
            KeyCode::Down => KeyAction::Orbit { left: 0, up: -1 },
            _ => return None,
        },
    };
    Some(action)
}

fn translate_mouse(mouse: MouseEvent) -> Option<InputEvent> {
    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::PointerDown { col, row }),
        MouseEventKind::Drag(MouseButton::Left) => Some(InputEvent::PointerMove { col, row }),
        MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::PointerUp { col, row }),
        MouseEventKind::ScrollUp => Some(InputEvent::Scroll { col, row, steps: 1 }),
        MouseEventKind::ScrollDown => Some(InputEvent::Scroll { col, row, steps: -1 }),
        _ => None,
    }
}

struct TerminalStep<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    state: AppState,
}

impl<B: Backend> FrameStep for TerminalStep<'_, B> {
    type Input = InputEvent;

    fn input(&mut self, input: InputEvent) -> StepControl {
        let control = self.state.handle_input(input);
        if control == StepControl::Stop {
            info!("Quit requested");
        }
        control
    }

    fn frame(&mut self, tick: FrameTick) -> Result<StepControl> {
        let changes = self.state.update();
        if changes.geometry_changed {
            trace!("Frame {}: aid buffers re-read", tick.frame);
        }
        if tick.frame == 0 {
            debug!("First frame after {:?}", tick.elapsed);
        }

        let state = &self.state;
        self.terminal.draw(|frame| render_app(frame, state))?;
        Ok(StepControl::Continue)
    }
}
