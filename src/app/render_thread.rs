//! Background render thread.
//!
//! The render thread owns the terminal and draws snapshots of `AppState`
//! sent from the event loop, so a slow terminal never delays input,
//! pointer dispatch or AI results.

use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use super::state::AppState;

pub enum RenderCommand {
    Render(Box<AppState>),
    Shutdown,
}

/// Raw mode, alternate screen and mouse capture for as long as it lives
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        // Pointer-down events drive outside-click dismissal of overlays
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            disable_raw_mode().ok();
            return Err(e);
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen).ok();
                disable_raw_mode().ok();
                Err(e)
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .ok();
        self.terminal.show_cursor().ok();
    }
}

/// Handle to the background render thread.
pub struct RenderThread {
    cmd_tx: SyncSender<RenderCommand>,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    /// Spawn the thread; it sets the terminal up and restores it on exit.
    pub fn spawn() -> io::Result<Self> {
        // Capacity 1: only the latest snapshot matters
        let (cmd_tx, cmd_rx) = mpsc::sync_channel::<RenderCommand>(1);

        let handle = thread::Builder::new()
            .name("render".into())
            .spawn(move || render_loop(cmd_rx))?;

        Ok(Self {
            cmd_tx,
            handle: Some(handle),
        })
    }

    /// Queue a snapshot without blocking. Returns false when the frame was
    /// dropped because the thread is still drawing the previous one.
    pub fn render(&self, state: AppState) -> bool {
        match self.cmd_tx.try_send(RenderCommand::Render(Box::new(state))) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Render thread busy, skipping frame");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!("Render thread disconnected");
                true
            }
        }
    }

    /// Stop the thread and wait for the terminal to be restored.
    pub fn shutdown(mut self) {
        let _ = self.cmd_tx.send(RenderCommand::Shutdown);

        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }
}

fn render_loop(cmd_rx: Receiver<RenderCommand>) {
    let mut guard = match TerminalGuard::enter() {
        Ok(guard) => guard,
        Err(e) => {
            tracing::error!("Failed to set up terminal: {}", e);
            return;
        }
    };

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            RenderCommand::Render(state) => {
                if let Err(e) = guard.terminal.draw(|f| crate::ui::render(f, &state)) {
                    tracing::error!("Render error: {}", e);
                }
            }
            RenderCommand::Shutdown => break,
        }
    }
}
