//! Application core - owns the composer session and coordinates the actors

mod actions;
mod event_loop;
pub mod render_thread;
pub mod state;

use anyhow::Result;
use ratatui::layout::{Rect, Size};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use render_thread::RenderThread;

use crate::ai::{AiActorHandle, AiCommand, AssistSelection, OpenRouterClient, spawn_ai_actor};
use crate::compose::DraftSeed;
use crate::config::Config;
use crate::input::{Action, KeyBindings};
use crate::mail::Outbox;
use crate::ui::composer::ComposerLayout;
use crate::ui::overlay::{AnchoredOverlay, OverlayEntry, PointerBus};
use state::{AppState, AssistState, KeyHints};

pub struct App {
    pub(crate) config: Config,
    pub(crate) state: AppState,
    pub(crate) bindings: KeyBindings,
    /// Capture-phase listeners for pointer-down events
    pub(crate) pointer_bus: PointerBus,
    /// Assist menu anchored under the composer's AI button
    pub(crate) ai_menu: AnchoredOverlay<AssistSelection>,
    /// Set by the menu's outside-click listener
    pub(crate) menu_dismissed: Rc<Cell<bool>>,
    /// AI actor handle (None if assist is disabled)
    pub(crate) ai_actor: Option<AiActorHandle>,
    pub(crate) next_request_id: u64,
    pub(crate) outbox: Outbox,
    /// Last directory the file browser attached from
    pub(crate) browse_dir: Option<PathBuf>,
    /// Seed for the first draft, consumed when it is applied
    pub(crate) seed: Option<DraftSeed>,
    pub(crate) viewport: Size,
    /// Dirty flag: when true, UI needs re-render
    pub(crate) dirty: bool,
}

impl App {
    pub fn new(config: Config, seed: Option<DraftSeed>) -> Result<Self> {
        let bindings = KeyBindings::new(&config.ui.keybinding_mode);

        let ai_actor = if config.ai.is_enabled() {
            config.ai.api_key().map(|api_key| {
                let client = OpenRouterClient::new(api_key, config.ai.model.clone());
                spawn_ai_actor(client, config.ai.max_tokens)
            })
        } else {
            None
        };

        let entries = AssistSelection::ALL
            .into_iter()
            .map(|selection| OverlayEntry::new(selection.label(), selection))
            .collect();
        let ai_menu = AnchoredOverlay::new(entries, config.ui.overlay_gap);

        let from = config.identity.mailbox();
        let outbox = Outbox::new(config.outbox_dir()?, from.clone());

        let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));

        let state = AppState {
            from,
            assist: AssistState {
                enabled: ai_actor.is_some(),
                ..Default::default()
            },
            keys: KeyHints {
                compose: bindings.key_for(Action::Compose).unwrap_or_default(),
                quit: bindings.key_for(Action::Quit).unwrap_or_default(),
            },
            ..Default::default()
        };

        let mut app = Self {
            config,
            state,
            bindings,
            pointer_bus: PointerBus::new(),
            ai_menu,
            menu_dismissed: Rc::new(Cell::new(false)),
            ai_actor,
            next_request_id: 0,
            outbox,
            browse_dir: None,
            seed,
            viewport: Size::new(width, height),
            dirty: true,
        };

        // Start straight in the composer
        app.start_compose();

        Ok(app)
    }

    pub async fn run(&mut self) -> Result<()> {
        // Spawn background render thread (owns terminal setup/teardown)
        let render_thread = RenderThread::spawn()?;

        let result = self.event_loop(&render_thread).await;

        // Shutdown render thread (handles terminal cleanup)
        render_thread.shutdown();

        if let Some(ref ai) = self.ai_actor {
            ai.cmd_tx.try_send(AiCommand::Shutdown).ok();
        }

        result
    }

    /// Composer layout for the current viewport, if composing
    pub(crate) fn composer_layout(&self) -> Option<ComposerLayout> {
        let area = Rect::new(0, 0, self.viewport.width, self.viewport.height);
        self.state
            .draft()
            .map(|draft| ComposerLayout::compute(area, draft))
    }

    /// Follow the assist button and copy the menu into the render snapshot
    pub(crate) fn sync_overlay(&mut self) {
        let anchor = self.composer_layout().and_then(|layout| layout.ai_button);
        self.ai_menu.reposition(anchor, self.viewport);
        self.state.assist.menu = self.ai_menu.view();
    }
}
