//! Assist menu and AI body revisions

use std::rc::Rc;

use crate::ai::{AiCommand, AiEvent, AssistRequest, AssistSelection, RequestId};
use crate::app::state::Modal;
use crate::compose::DraftField;
use crate::ui::theme::symbols;

use super::super::App;

impl App {
    /// Open the assist menu under the AI button, or close it if open
    pub(crate) fn toggle_assist_menu(&mut self) {
        if self.ai_menu.close() {
            return;
        }

        let anchor = self.composer_layout().and_then(|layout| layout.ai_button);
        let dismissed = Rc::clone(&self.menu_dismissed);
        let opened = self
            .ai_menu
            .open(anchor, self.viewport, &self.pointer_bus, move || {
                dismissed.set(true)
            });

        if !opened {
            self.state.set_error("Window too narrow for the assist menu");
        }
    }

    /// Act on a menu entry. The menu closes in every case.
    pub(crate) async fn run_assist_selection(&mut self, selection: AssistSelection) {
        self.ai_menu.close();

        if !self.state.assist.enabled {
            let reason = if self.config.ai.enable_assist {
                "AI assist not configured"
            } else {
                "AI assist is disabled in config"
            };
            self.state.set_error(reason);
            return;
        }

        let Some(draft) = self.state.draft() else {
            return;
        };

        match selection {
            AssistSelection::Prompt => {
                self.state.modal = Modal::AssistPrompt {
                    input: String::new(),
                };
            }
            AssistSelection::Proofread => {
                if draft.body.trim().is_empty() {
                    self.state.modal = Modal::Notice("Nothing to proofread".to_string());
                    return;
                }
                let request = AssistRequest::Proofread {
                    body: draft.body.clone(),
                };
                self.request_revision(request).await;
            }
        }
    }

    pub(super) async fn submit_assist_prompt(&mut self) {
        let Modal::AssistPrompt { input } = &self.state.modal else {
            return;
        };
        let instruction = input.trim().to_string();
        if instruction.is_empty() {
            return;
        }
        self.state.modal = Modal::None;

        let body = self
            .state
            .draft()
            .map(|draft| draft.body.clone())
            .unwrap_or_default();
        self.request_revision(AssistRequest::Prompt { instruction, body })
            .await;
    }

    pub(super) fn cancel_assist_prompt(&mut self) {
        if matches!(self.state.modal, Modal::AssistPrompt { .. }) {
            self.state.modal = Modal::None;
        }
    }

    /// Fire-and-forget; a newer request supersedes any pending one
    async fn request_revision(&mut self, request: AssistRequest) {
        let Some(ref ai) = self.ai_actor else {
            self.state.set_error("AI assist not configured");
            return;
        };

        self.next_request_id += 1;
        let request_id = RequestId(self.next_request_id);
        let kind = request.kind();

        if ai
            .cmd_tx
            .send(AiCommand::Assist {
                request_id,
                request,
            })
            .await
            .is_err()
        {
            tracing::error!("AI actor is gone, dropping {} request", kind);
            self.state.set_error("AI assist unavailable");
            return;
        }

        self.state.assist.pending = Some(request_id);
        self.state
            .set_status(format!("{} Working on it ({})...", symbols::ASSIST, kind));
    }

    /// Drain finished requests. Returns true if any arrived.
    pub(crate) fn process_ai_events(&mut self) -> bool {
        let Some(ref mut ai) = self.ai_actor else {
            return false;
        };

        let mut events = Vec::new();
        while let Ok(event) = ai.event_rx.try_recv() {
            events.push(event);
        }

        let had_events = !events.is_empty();
        for event in events {
            self.apply_ai_event(event);
        }
        had_events
    }

    /// Only the latest request for the open draft may touch the body
    pub(crate) fn apply_ai_event(&mut self, event: AiEvent) {
        match event {
            AiEvent::Revised { request_id, body } => {
                if self.state.assist.pending != Some(request_id) {
                    tracing::debug!("Discarding stale AI result {:?}", request_id);
                    return;
                }
                self.state.assist.pending = None;
                if let Some(draft) = self.state.draft_mut() {
                    draft.set_field(DraftField::Body, body);
                    self.state.set_status("Body updated");
                }
            }
            AiEvent::Failed { request_id, error } => {
                if self.state.assist.pending != Some(request_id) {
                    return;
                }
                self.state.assist.pending = None;
                tracing::warn!("{}", error);
                self.state.set_error(error);
            }
        }
    }
}
