use ratatui::Frame;

use super::composer::render_composer;
use super::home::render_home;
use crate::app::state::{AppState, View};

pub fn render(frame: &mut Frame, state: &AppState) {
    match &state.view {
        View::Home => render_home(frame, state),
        View::Composer { draft, field } => render_composer(frame, state, draft, *field),
    }
}
