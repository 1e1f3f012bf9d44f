mod app;
mod components;
pub mod composer;
mod home;
mod modals;
pub mod overlay;
pub mod theme;
mod widgets;

pub use app::render;
