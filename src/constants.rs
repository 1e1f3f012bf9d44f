//! Application-wide constants for tuning and configuration

/// Error message display duration in seconds before auto-dismiss.
pub const ERROR_TTL_SECS: u64 = 5;

/// Input poll timeout while an AI request is in flight (ms).
pub const POLL_BUSY_MS: u64 = 50;

/// Input poll timeout when idle (ms).
pub const POLL_IDLE_MS: u64 = 150;

/// Narrowest composer header that still shows the assist button.
/// Below this the button is not mounted and its menu cannot open.
pub const MIN_ASSIST_BUTTON_WIDTH: u16 = 40;

/// Attachment rows shown before the panel stops growing.
pub const MAX_ATTACHMENT_ROWS: u16 = 4;

/// Environment variable that overrides `[ai] api_key`.
pub const AI_KEY_ENV: &str = "POSTA_AI_KEY";

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Sent as `X-Title` so requests are attributed to the app.
pub const AI_APP_TITLE: &str = "posta";
