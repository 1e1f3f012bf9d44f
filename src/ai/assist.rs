//! What the assist menu offers and what gets sent to the model

use super::prompts;

/// An entry chosen from the assist menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistSelection {
    /// Write or rewrite the body from a typed instruction
    Prompt,
    Proofread,
}

impl AssistSelection {
    pub const ALL: [AssistSelection; 2] = [Self::Prompt, Self::Proofread];

    pub fn label(self) -> &'static str {
        match self {
            Self::Prompt => "Write with prompt",
            Self::Proofread => "Proofread",
        }
    }
}

/// A single body revision request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistRequest {
    Prompt { instruction: String, body: String },
    Proofread { body: String },
}

impl AssistRequest {
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::Prompt { .. } => prompts::PROMPT_SYSTEM,
            Self::Proofread { .. } => prompts::PROOFREAD_SYSTEM,
        }
    }

    pub fn user_content(&self) -> String {
        match self {
            Self::Prompt { instruction, body } if body.trim().is_empty() => {
                format!("Instruction: {}", instruction)
            }
            Self::Prompt { instruction, body } => {
                format!("Instruction: {}\n\nCurrent draft:\n{}", instruction, body)
            }
            Self::Proofread { body } => body.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Prompt { .. } => "prompt",
            Self::Proofread { .. } => "proofread",
        }
    }
}
