//! Prompt composition: persona + recent history + new user message

use crate::models::{ChatRole, ChatTurn};

use super::persona::{Persona, USER_LABEL};

/// How many of the most recent turns are carried into the prompt
pub const MAX_HISTORY_TURNS: usize = 6;

const SEPARATOR: &str = "===========================";

/// Build the single prompt string sent to the provider
///
/// The history block is always present, even when empty, so the layout is
/// identical with or without prior turns. Output is a pure function of the
/// inputs.
pub fn compose_prompt(persona: &Persona, history: &[ChatTurn], message: &str) -> String {
    let history_text = render_history(persona, history);

    format!(
        "\n{system}\n\n{SEPARATOR}\nConversation so far:\n{history_text}\n{SEPARATOR}\n\n{USER_LABEL}: {message}\n\n{name}:\n",
        system = persona.system_prompt,
        name = persona.name,
    )
}

/// Render the last `MAX_HISTORY_TURNS` turns, one `Label: text` line each
fn render_history(persona: &Persona, history: &[ChatTurn]) -> String {
    let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    history[start..]
        .iter()
        .map(|turn| {
            let label = match turn.role {
                ChatRole::User => USER_LABEL,
                ChatRole::Assistant => persona.name.as_str(),
            };
            format!("{}: {}", label, turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
