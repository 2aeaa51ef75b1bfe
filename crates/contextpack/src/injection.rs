use tb_domain::chat::Turn;

/// Header separating the system block from the rendered history.
pub const HISTORY_HEADER: &str = "Conversation History:";

/// Render a single turn as `"<label>: <content>\n"`.
pub fn format_turn(turn: &Turn) -> String {
    format!("{}: {}\n", turn.role.prompt_label(), turn.content)
}

/// Render the trailing user message plus the cue the model completes.
pub fn format_user_cue(message: &str) -> String {
    format!("User: {message}\nAI:")
}
