//! Shop assistant chat.

use std::io::Write;

use customshop_storefront::assistant::{Assistant, ConfiguredGenerator, TextGenerator};
use customshop_storefront::config::GeminiConfig;
use customshop_storefront::{AppError, AppState};

use super::{CliError, require_user};

/// Send one message and print the reply.
pub async fn ask(
    state: &AppState,
    out: &mut impl Write,
    message: &str,
    gemini: Option<&GeminiConfig>,
) -> Result<(), CliError> {
    let assistant = Assistant::new(ConfiguredGenerator::from_config(gemini).map_err(AppError::from)?);
    ask_with(state, out, message, &assistant).await
}

async fn ask_with<G: TextGenerator>(
    state: &AppState,
    out: &mut impl Write,
    message: &str,
    assistant: &Assistant<G>,
) -> Result<(), CliError> {
    require_user(state)?;
    if !state.settings().show_chatbot {
        return Err(CliError::ChatDisabled);
    }

    if let Some(reply) = state.send_chat(message, assistant).await? {
        writeln!(out, "{reply}")?;
    }
    Ok(())
}
