//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Asks for a long URL and a query string, shortens, prints the result.

use crate::adapters::ui::progress::spinner;
use crate::domain::{DomainError, LinkData, ShortenOutcome};
use crate::ports::InputPort;
use crate::usecases::ShortenService;
use async_trait::async_trait;
use inquire::error::InquireError;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::Text;
use std::sync::Arc;

pub fn apply_theme() {
    let config = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new(">").with_fg(Color::LightCyan));
    inquire::set_global_render_config(config);
}

/// Human-readable line for an outcome.
pub fn describe_outcome(outcome: &ShortenOutcome) -> String {
    match outcome {
        ShortenOutcome::Shortened(url) => format!("Short URL: {}", url),
        ShortenOutcome::Failed(code) => format!("Error {}: {}", code.code(), code),
        ShortenOutcome::Empty => "No short URL returned".to_string(),
    }
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    service: Arc<ShortenService>,
}

impl TuiInputPort {
    pub fn new(service: Arc<ShortenService>) -> Self {
        Self { service }
    }
}

/// `Ok(None)` when the user cancels the prompt.
fn prompt(text: Text<'_, '_>) -> Result<Option<String>, DomainError> {
    match text.prompt() {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(DomainError::Input(e.to_string())),
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let Some(long_url) = prompt(
                Text::new("Long URL:").with_help_message("empty line or Esc to quit"),
            )?
            else {
                break;
            };
            let long_url = long_url.trim();
            if long_url.is_empty() {
                break;
            }

            let Some(query_string) = prompt(
                Text::new("Query string:")
                    .with_default("")
                    .with_help_message("appended verbatim, e.g. ?utm_source=newsletter"),
            )?
            else {
                break;
            };

            let pb = spinner("Shortening...");
            let outcome = self
                .service
                .shorten_link(&LinkData::new(long_url), query_string.trim())
                .await;
            pb.finish_and_clear();

            println!("{}", describe_outcome(&outcome));
        }
        Ok(())
    }
}
