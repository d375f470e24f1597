//! Generative-text assistant.
//!
//! Writes product descriptions for the admin form and answers shopper
//! questions in the chat widget. Every failure ends in a fixed fallback
//! string: callers of [`Assistant`] never see an error.
//!
//! # Backends
//!
//! - [`GeminiClient`] - Google Gemini `generateContent`
//! - [`ConfiguredGenerator::Disabled`] - no API key; every call fails with
//!   [`AssistantError::MissingApiKey`]

mod client;
mod error;
pub mod types;

use std::fmt::Write as _;
use std::future::Future;

pub use client::GeminiClient;
pub use error::{ApiError, ApiErrorResponse, AssistantError};

use crate::config::GeminiConfig;
use crate::models::Product;

/// Reply when a description request produced no text.
pub const EMPTY_DESCRIPTION: &str = "No description generated.";

/// Description used when generation fails.
pub const FALLBACK_DESCRIPTION: &str =
    "Discover our new premium-quality product, designed to delight you every day.";

/// Chat reply when the model produced no text.
pub const EMPTY_CHAT_REPLY: &str = "Sorry, I couldn't come up with an answer.";

/// Chat reply when no API key is configured.
pub const CHAT_UNAVAILABLE: &str = "The AI assistant is temporarily unavailable (missing API key).";

/// Chat reply for any other failure.
pub const CHAT_ERROR: &str = "An error occurred while talking to the AI.";

/// Number of catalog products described to the chat model.
pub const CHAT_CONTEXT_PRODUCTS: usize = 10;

/// A single text-generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// User prompt.
    pub prompt: String,
    /// System prompt, if any.
    pub system_instruction: Option<String>,
}

/// Something that turns a prompt into text.
pub trait TextGenerator: Send + Sync {
    /// Generate text for `request`.
    ///
    /// Returns the trimmed text; an empty string means the model answered
    /// with nothing.
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<String, AssistantError>> + Send;
}

/// The generator selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredGenerator {
    /// Gemini with a configured API key.
    Gemini(GeminiClient),
    /// No API key configured.
    Disabled,
}

impl ConfiguredGenerator {
    /// Build the generator for `config`. `None` disables generation.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError` if the Gemini client cannot be built.
    pub fn from_config(config: Option<&GeminiConfig>) -> Result<Self, AssistantError> {
        match config {
            Some(config) => Ok(Self::Gemini(GeminiClient::new(config)?)),
            None => {
                tracing::info!("no Gemini API key configured, assistant disabled");
                Ok(Self::Disabled)
            }
        }
    }
}

impl TextGenerator for ConfiguredGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, AssistantError> {
        match self {
            Self::Gemini(client) => client.generate_content(request).await,
            Self::Disabled => Err(AssistantError::MissingApiKey),
        }
    }
}

/// Fail-closed wrapper over a [`TextGenerator`].
#[derive(Debug, Clone)]
pub struct Assistant<G> {
    generator: G,
}

impl<G: TextGenerator> Assistant<G> {
    /// Wrap a generator.
    #[must_use]
    pub const fn new(generator: G) -> Self {
        Self { generator }
    }

    /// The wrapped generator.
    pub const fn generator(&self) -> &G {
        &self.generator
    }

    /// Write a short sales description for a new product.
    pub async fn describe_product(&self, title: &str, category: &str) -> String {
        let request = GenerationRequest {
            prompt: format!(
                "Write a short, catchy sales description (max 150 characters) for a product \
                 named \"{title}\" in the category \"{category}\"."
            ),
            system_instruction: None,
        };

        match self.generator.generate(request).await {
            Ok(text) if text.is_empty() => EMPTY_DESCRIPTION.to_string(),
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, title, "product description generation failed");
                FALLBACK_DESCRIPTION.to_string()
            }
        }
    }

    /// Answer a shopper's chat message about the shop.
    pub async fn chat_reply(&self, message: &str, products: &[Product], shop_name: &str) -> String {
        let request = GenerationRequest {
            prompt: message.to_string(),
            system_instruction: Some(chat_instruction(products, shop_name)),
        };

        match self.generator.generate(request).await {
            Ok(text) if text.is_empty() => EMPTY_CHAT_REPLY.to_string(),
            Ok(text) => text,
            Err(AssistantError::MissingApiKey) => CHAT_UNAVAILABLE.to_string(),
            Err(e) => {
                tracing::error!(error = %e, "chat reply generation failed");
                CHAT_ERROR.to_string()
            }
        }
    }
}

/// System prompt for the chat: the shop name and up to
/// [`CHAT_CONTEXT_PRODUCTS`] catalog entries.
#[must_use]
pub fn chat_instruction(products: &[Product], shop_name: &str) -> String {
    let mut context = String::new();
    for product in products.iter().take(CHAT_CONTEXT_PRODUCTS) {
        if !context.is_empty() {
            context.push('\n');
        }
        let _ = write!(
            context,
            "- {} ({}): {}€.",
            product.title,
            product.category,
            product.price.amount().normalize()
        );
    }

    format!(
        "You are the virtual sales assistant for the shop \"{shop_name}\".\n\
         Here are the available products:\n\
         {context}\n\
         Answer politely and concisely."
    )
}
