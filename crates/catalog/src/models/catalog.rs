//! Catalog and context models.
//!
//! A catalog is an ordered sequence of contexts; a context is an ordered
//! sequence of messages. Order is significant: it is what the writer emits.

use serde::{Deserialize, Serialize};

use super::message::Message;
use crate::services::plural::PluralRule;

/// Default TS format version written by current lupdate.
pub const TS_VERSION: &str = "2.1";

/// A named group of messages, typically one per UI component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    pub messages: Vec<Message>,
}

impl Context {
    /// Create an empty context.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
        }
    }

    /// Append a message (builder style).
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Find a message by source text and disambiguation comment.
    ///
    /// An empty comment matches messages without one.
    pub fn find(&self, source: &str, comment: &str) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.source == source && m.comment_str() == comment)
    }
}

/// A whole translation file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: String,
    /// Target language tag, e.g. `fr_FR`.
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    pub contexts: Vec<Context>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            version: TS_VERSION.to_string(),
            language: String::new(),
            source_language: None,
            contexts: Vec::new(),
        }
    }
}

impl Catalog {
    /// Create an empty catalog for a target language.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Default::default()
        }
    }

    /// Append a context (builder style).
    pub fn with_context(mut self, context: Context) -> Self {
        self.contexts.push(context);
        self
    }

    /// Look up a context by name.
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Find a message by context, source, and comment.
    pub fn find(&self, context: &str, source: &str, comment: &str) -> Option<&Message> {
        self.context(context).and_then(|c| c.find(source, comment))
    }

    /// Iterate over every message with its context, in file order.
    pub fn messages(&self) -> impl Iterator<Item = (&Context, &Message)> {
        self.contexts
            .iter()
            .flat_map(|c| c.messages.iter().map(move |m| (c, m)))
    }

    /// Total number of messages.
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    /// Plural rule for the target language.
    pub fn plural_rule(&self) -> PluralRule {
        PluralRule::for_language(&self.language)
    }
}
