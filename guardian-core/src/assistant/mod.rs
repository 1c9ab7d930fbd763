//! The scripted "GuardianNet AI" assistant.
//!
//! There is no model behind it: replies come from an ordered keyword table
//! and arrive after a short artificial typing delay.

pub mod conversation;
pub mod markup;
pub mod rules;

pub use conversation::{Conversation, ConversationTurn, Role};
pub use markup::{render as render_markup, MarkupLine, Span};
pub use rules::{KeywordResponder, KeywordRule, Reply, ReplyCategory, INITIAL_SUGGESTIONS};
