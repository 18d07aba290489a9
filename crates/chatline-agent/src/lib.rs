// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state and responders for Chatline.
//!
//! A [`Responder`] turns one inbound text into reply messages. Three are
//! provided, selected by `agent.mode`:
//!
//! - [`ConversationResponder`]: persona plus per-user history
//! - [`RetrievalResponder`]: history plus chunks retrieved from the corpus
//! - [`InventoryResponder`]: stateless intent classification and DB-admin answer

pub mod intent;
pub mod prompt;
pub mod responder;
pub mod session;

pub use intent::{Intent, InventoryResponder, answer_as_db_admin, classify_intent};
pub use responder::{AgentReply, Completer, ConversationResponder, Responder, RetrievalResponder};
pub use session::{Session, SessionHandle, SessionStore};
