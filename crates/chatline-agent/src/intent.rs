// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retail intent classification and the database-administrator responder.
//!
//! Both calls are stateless and best-effort: the prompts and the call order
//! are fixed, the model's output is passed through as-is.

use async_trait::async_trait;
use chatline_core::ChatlineError;
use chatline_core::types::SessionId;
use strum::{Display, EnumString};
use tracing::info;

use crate::prompt;
use crate::responder::{AgentReply, Completer, Responder};

/// Coarse category of a customer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Intent {
    Promotion,
    Inventory,
    Other,
}

impl Intent {
    /// Reads a label out of free model output. The keyword appearing first
    /// wins; unrecognised output is `Other`.
    pub fn parse_label(raw: &str) -> Self {
        let label = raw.trim().to_lowercase();
        [Intent::Promotion, Intent::Inventory, Intent::Other]
            .into_iter()
            .filter_map(|intent| label.find(&intent.to_string()).map(|pos| (pos, intent)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, intent)| intent)
            .unwrap_or(Intent::Other)
    }
}

pub async fn classify_intent(completer: &Completer, text: &str) -> Result<Intent, ChatlineError> {
    let raw = completer.complete(prompt::intent_messages(text)).await?;
    Ok(Intent::parse_label(&raw))
}

/// Asks the model to answer as the store's database administrator: either one
/// raw SQL query or a short sentence.
pub async fn answer_as_db_admin(
    completer: &Completer,
    text: &str,
    branch_id: &str,
) -> Result<String, ChatlineError> {
    let answer = completer
        .complete(prompt::db_admin_messages(text, branch_id))
        .await?;
    Ok(answer.trim().to_string())
}

/// Classifies, then answers as the DB admin. Keeps no history.
pub struct InventoryResponder {
    completer: Completer,
    branch_id: String,
    echo_intent: bool,
}

impl InventoryResponder {
    pub fn new(completer: Completer, branch_id: impl Into<String>, echo_intent: bool) -> Self {
        Self {
            completer,
            branch_id: branch_id.into(),
            echo_intent,
        }
    }
}

#[async_trait]
impl Responder for InventoryResponder {
    async fn respond(&self, session_id: &SessionId, text: &str) -> Result<AgentReply, ChatlineError> {
        let intent = classify_intent(&self.completer, text).await?;
        let answer = answer_as_db_admin(&self.completer, text, &self.branch_id).await?;
        info!(session_id = %session_id, intent = %intent, "inventory query answered");

        let mut messages = Vec::with_capacity(2);
        if self.echo_intent {
            messages.push(intent.to_string());
        }
        messages.push(answer);
        Ok(AgentReply { messages })
    }
}
