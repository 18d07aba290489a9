// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt templates and message assembly.
//!
//! Everything here is a pure function of its inputs so the exact message
//! sequence sent to the completion API can be asserted in tests.

use chatline_core::types::ProviderMessage;
use chatline_memory::ScoredChunk;

/// Appended after the history when turning a follow-up into a search query.
pub const SEARCH_QUERY_INSTRUCTION: &str = "Given the above conversation, generate a search query to look up to get information relevant to the conversation";

const ANSWER_SYSTEM_PREFIX: &str = "Answer the user's questions based on the below context:\n\n";

const INTENT_SYSTEM_PROMPT: &str = "You are a customer service assistant for a retail chain. \
Classify the customer's message into exactly one category and reply with the category name only.\n\
Categories:\n\
- promotion: questions about discounts, sales, coupons, or current campaigns\n\
- inventory: questions about whether a product is in stock or how many are left\n\
- other: anything else";

/// Few-shot examples for the intent classifier, as (message, label) pairs.
const INTENT_EXAMPLES: &[(&str, &str)] = &[
    ("Are there any discounts on shampoo this week?", "promotion"),
    ("Is the 2-for-1 coffee deal still running?", "promotion"),
    ("Do you still have product P001 at this branch?", "inventory"),
    ("How many units of P017 are left?", "inventory"),
    ("What time do you close today?", "other"),
    ("Thanks, have a nice day!", "other"),
];

const DB_ADMIN_SYSTEM_PROMPT: &str = "You are a database administrator for a retail chain. \
The database has these tables:\n\
- products(product_id TEXT PRIMARY KEY, name TEXT, category TEXT, price NUMERIC)\n\
- inventory(branch_id TEXT, product_id TEXT REFERENCES products, quantity INTEGER, updated_at TIMESTAMP)\n\
- promotions(promotion_id TEXT PRIMARY KEY, product_id TEXT REFERENCES products, branch_id TEXT, \
description TEXT, discount_percent NUMERIC, starts_at DATE, ends_at DATE)\n\
If the customer's message can be answered from the database, reply with a single raw SQL query \
and nothing else. Filter by the customer's branch wherever the table has a branch_id column. \
Otherwise reply with one short natural-language sentence.";

/// Session mode: persona, full history, then the new message.
pub fn conversation_messages(
    persona: &str,
    history: &[ProviderMessage],
    input: &str,
) -> Vec<ProviderMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    if !persona.trim().is_empty() {
        messages.push(ProviderMessage::system(persona));
    }
    messages.extend_from_slice(history);
    messages.push(ProviderMessage::user(input));
    messages
}

/// Rewrites a follow-up into a standalone search query.
pub fn search_query_messages(history: &[ProviderMessage], input: &str) -> Vec<ProviderMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.extend_from_slice(history);
    messages.push(ProviderMessage::user(input));
    messages.push(ProviderMessage::user(SEARCH_QUERY_INSTRUCTION));
    messages
}

/// Chunk texts joined by blank lines, in rank order.
pub fn format_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Retrieval mode answer prompt: context system message, history, new message.
pub fn answer_messages(
    chunks: &[ScoredChunk],
    history: &[ProviderMessage],
    input: &str,
) -> Vec<ProviderMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ProviderMessage::system(format!(
        "{ANSWER_SYSTEM_PREFIX}{}",
        format_context(chunks)
    )));
    messages.extend_from_slice(history);
    messages.push(ProviderMessage::user(input));
    messages
}

pub fn intent_messages(input: &str) -> Vec<ProviderMessage> {
    let mut messages = Vec::with_capacity(INTENT_EXAMPLES.len() * 2 + 2);
    messages.push(ProviderMessage::system(INTENT_SYSTEM_PROMPT));
    for (example, label) in INTENT_EXAMPLES {
        messages.push(ProviderMessage::user(*example));
        messages.push(ProviderMessage::assistant(*label));
    }
    messages.push(ProviderMessage::user(input));
    messages
}

pub fn db_admin_messages(input: &str, branch_id: &str) -> Vec<ProviderMessage> {
    vec![
        ProviderMessage::system(format!(
            "{DB_ADMIN_SYSTEM_PROMPT}\nThe customer is at branch_id '{branch_id}'."
        )),
        ProviderMessage::user(input),
    ]
}
