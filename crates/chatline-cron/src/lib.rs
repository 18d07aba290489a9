// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Proactive morning and night greetings.
//!
//! [`PushScheduler`] runs as a background task next to the webhook server.
//! It learns who to greet from a `watch` channel the webhook handler publishes
//! the latest sender's user id on. Only one target is tracked.

pub mod clock;
pub mod scheduler;
pub mod state;
pub mod window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scheduler::{PushDelivery, PushScheduler};
pub use state::PushState;
pub use window::{PushKind, PushWindow};
