// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LINE webhook gateway for Chatline.
//!
//! Provides an axum server exposing:
//! - `POST /webhook` (configurable): signature-verified LINE webhook
//! - `GET /health`: liveness probe
//!
//! Verified events go through an [`EventDispatcher`], an explicit table from
//! event kind to [`EventHandler`]. Text messages are answered by
//! [`ExchangeHandler`]; follows are recorded by [`FollowHandler`].

pub mod dispatch;
pub mod exchange;
pub mod handlers;
pub mod server;

pub use dispatch::{ActiveUserTx, EventDispatcher, EventHandler, FollowHandler};
pub use exchange::ExchangeHandler;
pub use server::{GatewayState, build_router, start_server};
