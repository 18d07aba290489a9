// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The push loop.
//!
//! Each tick reads the clock, asks [`PushState`] whether a window is due, and
//! if so pushes a random greeting to the most recently active user. Ticks are
//! spaced by a random sleep so pushes do not land on the same minute every
//! day.

use std::sync::Arc;
use std::time::Duration;

use chatline_config::model::PushConfig;
use chatline_core::ChatlineError;
use chatline_core::traits::{ChannelAdapter, EventLogAdapter};
use chatline_core::types::{EventRecord, OutboundMessage};
use chrono::Timelike;
use rand::Rng;
use rand::seq::SliceRandom;
use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::state::PushState;
use crate::window::PushKind;

/// A greeting that went out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushDelivery {
    pub kind: PushKind,
    pub user_id: String,
    pub text: String,
}

pub struct PushScheduler {
    channel: Arc<dyn ChannelAdapter + Send + Sync>,
    event_log: Arc<dyn EventLogAdapter + Send + Sync>,
    clock: Arc<dyn Clock>,
    active_user: watch::Receiver<Option<String>>,
    state: Mutex<PushState>,
    morning_greetings: Vec<String>,
    night_greetings: Vec<String>,
    min_interval: Duration,
    max_interval: Duration,
    demo_message: String,
    demo_interval: Duration,
}

impl PushScheduler {
    pub fn new(
        config: &PushConfig,
        channel: Arc<dyn ChannelAdapter + Send + Sync>,
        event_log: Arc<dyn EventLogAdapter + Send + Sync>,
        clock: Arc<dyn Clock>,
        active_user: watch::Receiver<Option<String>>,
    ) -> Self {
        Self {
            channel,
            event_log,
            clock,
            active_user,
            state: Mutex::new(PushState::from_config(config)),
            morning_greetings: config.morning_greetings.clone(),
            night_greetings: config.night_greetings.clone(),
            min_interval: Duration::from_secs(config.min_interval_secs),
            max_interval: Duration::from_secs(config.max_interval_secs),
            demo_message: config.demo_message.clone(),
            demo_interval: Duration::from_secs(config.demo_interval_secs),
        }
    }

    pub fn greetings(&self, kind: PushKind) -> &[String] {
        match kind {
            PushKind::Morning => &self.morning_greetings,
            PushKind::Night => &self.night_greetings,
        }
    }

    pub async fn is_sent(&self, kind: PushKind) -> bool {
        self.state.lock().await.is_sent(kind)
    }

    fn active_user(&self) -> Option<String> {
        self.active_user.borrow().clone()
    }

    /// One scheduling step. Returns the delivery if a greeting was pushed.
    ///
    /// A failed push leaves the window's flag unset so a later tick inside
    /// the same window retries.
    pub async fn tick(&self) -> Result<Option<PushDelivery>, ChatlineError> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let Some(kind) = state.due(now.hour()) else {
            debug!(time = %now, "no push window due");
            return Ok(None);
        };
        let Some(user_id) = self.active_user() else {
            debug!(window = %kind, "push window due but no active user yet");
            return Ok(None);
        };
        let text = self
            .greetings(kind)
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| ChatlineError::Config(format!("no {kind} greetings configured")))?;

        if let Err(e) = self
            .channel
            .send(OutboundMessage::push(user_id.as_str(), vec![text.clone()]))
            .await
        {
            self.log(EventRecord::error(Some(user_id.clone()), &e)).await;
            return Err(e);
        }

        state.mark_sent(kind);
        info!(window = %kind, user_id = user_id.as_str(), "greeting pushed");
        self.log(EventRecord::push(user_id.as_str(), text.as_str())).await;
        Ok(Some(PushDelivery {
            kind,
            user_id,
            text,
        }))
    }

    /// Random sleep between ticks, uniform in `[min_interval, max_interval]`.
    pub fn next_interval(&self) -> Duration {
        let (min, max) = (self.min_interval, self.max_interval.max(self.min_interval));
        rand::thread_rng().gen_range(min..=max)
    }

    /// Ticks until `cancel` fires. Tick errors are logged and the loop keeps going.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            min_interval_secs = self.min_interval.as_secs(),
            max_interval_secs = self.max_interval.as_secs(),
            "push scheduler started"
        );
        loop {
            if let Err(e) = self.tick().await {
                warn!(error = %e, "push tick failed");
            }
            let sleep = self.next_interval();
            debug!(next_tick_secs = sleep.as_secs(), "push scheduler sleeping");
            tokio::select! {
                _ = tokio::time::sleep(sleep) => {}
                _ = cancel.cancelled() => {
                    info!("push scheduler shutting down");
                    break;
                }
            }
        }
    }

    /// Pushes the demo message to the active user every `demo_interval`
    /// until `cancel` fires.
    pub async fn run_demo(&self, cancel: CancellationToken) {
        warn!(
            interval_secs = self.demo_interval.as_secs(),
            "demo push loop enabled, unsolicited messages will be sent"
        );
        let mut interval = tokio::time::interval(self.demo_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.push_demo().await {
                        warn!(error = %e, "demo push failed");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("demo push loop shutting down");
                    break;
                }
            }
        }
    }

    async fn push_demo(&self) -> Result<(), ChatlineError> {
        let Some(user_id) = self.active_user() else {
            return Ok(());
        };
        let message = OutboundMessage::push(user_id.as_str(), vec![self.demo_message.clone()]);
        match self.channel.send(message).await {
            Ok(()) => {
                self.log(EventRecord::push(user_id, self.demo_message.as_str()))
                    .await;
                Ok(())
            }
            Err(e) => {
                self.log(EventRecord::error(Some(user_id), &e)).await;
                Err(e)
            }
        }
    }

    async fn log(&self, record: EventRecord) {
        if let Err(e) = self.event_log.append(&record).await {
            warn!(error = %e, "failed to write event log record");
        }
    }
}
