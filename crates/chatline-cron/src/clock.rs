// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wall-clock sources for the scheduler.

use std::sync::Mutex;

use chatline_config::model::PushConfig;
use chatline_core::ChatlineError;
use chrono::{FixedOffset, Local, NaiveDateTime, TimeDelta, Utc};

/// Source of the scheduler's notion of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Real time: the host's local zone, or a fixed UTC offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn local() -> Self {
        Self { offset: None }
    }

    pub fn with_utc_offset(hours: i32) -> Result<Self, ChatlineError> {
        let offset = hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ChatlineError::Config(format!("push.utc_offset_hours out of range: {hours}"))
            })?;
        Ok(Self {
            offset: Some(offset),
        })
    }

    pub fn from_config(config: &PushConfig) -> Result<Self, ChatlineError> {
        match config.utc_offset_hours {
            Some(hours) => Self::with_utc_offset(hours),
            None => Ok(Self::local()),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}

/// A clock that only moves when told to. Used for simulations.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, to: NaiveDateTime) {
        if let Ok(mut now) = self.now.lock() {
            *now = to;
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
