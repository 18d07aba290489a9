// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Push windows.

use chatline_config::model::WindowConfig;
use strum::Display;

/// Which greeting a window sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PushKind {
    Morning,
    Night,
}

/// Half-open hour range `[start_hour, end_hour)` in scheduler-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushWindow {
    pub kind: PushKind,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl PushWindow {
    pub fn new(kind: PushKind, start_hour: u32, end_hour: u32) -> Self {
        Self {
            kind,
            start_hour,
            end_hour,
        }
    }

    pub fn from_config(kind: PushKind, config: &WindowConfig) -> Self {
        Self::new(kind, config.start_hour, config.end_hour)
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let morning = PushWindow::new(PushKind::Morning, 7, 10);
        assert!(!morning.contains(6));
        assert!(morning.contains(7));
        assert!(morning.contains(9));
        assert!(!morning.contains(10));
    }

    #[test]
    fn kind_displays_lowercase() {
        assert_eq!(PushKind::Night.to_string(), "night");
    }
}
