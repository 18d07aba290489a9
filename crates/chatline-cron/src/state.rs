// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Once-per-window bookkeeping.

use chatline_config::model::PushConfig;

use crate::window::{PushKind, PushWindow};

/// Tracks whether each window's greeting already went out.
///
/// A flag resets as soon as a check happens outside its window, so each
/// window fires at most once per day and fires again the next day.
#[derive(Debug, Clone)]
pub struct PushState {
    morning: PushWindow,
    night: PushWindow,
    morning_sent: bool,
    night_sent: bool,
}

impl PushState {
    pub fn new(morning: PushWindow, night: PushWindow) -> Self {
        Self {
            morning,
            night,
            morning_sent: false,
            night_sent: false,
        }
    }

    pub fn from_config(config: &PushConfig) -> Self {
        Self::new(
            PushWindow::from_config(PushKind::Morning, &config.morning_window),
            PushWindow::from_config(PushKind::Night, &config.night_window),
        )
    }

    /// Returns the window due at `hour`, if its greeting has not been sent.
    pub fn due(&mut self, hour: u32) -> Option<PushKind> {
        if !self.morning.contains(hour) {
            self.morning_sent = false;
        }
        if !self.night.contains(hour) {
            self.night_sent = false;
        }

        if self.morning.contains(hour) && !self.morning_sent {
            Some(PushKind::Morning)
        } else if self.night.contains(hour) && !self.night_sent {
            Some(PushKind::Night)
        } else {
            None
        }
    }

    pub fn mark_sent(&mut self, kind: PushKind) {
        match kind {
            PushKind::Morning => self.morning_sent = true,
            PushKind::Night => self.night_sent = true,
        }
    }

    pub fn is_sent(&self, kind: PushKind) -> bool {
        match kind {
            PushKind::Morning => self.morning_sent,
            PushKind::Night => self.night_sent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> PushState {
        PushState::from_config(&PushConfig::default())
    }

    #[test]
    fn due_inside_window_until_marked() {
        let mut state = state();
        assert_eq!(state.due(8), Some(PushKind::Morning));
        assert_eq!(state.due(8), Some(PushKind::Morning));
        state.mark_sent(PushKind::Morning);
        assert_eq!(state.due(9), None);
    }

    #[test]
    fn nothing_due_outside_windows() {
        let mut state = state();
        for hour in [0, 6, 10, 12, 21, 23] {
            assert_eq!(state.due(hour), None, "hour {hour}");
        }
    }

    #[test]
    fn each_window_fires_once_per_day() {
        let mut state = state();
        let mut sent = Vec::new();
        // Two simulated days, checked every hour.
        for hour in (0..24).chain(0..24) {
            if let Some(kind) = state.due(hour) {
                state.mark_sent(kind);
                sent.push((hour, kind));
            }
        }
        assert_eq!(
            sent,
            vec![
                (7, PushKind::Morning),
                (22, PushKind::Night),
                (7, PushKind::Morning),
                (22, PushKind::Night),
            ]
        );
    }

    #[test]
    fn flag_resets_after_window() {
        let mut state = state();
        state.mark_sent(PushKind::Night);
        assert!(state.is_sent(PushKind::Night));
        state.due(23);
        assert!(!state.is_sent(PushKind::Night));
    }
}
