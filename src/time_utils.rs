// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lookback window computation for activity extraction.

use chrono::{DateTime, Utc};

/// Half-open `[after, before)` unix-second range filtering activities by
/// creation time. Computed fresh for every run; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub after: i64,
    pub before: i64,
}

impl TimeWindow {
    /// Window ending `offset_secs` before `now` and spanning `window_secs`.
    ///
    /// Callers validate `offset_secs >= 0` and `window_secs > 0` (see
    /// `Config`), which keeps `after < before`.
    pub fn lookback(now: DateTime<Utc>, offset_secs: i64, window_secs: i64) -> Self {
        let before = now.timestamp() - offset_secs;
        Self {
            after: before - window_secs,
            before,
        }
    }
}
