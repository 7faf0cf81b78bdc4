// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

/// Exponential backoff policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffConfig {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Multiplier applied after every delay.
    pub factor: f64,
}

/// Tracks the state of the exponential backoff algorithm.
#[derive(Debug)]
pub struct BackoffState {
    config: BackoffConfig,
    attempts: u32,
}

impl BackoffState {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            config,
            attempts: 0,
        }
    }

    /// Returns the delay to wait before the next attempt.
    pub fn next_delay(&mut self) -> Duration {
        // Cap exponent so powi stays finite.
        let exponent = self.attempts.min(64) as i32;
        self.attempts = self.attempts.saturating_add(1);
        let delay_secs =
            self.config.initial_delay.as_secs_f64() * self.config.factor.powi(exponent);
        Duration::from_secs_f64(delay_secs.min(self.config.max_delay.as_secs_f64()))
    }
}
