use std::time::Duration;
use tokio::time::Instant;

use crate::constants::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay between every poll
    Fixed,
    /// Delay doubles after every poll, capped by `max_interval`
    Exponential,
}

/// How long and how often to poll for a state change
///
/// A policy without `max_polls` and without `time_budget` polls until the
/// awaited state shows up.
#[derive(Clone, Debug)]
pub struct PollPolicy {
    backoff: Backoff,
    interval: Duration,
    max_interval: Option<Duration>,
    max_polls: Option<usize>,
    time_budget: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy::fixed(DEFAULT_POLL_INTERVAL).with_time_budget(Some(DEFAULT_POLL_TIMEOUT))
    }
}

impl PollPolicy {
    pub fn fixed(interval: Duration) -> Self {
        Self::new(Backoff::Fixed, interval)
    }

    pub fn exponential(interval: Duration) -> Self {
        Self::new(Backoff::Exponential, interval)
    }

    pub fn new(backoff: Backoff, interval: Duration) -> Self {
        Self {
            backoff,
            interval,
            max_interval: None,
            max_polls: None,
            time_budget: None,
        }
    }

    pub fn with_max_interval(mut self, max_interval: Option<Duration>) -> Self {
        self.max_interval = max_interval.filter(|d| !d.is_zero());
        self
    }

    /// Zero is treated as one: the first poll always happens
    pub fn with_max_polls(mut self, max_polls: Option<usize>) -> Self {
        self.max_polls = max_polls.map(|n| n.max(1));
        self
    }

    /// `None` or zero removes the budget
    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget.filter(|d| !d.is_zero());
        self
    }

    pub fn max_polls(&self) -> Option<usize> {
        self.max_polls
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_polls.is_none() && self.time_budget.is_none()
    }

    pub fn handle(&self) -> PollHandle {
        self.handle_from(Instant::now())
    }

    pub fn handle_from(&self, start: Instant) -> PollHandle {
        let deadline = self
            .time_budget
            .and_then(|budget| start.checked_add(budget));
        PollHandle {
            policy: self.clone(),
            polls: 0,
            deadline,
        }
    }

    fn delay_after(&self, poll: usize) -> Duration {
        let raw = match self.backoff {
            Backoff::Fixed => self.interval,
            Backoff::Exponential => {
                let shift = poll.saturating_sub(1).min(31) as u32;
                self.interval.saturating_mul(1u32 << shift)
            }
        };
        match self.max_interval {
            Some(max) => raw.min(max),
            None => raw,
        }
    }
}

/// Per-run polling state produced by [`PollPolicy::handle`]
pub struct PollHandle {
    policy: PollPolicy,
    polls: usize,
    deadline: Option<Instant>,
}

impl PollHandle {
    /// Record one completed poll and return the wait before the next one,
    /// or `None` when the policy is exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        self.polls += 1;
        if let Some(max) = self.policy.max_polls {
            if self.polls >= max {
                return None;
            }
        }
        let delay = self.policy.delay_after(self.polls);
        if let Some(deadline) = self.deadline {
            match Instant::now().checked_add(delay) {
                Some(next) if next <= deadline => {}
                _ => return None,
            }
        }
        Some(delay)
    }

    /// Polls recorded so far
    pub fn polls(&self) -> usize {
        self.polls
    }
}
