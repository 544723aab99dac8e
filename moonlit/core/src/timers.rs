//! Timers and Clocks
//!
//! Every time-based transition in the sky (fresh glow expiry, press-hold
//! threshold, decay completion, reply fade, notice dismissal) is a deadline in a
//! single registry keyed by what it belongs to. Scheduling a key that is already
//! pending replaces it, and removing an entry cancels every timer it owns, so a
//! stale timer can never fire for something that has moved on.
//!
//! Time is a [`Duration`] since the observatory started, read from a [`Clock`].
//! Surfaces run on [`SystemClock`]; tests drive a [`ManualClock`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::entries::EntryId;
use crate::messages::NoticeKind;

/// Source of monotonic time
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock at the current instant
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle and give another to
/// the observatory.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Create a clock at zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time
    pub fn set(&self, now: Duration) {
        *self.now.lock() = now;
    }

    /// Move forward by `by`
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}

/// Durations for every timed transition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// How long a new entry glows
    pub new_glow: Duration,
    /// How long a meteor must be held before it starts to decay
    pub press_hold: Duration,
    /// How long a decaying meteor lingers before removal
    pub decay: Duration,
    /// Length of the cosmetic fade after replying to a broadcast
    pub reply_fade: Duration,
    /// Welcome notice
    pub welcome_notice: Duration,
    /// Reply acknowledgement notice
    pub reply_notice: Duration,
    /// Radio switched on notice
    pub radio_notice: Duration,
    /// Meteor released notice
    pub meteor_notice: Duration,
    /// Not enough stars notice
    pub stars_notice: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            new_glow: Duration::from_secs(5),
            press_hold: Duration::from_millis(800),
            decay: Duration::from_millis(800),
            reply_fade: Duration::from_secs(8),
            welcome_notice: Duration::from_secs(5),
            reply_notice: Duration::from_secs(6),
            radio_notice: Duration::from_secs(6),
            meteor_notice: Duration::from_secs(5),
            stars_notice: Duration::from_secs(6),
        }
    }
}

impl TimingConfig {
    /// How long a notice stays on screen
    #[must_use]
    pub fn notice_duration(&self, kind: NoticeKind) -> Duration {
        match kind {
            NoticeKind::Welcome => self.welcome_notice,
            NoticeKind::ReplySent => self.reply_notice,
            NoticeKind::RadioTuned => self.radio_notice,
            NoticeKind::MeteorReleased => self.meteor_notice,
            NoticeKind::StarsNotEnough => self.stars_notice,
        }
    }
}

/// What a timer belongs to
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Fresh glow expiry for an entry
    NewGlow(EntryId),
    /// Press-and-hold threshold for a meteor
    PressHold(EntryId),
    /// Decay completion (entry removal)
    Decay(EntryId),
    /// End of the reply fade
    ReplyFade(EntryId),
    /// Notice auto-dismiss
    Notice(NoticeKind),
}

impl TimerKey {
    /// The entry this timer belongs to, if any
    #[must_use]
    pub fn entry_id(&self) -> Option<&EntryId> {
        match self {
            Self::NewGlow(id) | Self::PressHold(id) | Self::Decay(id) | Self::ReplyFade(id) => {
                Some(id)
            }
            Self::Notice(_) => None,
        }
    }
}

/// Pending deadlines keyed by owner
#[derive(Clone, Debug, Default)]
pub struct TimerRegistry {
    /// Deadline and scheduling sequence per key
    pending: HashMap<TimerKey, (Duration, u64)>,
    /// Tie-breaker so equal deadlines fire in scheduling order
    next_seq: u64,
}

impl TimerRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to fire at `deadline`
    ///
    /// Returns true if an earlier timer for the same key was replaced.
    pub fn schedule(&mut self, key: TimerKey, deadline: Duration) -> bool {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(key, (deadline, seq)).is_some()
    }

    /// Cancel a pending timer
    pub fn cancel(&mut self, key: &TimerKey) -> bool {
        self.pending.remove(key).is_some()
    }

    /// Cancel every timer owned by an entry
    ///
    /// Returns how many timers were cancelled.
    pub fn cancel_entry(&mut self, id: &EntryId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|key, _| key.entry_id() != Some(id));
        before - self.pending.len()
    }

    /// Deadline of a pending timer
    #[must_use]
    pub fn deadline(&self, key: &TimerKey) -> Option<Duration> {
        self.pending.get(key).map(|(deadline, _)| *deadline)
    }

    /// Earliest pending deadline
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.values().map(|(deadline, _)| *deadline).min()
    }

    /// Remove and return the earliest timer due at `now`
    ///
    /// Ties on the deadline fire in the order they were scheduled.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerKey, Duration)> {
        let key = self
            .pending
            .iter()
            .filter(|(_, (deadline, _))| *deadline <= now)
            .min_by_key(|(_, (deadline, seq))| (*deadline, *seq))
            .map(|(key, _)| key.clone())?;

        self.pending
            .remove(&key)
            .map(|(deadline, _)| (key, deadline))
    }

    /// Number of pending timers
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
