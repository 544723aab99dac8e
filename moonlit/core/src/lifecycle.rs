//! Lifecycle Controller
//!
//! Transient, time-driven state for entries:
//!
//! - **Fresh glow**: every created entry glows for `new_glow`, then the glow ends.
//! - **Decay**: a released meteor is marked disappearing and removed `decay` later.
//!   Decay is destructive and cannot be interrupted.
//! - **Reply fade**: a broadcast that has been replied to fades over `reply_fade`.
//!   The fade is cosmetic; the entry stays in the store once it has faded.
//!
//! The controller only records flags and schedules deadlines. The Observatory
//! reacts when those deadlines fire.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entries::EntryId;
use crate::timers::{TimerKey, TimerRegistry, TimingConfig};

/// Progress of the cosmetic reply fade
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FadeState {
    /// Fading; `progress` runs from 0.0 to 1.0
    Fading {
        /// When the fade began
        started_at: Duration,
        /// Fraction of the fade completed at snapshot time
        progress: f64,
    },
    /// Fade complete; the body remains in the sky, dimmed
    Faded,
}

/// Per-entry transient state and its timers
#[derive(Clone, Debug, Default)]
pub struct LifecycleController {
    timing: TimingConfig,
    /// Entries currently decaying
    disappearing: HashSet<EntryId>,
    /// Fade start per replied entry (`None` once the fade completed)
    fades: HashMap<EntryId, Option<Duration>>,
}

impl LifecycleController {
    /// Create a controller
    #[must_use]
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            disappearing: HashSet::new(),
            fades: HashMap::new(),
        }
    }

    /// Start the fresh glow for a newly created entry
    pub fn on_created(&mut self, id: &EntryId, now: Duration, timers: &mut TimerRegistry) {
        timers.schedule(TimerKey::NewGlow(id.clone()), now + self.timing.new_glow);
    }

    /// Mark an entry as disappearing and schedule its removal
    ///
    /// Returns false if the entry was already decaying; the original deadline stands.
    pub fn begin_decay(&mut self, id: &EntryId, at: Duration, timers: &mut TimerRegistry) -> bool {
        if !self.disappearing.insert(id.clone()) {
            return false;
        }
        timers.schedule(TimerKey::Decay(id.clone()), at + self.timing.decay);
        tracing::debug!(entry_id = %id, "Decay started");
        true
    }

    /// Start the reply fade
    ///
    /// Returns false if the entry is already fading or has faded.
    pub fn begin_fade(&mut self, id: &EntryId, at: Duration, timers: &mut TimerRegistry) -> bool {
        if self.fades.contains_key(id) {
            return false;
        }
        self.fades.insert(id.clone(), Some(at));
        timers.schedule(TimerKey::ReplyFade(id.clone()), at + self.timing.reply_fade);
        true
    }

    /// Record the end of a reply fade
    pub fn finish_fade(&mut self, id: &EntryId) -> bool {
        match self.fades.get_mut(id) {
            Some(started) if started.is_some() => {
                *started = None;
                true
            }
            _ => false,
        }
    }

    /// Whether the entry is decaying
    #[must_use]
    pub fn is_disappearing(&self, id: &EntryId) -> bool {
        self.disappearing.contains(id)
    }

    /// Fade state of an entry at `now`
    #[must_use]
    pub fn fade(&self, id: &EntryId, now: Duration) -> Option<FadeState> {
        match self.fades.get(id)? {
            Some(started_at) => {
                let total = self.timing.reply_fade.as_secs_f64();
                let elapsed = now.saturating_sub(*started_at).as_secs_f64();
                let progress = if total > 0.0 {
                    (elapsed / total).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                Some(FadeState::Fading {
                    started_at: *started_at,
                    progress,
                })
            }
            None => Some(FadeState::Faded),
        }
    }

    /// Drop all state and timers for a removed entry
    pub fn forget(&mut self, id: &EntryId, timers: &mut TimerRegistry) {
        self.disappearing.remove(id);
        self.fades.remove(id);
        let cancelled = timers.cancel_entry(id);
        if cancelled > 0 {
            tracing::debug!(entry_id = %id, cancelled, "Cancelled timers for removed entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_created_entry_schedules_glow_expiry() {
        let mut lifecycle = LifecycleController::new(TimingConfig::default());
        let mut timers = TimerRegistry::new();
        let id = EntryId::new("e");

        lifecycle.on_created(&id, ms(1000), &mut timers);
        assert_eq!(
            timers.deadline(&TimerKey::NewGlow(id.clone())),
            Some(ms(6000))
        );
    }

    #[test]
    fn test_decay_starts_once() {
        let mut lifecycle = LifecycleController::new(TimingConfig::default());
        let mut timers = TimerRegistry::new();
        let id = EntryId::new("m");

        assert!(lifecycle.begin_decay(&id, ms(900), &mut timers));
        assert!(lifecycle.is_disappearing(&id));
        assert!(!lifecycle.begin_decay(&id, ms(1200), &mut timers));
        assert_eq!(timers.deadline(&TimerKey::Decay(id)), Some(ms(1700)));
    }

    #[test]
    fn test_fade_progress_and_completion() {
        let mut lifecycle = LifecycleController::new(TimingConfig::default());
        let mut timers = TimerRegistry::new();
        let id = EntryId::new("x");

        assert!(lifecycle.fade(&id, ms(0)).is_none());
        assert!(lifecycle.begin_fade(&id, ms(2000), &mut timers));
        assert!(!lifecycle.begin_fade(&id, ms(3000), &mut timers));

        match lifecycle.fade(&id, ms(6000)) {
            Some(FadeState::Fading { progress, .. }) => assert!((progress - 0.5).abs() < 1e-9),
            other => panic!("expected fading, got {other:?}"),
        }

        assert!(lifecycle.finish_fade(&id));
        assert!(!lifecycle.finish_fade(&id));
        assert_eq!(lifecycle.fade(&id, ms(20000)), Some(FadeState::Faded));
    }

    #[test]
    fn test_forget_cancels_timers() {
        let mut lifecycle = LifecycleController::new(TimingConfig::default());
        let mut timers = TimerRegistry::new();
        let id = EntryId::new("m");

        lifecycle.on_created(&id, ms(0), &mut timers);
        lifecycle.begin_decay(&id, ms(900), &mut timers);
        lifecycle.forget(&id, &mut timers);

        assert!(timers.is_empty());
        assert!(!lifecycle.is_disappearing(&id));
    }
}
