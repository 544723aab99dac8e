//! Interaction State Machine
//!
//! Two independent machines:
//!
//! ```text
//! Focus (one at a time):
//!   Idle ──click(external, radio on)──▶ Focused(id)
//!   Focused ──submit_reply(non-empty)──▶ Idle   (reply recorded)
//!   Focused ──close / radio off / removal──▶ Idle
//!
//! Press-and-hold (per meteor):
//!   Resting ──press──▶ Pressing ──held for press_hold──▶ Decaying ──▶ Removed
//!                         │
//!                         └──release / leave──▶ Resting
//! ```
//!
//! Decaying is terminal: releasing or pressing again does nothing.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entries::{Entry, EntryId, EntryStore};
use crate::timers::{TimerKey, TimerRegistry};
use crate::visibility::is_visible;

/// Which entry, if any, has the reply box open
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusState {
    /// No reply box open
    #[default]
    Idle,
    /// Reply box open for this entry
    Focused(EntryId),
}

/// Press-and-hold progress for one meteor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressPhase {
    /// Not pressed
    #[default]
    Resting,
    /// Pointer held down, threshold not reached yet
    Pressing,
    /// Threshold reached; removal is pending and cannot be stopped
    Decaying,
    /// Removed from the sky
    Removed,
}

/// Result of submitting a reply
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// No entry is focused
    NotFocused,
    /// Text was empty after trimming; focus is kept
    Empty,
    /// Reply handled and focus released
    Recorded {
        /// Entry replied to
        id: EntryId,
        /// Trimmed reply text
        reply: String,
        /// Whether the reply set grew (identical replies are kept once)
        added: bool,
        /// Whether the sender should be shown an acknowledgement
        acknowledge: bool,
    },
}

/// Focus and press-and-hold state
#[derive(Clone, Debug)]
pub struct InteractionMachine {
    focus: FocusState,
    presses: HashMap<EntryId, PressPhase>,
    replied: HashSet<EntryId>,
    press_hold: Duration,
}

impl InteractionMachine {
    /// Create a machine with the given hold threshold
    #[must_use]
    pub fn new(press_hold: Duration) -> Self {
        Self {
            focus: FocusState::Idle,
            presses: HashMap::new(),
            replied: HashSet::new(),
            press_hold,
        }
    }

    /// Current focus
    #[must_use]
    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    /// ID of the focused entry
    #[must_use]
    pub fn focused_id(&self) -> Option<&EntryId> {
        match &self.focus {
            FocusState::Focused(id) => Some(id),
            FocusState::Idle => None,
        }
    }

    /// Whether a reply has been recorded for the entry
    #[must_use]
    pub fn is_replied(&self, id: &EntryId) -> bool {
        self.replied.contains(id)
    }

    /// Press phase of an entry
    #[must_use]
    pub fn press_phase(&self, id: &EntryId) -> PressPhase {
        self.presses.get(id).copied().unwrap_or_default()
    }

    /// Entries whose press is in progress
    #[must_use]
    pub fn pressing(&self) -> Vec<EntryId> {
        self.presses
            .iter()
            .filter(|(_, phase)| **phase == PressPhase::Pressing)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Handle a click on an entry
    ///
    /// Only broadcast entries can be focused, and only while the radio is on.
    /// Focusing replaces any previous focus. Returns true if focus changed to `entry`.
    pub fn click(&mut self, entry: &Entry, channel_on: bool) -> bool {
        if !entry.is_external() || !channel_on {
            return false;
        }

        if let FocusState::Focused(previous) = &self.focus {
            if previous != entry.id() {
                tracing::debug!(previous = %previous, next = %entry.id(), "Focus moved");
            }
        }
        self.focus = FocusState::Focused(entry.id().clone());
        true
    }

    /// Submit a reply for the focused entry
    pub fn submit_reply(&mut self, text: &str, store: &mut EntryStore) -> ReplyOutcome {
        let FocusState::Focused(id) = &self.focus else {
            return ReplyOutcome::NotFocused;
        };
        let id = id.clone();

        let reply = text.trim();
        if reply.is_empty() {
            return ReplyOutcome::Empty;
        }

        let Some(added) = store.append_reply(&id, reply) else {
            // Focused entry vanished underneath us
            self.focus = FocusState::Idle;
            return ReplyOutcome::NotFocused;
        };
        let acknowledge = store.get(&id).is_some_and(Entry::is_external);

        self.replied.insert(id.clone());
        self.focus = FocusState::Idle;

        ReplyOutcome::Recorded {
            id,
            reply: reply.to_string(),
            added,
            acknowledge,
        }
    }

    /// Close the reply box without replying
    ///
    /// Returns the entry that lost focus.
    pub fn close(&mut self) -> Option<EntryId> {
        match std::mem::take(&mut self.focus) {
            FocusState::Focused(id) => Some(id),
            FocusState::Idle => None,
        }
    }

    /// Drop focus if the focused entry is no longer visible
    pub fn defocus_hidden(&mut self, store: &EntryStore, channel_on: bool) -> Option<EntryId> {
        let id = self.focused_id()?;
        let visible = store
            .get(id)
            .is_some_and(|entry| is_visible(entry, channel_on));
        if visible {
            None
        } else {
            self.close()
        }
    }

    /// Start pressing an entry
    ///
    /// Only meteors respond. A press on a meteor that is already being pressed
    /// re-arms its timer. Returns true if the hold timer was (re)started.
    pub fn press_start(&mut self, entry: &Entry, now: Duration, timers: &mut TimerRegistry) -> bool {
        if !entry.category().is_meteor() {
            return false;
        }

        let id = entry.id();
        match self.press_phase(id) {
            PressPhase::Resting | PressPhase::Pressing => {
                self.presses.insert(id.clone(), PressPhase::Pressing);
                timers.schedule(TimerKey::PressHold(id.clone()), now + self.press_hold);
                true
            }
            PressPhase::Decaying | PressPhase::Removed => false,
        }
    }

    /// Release (or leave) a pressed entry
    ///
    /// Returns true if a pending press was cancelled.
    pub fn press_release(&mut self, id: &EntryId, timers: &mut TimerRegistry) -> bool {
        if self.press_phase(id) != PressPhase::Pressing {
            return false;
        }
        self.presses.remove(id);
        timers.cancel(&TimerKey::PressHold(id.clone()));
        true
    }

    /// The hold threshold elapsed
    ///
    /// Returns true if the entry moved to `Decaying`.
    pub fn press_timeout(&mut self, id: &EntryId) -> bool {
        match self.presses.get_mut(id) {
            Some(phase) if *phase == PressPhase::Pressing => {
                *phase = PressPhase::Decaying;
                true
            }
            _ => false,
        }
    }

    /// Forget an entry that left the store
    ///
    /// Nothing is kept for the entry afterwards; the store's retired set is
    /// what answers `Removed`. Returns true if the entry was focused.
    pub fn mark_removed(&mut self, id: &EntryId) -> bool {
        self.presses.remove(id);
        self.replied.remove(id);

        if self.focused_id() == Some(id) {
            self.focus = FocusState::Idle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::entries::{EmotionCategory, Visibility};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn external(id: &str, category: EmotionCategory) -> Entry {
        Entry::external(EntryId::new(id), "Hong", category, "rainy again", Utc::now())
    }

    fn local(id: &str, category: EmotionCategory) -> Entry {
        Entry::local(EntryId::new(id), category, "mine", Visibility::Private, false)
    }

    fn store_with(entries: Vec<Entry>) -> EntryStore {
        let mut store = EntryStore::new();
        for entry in entries {
            store.insert(entry).unwrap();
        }
        store
    }

    #[test]
    fn test_click_focuses_only_visible_broadcasts() {
        let mut machine = InteractionMachine::new(ms(800));
        let ext = external("x", EmotionCategory::Positive);
        let mine = local("l", EmotionCategory::Positive);

        assert!(!machine.click(&mine, true));
        assert!(!machine.click(&ext, false));
        assert_eq!(machine.focus(), &FocusState::Idle);

        assert!(machine.click(&ext, true));
        assert_eq!(machine.focused_id(), Some(&EntryId::new("x")));
    }

    #[test]
    fn test_focus_moves_without_queueing() {
        let mut machine = InteractionMachine::new(ms(800));
        machine.click(&external("a", EmotionCategory::Positive), true);
        machine.click(&external("b", EmotionCategory::Negative), true);
        assert_eq!(machine.focused_id(), Some(&EntryId::new("b")));
        assert_eq!(machine.close(), Some(EntryId::new("b")));
        assert_eq!(machine.close(), None);
    }

    #[test]
    fn test_reply_records_and_releases_focus() {
        let mut store = store_with(vec![external("x", EmotionCategory::Received)]);
        let mut machine = InteractionMachine::new(ms(800));
        machine.click(store.get(&EntryId::new("x")).unwrap(), true);

        assert_eq!(machine.submit_reply("   ", &mut store), ReplyOutcome::Empty);
        assert!(machine.focused_id().is_some());

        let outcome = machine.submit_reply("  you are not alone ", &mut store);
        assert_eq!(
            outcome,
            ReplyOutcome::Recorded {
                id: EntryId::new("x"),
                reply: "you are not alone".to_string(),
                added: true,
                acknowledge: true,
            }
        );
        assert_eq!(machine.focus(), &FocusState::Idle);
        assert!(machine.is_replied(&EntryId::new("x")));
        assert_eq!(store.get(&EntryId::new("x")).unwrap().replies().len(), 1);

        assert_eq!(
            machine.submit_reply("again", &mut store),
            ReplyOutcome::NotFocused
        );
    }

    #[test]
    fn test_defocus_hidden_when_radio_off() {
        let store = store_with(vec![external("x", EmotionCategory::Positive)]);
        let mut machine = InteractionMachine::new(ms(800));
        machine.click(store.get(&EntryId::new("x")).unwrap(), true);

        assert_eq!(machine.defocus_hidden(&store, true), None);
        assert_eq!(
            machine.defocus_hidden(&store, false),
            Some(EntryId::new("x"))
        );
        assert_eq!(machine.focus(), &FocusState::Idle);
    }

    #[test]
    fn test_press_only_applies_to_meteors() {
        let mut machine = InteractionMachine::new(ms(800));
        let mut timers = TimerRegistry::new();
        let star = local("s", EmotionCategory::Positive);

        assert!(!machine.press_start(&star, ms(0), &mut timers));
        assert!(timers.is_empty());
        assert_eq!(machine.press_phase(star.id()), PressPhase::Resting);
    }

    #[test]
    fn test_release_before_threshold_returns_to_resting() {
        let mut machine = InteractionMachine::new(ms(800));
        let mut timers = TimerRegistry::new();
        let meteor = local("m", EmotionCategory::Negative);

        assert!(machine.press_start(&meteor, ms(0), &mut timers));
        assert_eq!(machine.press_phase(meteor.id()), PressPhase::Pressing);
        assert!(machine.press_release(meteor.id(), &mut timers));
        assert_eq!(machine.press_phase(meteor.id()), PressPhase::Resting);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_repress_rearms_timer() {
        let mut machine = InteractionMachine::new(ms(800));
        let mut timers = TimerRegistry::new();
        let meteor = local("m", EmotionCategory::Negative);

        machine.press_start(&meteor, ms(0), &mut timers);
        machine.press_start(&meteor, ms(500), &mut timers);
        assert_eq!(timers.len(), 1);
        assert_eq!(
            timers.deadline(&TimerKey::PressHold(meteor.id().clone())),
            Some(ms(1300))
        );
    }

    #[test]
    fn test_decaying_ignores_release_and_press() {
        let mut machine = InteractionMachine::new(ms(800));
        let mut timers = TimerRegistry::new();
        let meteor = local("m", EmotionCategory::Negative);

        machine.press_start(&meteor, ms(100), &mut timers);
        assert!(machine.press_timeout(meteor.id()));
        assert_eq!(machine.press_phase(meteor.id()), PressPhase::Decaying);

        assert!(!machine.press_release(meteor.id(), &mut timers));
        assert!(!machine.press_start(&meteor, ms(1000), &mut timers));
        assert_eq!(machine.press_phase(meteor.id()), PressPhase::Decaying);

        assert!(!machine.mark_removed(meteor.id()));
    }

    #[test]
    fn test_removed_meteors_are_not_tracked() {
        let mut machine = InteractionMachine::new(ms(800));
        let mut timers = TimerRegistry::new();

        for n in 0..50 {
            let meteor = local(&format!("m{n}"), EmotionCategory::Negative);
            machine.press_start(&meteor, ms(0), &mut timers);
            assert!(machine.press_timeout(meteor.id()));
            machine.mark_removed(meteor.id());
        }

        assert!(machine.presses.is_empty());
        assert!(machine.pressing().is_empty());
    }

    #[test]
    fn test_removal_clears_focus() {
        let mut machine = InteractionMachine::new(ms(800));
        let ext = external("x", EmotionCategory::Negative);
        machine.click(&ext, true);
        assert!(machine.mark_removed(ext.id()));
        assert_eq!(machine.focus(), &FocusState::Idle);
    }
}
