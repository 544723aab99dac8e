//! Visibility Gate
//!
//! Local entries are always shown. Broadcast entries from other senders are shown
//! only while the radio channel is on.

use serde::{Deserialize, Serialize};

use crate::entries::{Entry, Origin};

/// Whether an entry is shown for the given channel state
#[must_use]
pub fn is_visible(entry: &Entry, channel_on: bool) -> bool {
    match entry.origin() {
        Origin::Local => true,
        Origin::External => channel_on,
    }
}

/// Filter entries down to the ones that are shown
pub fn visible_entries<'a>(
    entries: impl IntoIterator<Item = &'a Entry>,
    channel_on: bool,
) -> impl Iterator<Item = &'a Entry> {
    entries
        .into_iter()
        .filter(move |entry| is_visible(entry, channel_on))
}

/// The radio (broadcast) channel toggle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioChannel {
    on: bool,
}

impl RadioChannel {
    /// Whether the channel is on
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Set the channel state; returns true if it changed
    pub fn set(&mut self, on: bool) -> bool {
        let changed = self.on != on;
        self.on = on;
        changed
    }
}
