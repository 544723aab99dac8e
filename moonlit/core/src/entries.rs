//! Entry Store
//!
//! Emotional entries ("celestial bodies") and the ordered store that owns them.
//! This module defines the data structures; the Observatory handles orchestration.
//!
//! # Design Philosophy
//!
//! An entry is written once: its category, content, origin and creation time never
//! change. The only things that grow are its replies, and the only transient flag it
//! carries is `is_new`. Everything else that changes over an entry's life (fading,
//! decaying, being pressed) lives in the lifecycle and interaction controllers.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entry identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl EntryId {
    /// Create an entry ID from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique entry ID
    ///
    /// IDs combine a millisecond timestamp with a process-wide counter, so an ID is
    /// never handed out twice within a process.
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};

        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let count = COUNTER.fetch_add(1, Ordering::SeqCst);
        let timestamp = Utc::now().timestamp_millis();

        Self(format!("entry_{timestamp}_{count}"))
    }

    /// Get the string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Emotional category assigned by the classifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionCategory {
    /// Positive note, shown as a star
    Positive,
    /// Negative note, shown as a meteor
    Negative,
    /// Neutral note
    Received,
}

impl EmotionCategory {
    /// Map a free-form model reply onto a category
    ///
    /// The reply is lower-cased and searched for "positive" first, then "negative".
    /// Anything else (including an empty reply) is `Received`.
    #[must_use]
    pub fn from_model_reply(reply: &str) -> Self {
        let reply = reply.trim().to_lowercase();
        if reply.contains("positive") {
            Self::Positive
        } else if reply.contains("negative") {
            Self::Negative
        } else {
            Self::Received
        }
    }

    /// Name of the body this category is drawn as
    #[must_use]
    pub fn body_name(self) -> &'static str {
        match self {
            Self::Positive => "star",
            Self::Negative => "meteor",
            Self::Received => "received",
        }
    }

    /// Whether bodies of this category accept the press-and-hold release gesture
    #[must_use]
    pub fn is_meteor(self) -> bool {
        matches!(self, Self::Negative)
    }

    /// Human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Received => "received",
        }
    }
}

impl std::fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Who the author intended to share an entry with
///
/// Informational only: display gating is decided by [`Origin`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Only the author
    #[default]
    Private,
    /// The author's friends
    Friends,
    /// Anyone listening on the radio channel
    Broadcast,
}

/// Where an entry came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Written by the local user
    Local,
    /// Received over the broadcast channel from another sender
    External,
}

/// Replies attached to an entry
///
/// Replies are unique and kept in the order they were first recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplySet {
    replies: Vec<String>,
}

impl ReplySet {
    /// Create an empty reply set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reply unless an identical one is already present
    ///
    /// Returns true if the set grew.
    pub fn append_unique(&mut self, reply: impl Into<String>) -> bool {
        let reply = reply.into();
        if self.replies.contains(&reply) {
            return false;
        }
        self.replies.push(reply);
        true
    }

    /// Whether the reply is present
    #[must_use]
    pub fn contains(&self, reply: &str) -> bool {
        self.replies.iter().any(|r| r == reply)
    }

    /// Number of replies
    #[must_use]
    pub fn len(&self) -> usize {
        self.replies.len()
    }

    /// Whether there are no replies
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }

    /// Replies in recording order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.replies.iter().map(String::as_str)
    }

    /// Owned copy of the replies in recording order
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.replies.clone()
    }
}

/// An emotional entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entry {
    id: EntryId,
    category: EmotionCategory,
    content: String,
    created_at: DateTime<Utc>,
    starred: bool,
    visibility: Visibility,
    origin: Origin,
    sender: Option<String>,
    is_new: bool,
    replies: ReplySet,
}

impl Entry {
    /// Create a freshly submitted local entry
    ///
    /// Local entries start out new; the lifecycle controller clears the flag.
    #[must_use]
    pub fn local(
        id: EntryId,
        category: EmotionCategory,
        content: impl Into<String>,
        visibility: Visibility,
        starred: bool,
    ) -> Self {
        Self {
            id,
            category,
            content: content.into(),
            created_at: Utc::now(),
            starred,
            visibility,
            origin: Origin::Local,
            sender: None,
            is_new: true,
            replies: ReplySet::new(),
        }
    }

    /// Create an entry received over the broadcast channel
    #[must_use]
    pub fn external(
        id: EntryId,
        sender: impl Into<String>,
        category: EmotionCategory,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            category,
            content: content.into(),
            created_at,
            starred: false,
            visibility: Visibility::Broadcast,
            origin: Origin::External,
            sender: Some(sender.into()),
            is_new: false,
            replies: ReplySet::new(),
        }
    }

    /// Entry ID
    #[must_use]
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    /// Emotional category
    #[must_use]
    pub fn category(&self) -> EmotionCategory {
        self.category
    }

    /// Entry text
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Creation time
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the author starred the entry
    #[must_use]
    pub fn starred(&self) -> bool {
        self.starred
    }

    /// Sharing intent
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Where the entry came from
    #[must_use]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Whether the entry came from another sender
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.origin == Origin::External
    }

    /// Display name of the sender (external entries only)
    #[must_use]
    pub fn sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    /// Whether the entry is still inside its fresh window
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Replies recorded so far
    #[must_use]
    pub fn replies(&self) -> &ReplySet {
        &self.replies
    }
}

/// Errors raised by the entry store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An entry with this ID is already stored
    #[error("entry {0} already exists")]
    DuplicateId(EntryId),

    /// The ID belonged to an entry that has been removed
    #[error("entry {0} was removed and cannot be re-added")]
    Retired(EntryId),
}

/// Ordered collection of entries
///
/// Keeps insertion order for display and remembers every removed ID so a removed
/// entry can never come back.
#[derive(Clone, Debug, Default)]
pub struct EntryStore {
    /// All entries, keyed by ID
    entries: HashMap<EntryId, Entry>,
    /// Order of insertion for consistent display
    order: Vec<EntryId>,
    /// IDs of removed entries
    retired: HashSet<EntryId>,
}

impl EntryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new entry
    pub fn insert(&mut self, entry: Entry) -> Result<(), StoreError> {
        let id = entry.id.clone();
        if self.retired.contains(&id) {
            return Err(StoreError::Retired(id));
        }
        if self.entries.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }

        self.entries.insert(id.clone(), entry);
        self.order.push(id);
        Ok(())
    }

    /// Get an entry by ID
    #[must_use]
    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.get(id)
    }

    /// Whether an entry with this ID is stored
    #[must_use]
    pub fn contains(&self, id: &EntryId) -> bool {
        self.entries.contains_key(id)
    }

    /// Whether this ID belonged to a removed entry
    #[must_use]
    pub fn is_retired(&self, id: &EntryId) -> bool {
        self.retired.contains(id)
    }

    /// Append a reply to an entry
    ///
    /// Returns `None` for an unknown entry, otherwise whether the reply set grew.
    pub fn append_reply(&mut self, id: &EntryId, reply: impl Into<String>) -> Option<bool> {
        self.entries
            .get_mut(id)
            .map(|entry| entry.replies.append_unique(reply))
    }

    /// Clear the fresh flag on an entry
    ///
    /// Returns true if the flag was set.
    pub fn clear_new(&mut self, id: &EntryId) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) if entry.is_new => {
                entry.is_new = false;
                true
            }
            _ => false,
        }
    }

    /// Remove an entry permanently
    pub fn remove(&mut self, id: &EntryId) -> Option<Entry> {
        let entry = self.entries.remove(id)?;
        self.order.retain(|existing| existing != id);
        self.retired.insert(id.clone());
        Some(entry)
    }

    /// Remove every entry that is not starred
    ///
    /// Returns the IDs that were removed, in display order.
    pub fn retain_starred(&mut self) -> Vec<EntryId> {
        let removed: Vec<EntryId> = self
            .order
            .iter()
            .filter(|id| self.entries.get(*id).is_some_and(|e| !e.starred))
            .cloned()
            .collect();

        for id in &removed {
            self.entries.remove(id);
            self.retired.insert(id.clone());
        }
        self.order.retain(|id| self.entries.contains_key(id));

        removed
    }

    /// Number of starred entries with a positive category
    #[must_use]
    pub fn starred_positive_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.starred && e.category == EmotionCategory::Positive)
            .count()
    }

    /// All entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Entry IDs in insertion order
    #[must_use]
    pub fn ids(&self) -> Vec<EntryId> {
        self.order.clone()
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
