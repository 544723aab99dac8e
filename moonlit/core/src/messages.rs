//! Sky Messages
//!
//! Messages sent from the Observatory to whatever renders the sky. A surface is a
//! pure renderer: it draws bodies where it is told, shows notices for as long as
//! it is told, and forwards user input back as [`crate::events::SkyEvent`]s.
//!
//! Every state change produces a specific message followed by a
//! [`SkyMessage::Frame`] carrying the full visible state, so a surface can either
//! animate the individual transitions or just redraw each frame.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entries::{EmotionCategory, EntryId, Origin};
use crate::garden::Flower;
use crate::interaction::PressPhase;
use crate::lifecycle::FadeState;
use crate::placement::Position;

/// Messages from the Observatory to a surface
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkyMessage {
    // ============================================
    // Bodies
    // ============================================
    /// A body appeared (new local entry, or a broadcast arriving while the radio is on)
    BodyCreated {
        /// Full body state
        body: BodySnapshot,
    },

    /// The fresh glow of a body ended
    BodyGlowEnded {
        /// Body whose glow ended
        id: EntryId,
    },

    /// A body was removed from the sky for good
    BodyRemoved {
        /// Removed body
        id: EntryId,
    },

    /// A replied broadcast finished fading; it stays in the sky, dimmed
    BodyFaded {
        /// Faded body
        id: EntryId,
    },

    // ============================================
    // Reply Box
    // ============================================
    /// Reply box opened for a body
    BodyFocused {
        /// Focused body
        id: EntryId,
        /// Sender shown in the reply box header
        sender: Option<String>,
        /// Content being replied to
        content: String,
    },

    /// Reply box closed
    FocusCleared {
        /// Body that lost focus
        id: EntryId,
    },

    /// A reply was stored
    ReplyRecorded {
        /// Body replied to
        id: EntryId,
        /// Trimmed reply text
        reply: String,
        /// Number of distinct replies on the body
        reply_count: usize,
    },

    // ============================================
    // Press and Hold
    // ============================================
    /// A meteor is being held
    PressStarted {
        /// Held meteor
        id: EntryId,
        /// Hold needed before it is released, in milliseconds
        hold_ms: u64,
    },

    /// A hold ended before the threshold
    PressCanceled {
        /// Meteor that was let go
        id: EntryId,
    },

    /// A meteor reached the hold threshold and is disappearing
    BodyDecaying {
        /// Decaying meteor
        id: EntryId,
        /// Time until removal, in milliseconds
        remaining_ms: u64,
    },

    // ============================================
    // Sky-wide State
    // ============================================
    /// Radio channel switched
    RadioChanged {
        /// New channel state
        on: bool,
    },

    /// Bulk clear finished
    Cleared {
        /// Bodies removed by the clear
        removed: Vec<EntryId>,
        /// Credits after the clear
        credits: u32,
    },

    /// A flower was planted on the moon
    FlowerPlanted {
        /// The new flower
        flower: Flower,
        /// Credits left
        credits: u32,
    },

    // ============================================
    // Notices
    // ============================================
    /// Show a transient notice
    NoticeShown {
        /// Which notice
        kind: NoticeKind,
        /// Text to display
        text: String,
        /// How long it stays up, in milliseconds
        duration_ms: u64,
    },

    /// Hide a notice
    NoticeDismissed {
        /// Which notice
        kind: NoticeKind,
    },

    // ============================================
    // Frames
    // ============================================
    /// Full visible state
    Frame {
        /// Visible bodies in store order
        bodies: Vec<BodySnapshot>,
        /// Planted flowers
        flowers: Vec<Flower>,
        /// Star credits available
        credits: u32,
        /// Radio channel state
        radio_on: bool,
    },
}

impl SkyMessage {
    /// Short name for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BodyCreated { .. } => "body_created",
            Self::BodyGlowEnded { .. } => "body_glow_ended",
            Self::BodyRemoved { .. } => "body_removed",
            Self::BodyFaded { .. } => "body_faded",
            Self::BodyFocused { .. } => "body_focused",
            Self::FocusCleared { .. } => "focus_cleared",
            Self::ReplyRecorded { .. } => "reply_recorded",
            Self::PressStarted { .. } => "press_started",
            Self::PressCanceled { .. } => "press_canceled",
            Self::BodyDecaying { .. } => "body_decaying",
            Self::RadioChanged { .. } => "radio_changed",
            Self::Cleared { .. } => "cleared",
            Self::FlowerPlanted { .. } => "flower_planted",
            Self::NoticeShown { .. } => "notice_shown",
            Self::NoticeDismissed { .. } => "notice_dismissed",
            Self::Frame { .. } => "frame",
        }
    }
}

/// Transient notices a surface can show
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Greeting when the sky opens
    Welcome,
    /// Acknowledgement after replying to a broadcast
    ReplySent,
    /// Radio switched on
    RadioTuned,
    /// A meteor was released
    MeteorReleased,
    /// Not enough credits to plant a flower
    StarsNotEnough,
}

impl NoticeKind {
    /// Text shown to the user
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::Welcome => "Every little feeling you have will find its place here.",
            Self::ReplySent => "Your reply is drifting across the sky to them.",
            Self::RadioTuned => "Radio on. You can hear what others sent to the moon.",
            Self::MeteorReleased => "That meteor is gone. Let it go with it.",
            Self::StarsNotEnough => "Not enough stars yet. Keep gathering light!",
        }
    }
}

/// Everything a surface needs to draw one body
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    /// Entry ID
    pub id: EntryId,
    /// Emotional category
    pub category: EmotionCategory,
    /// Note text
    pub content: String,
    /// Sender label (broadcasts only)
    pub sender: Option<String>,
    /// Local or broadcast
    pub origin: Origin,
    /// Kept across a bulk clear
    pub starred: bool,
    /// When the note was written
    pub created_at: DateTime<Utc>,
    /// Placed position in viewport pixels
    pub position: Position,
    /// Fresh glow active
    pub is_new: bool,
    /// Decaying toward removal
    pub disappearing: bool,
    /// A reply has been recorded
    pub replied: bool,
    /// Reply fade progress, if any
    pub fade: Option<FadeState>,
    /// Reply box open for this body
    pub focused: bool,
    /// Press-and-hold phase
    pub press: PressPhase,
    /// Distinct replies in order
    pub replies: Vec<String>,
}
