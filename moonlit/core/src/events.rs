//! Sky Events
//!
//! Events sent from a surface to the Observatory. A surface reports what the user
//! did; the Observatory decides what it means.

use serde::{Deserialize, Serialize};

use crate::entries::{EmotionCategory, EntryId, Visibility};
use crate::garden::FlowerStyle;

/// Events from a surface to the Observatory
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkyEvent {
    // ============================================
    // Writing
    // ============================================
    /// User sent a note to the moon
    Submit {
        /// Raw note text (trimmed by the Observatory)
        text: String,
        /// Who the note is meant for
        #[serde(default)]
        visibility: Visibility,
        /// Keep the note across a bulk clear
        #[serde(default)]
        starred: bool,
    },

    /// A note came back from the classifier and can be placed
    ///
    /// Produced by the future from `Observatory::classify_submission`, so the
    /// model call never holds up ticks or other events.
    Classified {
        /// Trimmed note text
        text: String,
        /// Category the classifier chose
        category: EmotionCategory,
        /// Who the note is meant for
        #[serde(default)]
        visibility: Visibility,
        /// Keep the note across a bulk clear
        #[serde(default)]
        starred: bool,
    },

    // ============================================
    // Replying
    // ============================================
    /// User clicked a body
    BodyClicked {
        /// Clicked body
        id: EntryId,
    },

    /// User sent a reply from the open reply box
    ReplySubmitted {
        /// Raw reply text
        text: String,
    },

    /// User closed the reply box
    ReplyClosed,

    // ============================================
    // Press and Hold
    // ============================================
    /// Pointer went down on a body
    PressStarted {
        /// Pressed body
        id: EntryId,
    },

    /// Pointer went up on, or left, a body
    PressReleased {
        /// Released body
        id: EntryId,
    },

    // ============================================
    // Controls
    // ============================================
    /// Radio button pressed
    RadioToggled,

    /// Clear button pressed
    ClearRequested,

    /// A flower style was picked from the menu
    PlantFlower {
        /// Chosen style
        style: FlowerStyle,
    },

    /// Pointer is over the plant button
    PlantHovered,

    /// Pointer left the plant button
    PlantUnhovered,

    /// Viewport changed size
    Resized {
        /// New width in pixels
        width: f64,
        /// New height in pixels
        height: f64,
    },
}

impl SkyEvent {
    /// Short name for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "submit",
            Self::Classified { .. } => "classified",
            Self::BodyClicked { .. } => "body_clicked",
            Self::ReplySubmitted { .. } => "reply_submitted",
            Self::ReplyClosed => "reply_closed",
            Self::PressStarted { .. } => "press_started",
            Self::PressReleased { .. } => "press_released",
            Self::RadioToggled => "radio_toggled",
            Self::ClearRequested => "clear_requested",
            Self::PlantFlower { .. } => "plant_flower",
            Self::PlantHovered => "plant_hovered",
            Self::PlantUnhovered => "plant_unhovered",
            Self::Resized { .. } => "resized",
        }
    }
}
