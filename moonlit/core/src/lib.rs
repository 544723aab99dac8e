//! Moonlit Core - Headless Sky Engine for Moonlit
//!
//! This crate holds everything Moonlit knows about its sky: where each emotional
//! note sits around the moon, how long it glows, when a held meteor disappears,
//! who is replying to which broadcast, and which flowers have been planted. It is
//! completely independent of any UI framework and can drive a web view, a
//! desktop window, a terminal, or run headless for testing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         UI Surfaces                             │
//! │   ┌─────────┐   ┌──────────┐   ┌────────────────────────────┐   │
//! │   │   Web   │   │ Desktop  │   │  Headless (stdin / tests)  │   │
//! │   └────┬────┘   └────┬─────┘   └─────────────┬──────────────┘   │
//! │        └─────────────┴───────────────────────┘                  │
//! │                          │                                      │
//! │                    SkyEvent (up)                                │
//! │                   SkyMessage (down)                             │
//! └──────────────────────────┼──────────────────────────────────────┘
//!                            │
//! ┌──────────────────────────┼──────────────────────────────────────┐
//! │                    MOONLIT CORE                                 │
//! │  ┌───────────────────────┴───────────────────────────────────┐  │
//! │  │                      Observatory                          │  │
//! │  │  ┌─────────┐ ┌───────────┐ ┌───────────┐ ┌─────────────┐  │  │
//! │  │  │  Entry  │ │ Placement │ │ Lifecycle │ │ Interaction │  │  │
//! │  │  │  Store  │ │  Engine   │ │ + Timers  │ │   Machine   │  │  │
//! │  │  └─────────┘ └───────────┘ └───────────┘ └─────────────┘  │  │
//! │  │  ┌────────────┐ ┌──────────┐ ┌──────────────────────────┐ │  │
//! │  │  │ Visibility │ │  Garden  │ │ Emotion Classifier (LLM) │ │  │
//! │  │  └────────────┘ └──────────┘ └──────────────────────────┘ │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Observatory`]: The orchestrator that owns all sky state
//! - [`SkyEvent`]: User actions sent from a surface to the Observatory
//! - [`SkyMessage`]: Render directives sent from the Observatory to a surface
//! - [`EntryStore`]: Every note, local or broadcast, in display order
//! - [`PlacementEngine`]: Rejection-sampling placement around the moon
//! - [`EmotionClassifier`]: The injected model that labels each note
//!
//! # Quick Start
//!
//! ```ignore
//! use moonlit_core::{AnyClassifier, ClassifierConfig, Observatory, ObservatoryConfig, SkyEvent};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (tx, mut rx) = mpsc::channel(100);
//!
//!     let classifier = AnyClassifier::from_config(&ClassifierConfig::default());
//!     let mut observatory = Observatory::new(classifier, ObservatoryConfig::default(), tx);
//!     observatory.start().await?;
//!
//!     observatory
//!         .handle_event(SkyEvent::Submit {
//!             text: "the first snow fell today".to_string(),
//!             visibility: Default::default(),
//!             starred: false,
//!         })
//!         .await?;
//!
//!     loop {
//!         // Fire due timers (glow expiry, decay, fades, notices)
//!         observatory.tick().await;
//!
//!         while let Ok(msg) = rx.try_recv() {
//!             // Render message
//!         }
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`entries`]: Entries, replies, and the entry store
//! - [`placement`]: Body placement around the moon
//! - [`lifecycle`]: Fresh glow, decay, and reply fade
//! - [`timers`]: Timer registry and clocks
//! - [`interaction`]: Reply focus and press-and-hold
//! - [`visibility`]: Radio channel gating
//! - [`garden`]: Flowers and star credits
//! - [`classifier`]: Emotion classifier backends (Ollama, chat completions)
//! - [`events`]: Events from surfaces to the Observatory
//! - [`messages`]: Messages from the Observatory to surfaces
//! - [`observatory`]: Main Observatory struct
//! - [`config`]: TOML and environment configuration

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classifier;
pub mod config;
pub mod entries;
pub mod events;
pub mod garden;
pub mod interaction;
pub mod lifecycle;
pub mod messages;
pub mod observatory;
pub mod placement;
pub mod timers;
pub mod visibility;

// Re-exports for convenience
pub use classifier::{
    AnyClassifier, ChatCompletionsClassifier, ClassifierConfig, ClassifierError,
    EmotionClassifier, OllamaClassifier,
};
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_env, ClassifierKind,
    ConfigError, ConfigSource, MoonlitConfigFile, MoonlitToml,
};
pub use entries::{
    EmotionCategory, Entry, EntryId, EntryStore, Origin, ReplySet, StoreError, Visibility,
};
pub use events::SkyEvent;
pub use garden::{Flower, FlowerId, FlowerStyle, Garden, GardenConfig, PlantError, StarCredits};
pub use interaction::{FocusState, InteractionMachine, PressPhase, ReplyOutcome};
pub use lifecycle::{FadeState, LifecycleController};
pub use messages::{BodySnapshot, NoticeKind, SkyMessage};
pub use observatory::{Observatory, ObservatoryConfig};
pub use placement::{
    MoonGeometry, Placement, PlacementConfig, PlacementEngine, PlacementReport, Position,
    SafeRect, Viewport,
};
pub use timers::{Clock, ManualClock, SystemClock, TimerKey, TimerRegistry, TimingConfig};
pub use visibility::{is_visible, visible_entries, RadioChannel};
