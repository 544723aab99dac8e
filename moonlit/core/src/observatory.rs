//! Observatory - The Sky Orchestrator
//!
//! The Observatory owns every piece of sky state and is the only thing a surface
//! talks to. It communicates through:
//! - `SkyEvent`: user actions received FROM the surface
//! - `SkyMessage`: render directives sent TO the surface
//!
//! Time moves only when [`Observatory::tick`] is called. Each tick fires every
//! timer that is due, oldest deadline first, and follow-up timers are scheduled
//! from the deadline that fired rather than from the tick. A late tick therefore
//! produces exactly the same sequence of messages as a punctual one.
//!
//! Classification is the one slow step. [`Observatory::classify_submission`]
//! hands back a future that owns its own classifier handle; a driver spawns it
//! and feeds the resulting [`SkyEvent::Classified`] back in, so presses,
//! releases and ticks keep flowing while the model thinks.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

use crate::classifier::EmotionClassifier;
use crate::entries::{EmotionCategory, Entry, EntryId, EntryStore, Visibility};
use crate::events::SkyEvent;
use crate::garden::{Flower, FlowerStyle, Garden, GardenConfig};
use crate::interaction::{FocusState, InteractionMachine, PressPhase, ReplyOutcome};
use crate::lifecycle::LifecycleController;
use crate::messages::{BodySnapshot, NoticeKind, SkyMessage};
use crate::placement::{MoonGeometry, PlacementConfig, PlacementEngine, Position, Viewport};
use crate::timers::{Clock, SystemClock, TimerKey, TimerRegistry, TimingConfig};
use crate::visibility::{is_visible, RadioChannel};

/// Observatory configuration
#[derive(Clone, Debug)]
pub struct ObservatoryConfig {
    /// Body placement tuning
    pub placement: PlacementConfig,
    /// Lifecycle and notice durations
    pub timing: TimingConfig,
    /// Flower planting tuning
    pub garden: GardenConfig,
    /// Initial viewport; the moon centre is derived from it once
    pub viewport: Viewport,
    /// Seed the two default broadcasts on start
    pub seed_broadcasts: bool,
    /// Fixed RNG seed for reproducible layouts (entropy when `None`)
    pub rng_seed: Option<u64>,
}

impl Default for ObservatoryConfig {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            timing: TimingConfig::default(),
            garden: GardenConfig::default(),
            viewport: Viewport::default(),
            seed_broadcasts: true,
            rng_seed: None,
        }
    }
}

/// The Observatory - sky orchestrator
pub struct Observatory<C: EmotionClassifier> {
    config: ObservatoryConfig,
    classifier: Arc<C>,
    /// Channel to send messages to the surface
    tx: mpsc::Sender<SkyMessage>,
    clock: Arc<dyn Clock>,

    store: EntryStore,
    /// Cached body positions, including bodies currently hidden by the radio
    positions: HashMap<EntryId, Position>,
    placement: PlacementEngine,
    moon: MoonGeometry,
    viewport: Viewport,

    lifecycle: LifecycleController,
    interaction: InteractionMachine,
    radio: RadioChannel,
    garden: Garden,
    flower_rng: StdRng,

    timers: TimerRegistry,
    /// Notices currently on screen
    notices: HashSet<NoticeKind>,
    /// The stars notice on screen was opened by hovering the plant button
    hover_notice: bool,
    started: bool,
}

impl<C: EmotionClassifier> Observatory<C> {
    /// Create an Observatory on the system clock
    pub fn new(classifier: C, config: ObservatoryConfig, tx: mpsc::Sender<SkyMessage>) -> Self {
        Self::with_clock(classifier, config, tx, Arc::new(SystemClock::new()))
    }

    /// Create an Observatory on a caller-supplied clock
    pub fn with_clock(
        classifier: C,
        config: ObservatoryConfig,
        tx: mpsc::Sender<SkyMessage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (placement, flower_rng) = match config.rng_seed {
            Some(seed) => (
                PlacementEngine::with_seed(config.placement.clone(), seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (
                PlacementEngine::new(config.placement.clone()),
                StdRng::from_entropy(),
            ),
        };
        let moon = config.placement.moon_for(config.viewport);

        Self {
            classifier: Arc::new(classifier),
            tx,
            clock,
            store: EntryStore::new(),
            positions: HashMap::new(),
            placement,
            moon,
            viewport: config.viewport,
            lifecycle: LifecycleController::new(config.timing.clone()),
            interaction: InteractionMachine::new(config.timing.press_hold),
            radio: RadioChannel::default(),
            garden: Garden::new(config.garden.clone()),
            flower_rng,
            timers: TimerRegistry::new(),
            notices: HashSet::new(),
            hover_notice: false,
            started: false,
            config,
        }
    }

    // ============================================
    // Accessors
    // ============================================

    /// Configuration in use
    pub fn config(&self) -> &ObservatoryConfig {
        &self.config
    }

    /// Classifier in use
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// All entries, visible or not
    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// Cached position of a body
    pub fn position(&self, id: &EntryId) -> Option<Position> {
        self.positions.get(id).copied()
    }

    /// Moon geometry (fixed for the life of the Observatory)
    pub fn moon(&self) -> MoonGeometry {
        self.moon
    }

    /// Current viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Reply-box focus
    pub fn focus(&self) -> &FocusState {
        self.interaction.focus()
    }

    /// Press-and-hold phase of a body
    pub fn press_phase(&self, id: &EntryId) -> PressPhase {
        if self.store.is_retired(id) {
            PressPhase::Removed
        } else {
            self.interaction.press_phase(id)
        }
    }

    /// Whether a body is decaying
    pub fn is_disappearing(&self, id: &EntryId) -> bool {
        self.lifecycle.is_disappearing(id)
    }

    /// Whether the radio channel is on
    pub fn radio_on(&self) -> bool {
        self.radio.is_on()
    }

    /// Star credits available
    pub fn credits(&self) -> u32 {
        self.garden.credits()
    }

    /// Planted flowers
    pub fn flowers(&self) -> &[Flower] {
        self.garden.flowers()
    }

    /// Whether a notice is on screen
    pub fn is_notice_active(&self, kind: NoticeKind) -> bool {
        self.notices.contains(&kind)
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    // ============================================
    // Lifecycle
    // ============================================

    /// Start the Observatory: seed broadcasts, greet, send the first frame
    pub async fn start(&mut self) -> anyhow::Result<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;

        if self.config.seed_broadcasts {
            self.insert_external(
                EntryId::new("external-1"),
                "Xiao Ming",
                "What lovely weather today!",
                EmotionCategory::Positive,
                Duration::from_secs(60 * 60),
            )
            .await?;
            self.insert_external(
                EntryId::new("external-2"),
                "Xiao Hong",
                "Rainy days are so annoying...",
                EmotionCategory::Negative,
                Duration::from_secs(30 * 60),
            )
            .await?;
        }

        self.show_notice(NoticeKind::Welcome).await;
        self.emit_frame().await;

        tracing::info!(
            entries = self.store.len(),
            classifier = self.classifier.name(),
            "Observatory started"
        );
        Ok(())
    }

    /// Add a broadcast from another sender, written `age` ago
    pub async fn seed_broadcast(
        &mut self,
        sender: &str,
        content: &str,
        category: EmotionCategory,
        age: Duration,
    ) -> anyhow::Result<EntryId> {
        self.insert_external(EntryId::generate(), sender, content, category, age)
            .await
    }

    async fn insert_external(
        &mut self,
        id: EntryId,
        sender: &str,
        content: &str,
        category: EmotionCategory,
        age: Duration,
    ) -> anyhow::Result<EntryId> {
        let age = chrono::Duration::from_std(age).unwrap_or_else(|_| chrono::Duration::zero());
        self.store.insert(Entry::external(
            id.clone(),
            sender,
            category,
            content,
            Utc::now() - age,
        ))?;
        tracing::debug!(
            entry_id = %id,
            sender,
            %category,
            body = category.body_name(),
            "Broadcast received"
        );

        if self.radio.is_on() {
            self.place_visible();
            if let Some(body) = self.body_snapshot(&id, self.clock.now()) {
                self.send(SkyMessage::BodyCreated { body }).await;
            }
            self.emit_frame().await;
        }
        Ok(id)
    }

    /// Handle an event from the surface
    pub async fn handle_event(&mut self, event: SkyEvent) -> anyhow::Result<()> {
        tracing::debug!(event = event.kind(), "Handling sky event");

        match event {
            SkyEvent::Submit {
                text,
                visibility,
                starred,
            } => {
                self.submit(&text, visibility, starred).await?;
            }
            SkyEvent::Classified {
                text,
                category,
                visibility,
                starred,
            } => {
                self.insert_classified(&text, category, visibility, starred)
                    .await?;
            }
            SkyEvent::BodyClicked { id } => self.click(&id).await,
            SkyEvent::ReplySubmitted { text } => {
                self.submit_reply(&text).await;
            }
            SkyEvent::ReplyClosed => self.close_reply().await,
            SkyEvent::PressStarted { id } => {
                self.press_start(&id).await;
            }
            SkyEvent::PressReleased { id } => {
                self.press_release(&id).await;
            }
            SkyEvent::RadioToggled => self.toggle_radio().await,
            SkyEvent::ClearRequested => self.clear().await,
            SkyEvent::PlantFlower { style } => {
                self.plant_flower(style).await;
            }
            SkyEvent::PlantHovered => self.hover_plant().await,
            SkyEvent::PlantUnhovered => self.unhover_plant().await,
            SkyEvent::Resized { width, height } => self.resize(width, height).await,
        }

        Ok(())
    }

    // ============================================
    // Writing
    // ============================================

    /// Classify and add a note
    ///
    /// Whitespace-only text is ignored. The classifier is awaited before the
    /// entry exists and the Observatory is borrowed for the whole call; drivers
    /// that must keep ticking use [`Observatory::classify_submission`] instead.
    pub async fn submit(
        &mut self,
        text: &str,
        visibility: Visibility,
        starred: bool,
    ) -> anyhow::Result<Option<EntryId>> {
        let content = text.trim();
        if content.is_empty() {
            tracing::debug!("Ignoring empty submission");
            return Ok(None);
        }

        let category = self.classifier.classify(content).await;
        self.insert_classified(content, category, visibility, starred)
            .await
    }

    /// Classify a note without holding the Observatory
    ///
    /// Returns `None` for whitespace-only text. The future owns a handle to the
    /// classifier and resolves to a [`SkyEvent::Classified`] that places the note
    /// once it is passed to [`Observatory::handle_event`].
    pub fn classify_submission(
        &self,
        text: &str,
        visibility: Visibility,
        starred: bool,
    ) -> Option<impl Future<Output = SkyEvent> + Send + 'static>
    where
        C: 'static,
    {
        let text = text.trim().to_string();
        if text.is_empty() {
            return None;
        }

        let classifier = Arc::clone(&self.classifier);
        Some(async move {
            let category = classifier.classify(&text).await;
            SkyEvent::Classified {
                text,
                category,
                visibility,
                starred,
            }
        })
    }

    /// Add a note whose category is already known
    pub async fn insert_classified(
        &mut self,
        text: &str,
        category: EmotionCategory,
        visibility: Visibility,
        starred: bool,
    ) -> anyhow::Result<Option<EntryId>> {
        let content = text.trim();
        if content.is_empty() {
            tracing::debug!("Ignoring empty submission");
            return Ok(None);
        }

        let id = EntryId::generate();
        self.store.insert(Entry::local(
            id.clone(),
            category,
            content,
            visibility,
            starred,
        ))?;

        if category == EmotionCategory::Positive {
            self.garden.earn();
        }

        let now = self.clock.now();
        self.lifecycle.on_created(&id, now, &mut self.timers);
        self.place_visible();

        tracing::info!(
            entry_id = %id,
            %category,
            body = category.body_name(),
            starred,
            "Entry created"
        );

        if let Some(body) = self.body_snapshot(&id, now) {
            self.send(SkyMessage::BodyCreated { body }).await;
        }
        self.emit_frame().await;

        Ok(Some(id))
    }

    // ============================================
    // Replying
    // ============================================

    /// Open the reply box for a broadcast
    pub async fn click(&mut self, id: &EntryId) {
        let channel_on = self.radio.is_on();
        let Some(entry) = self
            .store
            .get(id)
            .filter(|entry| is_visible(entry, channel_on))
        else {
            tracing::debug!(entry_id = %id, "Click on unknown or hidden body ignored");
            return;
        };

        let sender = entry.sender().map(str::to_string);
        let content = entry.content().to_string();
        if !self.interaction.click(entry, channel_on) {
            return;
        }

        self.send(SkyMessage::BodyFocused {
            id: id.clone(),
            sender,
            content,
        })
        .await;
        self.emit_frame().await;
    }

    /// Reply to the focused broadcast
    pub async fn submit_reply(&mut self, text: &str) -> ReplyOutcome {
        let outcome = self.interaction.submit_reply(text, &mut self.store);

        if let ReplyOutcome::Recorded {
            id,
            reply,
            added,
            acknowledge,
        } = &outcome
        {
            let reply_count = self.store.get(id).map_or(0, |entry| entry.replies().len());
            tracing::info!(entry_id = %id, added, reply_count, "Reply recorded");

            self.send(SkyMessage::ReplyRecorded {
                id: id.clone(),
                reply: reply.clone(),
                reply_count,
            })
            .await;
            self.send(SkyMessage::FocusCleared { id: id.clone() }).await;

            if *acknowledge {
                let now = self.clock.now();
                self.lifecycle.begin_fade(id, now, &mut self.timers);
                self.show_notice(NoticeKind::ReplySent).await;
            }
            self.emit_frame().await;
        }

        outcome
    }

    /// Close the reply box
    pub async fn close_reply(&mut self) {
        if let Some(id) = self.interaction.close() {
            self.send(SkyMessage::FocusCleared { id }).await;
            self.emit_frame().await;
        }
    }

    // ============================================
    // Press and Hold
    // ============================================

    /// Pointer down on a body
    ///
    /// Returns true if a meteor started (or restarted) its hold.
    pub async fn press_start(&mut self, id: &EntryId) -> bool {
        let now = self.clock.now();
        let channel_on = self.radio.is_on();
        let Some(entry) = self
            .store
            .get(id)
            .filter(|entry| is_visible(entry, channel_on))
        else {
            tracing::debug!(entry_id = %id, "Press on unknown or hidden body ignored");
            return false;
        };

        if !self.interaction.press_start(entry, now, &mut self.timers) {
            return false;
        }

        self.send(SkyMessage::PressStarted {
            id: id.clone(),
            hold_ms: millis(self.config.timing.press_hold),
        })
        .await;
        self.emit_frame().await;
        true
    }

    /// Pointer up on, or off, a body
    ///
    /// Returns true if a pending hold was cancelled.
    pub async fn press_release(&mut self, id: &EntryId) -> bool {
        if !self.interaction.press_release(id, &mut self.timers) {
            return false;
        }

        self.send(SkyMessage::PressCanceled { id: id.clone() }).await;
        self.emit_frame().await;
        true
    }

    // ============================================
    // Controls
    // ============================================

    /// Flip the radio channel
    pub async fn toggle_radio(&mut self) {
        let on = !self.radio.is_on();
        self.set_radio(on).await;
    }

    /// Switch the radio channel
    ///
    /// Switching off drops focus and any pending hold on bodies that become
    /// hidden, in the same step. A decay already under way continues.
    pub async fn set_radio(&mut self, on: bool) {
        if !self.radio.set(on) {
            return;
        }
        tracing::info!(on, "Radio switched");

        let mut defocused = None;
        let mut canceled = Vec::new();
        if on {
            self.place_visible();
        } else {
            defocused = self.interaction.defocus_hidden(&self.store, false);
            for id in self.interaction.pressing() {
                let hidden = self
                    .store
                    .get(&id)
                    .is_some_and(|entry| !is_visible(entry, false));
                if hidden && self.interaction.press_release(&id, &mut self.timers) {
                    canceled.push(id);
                }
            }
        }

        self.send(SkyMessage::RadioChanged { on }).await;
        if let Some(id) = defocused {
            self.send(SkyMessage::FocusCleared { id }).await;
        }
        for id in canceled {
            self.send(SkyMessage::PressCanceled { id }).await;
        }
        if on {
            self.show_notice(NoticeKind::RadioTuned).await;
        }
        self.emit_frame().await;
    }

    /// Remove every unstarred body and every flower
    ///
    /// Credits are recomputed from the starred positive bodies that remain.
    pub async fn clear(&mut self) {
        let removed = self.store.retain_starred();

        let mut defocused = None;
        for id in &removed {
            if self.forget_entry(id) {
                defocused = Some(id.clone());
            }
        }

        let credits = u32::try_from(self.store.starred_positive_count()).unwrap_or(u32::MAX);
        self.garden.reset(credits);
        tracing::info!(removed = removed.len(), credits, "Sky cleared");

        if let Some(id) = defocused {
            self.send(SkyMessage::FocusCleared { id }).await;
        }
        self.send(SkyMessage::Cleared { removed, credits }).await;
        self.emit_frame().await;
    }

    /// Spend credits on a flower
    ///
    /// Without enough credits nothing is planted and a notice is shown instead.
    pub async fn plant_flower(&mut self, style: FlowerStyle) -> Option<Flower> {
        match self.garden.plant(style, &mut self.flower_rng) {
            Ok(flower) => {
                let credits = self.garden.credits();
                tracing::info!(flower_id = %flower.id, credits, "Flower planted");
                self.send(SkyMessage::FlowerPlanted {
                    flower: flower.clone(),
                    credits,
                })
                .await;
                self.emit_frame().await;
                Some(flower)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Plant rejected");
                self.hover_notice = false;
                self.show_notice(NoticeKind::StarsNotEnough).await;
                None
            }
        }
    }

    /// Pointer over the plant button
    pub async fn hover_plant(&mut self) {
        if !self.garden.can_plant() {
            self.show_notice(NoticeKind::StarsNotEnough).await;
            self.hover_notice = true;
        }
    }

    /// Pointer left the plant button
    ///
    /// Takes down the stars notice, but only if hovering put it up.
    pub async fn unhover_plant(&mut self) {
        if !std::mem::take(&mut self.hover_notice) {
            return;
        }
        let kind = NoticeKind::StarsNotEnough;
        self.timers.cancel(&TimerKey::Notice(kind));
        if self.notices.remove(&kind) {
            self.send(SkyMessage::NoticeDismissed { kind }).await;
        }
    }

    /// Viewport changed size
    ///
    /// Placed bodies keep their positions and the moon does not move; only
    /// bodies placed from now on use the new bounds.
    pub async fn resize(&mut self, width: f64, height: f64) {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            tracing::warn!(width, height, "Ignoring invalid viewport size");
            return;
        }
        self.viewport = Viewport::new(width, height);
        tracing::debug!(width, height, "Viewport resized");
        self.place_visible();
        self.emit_frame().await;
    }

    // ============================================
    // Time
    // ============================================

    /// Fire every timer that is due
    ///
    /// Returns how many timers fired. A frame is sent if any did.
    pub async fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;

        while let Some((key, deadline)) = self.timers.pop_due(now) {
            self.fire(key, deadline).await;
            fired += 1;
        }

        if fired > 0 {
            self.emit_frame().await;
        }
        fired
    }

    async fn fire(&mut self, key: TimerKey, deadline: Duration) {
        match key {
            TimerKey::NewGlow(id) => {
                if self.store.clear_new(&id) {
                    self.send(SkyMessage::BodyGlowEnded { id }).await;
                }
            }
            TimerKey::PressHold(id) => {
                if self.interaction.press_timeout(&id) {
                    self.lifecycle.begin_decay(&id, deadline, &mut self.timers);
                    tracing::info!(entry_id = %id, "Meteor held long enough, decaying");
                    self.send(SkyMessage::BodyDecaying {
                        id,
                        remaining_ms: millis(self.config.timing.decay),
                    })
                    .await;
                }
            }
            TimerKey::Decay(id) => {
                if self.store.remove(&id).is_none() {
                    return;
                }
                let was_focused = self.forget_entry(&id);
                tracing::info!(entry_id = %id, "Meteor removed");

                self.send(SkyMessage::BodyRemoved { id: id.clone() }).await;
                if was_focused {
                    self.send(SkyMessage::FocusCleared { id }).await;
                }
                self.show_notice_at(NoticeKind::MeteorReleased, deadline)
                    .await;
            }
            TimerKey::ReplyFade(id) => {
                if self.lifecycle.finish_fade(&id) {
                    self.send(SkyMessage::BodyFaded { id }).await;
                }
            }
            TimerKey::Notice(kind) => {
                if kind == NoticeKind::StarsNotEnough {
                    self.hover_notice = false;
                }
                if self.notices.remove(&kind) {
                    self.send(SkyMessage::NoticeDismissed { kind }).await;
                }
            }
        }
    }

    // ============================================
    // Snapshots
    // ============================================

    /// Visible bodies in store order
    pub fn snapshot(&self) -> Vec<BodySnapshot> {
        let now = self.clock.now();
        self.store
            .iter()
            .filter_map(|entry| self.body_snapshot(entry.id(), now))
            .collect()
    }

    fn body_snapshot(&self, id: &EntryId, now: Duration) -> Option<BodySnapshot> {
        let entry = self.store.get(id)?;
        if !is_visible(entry, self.radio.is_on()) {
            return None;
        }
        let position = *self.positions.get(id)?;

        Some(BodySnapshot {
            id: id.clone(),
            category: entry.category(),
            content: entry.content().to_string(),
            sender: entry.sender().map(str::to_string),
            origin: entry.origin(),
            starred: entry.starred(),
            created_at: entry.created_at(),
            position,
            is_new: entry.is_new(),
            disappearing: self.lifecycle.is_disappearing(id),
            replied: self.interaction.is_replied(id),
            fade: self.lifecycle.fade(id, now),
            focused: self.interaction.focused_id() == Some(id),
            press: self.interaction.press_phase(id),
            replies: entry.replies().to_vec(),
        })
    }

    /// Send the full visible state
    pub async fn emit_frame(&self) {
        self.send(SkyMessage::Frame {
            bodies: self.snapshot(),
            flowers: self.garden.flowers().to_vec(),
            credits: self.garden.credits(),
            radio_on: self.radio.is_on(),
        })
        .await;
    }

    // ============================================
    // Helpers
    // ============================================

    /// Place every visible body that has no position yet
    fn place_visible(&mut self) {
        let channel_on = self.radio.is_on();
        let pending: Vec<EntryId> = self
            .store
            .iter()
            .filter(|entry| is_visible(entry, channel_on) && !self.positions.contains_key(entry.id()))
            .map(|entry| entry.id().clone())
            .collect();
        if pending.is_empty() {
            return;
        }

        let report =
            self.placement
                .assign_positions(&pending, &self.positions, self.viewport, &self.moon);
        let degraded = report.degraded_count();
        if degraded > 0 {
            tracing::debug!(degraded, "Some bodies overlap; the sky is crowded");
        }
        self.positions = report.positions;
    }

    /// Drop everything held for a body that left the store
    ///
    /// Returns true if the body was focused.
    fn forget_entry(&mut self, id: &EntryId) -> bool {
        self.lifecycle.forget(id, &mut self.timers);
        self.positions.remove(id);
        self.interaction.mark_removed(id)
    }

    async fn show_notice(&mut self, kind: NoticeKind) {
        let now = self.clock.now();
        self.show_notice_at(kind, now).await;
    }

    /// Show a notice as of `at`; showing it again restarts its timer
    async fn show_notice_at(&mut self, kind: NoticeKind, at: Duration) {
        let duration = self.config.timing.notice_duration(kind);
        self.timers.schedule(TimerKey::Notice(kind), at + duration);
        self.notices.insert(kind);

        self.send(SkyMessage::NoticeShown {
            kind,
            text: kind.text().to_string(),
            duration_ms: millis(duration),
        })
        .await;
    }

    /// Send a message to the surface
    async fn send(&self, msg: SkyMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
