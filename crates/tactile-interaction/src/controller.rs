//! The interaction state machine: turns held pointer buttons into digs,
//! placements, item use and entity interactions, one tick at a time.
//!
//! The controller owns all session state. Every entry point takes the host by
//! reference, runs to completion, and leaves its output in the action and
//! event queues for the host to drain. Handlers that need a fresh evaluation
//! flip a button and call [`InteractionController::update`] again before
//! returning.

use std::collections::VecDeque;
use std::time::Duration;

use glam::DVec3;
use tactile_config::BlockInteractionKind;
use tactile_placement::{PlacementContext, PlacementOutcome, PlacementRequest, predict_placement};
use tactile_targeting::{Viewer, clip_reach, resolve_target_entity};
use tactile_world::{
    Block, BlockHit, BlockPos, EntityId, EntitySnapshot, GameMode, Hand, ItemStack, PlayerView,
    StateId,
};

use crate::action::{ENTITY_INTERACT_CURSOR, EntityInteraction, InteractionEvent, ProtocolAction};
use crate::error::InteractionError;
use crate::host::{HostFeature, InteractionHost};
use crate::settings::{BreakTimeOverrides, InteractionSettings, ServerSettings};
use crate::state::{
    ButtonState, CurrentBreak, CursorState, DigSession, DigStatus, ItemUseSession, StopReason,
};
use crate::timer::{TimerId, TimerWheel};

/// Rejection message of a dig that the client itself cancelled.
pub const DIG_ABORTED_MESSAGE: &str = "Digging aborted";

#[derive(Debug, Clone, PartialEq)]
enum TimerTask {
    ArmSwingEnd,
    PredictedWrite {
        reference: BlockPos,
        position: BlockPos,
        state_id: StateId,
    },
}

/// Per-session interaction state machine.
pub struct InteractionController {
    settings: InteractionSettings,
    break_times: BreakTimeOverrides,

    buttons: ButtonState,
    last_buttons: ButtonState,
    cursor_block: Option<BlockHit>,

    dig: Option<DigSession>,
    progress_stage: Option<u8>,
    current_break: Option<CurrentBreak>,
    prev_on_ground: Option<bool>,
    last_dug: Option<BlockPos>,
    last_dug_time: Option<Duration>,
    broken: VecDeque<Block>,
    dig_status: DigStatus,
    last_stop_reason: Option<StopReason>,

    right_click_delay: u32,
    last_swing: Option<Duration>,
    item_in_use: Option<ItemUseSession>,

    timers: TimerWheel<TimerTask>,
    swing_timer: Option<TimerId>,
    actions: Vec<ProtocolAction>,
    events: Vec<InteractionEvent>,
    ended: bool,
}

impl InteractionController {
    /// Creates a controller for a new session.
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            right_click_delay: settings.place_cooldown_ticks,
            broken: VecDeque::with_capacity(settings.broken_history_len),
            settings,
            break_times: BreakTimeOverrides::default(),
            buttons: ButtonState::default(),
            last_buttons: ButtonState::default(),
            cursor_block: None,
            dig: None,
            progress_stage: None,
            current_break: None,
            prev_on_ground: None,
            last_dug: None,
            last_dug_time: None,
            dig_status: DigStatus::None,
            last_stop_reason: None,
            last_swing: None,
            item_in_use: None,
            timers: TimerWheel::new(),
            swing_timer: None,
            actions: Vec::new(),
            events: Vec::new(),
            ended: false,
        }
    }

    // -----------------------------------------------------------------------
    // Button entry points
    // -----------------------------------------------------------------------

    /// Primary button pressed.
    pub fn attack_start<H>(&mut self, host: &mut H) -> Result<(), InteractionError>
    where
        H: InteractionHost + ?Sized,
    {
        self.buttons.attack = true;
        self.update(host)
    }

    /// Primary button released.
    pub fn attack_end<H>(&mut self, host: &mut H) -> Result<(), InteractionError>
    where
        H: InteractionHost + ?Sized,
    {
        self.buttons.attack = false;
        self.update(host)
    }

    /// Secondary button pressed.
    pub fn use_start<H>(&mut self, host: &mut H) -> Result<(), InteractionError>
    where
        H: InteractionHost + ?Sized,
    {
        self.buttons.use_item = true;
        self.update(host)
    }

    /// Secondary button released.
    pub fn use_end<H>(&mut self, host: &mut H) -> Result<(), InteractionError>
    where
        H: InteractionHost + ?Sized,
    {
        self.buttons.use_item = false;
        self.update(host)
    }

    /// Press and release the primary button.
    pub fn attack_click<H>(&mut self, host: &mut H) -> Result<(), InteractionError>
    where
        H: InteractionHost + ?Sized,
    {
        self.attack_start(host)?;
        self.attack_end(host)
    }

    /// Press and release the secondary button.
    pub fn use_click<H>(&mut self, host: &mut H) -> Result<(), InteractionError>
    where
        H: InteractionHost + ?Sized,
    {
        self.use_start(host)?;
        self.use_end(host)
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Game tick: advances the placement cooldown, fires due timers, updates.
    pub fn tick<H>(&mut self, host: &mut H) -> Result<(), InteractionError>
    where
        H: InteractionHost + ?Sized,
    {
        if self.ended {
            return Ok(());
        }
        if self.right_click_delay < self.settings.place_cooldown_ticks {
            self.right_click_delay += 1;
        }
        self.poll_timers(host);
        self.update(host)
    }

    /// Fires every scheduled task whose deadline has passed.
    pub fn poll_timers<H>(&mut self, host: &mut H)
    where
        H: InteractionHost + ?Sized,
    {
        if self.ended {
            return;
        }
        for task in self.timers.pop_due(host.now()) {
            match task {
                TimerTask::ArmSwingEnd => {
                    self.swing_timer = None;
                    self.events.push(InteractionEvent::ArmSwingEnded(Hand::Main));
                }
                TimerTask::PredictedWrite {
                    position, state_id, ..
                } => {
                    tracing::debug!(pos = ?position, state = state_id.0, "applying delayed predicted block");
                    host.set_block_state_id(position, state_id);
                }
            }
        }
    }

    /// Re-evaluates the cursor and dispatches whatever the buttons ask for.
    ///
    /// Order within one call: cursor resolution, item-use release, entity or
    /// block dispatch, dig lifecycle, then the button snapshot.
    pub fn update<H>(&mut self, host: &mut H) -> Result<(), InteractionError>
    where
        H: InteractionHost + ?Sized,
    {
        if self.ended {
            return Ok(());
        }
        let Some(player) = host.player().cloned() else {
            self.last_buttons = self.buttons;
            return Ok(());
        };

        let cursor = self.resolve_cursor(host, &player)?;

        if self.item_in_use.is_some() && !self.buttons.use_item {
            self.stop_using_item();
        }

        if let Some(entity) = &cursor.entity {
            if self.buttons.attack && !self.last_buttons.attack {
                self.attack_entity(entity);
            } else if self.buttons.use_item && !self.last_buttons.use_item {
                self.activate_entity(host, entity, &player);
            }
        } else {
            if self.buttons.use_item
                && (self.right_click_delay >= self.settings.place_cooldown_ticks
                    || !self.last_buttons.use_item)
            {
                self.update_place_interact(host, &player, cursor.block.as_ref());
            }
            self.update_breaking(host, &player, &cursor);
        }

        self.last_buttons = self.buttons;
        Ok(())
    }

    fn resolve_cursor<H>(
        &mut self,
        host: &H,
        player: &PlayerView,
    ) -> Result<CursorState, InteractionError>
    where
        H: InteractionHost + ?Sized,
    {
        let reach = self.settings.reach;
        let block = host.block_at_cursor(reach.cursor_reach);

        let viewer = Viewer {
            id: player.id,
            position: player.position,
            eye_height: reach.eye_height(player.sneaking),
            yaw: player.yaw,
            pitch: player.pitch,
        };
        let max_distance = clip_reach(
            reach.entity_reach(player.game_mode),
            player.position,
            block.as_ref(),
        );
        let entity =
            resolve_target_entity(&viewer, max_distance, host.entities(), host.classifier())?
                .cloned();

        // An entity hides the block behind it.
        let block = if entity.is_some() {
            if self.dig.is_some() {
                self.stop_digging(StopReason::EntityInterference, false);
            }
            None
        } else {
            block
        };

        let diggable = block.as_ref().is_some_and(|hit| match player.game_mode {
            GameMode::Creative => true,
            GameMode::Adventure => false,
            _ => host.can_dig(&hit.block),
        });

        let changed = match (&self.cursor_block, &block) {
            (Some(prev), Some(cur)) => prev.position() != cur.position(),
            (None, None) => false,
            _ => true,
        };
        if changed {
            self.events.push(InteractionEvent::CursorHighlightChanged(
                block.as_ref().map(BlockHit::position),
            ));
        }
        self.cursor_block = block.clone();

        Ok(CursorState {
            block,
            diggable,
            changed,
            entity,
        })
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    fn attack_entity(&mut self, entity: &EntitySnapshot) {
        self.swing_events(Hand::Main);
        self.actions.push(ProtocolAction::SwingArm { hand: Hand::Main });
        self.actions.push(ProtocolAction::Attack { target: entity.id });
        self.events
            .push(InteractionEvent::EntityInteractionDispatched {
                target: entity.id,
                kind: EntityInteraction::Attack,
            });
    }

    fn activate_entity<H>(&mut self, host: &H, entity: &EntitySnapshot, player: &PlayerView)
    where
        H: InteractionHost + ?Sized,
    {
        self.swing_events(Hand::Main);
        let swing_first = host.supports_feature(HostFeature::ArmAnimationBeforeUse);
        if swing_first {
            self.actions.push(ProtocolAction::SwingArm { hand: Hand::Main });
        }
        self.actions.push(ProtocolAction::InteractAt {
            target: entity.id,
            cursor: DVec3::splat(ENTITY_INTERACT_CURSOR),
            hand: Hand::Main,
            sneaking: player.sneaking,
        });
        self.actions.push(ProtocolAction::Interact {
            target: entity.id,
            hand: Hand::Main,
            sneaking: player.sneaking,
        });
        if !swing_first {
            self.actions.push(ProtocolAction::SwingArm { hand: Hand::Main });
        }
        self.events
            .push(InteractionEvent::EntityInteractionDispatched {
                target: entity.id,
                kind: EntityInteraction::Activate,
            });
    }

    // -----------------------------------------------------------------------
    // Place / interact / use
    // -----------------------------------------------------------------------

    fn update_place_interact<H>(
        &mut self,
        host: &mut H,
        player: &PlayerView,
        cursor_block: Option<&BlockHit>,
    ) where
        H: InteractionHost + ?Sized,
    {
        let special = cursor_block
            .filter(|_| !player.sneaking)
            .and_then(|hit| {
                self.settings
                    .block_interaction_for(&hit.block.name)
                    .map(|kind| (hit, kind))
            });

        match special {
            Some((hit, kind)) => self.run_block_interaction(hit, kind),
            None => self.place_or_use(host, player, cursor_block),
        }

        self.right_click_delay = 0;
    }

    fn run_block_interaction(&mut self, hit: &BlockHit, kind: BlockInteractionKind) {
        tracing::debug!(block = %hit.block.name, ?kind, "special block interaction");
        match kind {
            BlockInteractionKind::Sleep => {
                self.events.push(InteractionEvent::GoingToSleep {
                    position: hit.position(),
                });
                self.activate_block(hit);
            }
            BlockInteractionKind::ActivateOnly => {
                self.activate_block(hit);
                self.swing_events(Hand::Main);
            }
            BlockInteractionKind::Suppress => {}
        }
    }

    fn activate_block(&mut self, hit: &BlockHit) {
        self.actions.push(ProtocolAction::ActivateBlock {
            position: hit.position(),
            face: hit.face,
            cursor: placement_cursor(hit),
        });
        self.actions.push(ProtocolAction::SwingArm { hand: Hand::Main });
    }

    fn place_or_use<H>(
        &mut self,
        host: &mut H,
        player: &PlayerView,
        cursor_block: Option<&BlockHit>,
    ) where
        H: InteractionHost + ?Sized,
    {
        let activate_main = player
            .held_item
            .as_ref()
            .is_some_and(|item| item_activatable(&*host, item));

        if let Some(hit) = cursor_block {
            if let Some(item) = &player.held_item
                && self.predict_placement(host, player, item, hit)
            {
                self.events.push(InteractionEvent::BlockPlaced {
                    reference: hit.position(),
                    face: hit.face,
                    cursor: hit.cursor_offset(),
                    hand: Hand::Main,
                    predicted: true,
                });
            }
            // The server decides; the action goes out whether or not we predicted.
            self.place_block(host, hit, Hand::Main, !activate_main);
        }

        if activate_main || cursor_block.is_none() {
            let offhand = !activate_main
                && player
                    .offhand_item
                    .as_ref()
                    .is_some_and(|item| item_activatable(&*host, item));
            let hand = if offhand { Hand::Off } else { Hand::Main };
            if let Some(item) = player.item_in(hand) {
                self.start_using_item(host, player, item.clone(), hand);
            }
        }

        if let Some(hit) = cursor_block {
            self.place_block(host, hit, Hand::Off, false);
        }
    }

    /// Predicts the placement and writes or schedules it. Returns `true` if a
    /// block was predicted.
    fn predict_placement<H>(
        &mut self,
        host: &mut H,
        player: &PlayerView,
        item: &ItemStack,
        hit: &BlockHit,
    ) -> bool
    where
        H: InteractionHost + ?Sized,
    {
        let prediction = self.settings.prediction.clone();
        if !prediction.enabled {
            return false;
        }

        let request = PlacementRequest {
            item,
            reference: &hit.block,
            face: hit.face,
            cursor_offset: hit.cursor_offset(),
            game_mode: player.game_mode,
            sneaking: player.sneaking,
        };
        let ctx = PlacementContext {
            catalog: host.catalog(),
            classifier: host.classifier(),
            entities: if prediction.check_entities {
                Some(host.entities())
            } else {
                None
            },
            override_hook: self.settings.placement_override.as_ref(),
        };
        let predicted = match predict_placement(&request, ctx) {
            PlacementOutcome::Predicted(p) => p,
            outcome => {
                tracing::trace!(?outcome, "placement not predicted");
                return false;
            }
        };

        // A newer prediction for the same position supersedes a pending one.
        self.timers.cancel_where(|task| {
            matches!(task, TimerTask::PredictedWrite { position, .. } if *position == predicted.position)
        });

        if prediction.delay_ms == 0 {
            tracing::debug!(pos = ?predicted.position, block = %predicted.block_name, "predicted block written");
            host.set_block_state_id(predicted.position, predicted.state_id);
        } else {
            let due = host.now() + Duration::from_millis(prediction.delay_ms);
            tracing::debug!(pos = ?predicted.position, block = %predicted.block_name, ?due, "predicted block scheduled");
            self.timers.schedule(
                due,
                TimerTask::PredictedWrite {
                    reference: hit.position(),
                    position: predicted.position,
                    state_id: predicted.state_id,
                },
            );
        }
        true
    }

    fn place_block<H>(&mut self, host: &H, hit: &BlockHit, hand: Hand, client_swing: bool)
    where
        H: InteractionHost + ?Sized,
    {
        if hand == Hand::Off && host.supports_feature(HostFeature::NoOffhandSlot) {
            return;
        }
        self.actions.push(ProtocolAction::PlaceBlock {
            position: hit.position(),
            face: hit.face,
            hand,
            cursor: placement_cursor(hit),
        });
        if hand == Hand::Main {
            self.actions.push(ProtocolAction::SwingArm { hand });
        }
        if client_swing {
            self.swing_events(hand);
        }
    }

    fn start_using_item<H>(&mut self, host: &H, player: &PlayerView, item: ItemStack, hand: Hand)
    where
        H: InteractionHost + ?Sized,
    {
        if self.item_in_use.is_some() {
            return;
        }
        if hand == Hand::Off && host.supports_feature(HostFeature::NoOffhandSlot) {
            return;
        }
        let slot = player.slot_for(hand);
        self.actions.push(ProtocolAction::ActivateItem { hand });
        self.events.push(InteractionEvent::ItemUseStarted {
            item: item.name.clone(),
            slot: slot.inventory_index(),
            hand,
        });
        self.item_in_use = Some(ItemUseSession { item, hand, slot });
    }

    fn stop_using_item(&mut self) {
        if let Some(session) = self.item_in_use.take() {
            self.events.push(InteractionEvent::ItemUseStopped {
                item: session.item.name,
                slot: session.slot.inventory_index(),
                hand: session.hand,
            });
            self.actions.push(ProtocolAction::DeactivateItem);
        }
    }

    // -----------------------------------------------------------------------
    // Dig lifecycle
    // -----------------------------------------------------------------------

    fn update_breaking<H>(&mut self, host: &H, player: &PlayerView, cursor: &CursorState)
    where
        H: InteractionHost + ?Sized,
    {
        if cursor.changed {
            self.stop_digging(StopReason::BlockChange, cursor.diggable);
        }
        if !self.buttons.attack && self.last_buttons.attack {
            self.stop_digging(StopReason::UserStopped, false);
        }

        let has_override = !self.break_times.is_empty()
            && cursor.diggable_block().is_some_and(|hit| {
                self.break_times
                    .lookup(&hit.block, player.held_item.as_ref())
                    .is_some()
            });
        let on_ground =
            player.on_ground || player.game_mode == GameMode::Creative || has_override;
        let prev_on_ground = *self.prev_on_ground.get_or_insert(on_ground);

        self.update_break_progress(host, player, cursor.diggable_block());

        if self.buttons.attack {
            self.maybe_start_breaking(host, player, cursor, on_ground, prev_on_ground);
        }

        self.prev_on_ground = Some(on_ground);
    }

    fn update_break_progress<H>(
        &mut self,
        host: &H,
        player: &PlayerView,
        diggable: Option<&BlockHit>,
    ) where
        H: InteractionHost + ?Sized,
    {
        let (Some(hit), Some(session)) = (diggable, self.dig) else {
            return;
        };
        if player.game_mode == GameMode::Creative {
            return;
        }

        let time = self.dig_time(host, &hit.block, player);
        if time != session.dig_time {
            if self.settings.warnings {
                tracing::warn!(old = ?session.dig_time, new = ?time, "dig time changed, cancelling dig");
            }
            self.stop_digging(StopReason::DigTimeChanged, false);
            return;
        }

        let stage = progress_stage(host.now().saturating_sub(session.started_at), time);
        if self.progress_stage != Some(stage) {
            self.events.push(InteractionEvent::BreakProgress {
                position: hit.position(),
                stage: Some(stage),
            });
            self.current_break = Some(CurrentBreak {
                position: hit.position(),
                stage,
            });
        }
        self.progress_stage = Some(stage);
    }

    fn maybe_start_breaking<H>(
        &mut self,
        host: &H,
        player: &PlayerView,
        cursor: &CursorState,
        on_ground: bool,
        prev_on_ground: bool,
    ) where
        H: InteractionHost + ?Sized,
    {
        let now = host.now();
        let just_starting = !self.last_buttons.attack;
        let block_changed = cursor.changed
            || matches!((self.last_dug, &cursor.block), (Some(dug), Some(hit)) if dug != hit.position());
        let cooled_down = self
            .last_dug_time
            .is_none_or(|t| now.saturating_sub(t) > self.settings.dig_cooldown);
        let conditions_changed = on_ground != prev_on_ground && self.current_break.is_none();

        if let Some(hit) = cursor.diggable_block() {
            if on_ground
                && (just_starting || (cooled_down && (block_changed || conditions_changed)))
            {
                self.start_breaking(host, player, hit);
            }
        } else if self
            .last_swing
            .is_none_or(|t| now.saturating_sub(t) > self.settings.idle_swing_interval)
        {
            // Punching air.
            self.actions.push(ProtocolAction::SwingArm { hand: Hand::Main });
            self.swing_events(Hand::Main);
            self.last_swing = Some(now);
        }
    }

    fn start_breaking<H>(&mut self, host: &H, player: &PlayerView, hit: &BlockHit)
    where
        H: InteractionHost + ?Sized,
    {
        let dig_time = self.dig_time(host, &hit.block, player);
        let position = hit.position();

        self.last_dug = None;
        self.dig_status = DigStatus::Breaking;
        self.dig = Some(DigSession {
            position,
            started_at: host.now(),
            dig_time,
        });
        self.progress_stage = None;

        tracing::debug!(pos = ?position, block = %hit.block.name, ?dig_time, "dig started");
        self.actions.push(ProtocolAction::DigStart {
            position,
            face: hit.face,
        });
        self.events.push(InteractionEvent::DigStarted { position });
        self.events.push(InteractionEvent::ArmSwingStarted(Hand::Main));
    }

    /// Issues a stop and clears the dig. A stop is sent even with no dig in
    /// progress; the host swallows it.
    fn stop_digging(&mut self, reason: StopReason, temporary: bool) {
        self.actions.push(ProtocolAction::DigStop);
        if let Some(session) = self.dig.take() {
            tracing::debug!(pos = ?session.position, %reason, "dig stopped");
        }
        if let Some(current) = self.current_break {
            self.clear_break_visual(current.position);
        }
        self.progress_stage = None;
        self.dig_status = DigStatus::Stopped(reason);
        self.last_stop_reason = Some(reason);
        if !temporary {
            self.events.push(InteractionEvent::ArmSwingEnded(Hand::Main));
        }
    }

    fn clear_break_visual(&mut self, position: BlockPos) {
        self.events.push(InteractionEvent::BreakProgress {
            position,
            stage: None,
        });
        self.current_break = None;
        self.progress_stage = None;
    }

    /// Break time for `block`, honouring server overrides.
    fn dig_time<H>(&self, host: &H, block: &Block, player: &PlayerView) -> Duration
    where
        H: InteractionHost + ?Sized,
    {
        match self.break_times.lookup(block, player.held_item.as_ref()) {
            Some(seconds) => Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX),
            None => host.dig_time(block),
        }
    }

    fn swing_events(&mut self, hand: Hand) {
        self.events.push(InteractionEvent::ArmSwingStarted(hand));
        self.events.push(InteractionEvent::ArmSwingEnded(hand));
    }

    fn is_local_player<H>(host: &H, entity: EntityId) -> bool
    where
        H: InteractionHost + ?Sized,
    {
        host.player().is_some_and(|p| p.id == entity)
    }

    fn cursor_position(&self) -> Option<BlockPos> {
        self.cursor_block.as_ref().map(BlockHit::position)
    }

    // -----------------------------------------------------------------------
    // Host notifications
    // -----------------------------------------------------------------------

    /// The dig of `block` finished and the block was removed locally.
    pub fn on_dig_completed<H>(&mut self, host: &H, block: &Block)
    where
        H: InteractionHost + ?Sized,
    {
        if self.ended {
            return;
        }
        tracing::debug!(pos = ?block.position, block = %block.name, "dig completed");
        self.dig = None;
        self.last_dug = Some(block.position);
        self.last_dug_time = Some(host.now());
        self.dig_status = DigStatus::Success;

        self.broken.push_back(block.clone());
        while self.broken.len() > self.settings.broken_history_len {
            self.broken.pop_front();
        }
        self.clear_break_visual(block.position);
    }

    /// The dig of `block` was aborted. A held primary button restarts it.
    pub fn on_dig_aborted<H>(&mut self, host: &mut H, block: &Block) -> Result<(), InteractionError>
    where
        H: InteractionHost + ?Sized,
    {
        if self.ended || self.cursor_position() != Some(block.position) {
            return Ok(());
        }
        self.dig_status = DigStatus::Aborted;
        self.dig = None;

        let result = if self.buttons.attack {
            self.buttons.attack = false;
            let result = self.update(host);
            self.buttons.attack = true;
            result
        } else {
            Ok(())
        };

        self.last_dug = None;
        self.clear_break_visual(block.position);
        result
    }

    /// Some entity swung its arm. Mirrors the local player's own swings.
    pub fn on_arm_swing_observed<H>(&mut self, host: &H, entity: EntityId)
    where
        H: InteractionHost + ?Sized,
    {
        if self.ended || !Self::is_local_player(host, entity) {
            return;
        }
        if let Some(id) = self.swing_timer.take() {
            self.timers.cancel(id);
        }
        self.actions.push(ProtocolAction::SwingArm { hand: Hand::Main });
        self.events.push(InteractionEvent::ArmSwingStarted(Hand::Main));
        let due = host.now() + self.settings.arm_swing_duration;
        self.swing_timer = Some(self.timers.schedule(due, TimerTask::ArmSwingEnd));
    }

    /// Break progress observed on `position`. When the local player is the
    /// breaker and the cursor is on that block, the primary button follows.
    pub fn on_break_progress_observed<H>(
        &mut self,
        host: &mut H,
        position: BlockPos,
        breaker: EntityId,
    ) -> Result<(), InteractionError>
    where
        H: InteractionHost + ?Sized,
    {
        if self.ended
            || !Self::is_local_player(host, breaker)
            || self.cursor_position() != Some(position)
        {
            return Ok(());
        }
        if !self.buttons.attack {
            self.buttons.attack = true;
            self.update(host)?;
        }
        Ok(())
    }

    /// Observed break progress on `position` ended.
    pub fn on_break_progress_ended<H>(
        &mut self,
        host: &mut H,
        position: BlockPos,
        breaker: EntityId,
    ) -> Result<(), InteractionError>
    where
        H: InteractionHost + ?Sized,
    {
        if self.ended
            || !Self::is_local_player(host, breaker)
            || self.current_break.map(|c| c.position) != Some(position)
        {
            return Ok(());
        }
        if self.buttons.attack {
            self.buttons.attack = false;
            self.update(host)?;
        }
        Ok(())
    }

    /// Server acknowledgement of a dig. A rejection at the cursor block
    /// restores the block if it was already removed and releases the
    /// primary button.
    pub fn on_dig_acknowledged<H>(
        &mut self,
        host: &mut H,
        position: BlockPos,
        successful: bool,
    ) -> Result<(), InteractionError>
    where
        H: InteractionHost + ?Sized,
    {
        if self.ended || successful || self.cursor_position() != Some(position) {
            return Ok(());
        }

        if host.block_state_id(position).is_air() {
            match self.broken.iter().rev().find(|b| b.position == position) {
                Some(block) => {
                    tracing::debug!(pos = ?position, block = %block.name, "restoring rejected dig");
                    host.set_block(block);
                }
                None => tracing::debug!(pos = ?position, "cannot find block to restore"),
            }
        }

        self.buttons.attack = false;
        self.update(host)
    }

    /// The selected hotbar slot or its contents changed.
    pub fn on_held_item_changed(&mut self) {
        if self.item_in_use.as_ref().is_some_and(|s| s.hand == Hand::Main) {
            self.stop_using_item();
        }
    }

    /// A block update for `position` arrived from the server. Pending
    /// predicted writes for that position are dropped.
    pub fn on_block_update(&mut self, position: BlockPos) {
        let cancelled = self.timers.cancel_where(|task| {
            matches!(task, TimerTask::PredictedWrite { reference, position: target, .. }
                if *reference == position || *target == position)
        });
        if cancelled > 0 {
            tracing::debug!(pos = ?position, cancelled, "pending predicted write superseded");
        }
    }

    /// The session ended. Pending timers are dropped and every later call is a no-op.
    pub fn end(&mut self) {
        self.ended = true;
        self.timers.clear();
        self.swing_timer = None;
        self.dig = None;
    }

    /// Classifies a rejected action. Expected rejections are absorbed; anything
    /// else is returned for the host's error channel.
    pub fn handle_action_rejection(
        &mut self,
        action: &ProtocolAction,
        message: &str,
    ) -> Result<(), InteractionError> {
        match action {
            ProtocolAction::DigStop if self.dig.is_none() => {
                tracing::trace!(message, "stop without dig ignored");
                Ok(())
            }
            ProtocolAction::DigStart { .. } if message == DIG_ABORTED_MESSAGE => {
                tracing::trace!("dig aborted rejection ignored");
                Ok(())
            }
            _ => Err(InteractionError::ActionRejected {
                action: action.clone(),
                message: message.to_string(),
            }),
        }
    }

    /// Applies a JSON server settings packet.
    pub fn apply_server_settings_json(&mut self, json: &str) -> Result<(), InteractionError> {
        let packet: ServerSettings =
            serde_json::from_str(json).map_err(InteractionError::InvalidServerSettings)?;
        packet.apply(&mut self.settings, &mut self.break_times);
        tracing::debug!(?packet, "server settings applied");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queues and accessors
    // -----------------------------------------------------------------------

    /// Takes every queued protocol action, oldest first.
    pub fn drain_actions(&mut self) -> Vec<ProtocolAction> {
        std::mem::take(&mut self.actions)
    }

    /// Takes every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut InteractionSettings {
        &mut self.settings
    }

    pub fn break_times(&self) -> &BreakTimeOverrides {
        &self.break_times
    }

    pub fn buttons(&self) -> ButtonState {
        self.buttons
    }

    pub fn cursor_block(&self) -> Option<&BlockHit> {
        self.cursor_block.as_ref()
    }

    pub fn dig_session(&self) -> Option<&DigSession> {
        self.dig.as_ref()
    }

    pub fn dig_status(&self) -> DigStatus {
        self.dig_status
    }

    pub fn last_stop_reason(&self) -> Option<StopReason> {
        self.last_stop_reason
    }

    pub fn item_in_use(&self) -> Option<&ItemUseSession> {
        self.item_in_use.as_ref()
    }

    pub fn current_break(&self) -> Option<CurrentBreak> {
        self.current_break
    }

    /// Recently broken blocks, oldest first.
    pub fn broken_blocks(&self) -> impl Iterator<Item = &Block> {
        self.broken.iter()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

fn item_activatable<H>(host: &H, item: &ItemStack) -> bool
where
    H: InteractionHost + ?Sized,
{
    host.classifier().is_item_activatable(item, host.catalog())
}

/// Progress stage `0..=9` after `elapsed` of a `required` dig.
pub fn progress_stage(elapsed: Duration, required: Duration) -> u8 {
    if required.is_zero() {
        return 9;
    }
    let stage = (elapsed.as_secs_f64() / required.as_secs_f64() * 10.0).floor();
    stage.clamp(0.0, 9.0) as u8
}

/// Cursor sent with a placement: the hit point within the block, or the
/// centre of the clicked face when the hit point is unusable.
pub fn placement_cursor(hit: &BlockHit) -> DVec3 {
    let offset = hit.cursor_offset();
    if offset.is_finite() {
        offset
    } else {
        DVec3::splat(0.5) + hit.face.offset().as_dvec3() * 0.5
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
