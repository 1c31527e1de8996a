use super::*;

use std::collections::HashMap;

use glam::IVec3;
use tactile_world::{
    BlockCatalog, Classifier, DefaultClassifier, Face, ShapeRule, StateProperty, StaticCatalog,
    WorldAccess,
};

const PLAYER: EntityId = EntityId(1);
const STONE: StateId = StateId(1);

struct FakeHost {
    now: Duration,
    player: Option<PlayerView>,
    entities: Vec<EntitySnapshot>,
    cursor: Option<BlockHit>,
    world: HashMap<BlockPos, StateId>,
    dig_time: Duration,
    diggable: bool,
    features: Vec<HostFeature>,
    catalog: StaticCatalog,
    classifier: DefaultClassifier,
}

impl FakeHost {
    fn new() -> Self {
        let mut catalog = StaticCatalog::new();
        catalog.register("stone", vec![], &[], ShapeRule::Full).unwrap();
        catalog
            .register(
                "oak_slab",
                vec![
                    StateProperty::new("type", &["top", "bottom", "double"]),
                    StateProperty::new("waterlogged", &["true", "false"]),
                ],
                &["bottom", "false"],
                ShapeRule::Slab,
            )
            .unwrap();
        catalog.register("red_bed", vec![], &[], ShapeRule::Full).unwrap();

        Self {
            now: Duration::ZERO,
            player: Some(PlayerView {
                id: PLAYER,
                position: DVec3::ZERO,
                yaw: 0.0,
                pitch: 0.0,
                on_ground: true,
                sneaking: false,
                game_mode: GameMode::Survival,
                held_item: None,
                offhand_item: None,
                quick_bar_slot: 0,
            }),
            entities: Vec::new(),
            cursor: None,
            world: HashMap::new(),
            dig_time: Duration::from_secs(1),
            diggable: true,
            features: Vec::new(),
            catalog,
            classifier: DefaultClassifier::new(),
        }
    }

    fn with_cursor(mut self, hit: BlockHit) -> Self {
        self.world.insert(hit.position(), hit.block.state_id);
        self.cursor = Some(hit);
        self
    }

    fn holding(mut self, item: &str) -> Self {
        self.player_mut().held_item = Some(ItemStack::new(item));
        self
    }

    fn player_mut(&mut self) -> &mut PlayerView {
        self.player.as_mut().unwrap()
    }

    fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
    }

    fn slab_state(&self, values: &[&str]) -> StateId {
        self.catalog
            .block_by_name("oak_slab")
            .and_then(|d| d.encode(values))
            .unwrap()
    }
}

impl WorldAccess for FakeHost {
    fn block_at_cursor(&self, _max_distance: f64) -> Option<BlockHit> {
        self.cursor.clone()
    }

    fn can_dig(&self, _block: &Block) -> bool {
        self.diggable
    }

    fn block_state_id(&self, pos: BlockPos) -> StateId {
        self.world.get(&pos).copied().unwrap_or(StateId::AIR)
    }

    fn set_block_state_id(&mut self, pos: BlockPos, state: StateId) {
        self.world.insert(pos, state);
    }

    fn set_block(&mut self, block: &Block) {
        self.world.insert(block.position, block.state_id);
    }
}

impl InteractionHost for FakeHost {
    fn now(&self) -> Duration {
        self.now
    }

    fn player(&self) -> Option<&PlayerView> {
        self.player.as_ref()
    }

    fn entities(&self) -> &[EntitySnapshot] {
        &self.entities
    }

    fn dig_time(&self, _block: &Block) -> Duration {
        self.dig_time
    }

    fn supports_feature(&self, feature: HostFeature) -> bool {
        self.features.contains(&feature)
    }

    fn catalog(&self) -> &dyn BlockCatalog {
        &self.catalog
    }

    fn classifier(&self) -> &dyn Classifier {
        &self.classifier
    }
}

/// Stone block hit on its south face, in front of a player at the origin
/// looking north.
fn stone_hit(pos: IVec3) -> BlockHit {
    block_hit(Block::solid(pos, "stone", STONE), 0.62)
}

fn block_hit(block: Block, cursor_y: f64) -> BlockHit {
    let intersect = block.position.as_dvec3() + DVec3::new(0.5, cursor_y, 1.0);
    BlockHit {
        block,
        face: Face::South,
        intersect,
    }
}

fn zombie(id: i32, z: f64) -> EntitySnapshot {
    EntitySnapshot {
        id: EntityId(id),
        name: Some("zombie".to_string()),
        position: DVec3::new(0.0, 0.0, z),
        width: 0.6,
        height: 1.95,
        client_flags: 0,
    }
}

fn controller() -> InteractionController {
    InteractionController::new(InteractionSettings::default())
}

fn is_dig_start(a: &ProtocolAction) -> bool {
    matches!(a, ProtocolAction::DigStart { .. })
}

fn main_hand_places(actions: &[ProtocolAction]) -> usize {
    actions
        .iter()
        .filter(|a| matches!(a, ProtocolAction::PlaceBlock { hand: Hand::Main, .. }))
        .count()
}

const FRONT: IVec3 = IVec3::new(0, 1, -3);

// ---------------------------------------------------------------------------
// Digging
// ---------------------------------------------------------------------------

#[test]
fn test_attack_start_stops_then_starts() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    let mut ctl = controller();

    ctl.attack_start(&mut host).unwrap();

    assert_eq!(
        ctl.drain_actions(),
        vec![
            ProtocolAction::DigStop,
            ProtocolAction::DigStart {
                position: FRONT,
                face: Face::South
            },
        ]
    );
    assert_eq!(ctl.dig_status(), DigStatus::Breaking);
    let events = ctl.drain_events();
    assert!(events.contains(&InteractionEvent::CursorHighlightChanged(Some(FRONT))));
    assert!(events.contains(&InteractionEvent::DigStarted { position: FRONT }));
}

#[test]
fn test_next_block_waits_for_dig_cooldown() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();
    ctl.drain_actions();

    host.advance(1000);
    host.world.insert(FRONT, StateId::AIR);
    ctl.on_dig_completed(&host, &Block::solid(FRONT, "stone", STONE));
    assert_eq!(ctl.dig_status(), DigStatus::Success);

    let next = FRONT + IVec3::new(0, 0, -1);
    host.cursor = Some(stone_hit(next));
    ctl.tick(&mut host).unwrap();
    assert_eq!(ctl.drain_actions(), vec![ProtocolAction::DigStop]);

    host.advance(400);
    ctl.tick(&mut host).unwrap();
    assert_eq!(
        ctl.drain_actions(),
        vec![ProtocolAction::DigStart {
            position: next,
            face: Face::South
        }]
    );

    ctl.attack_end(&mut host).unwrap();
    assert_eq!(ctl.drain_actions(), vec![ProtocolAction::DigStop]);
    assert_eq!(ctl.last_stop_reason(), Some(StopReason::UserStopped));
}

#[test]
fn test_switching_block_mid_dig_stops_before_restart() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();

    for _ in 0..8 {
        host.advance(50);
        ctl.tick(&mut host).unwrap();
    }

    let next = FRONT + IVec3::new(1, 0, 0);
    host.cursor = Some(stone_hit(next));
    host.world.insert(next, STONE);
    ctl.tick(&mut host).unwrap();
    assert_eq!(ctl.last_stop_reason(), Some(StopReason::BlockChange));

    for _ in 0..8 {
        host.advance(50);
        ctl.tick(&mut host).unwrap();
    }

    assert_eq!(
        ctl.drain_actions(),
        vec![
            ProtocolAction::DigStop,
            ProtocolAction::DigStart {
                position: FRONT,
                face: Face::South
            },
            ProtocolAction::DigStop,
            ProtocolAction::DigStart {
                position: next,
                face: Face::South
            },
        ]
    );
    assert_eq!(ctl.dig_session().map(|d| d.position), Some(next));
    assert_eq!(ctl.dig_status(), DigStatus::Breaking);
}

#[test]
fn test_no_dig_start_within_cooldown() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();
    host.advance(1000);
    ctl.on_dig_completed(&host, &Block::solid(FRONT, "stone", STONE));
    host.cursor = Some(stone_hit(FRONT + IVec3::new(1, 0, 0)));
    ctl.drain_actions();

    for _ in 0..4 {
        host.advance(50);
        ctl.tick(&mut host).unwrap();
    }
    assert!(!ctl.drain_actions().iter().any(is_dig_start));

    host.advance(60);
    ctl.tick(&mut host).unwrap();
    assert!(ctl.drain_actions().iter().any(is_dig_start));
}

#[test]
fn test_break_progress_stages() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();
    ctl.drain_events();

    host.advance(500);
    ctl.tick(&mut host).unwrap();
    assert_eq!(
        ctl.drain_events(),
        vec![InteractionEvent::BreakProgress {
            position: FRONT,
            stage: Some(5)
        }]
    );
    assert_eq!(
        ctl.current_break(),
        Some(CurrentBreak {
            position: FRONT,
            stage: 5
        })
    );

    // Same stage, no new event.
    host.advance(20);
    ctl.tick(&mut host).unwrap();
    assert!(ctl.drain_events().is_empty());

    host.advance(5000);
    ctl.tick(&mut host).unwrap();
    assert_eq!(ctl.current_break().map(|c| c.stage), Some(9));
}

#[test]
fn test_release_clears_break_visual() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();
    host.advance(300);
    ctl.tick(&mut host).unwrap();
    ctl.drain_events();

    ctl.attack_end(&mut host).unwrap();
    let events = ctl.drain_events();
    assert!(events.contains(&InteractionEvent::BreakProgress {
        position: FRONT,
        stage: None
    }));
    assert!(events.contains(&InteractionEvent::ArmSwingEnded(Hand::Main)));
    assert!(ctl.current_break().is_none());
    assert!(ctl.dig_session().is_none());
}

#[test]
fn test_dig_time_change_cancels_dig() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();
    ctl.drain_actions();

    host.dig_time = Duration::from_secs(2);
    host.advance(50);
    ctl.tick(&mut host).unwrap();

    assert_eq!(
        ctl.dig_status(),
        DigStatus::Stopped(StopReason::DigTimeChanged)
    );
    assert_eq!(ctl.drain_actions(), vec![ProtocolAction::DigStop]);
}

#[test]
fn test_creative_reports_no_progress() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    host.player_mut().game_mode = GameMode::Creative;
    host.diggable = false;
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();
    assert!(ctl.drain_actions().iter().any(is_dig_start));
    ctl.drain_events();

    host.advance(600);
    ctl.tick(&mut host).unwrap();
    assert!(
        !ctl.drain_events()
            .iter()
            .any(|e| matches!(e, InteractionEvent::BreakProgress { .. }))
    );
}

#[test]
fn test_airborne_player_does_not_restart_dig() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    host.player_mut().on_ground = false;
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();
    assert!(!ctl.drain_actions().iter().any(is_dig_start));

    // Landing with no break in progress starts the dig.
    host.player_mut().on_ground = true;
    ctl.tick(&mut host).unwrap();
    assert!(ctl.drain_actions().iter().any(is_dig_start));
}

#[test]
fn test_break_time_override_counts_as_grounded() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    host.player_mut().on_ground = false;
    let mut ctl = controller();
    ctl.apply_server_settings_json(r#"{"customBreakTime": {"stone": 0.5}}"#)
        .unwrap();

    ctl.attack_start(&mut host).unwrap();
    let session = ctl.dig_session().copied().unwrap();
    assert_eq!(session.dig_time, Duration::from_millis(500));
}

#[test]
fn test_idle_swing_is_throttled() {
    let mut host = FakeHost::new();
    let mut ctl = controller();
    let swing = ProtocolAction::SwingArm { hand: Hand::Main };

    ctl.attack_start(&mut host).unwrap();
    assert_eq!(ctl.drain_actions(), vec![swing.clone()]);

    host.advance(100);
    ctl.tick(&mut host).unwrap();
    assert!(ctl.drain_actions().is_empty());

    host.advance(150);
    ctl.tick(&mut host).unwrap();
    assert_eq!(ctl.drain_actions(), vec![swing]);
}

#[test]
fn test_broken_history_is_capped() {
    let host = FakeHost::new();
    let mut ctl = controller();
    for x in 0..7 {
        ctl.on_dig_completed(&host, &Block::solid(IVec3::new(x, 0, 0), "stone", STONE));
    }
    let xs: Vec<i32> = ctl.broken_blocks().map(|b| b.position.x).collect();
    assert_eq!(xs, vec![2, 3, 4, 5, 6]);
}

// ---------------------------------------------------------------------------
// Server feedback
// ---------------------------------------------------------------------------

#[test]
fn test_rejected_dig_restores_block() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();
    host.advance(1000);
    host.world.insert(FRONT, StateId::AIR);
    ctl.on_dig_completed(&host, &Block::solid(FRONT, "stone", STONE));

    ctl.on_dig_acknowledged(&mut host, FRONT, false).unwrap();

    assert_eq!(host.block_state_id(FRONT), STONE);
    assert!(!ctl.buttons().attack);
}

#[test]
fn test_rejected_dig_without_history_leaves_air() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    host.world.insert(FRONT, StateId::AIR);
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();

    ctl.on_dig_acknowledged(&mut host, FRONT, false).unwrap();
    assert_eq!(host.block_state_id(FRONT), StateId::AIR);
    assert!(!ctl.buttons().attack);
}

#[test]
fn test_successful_ack_is_ignored() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();
    ctl.on_dig_acknowledged(&mut host, FRONT, true).unwrap();
    assert!(ctl.buttons().attack);
}

#[test]
fn test_aborted_dig_restarts_while_held() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();
    ctl.drain_actions();

    ctl.on_dig_aborted(&mut host, &Block::solid(FRONT, "stone", STONE))
        .unwrap();
    assert!(ctl.buttons().attack);
    assert_eq!(ctl.dig_status(), DigStatus::Stopped(StopReason::UserStopped));

    // The release was internal; the next update presses again.
    ctl.tick(&mut host).unwrap();
    assert!(ctl.drain_actions().iter().any(is_dig_start));
}

#[test]
fn test_break_progress_observed_mirrors_own_dig() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    let mut ctl = controller();
    ctl.update(&mut host).unwrap();

    ctl.on_break_progress_observed(&mut host, FRONT, EntityId(99))
        .unwrap();
    assert!(!ctl.buttons().attack);

    ctl.on_break_progress_observed(&mut host, FRONT, PLAYER).unwrap();
    assert!(ctl.buttons().attack);
    assert!(ctl.drain_actions().iter().any(is_dig_start));

    host.advance(200);
    ctl.tick(&mut host).unwrap();
    ctl.on_break_progress_ended(&mut host, FRONT, PLAYER).unwrap();
    assert!(!ctl.buttons().attack);
}

#[test]
fn test_action_rejection_filtering() {
    let mut ctl = controller();
    assert!(
        ctl.handle_action_rejection(&ProtocolAction::DigStop, "not digging")
            .is_ok()
    );
    let start = ProtocolAction::DigStart {
        position: FRONT,
        face: Face::Up,
    };
    assert!(ctl.handle_action_rejection(&start, DIG_ABORTED_MESSAGE).is_ok());

    let err = ctl
        .handle_action_rejection(&start, "too far")
        .unwrap_err();
    assert_eq!(err.to_string(), "dig start rejected: too far");
}

#[test]
fn test_invalid_server_settings() {
    let mut ctl = controller();
    let err = ctl.apply_server_settings_json("{not json").unwrap_err();
    assert!(matches!(err, InteractionError::InvalidServerSettings(_)));
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[test]
fn test_entity_interference_stops_dig() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();
    ctl.drain_actions();
    ctl.drain_events();

    host.entities.push(zombie(5, -1.5));
    ctl.tick(&mut host).unwrap();

    assert_eq!(
        ctl.dig_status(),
        DigStatus::Stopped(StopReason::EntityInterference)
    );
    assert!(ctl.cursor_block().is_none());
    let actions = ctl.drain_actions();
    assert_eq!(actions[0], ProtocolAction::DigStop);
    // Attack is still held, but no new press reached the entity.
    assert!(!actions.iter().any(|a| matches!(a, ProtocolAction::Attack { .. })));
    assert!(
        ctl.drain_events()
            .contains(&InteractionEvent::ArmSwingEnded(Hand::Main))
    );
}

#[test]
fn test_entity_attack_is_edge_triggered() {
    let mut host = FakeHost::new();
    host.entities.push(zombie(5, -1.5));
    let mut ctl = controller();

    ctl.attack_start(&mut host).unwrap();
    for _ in 0..5 {
        host.advance(50);
        ctl.tick(&mut host).unwrap();
    }
    let attacks = ctl
        .drain_actions()
        .into_iter()
        .filter(|a| matches!(a, ProtocolAction::Attack { .. }))
        .count();
    assert_eq!(attacks, 1);

    ctl.attack_end(&mut host).unwrap();
    ctl.attack_start(&mut host).unwrap();
    assert!(
        ctl.drain_actions()
            .contains(&ProtocolAction::Attack { target: EntityId(5) })
    );
}

#[test]
fn test_distant_block_does_not_extend_entity_reach() {
    let wall = FRONT + IVec3::new(0, 0, -2);
    let mut host = FakeHost::new().with_cursor(stone_hit(wall));
    host.entities.push(zombie(5, -3.9));
    let mut ctl = controller();

    ctl.attack_start(&mut host).unwrap();

    let actions = ctl.drain_actions();
    assert!(!actions.iter().any(|a| matches!(a, ProtocolAction::Attack { .. })));
    assert!(actions.contains(&ProtocolAction::DigStart {
        position: wall,
        face: Face::South
    }));
}

#[test]
fn test_closest_entity_is_attacked() {
    let mut host = FakeHost::new();
    host.entities.push(zombie(5, -2.5));
    host.entities.push(zombie(6, -1.2));
    let mut ctl = controller();
    ctl.attack_start(&mut host).unwrap();
    assert!(
        ctl.drain_actions()
            .contains(&ProtocolAction::Attack { target: EntityId(6) })
    );
}

#[test]
fn test_use_on_entity_sends_interaction_pair() {
    let mut host = FakeHost::new();
    host.entities.push(zombie(5, -1.5));
    let mut ctl = controller();

    ctl.use_click(&mut host).unwrap();
    let actions = ctl.drain_actions();
    assert!(matches!(actions[0], ProtocolAction::InteractAt { target: EntityId(5), cursor, .. } if cursor == DVec3::splat(ENTITY_INTERACT_CURSOR)));
    assert!(matches!(actions[1], ProtocolAction::Interact { target: EntityId(5), .. }));
    assert_eq!(actions[2], ProtocolAction::SwingArm { hand: Hand::Main });
    assert_eq!(actions.len(), 3);
}

#[test]
fn test_arm_animation_before_use() {
    let mut host = FakeHost::new();
    host.entities.push(zombie(5, -1.5));
    host.features.push(HostFeature::ArmAnimationBeforeUse);
    let mut ctl = controller();

    ctl.use_start(&mut host).unwrap();
    let actions = ctl.drain_actions();
    assert_eq!(actions[0], ProtocolAction::SwingArm { hand: Hand::Main });
    assert!(matches!(actions[1], ProtocolAction::InteractAt { .. }));
    assert!(matches!(actions[2], ProtocolAction::Interact { .. }));
}

#[test]
fn test_unnamed_entity_is_an_error() {
    let mut host = FakeHost::new();
    let mut unnamed = zombie(5, -1.5);
    unnamed.name = None;
    host.entities.push(unnamed);
    let mut ctl = controller();

    let err = ctl.attack_start(&mut host).unwrap_err();
    assert!(matches!(err, InteractionError::Targeting(_)));
}

// ---------------------------------------------------------------------------
// Placement and item use
// ---------------------------------------------------------------------------

#[test]
fn test_held_use_places_every_cooldown() {
    let mut host = FakeHost::new()
        .with_cursor(stone_hit(FRONT))
        .holding("stone");
    let mut ctl = controller();

    ctl.use_start(&mut host).unwrap();
    for _ in 0..12 {
        host.advance(50);
        ctl.tick(&mut host).unwrap();
    }
    assert_eq!(main_hand_places(&ctl.drain_actions()), 4);
}

#[test]
fn test_place_block_sends_both_hands() {
    let mut host = FakeHost::new()
        .with_cursor(stone_hit(FRONT))
        .holding("stone");
    let mut ctl = controller();

    ctl.use_click(&mut host).unwrap();
    let actions = ctl.drain_actions();
    let cursor = DVec3::new(0.5, 0.62, 1.0);
    assert!(actions.contains(&ProtocolAction::PlaceBlock {
        position: FRONT,
        face: Face::South,
        hand: Hand::Main,
        cursor,
    }));
    assert!(actions.contains(&ProtocolAction::PlaceBlock {
        position: FRONT,
        face: Face::South,
        hand: Hand::Off,
        cursor,
    }));

    host.features.push(HostFeature::NoOffhandSlot);
    ctl.use_click(&mut host).unwrap();
    assert!(
        !ctl.drain_actions()
            .iter()
            .any(|a| matches!(a, ProtocolAction::PlaceBlock { hand: Hand::Off, .. }))
    );
}

#[test]
fn test_slab_prediction_uses_cursor_height() {
    let mut host = FakeHost::new()
        .with_cursor(block_hit(Block::solid(FRONT, "stone", STONE), 0.8))
        .holding("oak_slab");
    let mut ctl = controller();

    ctl.use_click(&mut host).unwrap();

    let target = FRONT + IVec3::new(0, 0, 1);
    assert_eq!(host.block_state_id(target), host.slab_state(&["top", "false"]));
    assert!(ctl.drain_events().iter().any(|e| matches!(
        e,
        InteractionEvent::BlockPlaced {
            predicted: true,
            hand: Hand::Main,
            ..
        }
    )));
}

#[test]
fn test_prediction_disabled_leaves_world() {
    let mut host = FakeHost::new()
        .with_cursor(stone_hit(FRONT))
        .holding("oak_slab");
    let mut ctl = controller();
    ctl.apply_server_settings_json(r#"{"blockPlacePrediction": false}"#)
        .unwrap();

    ctl.use_click(&mut host).unwrap();
    assert_eq!(host.block_state_id(FRONT + IVec3::new(0, 0, 1)), StateId::AIR);
    // The server still gets the placement.
    assert_eq!(main_hand_places(&ctl.drain_actions()), 1);
}

#[test]
fn test_entity_blocks_predicted_placement() {
    let mut host = FakeHost::new()
        .with_cursor(stone_hit(FRONT))
        .holding("stone");
    // Standing in the target cell, beside the view ray.
    host.entities.push(EntitySnapshot {
        position: DVec3::new(0.5, 1.0, -1.5),
        ..zombie(5, 0.0)
    });
    let mut ctl = controller();

    ctl.use_click(&mut host).unwrap();
    assert_eq!(host.block_state_id(FRONT + IVec3::new(0, 0, 1)), StateId::AIR);
}

#[test]
fn test_delayed_prediction_fires_on_tick() {
    let mut host = FakeHost::new()
        .with_cursor(stone_hit(FRONT))
        .holding("stone");
    let mut ctl = controller();
    ctl.apply_server_settings_json(r#"{"blockPlacePredictionDelay": 100}"#)
        .unwrap();

    ctl.use_click(&mut host).unwrap();
    let target = FRONT + IVec3::new(0, 0, 1);
    assert_eq!(host.block_state_id(target), StateId::AIR);
    assert_eq!(ctl.pending_timers(), 1);

    host.advance(100);
    ctl.tick(&mut host).unwrap();
    assert_eq!(host.block_state_id(target), STONE);
}

#[test]
fn test_block_update_cancels_delayed_prediction() {
    let mut host = FakeHost::new()
        .with_cursor(stone_hit(FRONT))
        .holding("stone");
    let mut ctl = controller();
    ctl.apply_server_settings_json(r#"{"blockPlacePredictionDelay": 100}"#)
        .unwrap();

    ctl.use_click(&mut host).unwrap();
    let target = FRONT + IVec3::new(0, 0, 1);
    ctl.on_block_update(target);
    assert_eq!(ctl.pending_timers(), 0);

    host.advance(200);
    ctl.tick(&mut host).unwrap();
    assert_eq!(host.block_state_id(target), StateId::AIR);
}

#[test]
fn test_placement_override_cancels() {
    use tactile_placement::{OverrideDecision, PlacementPrediction};

    fn cancel_all(_: &PlacementRequest<'_>, _: &PlacementPrediction) -> OverrideDecision {
        OverrideDecision::Cancel
    }

    let mut host = FakeHost::new()
        .with_cursor(stone_hit(FRONT))
        .holding("stone");
    let settings =
        InteractionSettings::default().with_placement_override(std::sync::Arc::new(cancel_all));
    let mut ctl = InteractionController::new(settings);

    ctl.use_click(&mut host).unwrap();
    assert_eq!(host.block_state_id(FRONT + IVec3::new(0, 0, 1)), StateId::AIR);
    assert_eq!(main_hand_places(&ctl.drain_actions()), 1);
}

#[test]
fn test_use_start_twice_keeps_one_session() {
    let mut host = FakeHost::new().holding("bow");
    let mut ctl = controller();

    ctl.use_start(&mut host).unwrap();
    ctl.use_start(&mut host).unwrap();
    for _ in 0..6 {
        host.advance(50);
        ctl.tick(&mut host).unwrap();
    }
    let activations = ctl
        .drain_actions()
        .into_iter()
        .filter(|a| matches!(a, ProtocolAction::ActivateItem { .. }))
        .count();
    assert_eq!(activations, 1);
    assert_eq!(ctl.item_in_use().map(|s| s.hand), Some(Hand::Main));

    ctl.use_end(&mut host).unwrap();
    assert_eq!(ctl.drain_actions(), vec![ProtocolAction::DeactivateItem]);
    assert_eq!(
        ctl.drain_events().last(),
        Some(&InteractionEvent::ItemUseStopped {
            item: "bow".to_string(),
            slot: 0,
            hand: Hand::Main
        })
    );
}

#[test]
fn test_offhand_item_used_when_main_is_placeable() {
    let mut host = FakeHost::new().holding("stone");
    host.player_mut().offhand_item = Some(ItemStack::new("shield"));
    let mut ctl = controller();

    ctl.use_start(&mut host).unwrap();
    assert_eq!(
        ctl.drain_actions(),
        vec![ProtocolAction::ActivateItem { hand: Hand::Off }]
    );
    assert!(ctl.drain_events().contains(&InteractionEvent::ItemUseStarted {
        item: "shield".to_string(),
        slot: 45,
        hand: Hand::Off
    }));
}

#[test]
fn test_held_item_change_stops_use() {
    let mut host = FakeHost::new().holding("bow");
    let mut ctl = controller();
    ctl.use_start(&mut host).unwrap();
    ctl.drain_actions();

    ctl.on_held_item_changed();
    assert!(ctl.item_in_use().is_none());
    assert_eq!(ctl.drain_actions(), vec![ProtocolAction::DeactivateItem]);
}

#[test]
fn test_bed_sleeps_instead_of_placing() {
    let bed = Block::solid(FRONT, "red_bed", StateId(9));
    let mut host = FakeHost::new()
        .with_cursor(block_hit(bed, 0.5))
        .holding("stone");
    let mut ctl = controller();

    ctl.use_click(&mut host).unwrap();
    let actions = ctl.drain_actions();
    assert!(matches!(actions[0], ProtocolAction::ActivateBlock { position, .. } if position == FRONT));
    assert_eq!(main_hand_places(&actions), 0);
    assert!(
        ctl.drain_events()
            .contains(&InteractionEvent::GoingToSleep { position: FRONT })
    );

    // Sneaking bypasses the rule.
    host.player_mut().sneaking = true;
    ctl.use_click(&mut host).unwrap();
    assert_eq!(main_hand_places(&ctl.drain_actions()), 1);
}

// ---------------------------------------------------------------------------
// Swings, timers and session end
// ---------------------------------------------------------------------------

#[test]
fn test_observed_swing_mirrors_local_player_only() {
    let mut host = FakeHost::new();
    let mut ctl = controller();

    ctl.on_arm_swing_observed(&host, EntityId(42));
    assert!(ctl.drain_actions().is_empty());

    ctl.on_arm_swing_observed(&host, PLAYER);
    assert_eq!(
        ctl.drain_actions(),
        vec![ProtocolAction::SwingArm { hand: Hand::Main }]
    );
    assert_eq!(
        ctl.drain_events(),
        vec![InteractionEvent::ArmSwingStarted(Hand::Main)]
    );

    host.advance(250);
    ctl.poll_timers(&mut host);
    assert_eq!(
        ctl.drain_events(),
        vec![InteractionEvent::ArmSwingEnded(Hand::Main)]
    );
}

#[test]
fn test_repeated_swing_restarts_timer() {
    let mut host = FakeHost::new();
    let mut ctl = controller();
    ctl.on_arm_swing_observed(&host, PLAYER);
    host.advance(200);
    ctl.on_arm_swing_observed(&host, PLAYER);
    assert_eq!(ctl.pending_timers(), 1);
    ctl.drain_events();

    host.advance(100);
    ctl.poll_timers(&mut host);
    assert!(ctl.drain_events().is_empty());
}

#[test]
fn test_end_makes_controller_inert() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    let mut ctl = controller();
    ctl.on_arm_swing_observed(&host, PLAYER);
    ctl.drain_actions();

    ctl.end();
    assert!(ctl.is_ended());
    assert_eq!(ctl.pending_timers(), 0);

    ctl.attack_start(&mut host).unwrap();
    host.advance(1000);
    ctl.tick(&mut host).unwrap();
    assert!(ctl.drain_actions().is_empty());
}

#[test]
fn test_no_player_only_tracks_buttons() {
    let mut host = FakeHost::new().with_cursor(stone_hit(FRONT));
    host.player = None;
    let mut ctl = controller();

    ctl.attack_start(&mut host).unwrap();
    assert!(ctl.drain_actions().is_empty());
    assert!(ctl.buttons().attack);
}

#[test]
fn test_progress_stage_bounds() {
    let second = Duration::from_secs(1);
    assert_eq!(progress_stage(Duration::ZERO, second), 0);
    assert_eq!(progress_stage(Duration::from_millis(999), second), 9);
    assert_eq!(progress_stage(Duration::from_secs(3), second), 9);
    assert_eq!(progress_stage(Duration::ZERO, Duration::ZERO), 9);
}

#[test]
fn test_placement_cursor_falls_back_to_face_centre() {
    let mut hit = stone_hit(FRONT);
    hit.intersect = DVec3::NAN;
    assert_eq!(placement_cursor(&hit), DVec3::new(0.5, 0.5, 1.0));
}
