//! End-to-end tests on a four-tile line.
//!
//! A single piece moves along tiles 1-2-3-4 through the full pipeline:
//! definition, phase tree, compiled game, event handling, hashing.

use std::sync::Arc;

use rust_bge::core::{
    ArtifactId, ArtifactKind, ArtifactState, EngineConfig, EventKind, GameDefinition, GameEvent, GameState,
    PieceDefinition,
};
use rust_bge::engine::{CompiledGame, EventOutcome, GameProgress};
use rust_bge::movement::MovementPattern;
use rust_bge::plan::{ObservedEvent, PhaseId, PhaseNode, PhaseTree, RecordingObserver};
use rust_bge::rules::{MovePieceRule, StateIs};

const MOVE: EventKind = EventKind::new(0);
const EAST: ArtifactId = ArtifactId(10);
const WHITE: ArtifactId = ArtifactId(20);
const BLACK: ArtifactId = ArtifactId(21);
const RUNNER: ArtifactId = ArtifactId(30);
const GUARD: ArtifactId = ArtifactId(31);
const TURN: ArtifactId = ArtifactId(40);

fn tile(n: u32) -> ArtifactId {
    ArtifactId(n)
}

fn line() -> GameDefinition {
    GameDefinition::new()
        .with_tiles([tile(1), tile(2), tile(3), tile(4)])
        .with_direction(EAST)
        .with_relation(tile(1), EAST, tile(2))
        .with_relation(tile(2), EAST, tile(3))
        .with_relation(tile(3), EAST, tile(4))
        .with_player(WHITE)
        .with_player(BLACK)
        .with_piece(PieceDefinition::new(RUNNER, WHITE).with_pattern(MovementPattern::slide(EAST)))
        .with_piece(PieceDefinition::new(GUARD, BLACK))
}

fn progress(config: EngineConfig) -> GameProgress {
    let tree = PhaseTree::new().with_root(PhaseNode::leaf(PhaseId::new(1), MovePieceRule::new("move", MOVE)));
    let game = CompiledGame::build(line(), tree, config).unwrap();
    GameProgress::new(game, GameState::new().with_piece_on(RUNNER, tile(1)))
}

/// Moving 1 -> 2 applies, changes the hash, and moves the piece; moving
/// again from a tile the piece is not on is ignored.
#[test]
fn test_four_tile_line() {
    for config in [EngineConfig::default(), EngineConfig::legacy()] {
        let start = progress(config);

        let moved = start
            .handle_event(&GameEvent::move_piece(MOVE, RUNNER, tile(1), tile(2)))
            .unwrap();
        assert_eq!(
            moved.outcome,
            EventOutcome::Applied {
                phases: smallvec::smallvec![PhaseId::new(1)]
            }
        );
        assert_ne!(moved.progress.hash(), start.hash());
        assert_eq!(moved.progress.state().tile_of(RUNNER), Some(tile(2)));

        let stale = moved
            .progress
            .handle_event(&GameEvent::move_piece(MOVE, RUNNER, tile(1), tile(3)))
            .unwrap();
        assert!(stale.outcome.is_ignored());
        assert_eq!(stale.progress.state(), moved.progress.state());
        assert_eq!(stale.progress.hash(), moved.progress.hash());
    }
}

/// A slide from 1 to 4 passes through 2 and 3; a guard on 3 blocks it and
/// can itself be captured.
#[test]
fn test_blocked_slide_and_capture() {
    let start = progress(EngineConfig::default());
    let guarded = GameProgress::new(
        start.game().clone(),
        start.state().with_piece_on(GUARD, tile(3)),
    );

    let blocked = guarded
        .handle_event(&GameEvent::move_piece(MOVE, RUNNER, tile(1), tile(4)))
        .unwrap();
    assert!(blocked.outcome.is_ignored());

    let captured = guarded
        .handle_event(&GameEvent::move_piece(MOVE, RUNNER, tile(1), tile(3)))
        .unwrap();
    assert!(captured.outcome.is_applied());
    let state = captured.progress.state();
    assert_eq!(state.tile_of(RUNNER), Some(tile(3)));
    assert_eq!(state.state_of(GUARD), Some(&ArtifactState::Captured));
    assert_eq!(
        captured.progress.snapshot(),
        &captured.progress.game().snapshot(state)
    );
}

/// Strict rules turn unreachable moves into errors; the caller keeps the
/// original progress.
#[test]
fn test_strict_rule_rejects() {
    let tree = PhaseTree::new().with_root(PhaseNode::leaf(
        PhaseId::new(1),
        MovePieceRule::new("move", MOVE).strict(),
    ));
    let game = CompiledGame::build(line(), tree, EngineConfig::default()).unwrap();
    let start = GameProgress::new(game, GameState::new().with_piece_on(RUNNER, tile(2)));

    let error = start
        .handle_event(&GameEvent::move_piece(MOVE, RUNNER, tile(2), tile(1)))
        .unwrap_err();
    assert_eq!(error.phase, PhaseId::new(1));
    assert_eq!(error.rule, "move");
    assert_eq!(error.state_hash, start.state().hash64());
    assert_eq!(start.state().tile_of(RUNNER), Some(tile(2)));
}

/// Phases gated on whose turn it is.
#[test]
fn test_turn_gated_phases() {
    let whites_turn = Arc::new(StateIs {
        artifact: TURN,
        state: ArtifactState::Value(0),
    });
    let tree = PhaseTree::new()
        .with_root(PhaseNode::leaf(PhaseId::new(1), MovePieceRule::new("white moves", MOVE)).when(whites_turn));
    let game = CompiledGame::build(line(), tree, EngineConfig::default()).unwrap();

    let observer = Arc::new(RecordingObserver::new());
    let turn = |value| {
        GameState::new()
            .with_piece_on(RUNNER, tile(1))
            .with_state(TURN, ArtifactKind::Custom(0), ArtifactState::Value(value))
    };
    let event = GameEvent::move_piece(MOVE, RUNNER, tile(1), tile(2)).with_player(WHITE);

    let on_turn = GameProgress::new(game.clone(), turn(0)).with_observer(observer.clone());
    assert!(on_turn.handle_event(&event).unwrap().outcome.is_applied());
    // Black cannot move a white piece.
    let impostor = GameEvent::move_piece(MOVE, RUNNER, tile(1), tile(2)).with_player(BLACK);
    assert!(on_turn.handle_event(&impostor).unwrap().outcome.is_ignored());

    observer.clear();
    let off_turn = GameProgress::new(game, turn(1)).with_observer(observer.clone());
    assert!(off_turn.handle_event(&event).unwrap().outcome.is_ignored());
    assert_eq!(observer.evaluated(), 0);
    assert!(observer.events().contains(&ObservedEvent::EventIgnored));
}
