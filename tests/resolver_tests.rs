//! Compiled resolver integration tests.
//!
//! The legacy pattern visitor walks the artifact graph recursively and is the
//! oracle here: for every supported pattern shape the compiled resolver must
//! return the same path, with the same terminal.

use std::sync::Arc;

use proptest::prelude::*;

use rust_bge::core::{ArtifactId, EngineConfig, EventKind, GameDefinition, GameState, PieceDefinition};
use rust_bge::engine::CompiledGame;
use rust_bge::movement::{CompiledResolver, LegacyPatternVisitor, MovePath, MovementPattern, PathTerminal};
use rust_bge::plan::{PhaseId, PhaseNode, PhaseTree};
use rust_bge::rules::MovePieceRule;

const SIZE: u32 = 5;

const NORTH: ArtifactId = ArtifactId(100);
const SOUTH: ArtifactId = ArtifactId(101);
const EAST: ArtifactId = ArtifactId(102);
const WEST: ArtifactId = ArtifactId(103);
const NORTH_EAST: ArtifactId = ArtifactId(104);
const NORTH_WEST: ArtifactId = ArtifactId(105);
const SOUTH_EAST: ArtifactId = ArtifactId(106);
const SOUTH_WEST: ArtifactId = ArtifactId(107);

const WHITE: ArtifactId = ArtifactId(200);
const BLACK: ArtifactId = ArtifactId(201);

const ROOK: ArtifactId = ArtifactId(300);
const BISHOP: ArtifactId = ArtifactId(301);
const QUEEN: ArtifactId = ArtifactId(302);
const KNIGHT: ArtifactId = ArtifactId(303);
const KING: ArtifactId = ArtifactId(304);
const PAWN: ArtifactId = ArtifactId(305);
const LANCE: ArtifactId = ArtifactId(306);
const WILDCARD: ArtifactId = ArtifactId(307);

const MOVERS: [ArtifactId; 8] = [ROOK, BISHOP, QUEEN, KNIGHT, KING, PAWN, LANCE, WILDCARD];

/// White blockers use ids 400.., black blockers 420...
const BLOCKERS: u32 = 10;

fn tile(x: u32, y: u32) -> ArtifactId {
    ArtifactId(1 + y * SIZE + x)
}

fn orthogonal() -> [ArtifactId; 4] {
    [NORTH, SOUTH, EAST, WEST]
}

fn diagonal() -> [ArtifactId; 4] {
    [NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST]
}

/// A SIZE x SIZE grid with eight directions and a set of test pieces.
fn grid() -> GameDefinition {
    let mut definition = GameDefinition::new()
        .with_tiles((0..SIZE * SIZE).map(|i| ArtifactId(1 + i)))
        .with_player(WHITE)
        .with_player(BLACK);
    for direction in orthogonal().into_iter().chain(diagonal()) {
        definition = definition.with_direction(direction);
    }

    let steps: [(ArtifactId, i32, i32); 8] = [
        (NORTH, 0, 1),
        (SOUTH, 0, -1),
        (EAST, 1, 0),
        (WEST, -1, 0),
        (NORTH_EAST, 1, 1),
        (NORTH_WEST, -1, 1),
        (SOUTH_EAST, 1, -1),
        (SOUTH_WEST, -1, -1),
    ];
    for y in 0..SIZE as i32 {
        for x in 0..SIZE as i32 {
            for (direction, dx, dy) in steps {
                let (nx, ny) = (x + dx, y + dy);
                if (0..SIZE as i32).contains(&nx) && (0..SIZE as i32).contains(&ny) {
                    definition =
                        definition.with_relation(tile(x as u32, y as u32), direction, tile(nx as u32, ny as u32));
                }
            }
        }
    }

    let knight_jumps = [
        [NORTH, NORTH, EAST],
        [NORTH, NORTH, WEST],
        [SOUTH, SOUTH, EAST],
        [SOUTH, SOUTH, WEST],
        [EAST, EAST, NORTH],
        [EAST, EAST, SOUTH],
        [WEST, WEST, NORTH],
        [WEST, WEST, SOUTH],
    ];
    let mut knight = PieceDefinition::new(KNIGHT, WHITE);
    for jump in knight_jumps {
        knight = knight.with_pattern(MovementPattern::fixed(jump));
    }

    definition = definition
        .with_piece(PieceDefinition::new(ROOK, WHITE).with_pattern(MovementPattern::multi(orthogonal(), true)))
        .with_piece(PieceDefinition::new(BISHOP, WHITE).with_pattern(MovementPattern::multi(diagonal(), true)))
        .with_piece(
            PieceDefinition::new(QUEEN, WHITE)
                .with_pattern(MovementPattern::multi(orthogonal(), true))
                .with_pattern(MovementPattern::multi(diagonal(), true)),
        )
        .with_piece(knight)
        .with_piece(
            PieceDefinition::new(KING, WHITE)
                .with_pattern(MovementPattern::multi(orthogonal().into_iter().chain(diagonal()), false)),
        )
        .with_piece(PieceDefinition::new(PAWN, WHITE).with_pattern(MovementPattern::step(NORTH)))
        .with_piece(PieceDefinition::new(LANCE, WHITE).with_pattern(MovementPattern::slide(NORTH)))
        .with_piece(
            PieceDefinition::new(WILDCARD, WHITE)
                .with_pattern(MovementPattern::Null)
                .with_pattern(MovementPattern::step(EAST))
                .with_pattern(MovementPattern::Any),
        );

    for i in 0..BLOCKERS {
        definition = definition
            .with_piece(PieceDefinition::new(ArtifactId(400 + i), WHITE))
            .with_piece(PieceDefinition::new(ArtifactId(420 + i), BLACK));
    }
    definition
}

fn game(config: EngineConfig) -> Arc<CompiledGame> {
    let tree = PhaseTree::new().with_root(PhaseNode::leaf(PhaseId::new(1), MovePieceRule::new("move", EventKind::new(0))));
    CompiledGame::build(grid(), tree, config).unwrap()
}

fn compiled(game: &CompiledGame, state: &GameState, piece: ArtifactId, from: ArtifactId, to: ArtifactId) -> Option<MovePath> {
    let snapshot = game.snapshot(state);
    CompiledResolver::new(game, state, &snapshot).try_resolve(piece, from, to)
}

fn legacy(game: &CompiledGame, state: &GameState, piece: ArtifactId, from: ArtifactId, to: ArtifactId) -> Option<MovePath> {
    LegacyPatternVisitor::new(game.definition()).resolve(state, piece, from, to)
}

/// Place blockers: `(tile number, white?)`.
fn with_blockers(blockers: &[(u32, bool)]) -> GameState {
    let mut state = GameState::new();
    for (i, (at, white)) in blockers.iter().enumerate() {
        let id = if *white { 400 + i as u32 } else { 420 + i as u32 };
        state = state.with_piece_on(ArtifactId(id), ArtifactId(1 + at));
    }
    state
}

/// Every mover, from every tile, to every tile.
fn assert_sweep_matches(game: &CompiledGame, blockers: &GameState) {
    for piece in MOVERS {
        for from in 0..SIZE * SIZE {
            let from = ArtifactId(1 + from);
            let state = blockers.with_piece_on(piece, from);
            let snapshot = game.snapshot(&state);
            let resolver = CompiledResolver::new(game, &state, &snapshot);
            for to in 0..SIZE * SIZE {
                let to = ArtifactId(1 + to);
                assert_eq!(
                    resolver.try_resolve(piece, from, to),
                    legacy(game, &state, piece, from, to),
                    "piece {piece} from {from} to {to}"
                );
            }
        }
    }
}

// ============================================================================
// Shape x occupancy grid
// ============================================================================

/// Expected result plus agreement with the legacy visitor.
fn check(
    game: &CompiledGame,
    state: &GameState,
    piece: ArtifactId,
    from: ArtifactId,
    to: ArtifactId,
    expected: Option<PathTerminal>,
) {
    let path = compiled(game, state, piece, from, to);
    assert_eq!(path, legacy(game, state, piece, from, to), "{piece} {from}->{to}");
    assert_eq!(path.as_ref().map(|p| p.terminal), expected, "{piece} {from}->{to}");
    if let Some(path) = path {
        assert_eq!(path.destination(), Some(to));
    }
}

/// Fixed sequences jump over pieces and only look at the destination.
#[test]
fn test_fixed_sequence_cases() {
    let game = game(EngineConfig::default());
    let from = tile(2, 2);
    let base = GameState::new().with_piece_on(KNIGHT, from);

    // unblocked
    check(&game, &base, KNIGHT, from, tile(3, 4), Some(PathTerminal::Empty));
    // pieces in between do not block
    let crowded = base
        .with_piece_on(ArtifactId(400), tile(2, 3))
        .with_piece_on(ArtifactId(421), tile(2, 4));
    check(&game, &crowded, KNIGHT, from, tile(3, 4), Some(PathTerminal::Empty));
    // capture
    let target = base.with_piece_on(ArtifactId(420), tile(3, 4));
    check(&game, &target, KNIGHT, from, tile(3, 4), Some(PathTerminal::Capture));
    // own piece at the destination
    let own = base.with_piece_on(ArtifactId(400), tile(3, 4));
    check(&game, &own, KNIGHT, from, tile(3, 4), None);
    // off-ray
    check(&game, &base, KNIGHT, from, tile(3, 3), None);
}

/// Single-direction patterns, stepping and sliding.
#[test]
fn test_single_direction_cases() {
    let game = game(EngineConfig::default());
    let from = tile(1, 0);
    let base = GameState::new().with_piece_on(LANCE, from).with_piece_on(PAWN, tile(3, 0));

    // unblocked slide
    check(&game, &base, LANCE, from, tile(1, 4), Some(PathTerminal::Empty));
    // blocked before the destination
    let blocked = base.with_piece_on(ArtifactId(421), tile(1, 2));
    check(&game, &blocked, LANCE, from, tile(1, 4), None);
    // capture on the first blocker
    check(&game, &blocked, LANCE, from, tile(1, 2), Some(PathTerminal::Capture));
    // off-ray
    check(&game, &base, LANCE, from, tile(2, 3), None);

    // single steps
    check(&game, &base, PAWN, tile(3, 0), tile(3, 1), Some(PathTerminal::Empty));
    check(&game, &base, PAWN, tile(3, 0), tile(3, 2), None);
    let own = base.with_piece_on(ArtifactId(401), tile(3, 1));
    check(&game, &own, PAWN, tile(3, 0), tile(3, 1), None);
}

/// Multi-direction patterns try each direction in order.
#[test]
fn test_multi_direction_cases() {
    let game = game(EngineConfig::default());
    let from = tile(0, 0);
    let base = GameState::new().with_piece_on(QUEEN, from);

    // unblocked diagonal, reached through the second pattern
    check(&game, &base, QUEEN, from, tile(4, 4), Some(PathTerminal::Empty));
    // blocked diagonal
    let blocked = base.with_piece_on(ArtifactId(402), tile(2, 2));
    check(&game, &blocked, QUEEN, from, tile(4, 4), None);
    // capture along a file
    let target = base.with_piece_on(ArtifactId(422), tile(0, 3));
    check(&game, &target, QUEEN, from, tile(0, 3), Some(PathTerminal::Capture));
    // off-ray
    check(&game, &base, QUEEN, from, tile(1, 2), None);

    // kings only step
    let king = GameState::new().with_piece_on(KING, tile(2, 2));
    check(&game, &king, KING, tile(2, 2), tile(3, 3), Some(PathTerminal::Empty));
    check(&game, &king, KING, tile(2, 2), tile(4, 4), None);
}

/// Path tiles are listed from the first step to the destination.
#[test]
fn test_path_tiles() {
    let game = game(EngineConfig::default());
    let state = GameState::new().with_piece_on(ROOK, tile(0, 0));
    let path = compiled(&game, &state, ROOK, tile(0, 0), tile(3, 0)).unwrap();
    assert_eq!(path.tiles.to_vec(), vec![tile(1, 0), tile(2, 0), tile(3, 0)]);
    assert_eq!(path.len(), 3);
    assert!(!path.is_capture());
}

/// Patterns that cannot be compiled go through the legacy visitor, in
/// declaration order with the compiled ones.
#[test]
fn test_unsupported_pattern_falls_back() {
    let game = game(EngineConfig::default());
    assert_eq!(game.patterns().unsupported_count(), 1);

    let state = GameState::new().with_piece_on(WILDCARD, tile(0, 0));
    // The step east comes first and yields a one-tile path.
    check(&game, &state, WILDCARD, tile(0, 0), tile(1, 0), Some(PathTerminal::Empty));
    // Anywhere else is reached through `Any`.
    check(&game, &state, WILDCARD, tile(0, 0), tile(4, 3), Some(PathTerminal::Empty));
    let own = state.with_piece_on(ArtifactId(403), tile(4, 3));
    check(&game, &own, WILDCARD, tile(0, 0), tile(4, 3), None);
}

/// Unknown pieces and unknown tiles resolve to nothing.
#[test]
fn test_unknown_artifacts() {
    let game = game(EngineConfig::default());
    let state = GameState::new();
    assert_eq!(compiled(&game, &state, ArtifactId(999), tile(0, 0), tile(0, 1)), None);
    assert_eq!(compiled(&game, &state, ROOK, ArtifactId(9999), tile(0, 1)), None);
    assert_eq!(compiled(&game, &state, ROOK, tile(0, 0), tile(0, 0)), None);
}

// ============================================================================
// Exhaustive sweeps
// ============================================================================

/// Every mover, every origin, every destination on a fixed crowded board.
#[test]
fn test_exhaustive_sweep_fixed_board() {
    let game = game(EngineConfig::default());
    let blockers = with_blockers(&[(7, true), (12, false), (13, false), (17, true), (21, false), (3, true)]);
    assert_sweep_matches(&game, &blockers);
}

/// With compiled patterns disabled the resolver is the legacy visitor.
#[test]
fn test_compiled_patterns_disabled() {
    let game = game(EngineConfig::default().with_compiled_patterns(false));
    let blockers = with_blockers(&[(6, false), (8, true), (18, false)]);
    assert_sweep_matches(&game, &blockers);
}

/// With an exhausted ray budget, sliding walks the neighbor table instead.
#[test]
fn test_over_budget_rays_fall_back_to_walk() {
    let game = game(EngineConfig::default().with_max_ray_slots(4));
    assert!(game.rays().is_over_budget());
    assert_eq!(game.rays().total_slots(), 0);

    let blockers = with_blockers(&[(6, false), (11, true), (18, false), (22, true)]);
    assert_sweep_matches(&game, &blockers);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Random blocker placements.
    #[test]
    fn test_exhaustive_sweep_random_boards(
        blockers in prop::collection::vec((0..SIZE * SIZE, any::<bool>()), 0..BLOCKERS as usize)
    ) {
        let game = game(EngineConfig::default());
        assert_sweep_matches(&game, &with_blockers(&blockers));
    }
}
