//! Generic piece movement rule.

use smallvec::SmallVec;

use crate::core::{ArtifactKind, ArtifactState, EventKind, GameEvent, GameState};
use crate::engine::AccelerationContext;
use crate::movement::MovePath;

use super::rule::{Rule, RuleResponse};

/// Moves `event.piece` from `event.from` to `event.to` when one of the
/// piece's movement patterns reaches the destination. Opponent pieces on the
/// destination are captured.
///
/// Events without piece, origin or destination, events whose piece is not on
/// the origin, and unreachable destinations are ignored, or rejected as
/// `Invalid` when the rule is strict. When `event.player` is set it must own
/// the piece.
#[derive(Clone, Debug)]
pub struct MovePieceRule {
    name: String,
    kinds: SmallVec<[EventKind; 1]>,
    strict: bool,
}

impl MovePieceRule {
    /// A rule handling events of `kind`.
    pub fn new(name: impl Into<String>, kind: EventKind) -> Self {
        Self {
            name: name.into(),
            kinds: SmallVec::from_elem(kind, 1),
            strict: false,
        }
    }

    /// Report unreachable moves as `Invalid` instead of ignoring them.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    fn reject(&self, reason: &str) -> RuleResponse {
        if self.strict {
            RuleResponse::invalid(reason)
        } else {
            RuleResponse::Ignore
        }
    }

    fn resolve(&self, ctx: &AccelerationContext<'_>, event: &GameEvent) -> Result<MovePath, &'static str> {
        let (Some(piece), Some(from), Some(to)) = (event.piece, event.from, event.to) else {
            return Err("event is not a move");
        };
        if ctx.state().tile_of(piece) != Some(from) {
            return Err("piece is not on the origin tile");
        }
        if let Some(player) = event.player {
            let owner = ctx.game().definition().piece(piece).map(|p| p.owner);
            if owner != Some(player) {
                return Err("piece is not owned by the acting player");
            }
        }
        ctx.resolver()
            .try_resolve(piece, from, to)
            .ok_or("destination is not reachable")
    }
}

impl Rule for MovePieceRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn event_kinds(&self) -> Option<&[EventKind]> {
        Some(self.kinds.as_slice())
    }

    fn check(&self, ctx: &AccelerationContext<'_>, event: &GameEvent) -> RuleResponse {
        if !self.kinds.contains(&event.kind) {
            return RuleResponse::Ignore;
        }
        match self.resolve(ctx, event) {
            Ok(_) => RuleResponse::Valid,
            Err(reason) => self.reject(reason),
        }
    }

    fn apply(&self, ctx: &AccelerationContext<'_>, event: &GameEvent) -> GameState {
        let (Some(piece), Ok(path)) = (event.piece, self.resolve(ctx, event)) else {
            return ctx.state().clone();
        };
        let Some(destination) = path.destination() else {
            return ctx.state().clone();
        };

        let definition = ctx.game().definition();
        let owner = definition.piece(piece).map(|p| p.owner);
        let captured: SmallVec<[_; 2]> = if path.is_capture() {
            ctx.state()
                .pieces_on(destination)
                .filter(|other| definition.piece(*other).is_some_and(|p| Some(p.owner) != owner))
                .collect()
        } else {
            SmallVec::new()
        };

        let mut next = ctx.state().with_piece_on(piece, destination);
        for other in captured {
            next = next.with_state(other, ArtifactKind::Piece, ArtifactState::Captured);
        }
        next
    }
}
