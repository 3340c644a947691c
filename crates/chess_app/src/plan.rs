//! Turning a committed move into animations.
//!
//! The plan is computed from the piece snapshots taken before and after the
//! move plus its outcome, and is a pure function of those inputs.

use chess_core::{MoveOutcome, PieceInfo};

use crate::animation::{Animation, OnComplete, Track};
use crate::config::AnimationConfig;
use crate::geometry::Vec3;
use crate::scene::{PieceInstance, square_center};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationPlan {
    /// Pieces whose logical square changed, with their new square.
    pub moved: Vec<(u32, u8)>,
    /// Captured piece kept on screen until its capture animation ends.
    pub departing: Option<PieceInstance>,
    pub animations: Vec<Animation>,
}

/// A piece standing close enough to a path to be pushed aside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blocker {
    pub id: u32,
    /// Sidestep offset, perpendicular to the path
    pub push: Vec3,
}

pub fn plan_move(
    before: &[PieceInfo],
    after: &[PieceInfo],
    outcome: &MoveOutcome,
    cfg: &AnimationConfig,
) -> AnimationPlan {
    let square_of = |pieces: &[PieceInfo], id: u32| {
        pieces.iter().find(|p| p.id == id).map(|p| p.index)
    };

    let mut plan = AnimationPlan::default();
    let (Some(from), Some(to)) = (
        square_of(before, outcome.piece_id),
        square_of(after, outcome.piece_id),
    ) else {
        return plan;
    };

    let rook = outcome.castle.and_then(|c| {
        let id = before.iter().find(|p| p.index == c.rook_from)?.id;
        Some((id, c.rook_from, square_of(after, id)?))
    });

    let start = square_center(from);
    let end = square_center(to);
    let blockers: Vec<Blocker> = find_blockers(
        after
            .iter()
            .filter(|p| p.id != outcome.piece_id && rook.is_none_or(|(id, ..)| p.id != id))
            .map(|p| (p.id, square_center(p.index))),
        start,
        end,
        cfg,
    );

    for b in &blockers {
        plan.animations.push(Animation::new(
            b.id,
            Track::Sidestep { to: b.push },
            cfg.sidestep_duration,
        ));
    }

    plan.moved.push((outcome.piece_id, to));
    plan.animations.push(
        Animation::new(
            outcome.piece_id,
            Track::Travel {
                start: start - end,
                lift: cfg.lift_height,
            },
            cfg.move_duration,
        )
        .then(OnComplete::ReturnPieces {
            ids: blockers.iter().map(|b| b.id).collect(),
            duration: cfg.sidestep_duration,
        }),
    );

    if let Some((id, rook_from, rook_to)) = rook {
        plan.moved.push((id, rook_to));
        plan.animations.push(Animation::new(
            id,
            Track::Travel {
                start: square_center(rook_from) - square_center(rook_to),
                lift: cfg.lift_height * cfg.rook_lift_factor,
            },
            cfg.move_duration * cfg.rook_duration_factor,
        ));
    }

    if let (Some(captured), Some(square)) = (&outcome.captured, outcome.captured_square) {
        plan.departing = Some(PieceInstance::new(
            captured.id,
            captured.kind,
            captured.color,
            square,
        ));
        plan.animations.push(
            Animation::new(
                captured.id,
                Track::Capture {
                    min_scale: cfg.capture_min_scale,
                    sink: cfg.capture_sink,
                },
                cfg.capture_duration,
            )
            .then(OnComplete::RemovePiece),
        );
    }

    plan
}

/// Pieces whose centre lies within `blocker_threshold` of the segment
/// `start..end`, strictly between its ends, ordered by id. Each is pushed
/// `sidestep_distance` along the path normal, away from the path.
pub fn find_blockers(
    pieces: impl Iterator<Item = (u32, Vec3)>,
    start: Vec3,
    end: Vec3,
    cfg: &AnimationConfig,
) -> Vec<Blocker> {
    let dir = end - start;
    let len2 = dir.dot(dir);
    if len2 <= f32::EPSILON {
        return Vec::new();
    }
    let normal = Vec3::new(-dir.z, 0.0, dir.x).normalize();

    let mut out: Vec<Blocker> = pieces
        .filter_map(|(id, center)| {
            let rel = center - start;
            let s = rel.dot(dir) / len2;
            if s <= 0.0 || s >= 1.0 {
                return None;
            }
            let perp = rel - dir * s;
            if perp.length() >= cfg.blocker_threshold {
                return None;
            }
            let side = if rel.dot(normal) < 0.0 { -1.0 } else { 1.0 };
            Some(Blocker {
                id,
                push: normal * (side * cfg.sidestep_distance),
            })
        })
        .collect();
    out.sort_by_key(|b| b.id);
    out
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod plan_tests;
