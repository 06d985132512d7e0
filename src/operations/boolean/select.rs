use super::classify::EdgeClass;

/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersect,
}

impl BooleanOp {
    /// Combines membership in the two operands into membership in the result.
    #[must_use]
    pub fn admits(self, in_a: bool, in_b: bool) -> bool {
        match self {
            BooleanOp::Union => in_a || in_b,
            BooleanOp::Intersect => in_a && in_b,
        }
    }
}

/// Which operand a ring edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingSource {
    A,
    B,
}

/// Decision about whether to keep a sub-arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepDecision {
    Keep,
    Discard,
}

/// Determines whether a sub-arc is part of the result boundary based on its
/// classification relative to the other loop and the boolean operation.
///
/// | Sub-arc  | vs other loop      | Union   | Intersect |
/// |----------|--------------------|---------|-----------|
/// | from A   | INSIDE B           | discard | keep      |
/// | from A   | OUTSIDE B          | keep    | discard   |
/// | from A   | shared, same dir   | keep    | keep      |
/// | from A   | shared, opposite   | discard | discard   |
/// | from B   | INSIDE A           | discard | keep      |
/// | from B   | OUTSIDE A          | keep    | discard   |
/// | from B   | shared (either)    | discard | discard   |
///
/// A same-direction shared edge appears in both rings; A's copy represents it.
#[allow(clippy::match_same_arms)]
#[must_use]
pub fn should_keep_edge(source: RingSource, class: EdgeClass, op: BooleanOp) -> KeepDecision {
    match (source, class, op) {
        (_, EdgeClass::Inside, BooleanOp::Intersect) => KeepDecision::Keep,
        (_, EdgeClass::Inside, BooleanOp::Union) => KeepDecision::Discard,

        (_, EdgeClass::Outside, BooleanOp::Union) => KeepDecision::Keep,
        (_, EdgeClass::Outside, BooleanOp::Intersect) => KeepDecision::Discard,

        (RingSource::A, EdgeClass::SharedSame, _) => KeepDecision::Keep,
        (RingSource::B, EdgeClass::SharedSame, _) => KeepDecision::Discard,

        // Opposite shared edges separate the two regions; neither side of
        // them is a boundary of the result.
        (_, EdgeClass::SharedOpposite, _) => KeepDecision::Discard,
    }
}
