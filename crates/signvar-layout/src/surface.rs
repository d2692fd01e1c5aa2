#![forbid(unsafe_code)]

//! Surfaces, the backend collaborator, and chains of linked surfaces.
//!
//! The engine never discovers surfaces itself. A [`SurfaceBackend`] answers
//! four questions: what a surface line currently says, which surface sits next
//! to another, who can see a surface, and how to deliver a line to one viewer.
//!
//! A [`LinkedSurface`] is a variable's binding to one line of a starting
//! surface plus a growth direction. Its chain is recomputed from the backend's
//! adjacency on first use after every [`invalidate`](LinkedSurface::invalidate).

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Opaque handle of one surface side, assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

impl SurfaceId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Horizontal neighbour side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// How a chain grows from its starting surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainDirection {
    /// Single surface, content centred.
    #[default]
    None,
    /// Chain extends to the left; content is anchored at the right end.
    Left,
    /// Chain extends to the right; content is anchored at the left end.
    Right,
}

/// The external surface transport and discovery collaborator.
pub trait SurfaceBackend {
    /// Current raw text of `line` on `surface`, escape codes included.
    fn raw_line(&self, surface: SurfaceId, line: usize) -> Option<String>;

    /// The adjacent surface on `side`, if any.
    fn neighbor(&self, surface: SurfaceId, side: Side) -> Option<SurfaceId>;

    /// Viewers currently in range of `surface`.
    fn viewers(&self, surface: SurfaceId) -> Vec<String>;

    /// Deliver one line to one viewer.
    fn send_line(&mut self, surface: SurfaceId, line: usize, text: &str, viewer: &str);
}

/// A variable's binding to a line on a chain of surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedSurface {
    start: SurfaceId,
    line: usize,
    direction: ChainDirection,
    chain: Option<Vec<SurfaceId>>,
}

impl LinkedSurface {
    #[must_use]
    pub fn new(start: SurfaceId, line: usize, direction: ChainDirection) -> Self {
        Self {
            start,
            line,
            direction,
            chain: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> SurfaceId {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[inline]
    #[must_use]
    pub fn direction(&self) -> ChainDirection {
        self.direction
    }

    /// Whether this binding is for `start`/`line`.
    #[must_use]
    pub fn is_at(&self, start: SurfaceId, line: usize) -> bool {
        self.start == start && self.line == line
    }

    /// Whether `surface` is the start or part of the cached chain.
    #[must_use]
    pub fn touches(&self, surface: SurfaceId) -> bool {
        self.start == surface
            || self
                .chain
                .as_ref()
                .is_some_and(|chain| chain.contains(&surface))
    }

    /// Drop the cached chain; the next [`surfaces`](Self::surfaces) walks again.
    pub fn invalidate(&mut self) {
        self.chain = None;
    }

    /// The chain in reading order (left to right), walking adjacency if needed.
    pub fn surfaces<B: SurfaceBackend + ?Sized>(
        &mut self,
        backend: &B,
        max_len: usize,
    ) -> &[SurfaceId] {
        if self.chain.is_none() {
            let chain = walk_chain(backend, self.start, self.direction, max_len);
            tracing::debug!(
                start = self.start.raw(),
                line = self.line,
                len = chain.len(),
                "surface chain recomputed"
            );
            self.chain = Some(chain);
        }
        self.chain.as_deref().unwrap_or_default()
    }
}

/// Collect the chain from `start` in reading order.
#[must_use]
pub fn walk_chain<B: SurfaceBackend + ?Sized>(
    backend: &B,
    start: SurfaceId,
    direction: ChainDirection,
    max_len: usize,
) -> Vec<SurfaceId> {
    let side = match direction {
        ChainDirection::None => return vec![start],
        ChainDirection::Left => Side::Left,
        ChainDirection::Right => Side::Right,
    };
    let max_len = max_len.max(1);
    let mut chain = vec![start];
    let mut seen = FxHashSet::default();
    seen.insert(start);
    let mut current = start;
    while let Some(next) = backend.neighbor(current, side) {
        if !seen.insert(next) {
            break;
        }
        if chain.len() == max_len {
            tracing::warn!(
                start = start.raw(),
                max_len,
                "surface chain truncated at maximum length"
            );
            break;
        }
        chain.push(next);
        current = next;
    }
    if side == Side::Left {
        chain.reverse();
    }
    chain
}
