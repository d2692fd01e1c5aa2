//! In-memory surface backend for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use signvar_layout::{Side, SurfaceBackend, SurfaceId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub surface: SurfaceId,
    pub line: usize,
    pub text: String,
    pub viewer: String,
}

/// Surfaces with raw lines, right-hand neighbours and one viewer list shared
/// by every surface. Every delivered line is recorded.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub raw: BTreeMap<(SurfaceId, usize), String>,
    pub right: BTreeMap<SurfaceId, SurfaceId>,
    pub viewers: Vec<String>,
    pub sent: Vec<Sent>,
}

impl RecordingBackend {
    /// Surfaces `1..=len` in a row, all seen by `viewers`.
    pub fn row(len: u64, viewers: &[&str]) -> Self {
        let mut backend = Self {
            viewers: viewers.iter().map(|v| (*v).to_owned()).collect(),
            ..Self::default()
        };
        for id in 1..len {
            backend.right.insert(SurfaceId(id), SurfaceId(id + 1));
        }
        backend
    }

    pub fn set_raw(&mut self, surface: u64, line: usize, text: &str) {
        self.raw.insert((SurfaceId(surface), line), text.to_owned());
    }

    /// The last line delivered to `viewer`.
    pub fn last(&self, surface: u64, line: usize, viewer: &str) -> Option<&str> {
        self.sent
            .iter()
            .rev()
            .find(|s| s.surface == SurfaceId(surface) && s.line == line && s.viewer == viewer)
            .map(|s| s.text.as_str())
    }

    pub fn sent_to(&self, viewer: &str) -> usize {
        self.sent.iter().filter(|s| s.viewer == viewer).count()
    }
}

impl SurfaceBackend for RecordingBackend {
    fn raw_line(&self, surface: SurfaceId, line: usize) -> Option<String> {
        self.raw.get(&(surface, line)).cloned()
    }

    fn neighbor(&self, surface: SurfaceId, side: Side) -> Option<SurfaceId> {
        match side {
            Side::Right => self.right.get(&surface).copied(),
            Side::Left => self
                .right
                .iter()
                .find(|(_, right)| **right == surface)
                .map(|(left, _)| *left),
        }
    }

    fn viewers(&self, _: SurfaceId) -> Vec<String> {
        self.viewers.clone()
    }

    fn send_line(&mut self, surface: SurfaceId, line: usize, text: &str, viewer: &str) {
        self.sent.push(Sent {
            surface,
            line,
            text: text.to_owned(),
            viewer: viewer.to_owned(),
        });
    }
}
