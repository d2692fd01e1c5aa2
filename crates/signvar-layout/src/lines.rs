#![forbid(unsafe_code)]

//! Per-viewer delivery of surface lines.
//!
//! The cache remembers, for every surface line, what each in-range viewer was
//! last sent. A line is only transmitted when it differs from that record.
//! A viewer who drops out of range loses their record, so the next update
//! after they return is always sent.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::surface::{SurfaceBackend, SurfaceId};
use crate::viewer::ViewerFilter;

/// What each viewer last received, per surface line.
#[derive(Debug, Clone, Default)]
pub struct LineCache {
    sent: FxHashMap<(SurfaceId, usize), FxHashMap<String, String>>,
}

impl LineCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `text` to every in-range viewer of `surface` selected by
    /// `filter`. Returns the number of lines actually transmitted.
    pub fn apply<B: SurfaceBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        surface: SurfaceId,
        line: usize,
        text: &str,
        filter: &ViewerFilter,
    ) -> usize {
        let in_range: FxHashSet<String> = backend.viewers(surface).into_iter().collect();
        let sent = self.sent.entry((surface, line)).or_default();
        sent.retain(|viewer, _| in_range.contains(viewer));

        let mut transmitted = 0;
        let mut targets: Vec<&String> = in_range.iter().filter(|v| filter.matches(v)).collect();
        targets.sort();
        for viewer in targets {
            if sent.get(viewer).is_some_and(|last| last == text) {
                continue;
            }
            backend.send_line(surface, line, text, viewer);
            sent.insert(viewer.clone(), text.to_owned());
            transmitted += 1;
        }
        if transmitted > 0 {
            tracing::trace!(surface = surface.raw(), line, transmitted, "lines sent");
        }
        transmitted
    }

    /// The line `viewer` last received, if any.
    #[must_use]
    pub fn last_sent(&self, surface: SurfaceId, line: usize, viewer: &str) -> Option<&str> {
        self.sent
            .get(&(surface, line))
            .and_then(|sent| sent.get(viewer))
            .map(String::as_str)
    }

    /// Forget everything sent to `viewer`, forcing full resends.
    pub fn forget_viewer(&mut self, viewer: &str) {
        for sent in self.sent.values_mut() {
            sent.remove(viewer);
        }
    }

    /// Forget everything sent on one line of `surface`.
    pub fn forget_line(&mut self, surface: SurfaceId, line: usize) {
        self.sent.remove(&(surface, line));
    }

    /// Forget everything sent on `surface`.
    pub fn forget_surface(&mut self, surface: SurfaceId) {
        self.sent.retain(|(id, _), _| *id != surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Side;

    #[derive(Default)]
    struct Recorder {
        viewers: Vec<String>,
        sent: Vec<(String, String)>,
    }

    impl SurfaceBackend for Recorder {
        fn raw_line(&self, _: SurfaceId, _: usize) -> Option<String> {
            None
        }

        fn neighbor(&self, _: SurfaceId, _: Side) -> Option<SurfaceId> {
            None
        }

        fn viewers(&self, _: SurfaceId) -> Vec<String> {
            self.viewers.clone()
        }

        fn send_line(&mut self, _: SurfaceId, _: usize, text: &str, viewer: &str) {
            self.sent.push((viewer.to_owned(), text.to_owned()));
        }
    }

    fn recorder(viewers: &[&str]) -> Recorder {
        Recorder {
            viewers: viewers.iter().map(|v| (*v).to_owned()).collect(),
            sent: Vec::new(),
        }
    }

    #[test]
    fn unchanged_lines_are_not_resent() {
        let mut backend = recorder(&["alice", "bob"]);
        let mut cache = LineCache::new();
        let s = SurfaceId(1);
        assert_eq!(cache.apply(&mut backend, s, 0, "hi", &ViewerFilter::All), 2);
        assert_eq!(cache.apply(&mut backend, s, 0, "hi", &ViewerFilter::All), 0);
        assert_eq!(cache.apply(&mut backend, s, 0, "yo", &ViewerFilter::All), 2);
        assert_eq!(cache.last_sent(s, 0, "bob"), Some("yo"));
    }

    #[test]
    fn filters_select_viewers() {
        let mut backend = recorder(&["alice", "bob"]);
        let mut cache = LineCache::new();
        let s = SurfaceId(1);
        cache.apply(&mut backend, s, 0, "mine", &ViewerFilter::only("alice"));
        cache.apply(&mut backend, s, 0, "rest", &ViewerFilter::except(["alice"]));
        assert_eq!(
            backend.sent,
            vec![
                ("alice".to_owned(), "mine".to_owned()),
                ("bob".to_owned(), "rest".to_owned()),
            ]
        );
    }

    #[test]
    fn returning_viewer_is_resent() {
        let mut backend = recorder(&["alice"]);
        let mut cache = LineCache::new();
        let s = SurfaceId(7);
        cache.apply(&mut backend, s, 2, "x", &ViewerFilter::All);
        backend.viewers.clear();
        cache.apply(&mut backend, s, 2, "x", &ViewerFilter::All);
        backend.viewers.push("alice".to_owned());
        assert_eq!(cache.apply(&mut backend, s, 2, "x", &ViewerFilter::All), 1);
    }

    #[test]
    fn forget_viewer_forces_resend() {
        let mut backend = recorder(&["alice"]);
        let mut cache = LineCache::new();
        let s = SurfaceId(1);
        cache.apply(&mut backend, s, 0, "x", &ViewerFilter::All);
        cache.forget_viewer("alice");
        assert_eq!(cache.apply(&mut backend, s, 0, "x", &ViewerFilter::All), 1);
        cache.apply(&mut backend, s, 1, "y", &ViewerFilter::All);
        cache.forget_line(s, 1);
        assert_eq!(cache.last_sent(s, 1, "alice"), None);
        assert_eq!(cache.last_sent(s, 0, "alice"), Some("x"));
        cache.forget_surface(s);
        assert_eq!(cache.last_sent(s, 0, "alice"), None);
    }
}
