//! Variables bound to surface chains.

mod common;

use common::RecordingBackend;
use signvar_layout::{ChainDirection, LinkedSurface, SurfaceId};
use signvar_runtime::VariableStore;
use signvar_ticker::{TickMode, Ticker};

fn link(start: u64, direction: ChainDirection) -> LinkedSurface {
    LinkedSurface::new(SurfaceId(start), 0, direction)
}

#[test]
fn prefix_and_postfix_are_kept() {
    let mut backend = RecordingBackend::row(1, &["alice"]);
    backend.set_raw(1, 0, "[%score%]");
    let mut store = VariableStore::new(backend);
    store.set_value("score", "42");
    assert!(store.bind_surface("score", link(1, ChainDirection::None)));
    assert!(!store.bind_surface("score", link(1, ChainDirection::None)));
    assert_eq!(store.backend().last(1, 0, "alice"), Some("[42]"));
}

#[test]
fn every_surface_of_the_chain_gets_a_line() {
    let mut backend = RecordingBackend::row(3, &["alice", "bob"]);
    backend.set_raw(1, 0, "%news%");
    let mut store = VariableStore::new(backend);
    store.bind_surface("news", link(1, ChainDirection::Right));
    store.set_value("news", "hi");

    let b = store.backend();
    for viewer in ["alice", "bob"] {
        assert!(b.last(1, 0, viewer).is_some_and(|l| l.starts_with("hi")));
        assert!(b.last(2, 0, viewer).is_some());
        assert!(b.last(3, 0, viewer).is_some());
    }
}

#[test]
fn viewer_values_go_only_to_that_viewer() {
    let mut backend = RecordingBackend::row(1, &["alice", "bob"]);
    backend.set_raw(1, 0, "%who%");
    let mut store = VariableStore::new(backend);
    store.bind_surface("who", link(1, ChainDirection::None));
    store.set_value("who", "all");
    store.set_viewer_value("who", "alice", "me");

    assert_eq!(store.backend().last(1, 0, "alice"), Some("me"));
    assert_eq!(store.backend().last(1, 0, "bob"), Some("all"));

    store.set_value("who", "everyone");
    assert_eq!(store.backend().last(1, 0, "alice"), Some("me"));
    assert_eq!(store.backend().last(1, 0, "bob"), Some("everyone"));

    store.remove_viewer("who", "alice");
    assert_eq!(store.backend().last(1, 0, "alice"), Some("everyone"));
}

#[test]
fn reassigning_the_same_value_writes_nothing() {
    let mut backend = RecordingBackend::row(2, &["alice"]);
    backend.set_raw(1, 0, "%x%");
    let mut store = VariableStore::new(backend);
    store.bind_surface("x", link(1, ChainDirection::Right));
    store.set_value("x", "same");
    store.set_viewer_value("x", "bob", "mine");
    store.drain_events();
    let before = store.backend().sent.len();

    store.set_value("x", "same");
    store.set_viewer_value("x", "bob", "mine");
    store.redraw();
    assert_eq!(store.backend().sent.len(), before);
    assert!(store.drain_events().is_empty());
}

#[test]
fn dependents_redraw_their_own_surfaces() {
    let mut backend = RecordingBackend::row(2, &["alice"]);
    backend.set_raw(1, 0, "%greeting%");
    backend.set_raw(2, 0, "%name%");
    let mut store = VariableStore::new(backend);
    store.bind_surface("greeting", link(1, ChainDirection::None));
    store.set_value("greeting", "Hello %name%!");
    store.set_value("name", "World");
    assert_eq!(store.backend().last(1, 0, "alice"), Some("Hello World!"));
}

#[test]
fn invalidation_walks_the_chain_again() {
    let mut backend = RecordingBackend::row(2, &["alice"]);
    backend.set_raw(1, 0, "%x%");
    let mut store = VariableStore::new(backend);
    store.bind_surface("x", link(1, ChainDirection::Right));
    store.set_value("x", "grow");
    assert!(store.backend().last(3, 0, "alice").is_none());

    store.backend_mut().right.insert(SurfaceId(2), SurfaceId(3));
    assert_eq!(store.invalidate_surface(SurfaceId(2)), 1);
    assert!(store.backend().last(3, 0, "alice").is_some());
    assert_eq!(store.invalidate_surface(SurfaceId(9)), 0);
}

#[test]
fn returning_viewers_are_resent() {
    let mut backend = RecordingBackend::row(1, &["alice"]);
    backend.set_raw(1, 0, "%x%");
    let mut store = VariableStore::new(backend);
    store.bind_surface("x", link(1, ChainDirection::None));
    store.set_value("x", "hi");
    let before = store.backend().sent_to("alice");

    store.redraw();
    assert_eq!(store.backend().sent_to("alice"), before);

    store.forget_viewer("alice");
    store.redraw();
    assert_eq!(store.backend().sent_to("alice"), before + 1);
}

#[test]
fn unbound_surfaces_stop_receiving() {
    let mut backend = RecordingBackend::row(1, &["alice"]);
    backend.set_raw(1, 0, "%x%");
    let mut store = VariableStore::new(backend);
    store.bind_surface("x", link(1, ChainDirection::None));
    store.set_value("x", "a");
    assert!(store.unbind_surface("x", SurfaceId(1), 0));
    assert!(!store.unbind_surface("x", SurfaceId(1), 0));
    store.set_value("x", "b");
    assert_eq!(store.backend().last(1, 0, "alice"), Some("a"));
}

#[test]
fn scrolling_values_wrap_around_the_chain() {
    let mut backend = RecordingBackend::row(2, &["alice"]);
    backend.set_raw(1, 0, "%x%");
    let mut store = VariableStore::new(backend);
    store.bind_surface("x", link(1, ChainDirection::Right));
    store.set_value("x", "ab");
    store.ticker("x").expect("valid").set_mode(TickMode::Left);

    // "ab" is 12 px wide; wraparound tiles both 90 px surfaces.
    let first = store.backend().last(1, 0, "alice").map(str::to_owned);
    assert_eq!(first.as_deref(), Some("abababababababa"));
    store.tick();
    assert_eq!(store.backend().last(1, 0, "alice"), Some("bababababababab"));
}
