#![forbid(unsafe_code)]

//! The tick sweep and the three ticker handles.
//!
//! | Handle           | Reads                 | Writes                            |
//! |------------------|-----------------------|-----------------------------------|
//! | [`DefaultTicker`]| shared state          | shared state (default + followers)|
//! | [`ViewerTicker`] | the viewer's state    | promotes, then the private state  |
//! | [`GroupTicker`]  | the first member      | every member (each promoted)      |
//!
//! Promotion clones the shared state into the viewer's slot and bumps the
//! variable's ticking-viewer counter; [`VariableStore::reset_viewer_ticker`]
//! demotes again. The sweep only visits viewer entries of variables whose
//! counter is non-zero.

use std::sync::LazyLock;

use signvar_layout::SurfaceBackend;
use signvar_ticker::{Pause, TickMode, Ticker, TickerState};

use crate::entry::{EntryId, TickerSlot};
use crate::store::VariableStore;
use crate::variable::VarId;

/// Stand-in read by handles whose target vanished.
static IDLE: LazyLock<TickerState> = LazyLock::new(TickerState::new);

impl<B: SurfaceBackend> VariableStore<B> {
    /// Advance every ticker by one clock tick and redraw what moved.
    pub fn tick(&mut self) {
        let ids: Vec<VarId> = self.vars.ids().collect();
        for var_id in ids {
            let moved = self.tick_variable(var_id);
            self.refresh_entries(&moved, false);
        }
    }

    fn tick_variable(&mut self, var_id: VarId) -> Vec<EntryId> {
        let Some(var) = self.vars.get_mut(var_id) else {
            return Vec::new();
        };
        let mut moved = Vec::new();
        if var.shared.tick() {
            moved.push(var.default);
            moved.extend(var.viewers.values().copied().filter(|id| {
                self.entries
                    .get(*id)
                    .is_some_and(|e| !e.ticker.is_private())
            }));
        }
        if var.ticking_viewers > 0 {
            for &id in var.viewers.values() {
                if let Some(entry) = self.entries.get_mut(id)
                    && let TickerSlot::Private(state) = &mut entry.ticker
                    && state.tick()
                {
                    moved.push(id);
                }
            }
        }
        moved
    }

    /// Re-render entries whose ticker moved, then their dependents.
    ///
    /// `relayout` pushes even unchanged text, for settings such as the mode
    /// that change the layout without moving the text.
    pub(crate) fn refresh_entries(&mut self, ids: &[EntryId], relayout: bool) {
        let mut changed = Vec::with_capacity(ids.len());
        for &id in ids {
            let moved = self.refresh_entry(id);
            if moved || relayout {
                self.push_entry(id);
            }
            if moved {
                changed.push(id);
            }
        }
        self.recompute(&changed, false);
    }

    fn refresh_entry(&mut self, id: EntryId) -> bool {
        let Some(entry) = self.entries.get_mut(id) else {
            return false;
        };
        let Some(var) = self.vars.get(entry.variable) else {
            return false;
        };
        entry.text.refresh(entry.ticker.resolve(&var.shared))
    }

    /// Controls for the shared ticker of `name`.
    pub fn ticker(&mut self, name: &str) -> Option<DefaultTicker<'_, B>> {
        let var = self.ensure_variable(name)?;
        Some(DefaultTicker { store: self, var })
    }

    /// Controls for `viewer`'s ticker of `name`. The first mutation promotes
    /// the viewer to a private ticker.
    pub fn viewer_ticker(&mut self, name: &str, viewer: &str) -> Option<ViewerTicker<'_, B>> {
        if viewer.is_empty() {
            return None;
        }
        let var = self.ensure_variable(name)?;
        let entry = self.ensure_viewer_entry(var, viewer)?;
        Some(ViewerTicker { store: self, entry })
    }

    /// Controls that apply to several viewers of `name` at once.
    pub fn group_ticker<I, S>(&mut self, name: &str, viewers: I) -> Option<GroupTicker<'_, B>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let var = self.ensure_variable(name)?;
        let mut members = Vec::new();
        for viewer in viewers {
            let viewer = viewer.as_ref();
            if viewer.is_empty() {
                continue;
            }
            if let Some(id) = self.ensure_viewer_entry(var, viewer)
                && !members.contains(&id)
            {
                members.push(id);
            }
        }
        Some(GroupTicker {
            store: self,
            var,
            members,
        })
    }

    /// Return `viewer` to the shared ticker of `name`.
    pub fn reset_viewer_ticker(&mut self, name: &str, viewer: &str) -> bool {
        let Some(var_id) = self.vars.id(name) else {
            return false;
        };
        let Some(id) = self.vars.get(var_id).and_then(|v| v.viewer_entry(viewer)) else {
            return false;
        };
        match self.entries.get_mut(id) {
            Some(entry) if entry.ticker.is_private() => entry.ticker = TickerSlot::Shared,
            _ => return false,
        }
        if let Some(var) = self.vars.get_mut(var_id) {
            var.ticking_viewers = var.ticking_viewers.saturating_sub(1);
        }
        tracing::debug!(variable = name, viewer, "ticker demoted");
        self.refresh_entries(&[id], true);
        true
    }

    fn shared_state(&self, var: VarId) -> &TickerState {
        self.vars.get(var).map_or(&*IDLE, |v| &v.shared)
    }

    fn entry_state(&self, id: EntryId) -> &TickerState {
        self.entries
            .get(id)
            .and_then(|e| {
                let var = self.vars.get(e.variable)?;
                Some(e.ticker.resolve(&var.shared))
            })
            .unwrap_or(&*IDLE)
    }

    fn update_shared(&mut self, var_id: VarId, apply: impl Fn(&mut TickerState)) {
        let Some(var) = self.vars.get_mut(var_id) else {
            return;
        };
        apply(&mut var.shared);
        let mut followers = vec![var.default];
        followers.extend(var.viewers.values().copied().filter(|id| {
            self.entries
                .get(*id)
                .is_some_and(|e| !e.ticker.is_private())
        }));
        self.refresh_entries(&followers, true);
    }

    fn update_private(&mut self, ids: &[EntryId], apply: impl Fn(&mut TickerState)) {
        for &id in ids {
            let Some(entry) = self.entries.get_mut(id) else {
                continue;
            };
            let Some(var) = self.vars.get_mut(entry.variable) else {
                continue;
            };
            if !entry.ticker.is_private() {
                entry.ticker = TickerSlot::Private(var.shared.clone());
                var.ticking_viewers += 1;
                tracing::debug!(
                    variable = %var.name,
                    viewer = ?entry.viewer(),
                    ticking = var.ticking_viewers,
                    "ticker promoted"
                );
            }
            if let TickerSlot::Private(state) = &mut entry.ticker {
                apply(state);
            }
        }
        self.refresh_entries(ids, true);
    }
}

/// Implements [`Ticker`] for a handle from its `state()` and `update()`.
macro_rules! handle_ticker {
    ($handle:ident) => {
        impl<B: SurfaceBackend> Ticker for $handle<'_, B> {
            fn mode(&self) -> TickMode {
                self.state().mode()
            }

            fn set_mode(&mut self, mode: TickMode) {
                self.update(move |s| s.set_mode(mode));
            }

            fn interval(&self) -> u32 {
                self.state().interval()
            }

            fn set_interval(&mut self, interval: u32) {
                self.update(move |s| s.set_interval(interval));
            }

            fn pauses(&self) -> &[Pause] {
                self.state().pauses()
            }

            fn add_pause(&mut self, delay: u32, duration: u32) {
                self.update(move |s| s.add_pause(delay, duration));
            }

            fn clear_pauses(&mut self) {
                self.update(TickerState::clear_pauses);
            }

            fn left(&mut self) {
                self.update(TickerState::left);
            }

            fn right(&mut self) {
                self.update(TickerState::right);
            }

            fn blink(&mut self) {
                self.update(TickerState::blink);
            }

            fn reset(&mut self) {
                self.update(TickerState::reset);
            }

            fn config(&self) -> signvar_ticker::TickerConfig {
                Ticker::config(self.state())
            }
        }
    };
}

/// The shared ticker of one variable.
pub struct DefaultTicker<'a, B: SurfaceBackend> {
    store: &'a mut VariableStore<B>,
    var: VarId,
}

impl<B: SurfaceBackend> DefaultTicker<'_, B> {
    #[must_use]
    pub fn state(&self) -> &TickerState {
        self.store.shared_state(self.var)
    }

    fn update(&mut self, apply: impl Fn(&mut TickerState)) {
        self.store.update_shared(self.var, apply);
    }
}

handle_ticker!(DefaultTicker);

/// One viewer's ticker of one variable.
pub struct ViewerTicker<'a, B: SurfaceBackend> {
    store: &'a mut VariableStore<B>,
    entry: EntryId,
}

impl<B: SurfaceBackend> ViewerTicker<'_, B> {
    #[must_use]
    pub fn state(&self) -> &TickerState {
        self.store.entry_state(self.entry)
    }

    /// Whether this viewer already owns a private ticker.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.store
            .entries
            .get(self.entry)
            .is_some_and(|e| e.ticker.is_private())
    }

    fn update(&mut self, apply: impl Fn(&mut TickerState)) {
        self.store.update_private(&[self.entry], apply);
    }
}

handle_ticker!(ViewerTicker);

/// Fan-out over several viewers' tickers of one variable.
///
/// Reads report the first member; writes go to every member.
pub struct GroupTicker<'a, B: SurfaceBackend> {
    store: &'a mut VariableStore<B>,
    var: VarId,
    members: Vec<EntryId>,
}

impl<B: SurfaceBackend> GroupTicker<'_, B> {
    #[must_use]
    pub fn state(&self) -> &TickerState {
        match self.members.first() {
            Some(&first) => self.store.entry_state(first),
            None => self.store.shared_state(self.var),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn update(&mut self, apply: impl Fn(&mut TickerState)) {
        self.store.update_private(&self.members, apply);
    }
}

handle_ticker!(GroupTicker);
