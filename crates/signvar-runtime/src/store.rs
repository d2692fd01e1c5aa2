#![forbid(unsafe_code)]

//! The variable store: named variables, their entries, and value assignment.
//!
//! # Design
//!
//! The store owns every [`Variable`] and every [`Entry`](crate::entry::Entry).
//! Each variable has a default entry plus one entry per viewer that needed its
//! own view. Value changes go through [`FormattedValue`] resolution and the
//! declared-set diff, then a recompute pass (see `graph.rs`) re-renders the
//! entry and everything that embeds it and pushes changed text to surfaces.
//!
//! # Invariants
//!
//! 1. For all entries X, Y: `Y ∈ X.declared ⟺ X ∈ Y.declaring`.
//! 2. No entry is left marked computing once a public method returns.
//! 3. A non-custom viewer entry's format always equals its default's format.
//! 4. Assigning the value an entry already holds emits no event and writes
//!    nothing.
//!
//! Reentrant assignment from inside a recompute is impossible: every mutating
//! method takes `&mut self`, and notifications are queued as
//! [`VariableEvent`]s for the caller to drain afterwards.

use signvar_layout::{LineCache, SurfaceBackend};
use signvar_style::Style;
use signvar_text::StyledText;

use crate::config::StoreConfig;
use crate::entry::{Entry, EntryArena, EntryId};
use crate::event::VariableEvent;
use crate::value::{FormattedValue, detect_changes};
use crate::variable::{VarId, Variable, VariableTable};

/// Identifies one entry by variable name and viewer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    pub variable: String,
    pub viewer: Option<String>,
}

/// Owner of all variables, their dependency graph and surface bindings.
pub struct VariableStore<B: SurfaceBackend> {
    pub(crate) config: StoreConfig,
    pub(crate) backend: B,
    pub(crate) vars: VariableTable,
    pub(crate) entries: EntryArena,
    pub(crate) lines: LineCache,
    pub(crate) events: Vec<VariableEvent>,
}

impl<B: SurfaceBackend> std::fmt::Debug for VariableStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariableStore")
            .field("variables", &self.vars.len())
            .field("entries", &self.entries.len())
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl<B: SurfaceBackend> VariableStore<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, StoreConfig::default())
    }

    #[must_use]
    pub fn with_config(backend: B, config: StoreConfig) -> Self {
        Self {
            config,
            backend,
            vars: VariableTable::default(),
            entries: EntryArena::default(),
            lines: LineCache::new(),
            events: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }

    #[must_use]
    pub fn is_valid_name(&self, name: &str) -> bool {
        self.config.is_valid_name(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.id(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variable names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.vars.iter().map(|v| v.name.clone()).collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.vars.by_name(name)
    }

    #[must_use]
    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id)
    }

    /// Take every queued notification, oldest first.
    pub fn drain_events(&mut self) -> Vec<VariableEvent> {
        std::mem::take(&mut self.events)
    }

    /// Create `name` if it does not exist. Returns `false` for invalid names.
    pub fn create(&mut self, name: &str) -> bool {
        self.ensure_variable(name).is_some()
    }

    /// Set the default value of `name`, creating the variable if needed.
    ///
    /// Viewers without a custom value follow the new value, re-resolved so
    /// their references keep pointing at their own entries. Viewers with an
    /// entry in a newly embedded variable get one here as well.
    pub fn set_value(&mut self, name: &str, format: &str) -> bool {
        let Some(var_id) = self.ensure_variable(name) else {
            return false;
        };
        let Some(default) = self.vars.get(var_id).map(|v| v.default) else {
            return false;
        };
        if self
            .entries
            .get(default)
            .is_some_and(|e| e.value.format() == format && !e.value.is_detached())
        {
            return true;
        }
        let value = self.build_value(format, None);
        self.assign_value(default, value);
        self.events.push(VariableEvent::Changed {
            name: name.to_owned(),
            viewer: None,
        });

        let followers: Vec<EntryId> = self
            .vars
            .get(var_id)
            .map(|v| {
                v.viewers
                    .values()
                    .copied()
                    .filter(|id| self.entries.get(*id).is_some_and(|e| !e.custom))
                    .collect()
            })
            .unwrap_or_default();
        for &id in &followers {
            self.follow_default(id);
        }
        let mut roots = Vec::with_capacity(followers.len() + 1);
        roots.push(default);
        roots.extend(followers);
        self.recompute(&roots, true);
        self.cover_embedded_viewers(default);
        true
    }

    /// Give `viewer` their own value of `name`.
    pub fn set_viewer_value(&mut self, name: &str, viewer: &str, format: &str) -> bool {
        if viewer.is_empty() {
            return false;
        }
        let Some(var_id) = self.ensure_variable(name) else {
            return false;
        };
        let Some(id) = self.ensure_viewer_entry(var_id, viewer) else {
            return false;
        };
        if self
            .entries
            .get(id)
            .is_some_and(|e| e.custom && e.value.format() == format && !e.value.is_detached())
        {
            return true;
        }
        let value = self.build_value(format, Some(viewer));
        self.assign_value(id, value);
        if let Some(entry) = self.entries.get_mut(id) {
            entry.custom = true;
        }
        self.events.push(VariableEvent::Changed {
            name: name.to_owned(),
            viewer: Some(viewer.to_owned()),
        });
        self.recompute(&[id], true);
        true
    }

    /// Drop `viewer`'s custom value; their entry follows the default again.
    pub fn clear_viewer_value(&mut self, name: &str, viewer: &str) -> bool {
        let Some(id) = self.vars.by_name(name).and_then(|v| v.viewer_entry(viewer)) else {
            return false;
        };
        match self.entries.get_mut(id) {
            Some(entry) if entry.custom => entry.custom = false,
            _ => return false,
        }
        self.follow_default(id);
        self.events.push(VariableEvent::Changed {
            name: name.to_owned(),
            viewer: Some(viewer.to_owned()),
        });
        self.recompute(&[id], true);
        true
    }

    /// Remove `viewer`'s entry of `name`. Their same-viewer dependents fall
    /// back to the default entry.
    pub fn remove_viewer(&mut self, name: &str, viewer: &str) -> bool {
        let Some(var_id) = self.vars.id(name) else {
            return false;
        };
        let Some(id) = self
            .vars
            .get_mut(var_id)
            .and_then(|v| v.viewers.remove(viewer))
        else {
            return false;
        };
        let Some(entry) = self.entries.get(id) else {
            return false;
        };
        let changes = detect_changes(entry.value.declared(), &[]);
        let dependents: Vec<EntryId> = entry.declaring.iter().copied().filter(|d| *d != id).collect();
        let was_private = entry.ticker.is_private();
        let was_custom = entry.custom;
        self.apply_changes(id, &changes);
        self.entries.remove(id);

        let Some(var) = self.vars.get_mut(var_id) else {
            return false;
        };
        if was_private {
            var.ticking_viewers = var.ticking_viewers.saturating_sub(1);
        }
        let default = var.default;
        tracing::debug!(variable = name, viewer, "viewer entry removed");
        if was_custom {
            self.events.push(VariableEvent::Changed {
                name: name.to_owned(),
                viewer: Some(viewer.to_owned()),
            });
        }

        for &d in &dependents {
            self.reresolve_entry(d);
        }
        self.recompute(&dependents, true);
        self.push_entry(default);
        true
    }

    /// Remove `name` and everything attached to it.
    ///
    /// Entries elsewhere that embedded it keep showing its `%name%`
    /// placeholder until their own value is set again.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(var_id) = self.vars.id(name) else {
            return false;
        };
        let Some(ids) = self.vars.get(var_id).map(|v| v.entries().collect::<Vec<_>>()) else {
            return false;
        };
        for &id in &ids {
            let declared = self
                .entries
                .get(id)
                .map(|e| e.value.declared().to_vec())
                .unwrap_or_default();
            let changes = detect_changes(&declared, &[]);
            self.apply_changes(id, &changes);
        }

        let literal = signvar_text::placeholder(name);
        let mut dependents: Vec<EntryId> = Vec::new();
        for &id in &ids {
            let declaring = self
                .entries
                .get(id)
                .map(|e| e.declaring.clone())
                .unwrap_or_default();
            for d in declaring {
                if ids.contains(&d) {
                    continue;
                }
                if let Some(dependent) = self.entries.get_mut(d) {
                    dependent.value.detach(id, &literal);
                }
                if !dependents.contains(&d) {
                    dependents.push(d);
                }
            }
        }
        for &id in &ids {
            self.entries.remove(id);
        }
        if let Some(mut var) = self.vars.remove(var_id) {
            for link in &mut var.surfaces {
                let line = link.line();
                for &surface in link.surfaces(&self.backend, self.config.layout.max_chain_len) {
                    self.lines.forget_line(surface, line);
                }
            }
        }
        tracing::debug!(variable = name, dependents = dependents.len(), "variable removed");
        self.events.push(VariableEvent::Removed {
            name: name.to_owned(),
        });
        self.recompute(&dependents, true);
        true
    }

    /// Re-render every entry of `name` and everything embedding it.
    pub fn refresh(&mut self, name: &str) -> bool {
        let Some(roots) = self.vars.by_name(name).map(|v| v.entries().collect::<Vec<_>>()) else {
            return false;
        };
        self.recompute(&roots, true);
        true
    }

    /// Viewers holding their own entry of `name`, sorted.
    #[must_use]
    pub fn viewers(&self, name: &str) -> Vec<String> {
        self.vars
            .by_name(name)
            .map(|v| v.viewers.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The format string `viewer` (or the default view) sees.
    #[must_use]
    pub fn format(&self, name: &str, viewer: Option<&str>) -> Option<&str> {
        self.view(name, viewer).map(|e| e.value.format())
    }

    /// The displayed text, animation applied.
    #[must_use]
    pub fn styled_text(&self, name: &str, viewer: Option<&str>) -> Option<&StyledText> {
        self.view(name, viewer).map(|e| e.text.current())
    }

    /// The displayed text encoded relative to the base style.
    #[must_use]
    pub fn text(&self, name: &str, viewer: Option<&str>) -> Option<String> {
        let base = self.base_style();
        self.styled_text(name, viewer).map(|t| t.encode(base))
    }

    /// Entries referenced by `name`'s entry for `viewer`.
    #[must_use]
    pub fn declares(&self, name: &str, viewer: Option<&str>) -> Option<Vec<EntryKey>> {
        let entry = self.view(name, viewer)?;
        Some(self.keys(entry.value.declared()))
    }

    /// Entries that reference `name`'s entry for `viewer`.
    #[must_use]
    pub fn declaring(&self, name: &str, viewer: Option<&str>) -> Option<Vec<EntryKey>> {
        let entry = self.view(name, viewer)?;
        Some(self.keys(&entry.declaring))
    }

    /// Whether declares and declaring edges are inverse everywhere.
    #[must_use]
    pub fn edges_are_mutual(&self) -> bool {
        self.entries.iter().all(|(id, entry)| {
            entry.value.declared().iter().all(|d| {
                self.entries
                    .get(*d)
                    .is_some_and(|target| target.declaring.contains(&id))
            }) && entry.declaring.iter().all(|d| {
                self.entries
                    .get(*d)
                    .is_some_and(|source| source.value.declared().contains(&id))
            })
        })
    }

    /// Whether no entry is marked as computing.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|(_, entry)| !entry.computing)
    }

    #[inline]
    pub(crate) fn base_style(&self) -> Style {
        self.config.layout.base_style
    }

    fn view(&self, name: &str, viewer: Option<&str>) -> Option<&Entry> {
        let var = self.vars.by_name(name)?;
        self.entries.get(var.entry_for(viewer))
    }

    fn keys(&self, ids: &[EntryId]) -> Vec<EntryKey> {
        let mut keys: Vec<EntryKey> = ids
            .iter()
            .filter_map(|id| self.entries.get(*id))
            .filter_map(|entry| {
                Some(EntryKey {
                    variable: self.vars.get(entry.variable)?.name.clone(),
                    viewer: entry.viewer.clone(),
                })
            })
            .collect();
        keys.sort();
        keys
    }

    pub(crate) fn ensure_variable(&mut self, name: &str) -> Option<VarId> {
        if !self.config.is_valid_name(name) {
            return None;
        }
        if let Some(id) = self.vars.id(name) {
            return Some(id);
        }
        let var_id = self.vars.next_id();
        let default = self.entries.insert(Entry::new(var_id, None));
        let id = self.vars.insert(Variable::new(name.to_owned(), default));
        tracing::debug!(variable = name, "variable created");
        self.events.push(VariableEvent::Created {
            name: name.to_owned(),
        });
        Some(id)
    }

    pub(crate) fn build_value(&mut self, format: &str, viewer: Option<&str>) -> FormattedValue {
        let viewer = viewer.map(str::to_owned);
        FormattedValue::build(format, |name| self.resolve(name, viewer.as_deref()))
    }
}
