#![forbid(unsafe_code)]

//! Dependency edges, viewer bootstrap and cycle-safe recomputation.
//!
//! # Recompute
//!
//! ```text
//! mark     every root and, transitively, every entry declaring a marked
//!          entry is flagged computing (each at most once)
//! order    an entry is ready once none of the marked entries it declares
//!          is still computing; when nothing is ready the graph has a cycle
//!          and the earliest-marked pending entry goes next
//! compute  render tokens (a still-computing reference renders as its
//!          %name% placeholder), clear the flag, push if the text changed
//! settle   clear the flag on every marked entry
//! ```
//!
//! The work lists are explicit, so deep chains never grow the call stack.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use signvar_layout::SurfaceBackend;
use signvar_text::{StyledText, placeholder};

use crate::entry::{Entry, EntryId};
use crate::store::VariableStore;
use crate::value::{FormatChanges, FormattedValue, Token, detect_changes};
use crate::variable::VarId;

impl<B: SurfaceBackend> VariableStore<B> {
    /// The entry `name` resolves to for `viewer`, creating the variable.
    pub(crate) fn resolve(&mut self, name: &str, viewer: Option<&str>) -> Option<EntryId> {
        let var = self.ensure_variable(name)?;
        Some(self.vars.get(var)?.entry_for(viewer))
    }

    /// Replace an entry's value, applying the declared-set diff to the graph.
    pub(crate) fn assign_value(&mut self, id: EntryId, value: FormattedValue) {
        let Some(entry) = self.entries.get_mut(id) else {
            return;
        };
        let changes = detect_changes(entry.value.declared(), value.declared());
        entry.value = value;
        self.apply_changes(id, &changes);
    }

    /// The only place graph edges change.
    pub(crate) fn apply_changes(&mut self, owner: EntryId, changes: &FormatChanges) {
        if changes.is_empty() {
            return;
        }
        for &target in &changes.declared {
            if let Some(entry) = self.entries.get_mut(target) {
                entry.add_declaring(owner);
            }
        }
        for &target in &changes.undeclared {
            if let Some(entry) = self.entries.get_mut(target) {
                entry.remove_declaring(owner);
            }
        }
        tracing::trace!(
            entry = owner.index(),
            declared = changes.declared.len(),
            undeclared = changes.undeclared.len(),
            "edges updated"
        );
    }

    /// Re-resolve an entry's current format for its own viewer.
    pub(crate) fn reresolve_entry(&mut self, id: EntryId) {
        let Some(entry) = self.entries.get(id) else {
            return;
        };
        let viewer = entry.viewer.clone();
        let current = entry.value.clone();
        let value = current.reresolve(|name| self.resolve(name, viewer.as_deref()));
        self.assign_value(id, value);
    }

    /// Copy the default entry's format into a viewer entry, resolved for
    /// that viewer.
    pub(crate) fn follow_default(&mut self, id: EntryId) {
        let Some(entry) = self.entries.get(id) else {
            return;
        };
        let viewer = entry.viewer.clone();
        let Some(default) = self
            .vars
            .get(entry.variable)
            .and_then(|v| self.entries.get(v.default))
        else {
            return;
        };
        let source = default.value.clone();
        let value = source.reresolve(|name| self.resolve(name, viewer.as_deref()));
        self.assign_value(id, value);
    }

    /// The entry of `var` for `viewer`, creating it on first use.
    ///
    /// Every variable whose default entry embeds `var` gains an entry for the
    /// same viewer too, recursively, so embedding keeps resolving to the
    /// viewer's own values. Existing entries of that viewer which embedded a
    /// default are re-pointed at the new entries.
    pub(crate) fn ensure_viewer_entry(&mut self, var: VarId, viewer: &str) -> Option<EntryId> {
        if let Some(id) = self.vars.get(var)?.viewer_entry(viewer) {
            return Some(id);
        }

        let mut created: Vec<EntryId> = Vec::new();
        let mut stack = vec![var];
        while let Some(v) = stack.pop() {
            let Some(variable) = self.vars.get(v) else {
                continue;
            };
            if variable.viewers.contains_key(viewer) {
                continue;
            }
            let default = variable.default;
            let id = self.entries.insert(Entry::new(v, Some(viewer.to_owned())));
            if let Some(variable) = self.vars.get_mut(v) {
                variable.viewers.insert(viewer.to_owned(), id);
                tracing::debug!(variable = %variable.name, viewer, "viewer entry created");
            }
            created.push(id);
            if let Some(default) = self.entries.get(default) {
                for &d in &default.declaring {
                    if let Some(dependent) = self.entries.get(d)
                        && dependent.viewer.is_none()
                    {
                        stack.push(dependent.variable);
                    }
                }
            }
        }

        for &id in &created {
            self.follow_default(id);
        }
        let mut touched = created.clone();
        for &id in &created {
            let Some(default) = self
                .entries
                .get(id)
                .and_then(|e| self.vars.get(e.variable))
                .map(|v| v.default)
            else {
                continue;
            };
            let rebind: Vec<EntryId> = self
                .entries
                .get(default)
                .map(|d| {
                    d.declaring
                        .iter()
                        .copied()
                        .filter(|r| {
                            !created.contains(r)
                                && self
                                    .entries
                                    .get(*r)
                                    .is_some_and(|e| e.viewer.as_deref() == Some(viewer))
                        })
                        .collect()
                })
                .unwrap_or_default();
            for r in rebind {
                self.reresolve_entry(r);
                if !touched.contains(&r) {
                    touched.push(r);
                }
            }
        }
        self.recompute(&touched, true);
        self.vars.get(var)?.viewer_entry(viewer)
    }

    /// Give a default entry's variable an entry for every viewer that one of
    /// its embedded variables already has.
    pub(crate) fn cover_embedded_viewers(&mut self, default: EntryId) {
        let Some(entry) = self.entries.get(default) else {
            return;
        };
        if entry.viewer.is_some() {
            return;
        }
        let var = entry.variable;
        let Some(own) = self.vars.get(var) else {
            return;
        };
        let mut missing: Vec<String> = Vec::new();
        for &target in entry.value.declared() {
            let Some(embedded) = self.entries.get(target).and_then(|t| self.vars.get(t.variable))
            else {
                continue;
            };
            for viewer in embedded.viewers.keys() {
                if !own.viewers.contains_key(viewer) && !missing.contains(viewer) {
                    missing.push(viewer.clone());
                }
            }
        }
        missing.sort_unstable();
        for viewer in missing {
            self.ensure_viewer_entry(var, &viewer);
        }
    }

    /// Re-render `roots` and everything that embeds them.
    ///
    /// With `roots_too == false` the roots' own sources are kept (their
    /// displayed text moved for another reason, such as a ticker step) unless
    /// a root also embeds another marked entry.
    pub(crate) fn recompute(&mut self, roots: &[EntryId], roots_too: bool) {
        if roots.is_empty() {
            return;
        }
        let _span = tracing::trace_span!("signvar.recompute", roots = roots.len()).entered();

        let mut marked: Vec<EntryId> = Vec::new();
        let mut reached: FxHashSet<EntryId> = FxHashSet::default();
        let mut stack: Vec<EntryId> = roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(entry) = self.entries.get_mut(id) else {
                continue;
            };
            if entry.computing {
                continue;
            }
            entry.computing = true;
            marked.push(id);
            for &d in entry.declaring.iter().rev() {
                if d != id {
                    reached.insert(d);
                }
                stack.push(d);
            }
        }

        let mut pending: FxHashMap<EntryId, usize> = FxHashMap::default();
        for &id in &marked {
            let count = self.entries.get(id).map_or(0, |entry| {
                entry
                    .value
                    .declared()
                    .iter()
                    .filter(|d| **d != id && self.is_computing(**d))
                    .count()
            });
            pending.insert(id, count);
        }
        let mut ready: VecDeque<EntryId> = marked
            .iter()
            .copied()
            .filter(|id| pending.get(id) == Some(&0))
            .collect();

        loop {
            let id = match ready.pop_front() {
                Some(id) => id,
                None => match marked.iter().copied().find(|id| self.is_computing(*id)) {
                    Some(id) => {
                        tracing::trace!(entry = id.index(), "breaking reference cycle");
                        id
                    }
                    None => break,
                },
            };
            if !self.is_computing(id) {
                continue;
            }
            let render = roots_too || !roots.contains(&id) || reached.contains(&id);
            let changed = render && self.render_entry(id);
            let declaring = match self.entries.get_mut(id) {
                Some(entry) => {
                    entry.computing = false;
                    entry.declaring.clone()
                }
                None => continue,
            };
            if changed {
                self.push_entry(id);
            }
            for d in declaring {
                if !self.is_computing(d) {
                    continue;
                }
                if let Some(count) = pending.get_mut(&d) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.push_back(d);
                    }
                }
            }
        }

        for id in marked {
            if let Some(entry) = self.entries.get_mut(id) {
                entry.computing = false;
            }
        }
    }

    fn is_computing(&self, id: EntryId) -> bool {
        self.entries.get(id).is_some_and(|e| e.computing)
    }

    /// Rebuild an entry's source from its tokens. Returns whether the
    /// displayed text changed.
    fn render_entry(&mut self, id: EntryId) -> bool {
        let base = self.base_style();
        let Some(entry) = self.entries.get(id) else {
            return false;
        };
        let mut source = StyledText::new();
        let mut running = base;
        for token in entry.value.tokens() {
            match token {
                Token::Literal(raw) => running = source.push_raw(raw, running, base),
                Token::Variable(target) => {
                    let Some(target) = self.entries.get(*target) else {
                        continue;
                    };
                    if target.computing {
                        let name = self
                            .vars
                            .get(target.variable)
                            .map(|v| v.name.as_str())
                            .unwrap_or_default();
                        tracing::trace!(entry = id.index(), variable = name, "cycle placeholder");
                        running = source.push_raw(&placeholder(name), running, base);
                    } else {
                        source.append(target.text.current());
                    }
                }
            }
        }

        let variable = self.entries.get(id).map(|e| e.variable);
        let Some(var) = variable.and_then(|v| self.vars.get(v)) else {
            return false;
        };
        let Some(Entry { text, ticker, .. }) = self.entries.get_mut(id) else {
            return false;
        };
        text.set_source(source, ticker.resolve(&var.shared))
    }
}
