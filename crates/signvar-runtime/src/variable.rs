#![forbid(unsafe_code)]

//! Named variables: a default entry, per-viewer entries and bound surfaces.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use signvar_layout::LinkedSurface;
use signvar_ticker::TickerState;

use crate::entry::EntryId;

/// Stable index of a variable in the [`VariableTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u32);

impl VarId {
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub(crate) name: String,
    pub(crate) default: EntryId,
    /// Viewer entries, ordered by viewer name.
    pub(crate) viewers: BTreeMap<String, EntryId>,
    pub(crate) surfaces: Vec<LinkedSurface>,
    /// State behind every entry that has not been promoted.
    pub(crate) shared: TickerState,
    /// Number of viewer entries owning a private ticker.
    pub(crate) ticking_viewers: usize,
}

impl Variable {
    pub(crate) fn new(name: String, default: EntryId) -> Self {
        Self {
            name,
            default,
            viewers: BTreeMap::new(),
            surfaces: Vec::new(),
            shared: TickerState::new(),
            ticking_viewers: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn default_entry(&self) -> EntryId {
        self.default
    }

    #[must_use]
    pub fn viewer_entry(&self, viewer: &str) -> Option<EntryId> {
        self.viewers.get(viewer).copied()
    }

    /// The viewer's entry if one exists, else the default entry.
    #[must_use]
    pub fn entry_for(&self, viewer: Option<&str>) -> EntryId {
        viewer
            .and_then(|v| self.viewer_entry(v))
            .unwrap_or(self.default)
    }

    /// Every entry, default first.
    pub fn entries(&self) -> impl Iterator<Item = EntryId> + '_ {
        std::iter::once(self.default).chain(self.viewers.values().copied())
    }

    #[inline]
    #[must_use]
    pub fn ticking_viewers(&self) -> usize {
        self.ticking_viewers
    }

    #[inline]
    #[must_use]
    pub fn surfaces(&self) -> &[LinkedSurface] {
        &self.surfaces
    }
}

/// Variables by index and by name.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    slots: Vec<Option<Variable>>,
    free: Vec<u32>,
    names: FxHashMap<String, VarId>,
}

impl VariableTable {
    #[must_use]
    pub fn id(&self, name: &str) -> Option<VarId> {
        self.names.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: VarId) -> Option<&Variable> {
        self.slots.get(id.index())?.as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: VarId) -> Option<&mut Variable> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Variable> {
        self.get(self.id(name)?)
    }

    /// Reserve the id the next inserted variable will get.
    pub(crate) fn next_id(&self) -> VarId {
        match self.free.last() {
            Some(index) => VarId(*index),
            None => VarId(u32::try_from(self.slots.len()).unwrap_or(u32::MAX)),
        }
    }

    pub(crate) fn insert(&mut self, variable: Variable) -> VarId {
        let id = self.next_id();
        self.names.insert(variable.name.clone(), id);
        if self.free.pop().is_some() {
            self.slots[id.index()] = Some(variable);
        } else {
            self.slots.push(Some(variable));
        }
        id
    }

    pub(crate) fn remove(&mut self, id: VarId) -> Option<Variable> {
        let variable = self.slots.get_mut(id.index())?.take()?;
        self.names.remove(&variable.name);
        self.free.push(id.0);
        Some(variable)
    }

    /// Live variable ids in index order.
    pub fn ids(&self) -> impl Iterator<Item = VarId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| VarId(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.slots.iter().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
