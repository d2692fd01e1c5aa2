#![forbid(unsafe_code)]

//! Entries and the arena that owns them.
//!
//! An entry is one variable's value as seen by one viewer (or by default).
//! Graph edges are [`EntryId`] indices into the [`EntryArena`], so the
//! declares/declaring sets are plain index lists with no shared ownership.

use signvar_ticker::{TickMode, Ticker, TickerState, TickerText};
use smallvec::SmallVec;

use crate::value::FormattedValue;
use crate::variable::VarId;

/// Stable index of an entry in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u32);

impl EntryId {
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

/// Which ticker state drives an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TickerSlot {
    /// The owning variable's shared state.
    #[default]
    Shared,
    /// A viewer's own state after promotion.
    Private(TickerState),
}

impl TickerSlot {
    #[inline]
    #[must_use]
    pub fn is_private(&self) -> bool {
        matches!(self, Self::Private(_))
    }

    /// The state to use, given the variable's shared state.
    #[must_use]
    pub fn resolve<'a>(&'a self, shared: &'a TickerState) -> &'a TickerState {
        match self {
            Self::Shared => shared,
            Self::Private(state) => state,
        }
    }
}

/// A variable's value scoped to the default view or to one viewer.
#[derive(Debug, Clone)]
pub struct Entry {
    pub(crate) variable: VarId,
    pub(crate) viewer: Option<String>,
    pub(crate) value: FormattedValue,
    pub(crate) text: TickerText,
    pub(crate) ticker: TickerSlot,
    /// Entries whose values reference this one.
    pub(crate) declaring: SmallVec<[EntryId; 4]>,
    pub(crate) custom: bool,
    pub(crate) computing: bool,
}

impl Entry {
    pub(crate) fn new(variable: VarId, viewer: Option<String>) -> Self {
        Self {
            variable,
            viewer,
            value: FormattedValue::default(),
            text: TickerText::default(),
            ticker: TickerSlot::Shared,
            declaring: SmallVec::new(),
            custom: false,
            computing: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn viewer(&self) -> Option<&str> {
        self.viewer.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> &FormattedValue {
        &self.value
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &TickerText {
        &self.text
    }

    #[inline]
    #[must_use]
    pub fn declaring(&self) -> &[EntryId] {
        &self.declaring
    }

    #[inline]
    #[must_use]
    pub fn has_custom_value(&self) -> bool {
        self.custom
    }

    /// Whether the entry's ticker scrolls, which turns on wraparound layout.
    #[must_use]
    pub fn scrolls(&self, shared: &TickerState) -> bool {
        matches!(
            self.ticker.resolve(shared).mode(),
            TickMode::Left | TickMode::Right
        )
    }

    pub(crate) fn add_declaring(&mut self, id: EntryId) {
        if !self.declaring.contains(&id) {
            self.declaring.push(id);
        }
    }

    pub(crate) fn remove_declaring(&mut self, id: EntryId) {
        self.declaring.retain(|d| *d != id);
    }
}

/// Slab of entries with index reuse.
#[derive(Debug, Clone, Default)]
pub struct EntryArena {
    slots: Vec<Option<Entry>>,
    free: Vec<u32>,
}

impl EntryArena {
    pub(crate) fn insert(&mut self, entry: Entry) -> EntryId {
        if let Some(index) = self.free.pop() {
            self.slots[index as usize] = Some(entry);
            return EntryId(index);
        }
        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Some(entry));
        EntryId(index)
    }

    pub(crate) fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let entry = self.slots.get_mut(id.index())?.take()?;
        self.free.push(id.0);
        Some(entry)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.slots.get(id.index())?.as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Live entries in index order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &Entry)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (EntryId(i as u32), e)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
