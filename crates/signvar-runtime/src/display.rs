#![forbid(unsafe_code)]

//! Surface bindings and line delivery.

use signvar_layout::{
    LayoutInput, LinkedSurface, SurfaceBackend, SurfaceId, ViewerFilter, boundary_fragments,
    encode_lines, layout_lines,
};
use signvar_text::placeholder;

use crate::entry::EntryId;
use crate::store::VariableStore;
use crate::variable::VarId;

impl<B: SurfaceBackend> VariableStore<B> {
    /// Show `name` on the chain starting at `link`. Returns `false` if the
    /// name is invalid or that line is already bound.
    pub fn bind_surface(&mut self, name: &str, link: LinkedSurface) -> bool {
        let Some(var_id) = self.ensure_variable(name) else {
            return false;
        };
        let Some(var) = self.vars.get_mut(var_id) else {
            return false;
        };
        if var
            .surfaces
            .iter()
            .any(|s| s.is_at(link.start(), link.line()))
        {
            return false;
        }
        tracing::debug!(
            variable = name,
            surface = link.start().raw(),
            line = link.line(),
            direction = ?link.direction(),
            "surface bound"
        );
        var.surfaces.push(link);
        self.push_variable(var_id);
        true
    }

    /// Stop showing `name` on the chain starting at `start`/`line`.
    pub fn unbind_surface(&mut self, name: &str, start: SurfaceId, line: usize) -> bool {
        let Some(var) = self.vars.id(name).and_then(|id| self.vars.get_mut(id)) else {
            return false;
        };
        let Some(index) = var.surfaces.iter().position(|s| s.is_at(start, line)) else {
            return false;
        };
        let mut link = var.surfaces.remove(index);
        for &surface in link.surfaces(&self.backend, self.config.layout.max_chain_len) {
            self.lines.forget_line(surface, line);
        }
        tracing::debug!(variable = name, surface = start.raw(), line, "surface unbound");
        true
    }

    /// Chain-changed notification: every binding touching `surface` walks
    /// its chain again and is redrawn. Returns the number of bindings hit.
    pub fn invalidate_surface(&mut self, surface: SurfaceId) -> usize {
        let mut hit: Vec<VarId> = Vec::new();
        let mut count = 0;
        let ids: Vec<VarId> = self.vars.ids().collect();
        for var_id in ids {
            let Some(var) = self.vars.get_mut(var_id) else {
                continue;
            };
            for link in &mut var.surfaces {
                if link.touches(surface) {
                    link.invalidate();
                    count += 1;
                    if !hit.contains(&var_id) {
                        hit.push(var_id);
                    }
                }
            }
        }
        for var_id in hit {
            self.push_variable(var_id);
        }
        count
    }

    /// `viewer` left every surface; whatever they see next is resent.
    pub fn forget_viewer(&mut self, viewer: &str) {
        self.lines.forget_viewer(viewer);
    }

    /// Push every variable to its surfaces. Only lines that differ from what
    /// a viewer last received are transmitted.
    pub fn redraw(&mut self) {
        let ids: Vec<VarId> = self.vars.ids().collect();
        for var_id in ids {
            self.push_variable(var_id);
        }
    }

    pub(crate) fn push_variable(&mut self, var_id: VarId) {
        let entries: Vec<EntryId> = self
            .vars
            .get(var_id)
            .map(|v| v.entries().collect())
            .unwrap_or_default();
        for id in entries {
            self.push_entry(id);
        }
    }

    /// Lay out an entry's displayed text on every bound chain and deliver
    /// it to the viewers that entry speaks for.
    pub(crate) fn push_entry(&mut self, id: EntryId) {
        let Self {
            config,
            backend,
            vars,
            entries,
            lines,
            ..
        } = self;
        let Some(entry) = entries.get(id) else {
            return;
        };
        let Some(var) = vars.get_mut(entry.variable) else {
            return;
        };
        if var.surfaces.is_empty() {
            return;
        }
        let filter = match entry.viewer() {
            Some(viewer) => ViewerFilter::only(viewer),
            None => ViewerFilter::except(var.viewers.keys().cloned()),
        };
        let wraparound = entry.scrolls(&var.shared);
        let marker = placeholder(&var.name);
        let layout = config.layout;
        let value = entry.text.current();

        let mut sent = 0;
        for link in &mut var.surfaces {
            let line = link.line();
            let direction = link.direction();
            let chain = link.surfaces(&*backend, layout.max_chain_len).to_vec();
            let (Some(&first), Some(&last)) = (chain.first(), chain.last()) else {
                continue;
            };
            let fragments = boundary_fragments(
                backend.raw_line(first, line).as_deref(),
                backend.raw_line(last, line).as_deref(),
                &marker,
                layout.base_style,
            );
            let rendered = layout_lines(
                &LayoutInput {
                    prefix: &fragments.prefix,
                    value,
                    postfix: &fragments.postfix,
                    surfaces: chain.len(),
                    direction,
                    wraparound,
                },
                layout.width_limit,
            );
            for (surface, text) in chain.iter().zip(encode_lines(&rendered, layout.base_style)) {
                sent += lines.apply(&mut *backend, *surface, line, &text, &filter);
            }
        }
        if sent > 0 {
            tracing::trace!(variable = %var.name, viewer = ?entry.viewer(), sent, "entry pushed");
        }
    }
}
