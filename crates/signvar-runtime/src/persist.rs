#![forbid(unsafe_code)]

//! Snapshot and restore in the persisted record shape.

use signvar_layout::SurfaceBackend;
use signvar_ticker::Ticker;

use crate::entry::TickerSlot;
use crate::error::{Result, StoreError};
use crate::record::{VariableRecord, ViewerRecord};
use crate::store::VariableStore;

impl<B: SurfaceBackend> VariableStore<B> {
    /// Every variable's persisted state, sorted by name.
    #[must_use]
    pub fn snapshot(&self) -> Vec<VariableRecord> {
        let mut records: Vec<VariableRecord> = self
            .vars
            .iter()
            .map(|var| {
                let value = self
                    .entries
                    .get(var.default)
                    .map(|e| e.value.format().to_owned())
                    .unwrap_or_default();
                let viewers = var
                    .viewers
                    .iter()
                    .filter_map(|(viewer, id)| {
                        let entry = self.entries.get(*id)?;
                        let value = entry.custom.then(|| entry.value.format().to_owned());
                        let ticker = match &entry.ticker {
                            TickerSlot::Private(state) => Some(Ticker::config(state)),
                            TickerSlot::Shared => None,
                        };
                        (value.is_some() || ticker.is_some()).then(|| ViewerRecord {
                            viewer: viewer.clone(),
                            value,
                            ticker,
                        })
                    })
                    .collect();
                VariableRecord {
                    name: var.name.clone(),
                    value,
                    ticker: Ticker::config(&var.shared),
                    viewers,
                }
            })
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    /// Apply persisted records. Returns the number of variables restored.
    ///
    /// Names are checked up front; one invalid name rejects the whole batch
    /// before anything changes.
    pub fn restore(&mut self, records: Vec<VariableRecord>) -> Result<usize> {
        if let Some(bad) = records.iter().find(|r| !self.is_valid_name(&r.name)) {
            return Err(StoreError::invalid_name(bad.name.clone()));
        }
        let count = records.len();
        for record in records {
            self.set_value(&record.name, &record.value);
            if let Some(mut ticker) = self.ticker(&record.name) {
                ticker.load_config(&record.ticker);
            }
            for viewer in record.viewers {
                if viewer.viewer.is_empty() {
                    tracing::warn!(variable = %record.name, "skipping viewer record without a viewer");
                    continue;
                }
                if let Some(value) = &viewer.value {
                    self.set_viewer_value(&record.name, &viewer.viewer, value);
                }
                if let Some(config) = &viewer.ticker
                    && let Some(mut ticker) = self.viewer_ticker(&record.name, &viewer.viewer)
                {
                    ticker.load_config(config);
                }
            }
        }
        tracing::debug!(count, "variables restored");
        Ok(count)
    }

    /// The snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Restore from JSON written by [`to_json`](Self::to_json).
    pub fn from_json(&mut self, json: &str) -> Result<usize> {
        let records: Vec<VariableRecord> = serde_json::from_str(json)?;
        self.restore(records)
    }
}
