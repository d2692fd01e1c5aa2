#![forbid(unsafe_code)]

//! Change notifications for persistence and other collaborators.

/// Something a collaborator may want to react to.
///
/// Events are queued by the store and handed out by
/// [`drain_events`](crate::VariableStore::drain_events); the store never acts
/// on them itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableEvent {
    Created { name: String },
    Removed { name: String },
    /// The default value (`viewer == None`) or one viewer's value changed.
    Changed { name: String, viewer: Option<String> },
}

impl VariableEvent {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Created { name } | Self::Removed { name } | Self::Changed { name, .. } => name,
        }
    }
}
