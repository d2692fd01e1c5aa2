#![forbid(unsafe_code)]

//! signvar public facade crate.
//!
//! Re-exports the store, ticker controls and surface collaborator traits
//! under one name. Enable `tracing-json` for [`logging::init_json`].

#[cfg(feature = "tracing-json")]
pub mod logging;

pub use signvar_layout::{
    ChainDirection, LayoutConfig, LinkedSurface, Side, SurfaceBackend, SurfaceId,
};
pub use signvar_runtime::{
    DefaultTicker, EntryKey, GroupTicker, StoreConfig, StoreError, VariableEvent,
    VariableRecord, VariableStore, ViewerRecord, ViewerTicker,
};
pub use signvar_style::{ChatColor, Style};
pub use signvar_text::StyledText;
pub use signvar_ticker::{Pause, TickMode, Ticker, TickerConfig};

pub mod prelude {
    pub use signvar_layout as layout;
    pub use signvar_runtime as runtime;
    pub use signvar_style as style;
    pub use signvar_text as text;
    pub use signvar_ticker as ticker;

    pub use signvar_layout::{ChainDirection, LinkedSurface, SurfaceBackend, SurfaceId};
    pub use signvar_runtime::VariableStore;
    pub use signvar_ticker::{TickMode, Ticker};
}
