//! Boldscan core: pure panel state machine, view model and markup rendering.
mod effect;
mod markup;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use markup::{embed_url, escape_html, render_panel, render_summary};
pub use msg::Msg;
pub use state::{
    AppState, CopyState, CycleFailure, CycleId, CycleStage, Enrichment, EntryId, PanelOptions,
    ResultsPane,
};
pub use update::update;
pub use view_model::{AppViewModel, EntryView};
