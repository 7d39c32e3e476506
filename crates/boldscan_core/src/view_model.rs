use crate::{CopyState, CycleId, CycleStage, Enrichment, EntryId, ResultsPane};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub trigger_enabled: bool,
    pub cycle: CycleId,
    pub stage: CycleStage,
    pub enrich_with_video: bool,
    pub pane: ResultsPane,
    pub entries: Vec<EntryView>,
    pub in_flight_lookups: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub entry: EntryId,
    pub phrase: String,
    /// `None` in plain mode.
    pub enrichment: Option<Enrichment>,
    pub copy: CopyState,
}

impl AppViewModel {
    /// True once no cycle work is outstanding and every copy control shows its resting label.
    pub fn is_settled(&self) -> bool {
        self.trigger_enabled
            && self
                .entries
                .iter()
                .all(|entry| entry.copy == CopyState::Ready)
    }

    pub fn resolved_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.enrichment, Some(Enrichment::Resolved { .. })))
            .count()
    }
}
