use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use crate::view_model::{AppViewModel, EntryView};

pub type CycleId = u64;
pub type EntryId = usize;

pub const DEFAULT_COPY_ACK: Duration = Duration::from_millis(2_000);

/// Renderer configuration. Plain mode and enriched mode share every code path;
/// `enrich_with_video` only decides whether entries get a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelOptions {
    pub enrich_with_video: bool,
    /// Upper bound on outstanding lookups. 1 reproduces the sequential chain.
    pub max_concurrent_lookups: usize,
    pub copy_ack: Duration,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            enrich_with_video: false,
            max_concurrent_lookups: 1,
            copy_ack: DEFAULT_COPY_ACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleStage {
    #[default]
    Idle,
    Extracting,
    Enriching,
    Settled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    Pending,
    Resolved { video_id: String },
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyState {
    #[default]
    Ready,
    Writing,
    Acknowledged,
}

impl CopyState {
    pub fn label(self) -> &'static str {
        match self {
            CopyState::Ready | CopyState::Writing => "Copy",
            CopyState::Acknowledged => "Copied!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleFailure {
    NoActiveTarget,
    Unexpected(String),
}

impl fmt::Display for CycleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleFailure::NoActiveTarget => write!(f, "No active page found"),
            CycleFailure::Unexpected(message) => write!(f, "{message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsPane {
    #[default]
    Empty,
    Loading,
    NoResults,
    Error(String),
    Phrases,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResultEntry {
    phrase: String,
    enrichment: Option<Enrichment>,
    copy: CopyState,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    options: PanelOptions,
    stage: CycleStage,
    cycle: CycleId,
    pane: ResultsPane,
    entries: Vec<ResultEntry>,
    lookup_queue: VecDeque<EntryId>,
    in_flight: usize,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut options: PanelOptions) -> Self {
        options.max_concurrent_lookups = options.max_concurrent_lookups.max(1);
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &PanelOptions {
        &self.options
    }

    pub fn stage(&self) -> CycleStage {
        self.stage
    }

    pub fn cycle(&self) -> CycleId {
        self.cycle
    }

    pub fn trigger_enabled(&self) -> bool {
        matches!(self.stage, CycleStage::Idle | CycleStage::Settled)
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            trigger_enabled: self.trigger_enabled(),
            cycle: self.cycle,
            stage: self.stage,
            enrich_with_video: self.options.enrich_with_video,
            pane: self.pane.clone(),
            entries: self
                .entries
                .iter()
                .enumerate()
                .map(|(entry, e)| EntryView {
                    entry,
                    phrase: e.phrase.clone(),
                    enrichment: e.enrichment.clone(),
                    copy: e.copy,
                })
                .collect(),
            in_flight_lookups: self.in_flight,
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// A message belongs to the displayed cycle only while that cycle has not been cleared.
    pub(crate) fn is_current(&self, cycle: CycleId) -> bool {
        cycle == self.cycle && self.stage != CycleStage::Idle
    }

    pub(crate) fn is_awaiting_extraction(&self, cycle: CycleId) -> bool {
        cycle == self.cycle && self.stage == CycleStage::Extracting
    }

    /// Replaces the results view with a loading block and opens a new cycle.
    pub(crate) fn begin_cycle(&mut self) -> CycleId {
        self.cycle += 1;
        self.stage = CycleStage::Extracting;
        self.pane = ResultsPane::Loading;
        self.entries.clear();
        self.lookup_queue.clear();
        self.in_flight = 0;
        self.mark_dirty();
        self.cycle
    }

    pub(crate) fn fail_cycle(&mut self, failure: CycleFailure) {
        self.pane = ResultsPane::Error(failure.to_string());
        self.entries.clear();
        self.lookup_queue.clear();
        self.in_flight = 0;
        self.stage = CycleStage::Settled;
        self.mark_dirty();
    }

    pub(crate) fn show_no_results(&mut self) {
        self.pane = ResultsPane::NoResults;
        self.stage = CycleStage::Settled;
        self.mark_dirty();
    }

    /// Creates one entry per phrase and returns the lookups that may start now.
    pub(crate) fn populate(&mut self, phrases: Vec<String>) -> Vec<(EntryId, String)> {
        let enrich = self.options.enrich_with_video;
        self.entries = phrases
            .into_iter()
            .map(|phrase| ResultEntry {
                phrase,
                enrichment: enrich.then_some(Enrichment::Pending),
                copy: CopyState::Ready,
            })
            .collect();
        self.pane = ResultsPane::Phrases;
        self.mark_dirty();

        if enrich {
            self.stage = CycleStage::Enriching;
            self.lookup_queue = (0..self.entries.len()).collect();
            self.release_lookups()
        } else {
            self.stage = CycleStage::Settled;
            Vec::new()
        }
    }

    fn release_lookups(&mut self) -> Vec<(EntryId, String)> {
        let mut started = Vec::new();
        while self.in_flight < self.options.max_concurrent_lookups {
            let Some(entry) = self.lookup_queue.pop_front() else {
                break;
            };
            self.in_flight += 1;
            started.push((entry, self.entries[entry].phrase.clone()));
        }
        started
    }

    /// Applies a lookup outcome to a pending entry. Returns the lookups that may
    /// start next; an outcome for an already settled entry changes nothing.
    pub(crate) fn settle_lookup(
        &mut self,
        entry: EntryId,
        outcome: Enrichment,
    ) -> Vec<(EntryId, String)> {
        let Some(slot) = self.entries.get_mut(entry) else {
            return Vec::new();
        };
        if slot.enrichment != Some(Enrichment::Pending) {
            return Vec::new();
        }
        slot.enrichment = Some(outcome);
        self.in_flight = self.in_flight.saturating_sub(1);
        self.mark_dirty();

        let started = self.release_lookups();
        if self.in_flight == 0 && self.lookup_queue.is_empty() {
            self.stage = CycleStage::Settled;
        }
        started
    }

    /// Empties the results view. Returns the cycle whose work must be cancelled, if any.
    pub(crate) fn clear(&mut self) -> Option<CycleId> {
        let in_flight = matches!(self.stage, CycleStage::Extracting | CycleStage::Enriching)
            .then_some(self.cycle);
        if self.stage == CycleStage::Idle && self.pane == ResultsPane::Empty {
            return None;
        }
        self.stage = CycleStage::Idle;
        self.pane = ResultsPane::Empty;
        self.entries.clear();
        self.lookup_queue.clear();
        self.in_flight = 0;
        self.mark_dirty();
        in_flight
    }

    /// Starts a clipboard write for an entry, returning the raw phrase to copy.
    pub(crate) fn begin_copy(&mut self, entry: EntryId) -> Option<String> {
        let slot = self.entries.get_mut(entry)?;
        if slot.copy == CopyState::Writing {
            return None;
        }
        slot.copy = CopyState::Writing;
        Some(slot.phrase.clone())
    }

    pub(crate) fn acknowledge_copy(&mut self, entry: EntryId) -> bool {
        match self.entries.get_mut(entry) {
            Some(slot) if slot.copy == CopyState::Writing => {
                slot.copy = CopyState::Acknowledged;
                self.mark_dirty();
                true
            }
            _ => false,
        }
    }

    /// Moves an entry's copy control back to `Ready`, but only out of `from`.
    pub(crate) fn reset_copy(&mut self, entry: EntryId, from: CopyState) {
        if let Some(slot) = self.entries.get_mut(entry) {
            if slot.copy == from && from != CopyState::Ready {
                slot.copy = CopyState::Ready;
                self.mark_dirty();
            }
        }
    }
}
