use crate::{CycleFailure, CycleId, EntryId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User pressed the extract control.
    TriggerClicked,
    /// Extractor finished for a cycle.
    ExtractionFinished {
        cycle: CycleId,
        result: Result<Vec<String>, CycleFailure>,
    },
    /// Resolver produced a video id (possibly the fallback) for an entry.
    VideoResolved {
        cycle: CycleId,
        entry: EntryId,
        video_id: String,
    },
    /// The lookup task for an entry died before producing an id.
    VideoFailed {
        cycle: CycleId,
        entry: EntryId,
        reason: String,
    },
    /// User pressed an entry's copy control.
    CopyClicked { entry: EntryId },
    /// Clipboard accepted the text.
    ClipboardWritten { cycle: CycleId, entry: EntryId },
    /// Clipboard rejected the text.
    ClipboardFailed {
        cycle: CycleId,
        entry: EntryId,
        reason: String,
    },
    /// The transient "Copied!" label has been shown long enough.
    CopyAckElapsed { cycle: CycleId, entry: EntryId },
    /// User cleared the results view.
    ClearClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
