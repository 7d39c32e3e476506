use std::time::Duration;

use crate::{CycleId, EntryId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the phrase extractor against the active page.
    ExtractActivePage { cycle: CycleId },
    /// Look up a video for one entry; answered by `VideoResolved` or `VideoFailed`.
    ResolveVideo {
        cycle: CycleId,
        entry: EntryId,
        phrase: String,
    },
    /// Drop any outstanding work for a cycle that is no longer displayed.
    CancelCycle { cycle: CycleId },
    /// Put the exact phrase text on the system clipboard.
    WriteClipboard {
        cycle: CycleId,
        entry: EntryId,
        text: String,
    },
    /// Deliver `CopyAckElapsed` once `after` has passed.
    ScheduleCopyReset {
        cycle: CycleId,
        entry: EntryId,
        after: Duration,
    },
}
