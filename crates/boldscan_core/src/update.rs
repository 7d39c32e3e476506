use crate::{AppState, CopyState, CycleId, Effect, Enrichment, EntryId, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::TriggerClicked => {
            // The control is disabled for the whole cycle, enrichment included.
            if !state.trigger_enabled() {
                return (state, Vec::new());
            }
            let cycle = state.begin_cycle();
            vec![Effect::ExtractActivePage { cycle }]
        }
        Msg::ExtractionFinished { cycle, result } => {
            if !state.is_awaiting_extraction(cycle) {
                return (state, Vec::new());
            }
            match result {
                Err(failure) => {
                    state.fail_cycle(failure);
                    Vec::new()
                }
                Ok(phrases) if phrases.is_empty() => {
                    state.show_no_results();
                    Vec::new()
                }
                Ok(phrases) => lookups(cycle, state.populate(phrases)),
            }
        }
        Msg::VideoResolved {
            cycle,
            entry,
            video_id,
        } => settle(&mut state, cycle, entry, Enrichment::Resolved { video_id }),
        Msg::VideoFailed { cycle, entry, .. } => {
            settle(&mut state, cycle, entry, Enrichment::Failed)
        }
        Msg::CopyClicked { entry } => {
            let cycle = state.cycle();
            if !state.is_current(cycle) {
                return (state, Vec::new());
            }
            match state.begin_copy(entry) {
                Some(text) => vec![Effect::WriteClipboard { cycle, entry, text }],
                None => Vec::new(),
            }
        }
        Msg::ClipboardWritten { cycle, entry } => {
            if state.is_current(cycle) && state.acknowledge_copy(entry) {
                vec![Effect::ScheduleCopyReset {
                    cycle,
                    entry,
                    after: state.options().copy_ack,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::ClipboardFailed { cycle, entry, .. } => {
            if state.is_current(cycle) {
                state.reset_copy(entry, CopyState::Writing);
            }
            Vec::new()
        }
        Msg::CopyAckElapsed { cycle, entry } => {
            if state.is_current(cycle) {
                state.reset_copy(entry, CopyState::Acknowledged);
            }
            Vec::new()
        }
        Msg::ClearClicked => match state.clear() {
            Some(cycle) => vec![Effect::CancelCycle { cycle }],
            None => Vec::new(),
        },
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn settle(
    state: &mut AppState,
    cycle: CycleId,
    entry: EntryId,
    outcome: Enrichment,
) -> Vec<Effect> {
    if !state.is_current(cycle) {
        return Vec::new();
    }
    lookups(cycle, state.settle_lookup(entry, outcome))
}

fn lookups(cycle: CycleId, started: Vec<(EntryId, String)>) -> Vec<Effect> {
    started
        .into_iter()
        .map(|(entry, phrase)| Effect::ResolveVideo {
            cycle,
            entry,
            phrase,
        })
        .collect()
}
