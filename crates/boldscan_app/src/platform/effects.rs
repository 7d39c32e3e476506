use std::time::Duration;

use boldscan_core::{CycleFailure, Effect, Msg};
use boldscan_engine::{
    EngineConfig, EngineEvent, EngineHandle, EngineStopped, LoadError, PageTarget,
};
use boldscan_logging::{scan_debug, scan_info, scan_warn};

/// Where the session sends effects and waits for the messages they produce.
pub trait EffectPort {
    fn enqueue(&self, effects: Vec<Effect>);

    /// `Ok(None)` when nothing arrived within `timeout`.
    fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineStopped>;
}

/// Executes core effects against the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    target: Option<PageTarget>,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, target: Option<PageTarget>) -> std::io::Result<Self> {
        Ok(Self::with_engine(EngineHandle::new(config)?, target))
    }

    pub fn with_engine(engine: EngineHandle, target: Option<PageTarget>) -> Self {
        Self { engine, target }
    }
}

impl EffectPort for EffectRunner {
    fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ExtractActivePage { cycle } => {
                    match &self.target {
                        Some(target) => scan_info!("cycle {cycle}: extracting from {target}"),
                        None => scan_warn!("cycle {cycle}: no page given"),
                    }
                    self.engine.extract(cycle, self.target.clone());
                }
                Effect::ResolveVideo {
                    cycle,
                    entry,
                    phrase,
                } => {
                    scan_debug!("cycle {cycle}: resolving entry {entry}");
                    self.engine.resolve(cycle, entry, phrase);
                }
                Effect::CancelCycle { cycle } => {
                    scan_debug!("cycle {cycle}: cancelling");
                    self.engine.cancel(cycle);
                }
                Effect::WriteClipboard { cycle, entry, text } => {
                    self.engine.copy(cycle, entry, text);
                }
                Effect::ScheduleCopyReset {
                    cycle,
                    entry,
                    after,
                } => {
                    self.engine.schedule_copy_reset(cycle, entry, after);
                }
            }
        }
    }

    fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineStopped> {
        Ok(self.engine.recv_timeout(timeout)?.map(map_event))
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Extracted { cycle, result } => Msg::ExtractionFinished {
            cycle,
            result: result.map_err(|err| {
                scan_warn!("cycle {cycle}: extraction failed: {err}");
                map_load_error(err)
            }),
        },
        EngineEvent::VideoResolved {
            cycle,
            entry,
            video_id,
        } => Msg::VideoResolved {
            cycle,
            entry,
            video_id,
        },
        EngineEvent::VideoFailed {
            cycle,
            entry,
            reason,
        } => Msg::VideoFailed {
            cycle,
            entry,
            reason,
        },
        EngineEvent::ClipboardWritten { cycle, entry } => Msg::ClipboardWritten { cycle, entry },
        EngineEvent::ClipboardFailed {
            cycle,
            entry,
            reason,
        } => Msg::ClipboardFailed {
            cycle,
            entry,
            reason,
        },
        EngineEvent::CopyAckElapsed { cycle, entry } => Msg::CopyAckElapsed { cycle, entry },
    }
}

fn map_load_error(err: LoadError) -> CycleFailure {
    match err {
        LoadError::NoActiveTarget => CycleFailure::NoActiveTarget,
        other => CycleFailure::Unexpected(other.to_string()),
    }
}
