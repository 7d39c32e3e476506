use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use boldscan_logging::{scan_debug, scan_warn};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::clipboard::{ClipboardWriter, SystemClipboard};
use crate::extract::{BoldPhraseExtractor, PhraseExtractor};
use crate::fetch::{FetchSettings, ReqwestFetcher};
use crate::page::{LoadError, PageLoader, PageTarget};
use crate::resolve::{ResolverSettings, VideoResolver, YoutubeResolver};
use crate::{CycleId, EngineEvent, EngineStopped, EntryId};

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub resolver: ResolverSettings,
}

/// The collaborators the engine drives. Tests swap in fakes.
#[derive(Clone)]
pub struct EngineServices {
    pub loader: Arc<PageLoader>,
    pub extractor: Arc<dyn PhraseExtractor>,
    pub resolver: Arc<dyn VideoResolver>,
    pub clipboard: Arc<dyn ClipboardWriter>,
}

impl EngineServices {
    pub fn from_config(config: EngineConfig) -> std::io::Result<Self> {
        let resolver = YoutubeResolver::new(config.resolver).map_err(std::io::Error::other)?;
        Ok(Self {
            loader: Arc::new(PageLoader::new(Arc::new(ReqwestFetcher::new(config.fetch)))),
            extractor: Arc::new(BoldPhraseExtractor),
            resolver: Arc::new(resolver),
            clipboard: Arc::new(SystemClipboard),
        })
    }
}

enum EngineCommand {
    Extract {
        cycle: CycleId,
        target: Option<PageTarget>,
    },
    Resolve {
        cycle: CycleId,
        entry: EntryId,
        phrase: String,
    },
    Cancel {
        cycle: CycleId,
    },
    Copy {
        cycle: CycleId,
        entry: EntryId,
        text: String,
    },
    ScheduleCopyReset {
        cycle: CycleId,
        entry: EntryId,
        after: Duration,
    },
}

/// Owns a worker thread with its own tokio runtime. Commands go in, events come out.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> std::io::Result<Self> {
        Self::with_services(EngineServices::from_config(config)?)
    }

    pub fn with_services(services: EngineServices) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = Runtime::new()?;

        thread::Builder::new()
            .name("boldscan-engine".to_string())
            .spawn(move || {
                let mut dispatcher = Dispatcher::new(services, event_tx);
                while let Ok(command) = cmd_rx.recv() {
                    dispatcher.handle(&runtime, command);
                }
                runtime.shutdown_background();
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn extract(&self, cycle: CycleId, target: Option<PageTarget>) {
        self.send(EngineCommand::Extract { cycle, target });
    }

    pub fn resolve(&self, cycle: CycleId, entry: EntryId, phrase: impl Into<String>) {
        self.send(EngineCommand::Resolve {
            cycle,
            entry,
            phrase: phrase.into(),
        });
    }

    pub fn cancel(&self, cycle: CycleId) {
        self.send(EngineCommand::Cancel { cycle });
    }

    pub fn copy(&self, cycle: CycleId, entry: EntryId, text: impl Into<String>) {
        self.send(EngineCommand::Copy {
            cycle,
            entry,
            text: text.into(),
        });
    }

    pub fn schedule_copy_reset(&self, cycle: CycleId, entry: EntryId, after: Duration) {
        self.send(EngineCommand::ScheduleCopyReset {
            cycle,
            entry,
            after,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// `Ok(None)` means nothing arrived within `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            scan_warn!("engine worker is gone; command dropped");
        }
    }
}

struct Dispatcher {
    services: EngineServices,
    event_tx: mpsc::Sender<EngineEvent>,
    cycles: HashMap<CycleId, CancellationToken>,
}

impl Dispatcher {
    fn new(services: EngineServices, event_tx: mpsc::Sender<EngineEvent>) -> Self {
        Self {
            services,
            event_tx,
            cycles: HashMap::new(),
        }
    }

    fn token(&mut self, cycle: CycleId) -> CancellationToken {
        self.cycles.entry(cycle).or_default().clone()
    }

    fn handle(&mut self, runtime: &Runtime, command: EngineCommand) {
        match command {
            EngineCommand::Extract { cycle, target } => {
                // Starting a cycle retires every older one still in flight.
                self.cycles.retain(|&older, token| {
                    if older < cycle {
                        token.cancel();
                        false
                    } else {
                        true
                    }
                });
                let token = self.token(cycle);
                let tx = self.event_tx.clone();
                let work = runtime.spawn(extract_phrases(self.services.clone(), target));
                let abort = work.abort_handle();
                runtime.spawn(async move {
                    // A panicking extraction still reports, so the cycle always ends.
                    let result = tokio::select! {
                        _ = token.cancelled() => {
                            abort.abort();
                            scan_debug!("cycle {cycle}: extraction cancelled");
                            return;
                        }
                        joined = work => joined.unwrap_or_else(|err| Err(LoadError::Aborted(err.to_string()))),
                    };
                    let _ = tx.send(EngineEvent::Extracted { cycle, result });
                });
            }
            EngineCommand::Resolve {
                cycle,
                entry,
                phrase,
            } => {
                let token = self.token(cycle);
                let resolver = self.services.resolver.clone();
                let tx = self.event_tx.clone();
                let lookup = runtime.spawn(async move { resolver.resolve(Some(&phrase)).await });
                let abort = lookup.abort_handle();
                runtime.spawn(async move {
                    let event = tokio::select! {
                        _ = token.cancelled() => {
                            abort.abort();
                            scan_debug!("cycle {cycle}: lookup for entry {entry} cancelled");
                            return;
                        }
                        joined = lookup => match joined {
                            Ok(video_id) => EngineEvent::VideoResolved { cycle, entry, video_id },
                            Err(err) => EngineEvent::VideoFailed {
                                cycle,
                                entry,
                                reason: err.to_string(),
                            },
                        },
                    };
                    let _ = tx.send(event);
                });
            }
            EngineCommand::Cancel { cycle } => {
                if let Some(token) = self.cycles.remove(&cycle) {
                    token.cancel();
                }
            }
            EngineCommand::Copy { cycle, entry, text } => {
                let clipboard = self.services.clipboard.clone();
                let tx = self.event_tx.clone();
                runtime.spawn(async move {
                    let event = match clipboard.write_text(&text).await {
                        Ok(()) => EngineEvent::ClipboardWritten { cycle, entry },
                        Err(err) => {
                            scan_warn!("copy of entry {entry} failed: {err}");
                            EngineEvent::ClipboardFailed {
                                cycle,
                                entry,
                                reason: err.to_string(),
                            }
                        }
                    };
                    let _ = tx.send(event);
                });
            }
            EngineCommand::ScheduleCopyReset {
                cycle,
                entry,
                after,
            } => {
                let tx = self.event_tx.clone();
                runtime.spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(EngineEvent::CopyAckElapsed { cycle, entry });
                });
            }
        }
    }
}

async fn extract_phrases(
    services: EngineServices,
    target: Option<PageTarget>,
) -> Result<Vec<String>, LoadError> {
    let target = target.ok_or(LoadError::NoActiveTarget)?;
    let page = services.loader.load(&target).await?;
    let extractor = services.extractor.clone();
    // `scraper::Html` is not `Send`; parse and walk it in one blocking call.
    tokio::task::spawn_blocking(move || extractor.extract(&page.html))
        .await
        .map_err(|err| LoadError::Aborted(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_worker_is_reported_instead_of_timing_out() {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let handle = EngineHandle { cmd_tx, event_rx };

        assert_eq!(handle.recv_timeout(Duration::from_millis(10)), Ok(None));
        drop(event_tx);
        assert_eq!(handle.recv_timeout(Duration::from_secs(5)), Err(EngineStopped));
    }
}
