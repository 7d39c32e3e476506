use std::sync::{Arc, Mutex};
use std::time::Duration;

use boldscan_engine::{
    BoldPhraseExtractor, ClipboardError, ClipboardWriter, EngineEvent, EngineHandle,
    EngineServices, FetchSettings, LoadError, PageLoader, PageTarget, ReqwestFetcher,
    VideoResolver,
};
use pretty_assertions::assert_eq;

const WAIT: Duration = Duration::from_secs(5);

struct EchoResolver {
    delay: Duration,
}

#[async_trait::async_trait]
impl VideoResolver for EchoResolver {
    async fn resolve(&self, phrase: Option<&str>) -> String {
        tokio::time::sleep(self.delay).await;
        format!("vid-{}", phrase.unwrap_or_default().replace(' ', "-"))
    }

    fn fallback_video_id(&self) -> &str {
        "fallback"
    }
}

#[derive(Default)]
struct RecordingClipboard {
    written: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait::async_trait]
impl ClipboardWriter for RecordingClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::AccessFailed("denied".to_string()));
        }
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

fn services(delay: Duration, clipboard: Arc<RecordingClipboard>) -> EngineServices {
    EngineServices {
        loader: Arc::new(PageLoader::new(Arc::new(ReqwestFetcher::new(
            FetchSettings::default(),
        )))),
        extractor: Arc::new(BoldPhraseExtractor),
        resolver: Arc::new(EchoResolver { delay }),
        clipboard,
    }
}

fn handle() -> EngineHandle {
    EngineHandle::with_services(services(Duration::ZERO, Arc::default())).expect("engine starts")
}

#[test]
fn extracts_phrases_from_local_file() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("page.html");
    std::fs::write(
        &page,
        r#"<html><body><nav><b>Menu Entry</b></nav>
           <article><h2>Borrow Checker</h2><p>Some <strong>Lifetimes Explained</strong></p></article>
           </body></html>"#,
    )
    .unwrap();

    let engine = handle();
    engine.extract(1, Some(PageTarget::File(page)));

    assert_eq!(
        engine.recv_timeout(WAIT).unwrap(),
        Some(EngineEvent::Extracted {
            cycle: 1,
            result: Ok(vec![
                "Borrow Checker".to_string(),
                "Lifetimes Explained".to_string()
            ]),
        })
    );
}

#[test]
fn missing_target_reports_no_active_page() {
    let engine = handle();
    engine.extract(4, None);

    assert_eq!(
        engine.recv_timeout(WAIT).unwrap(),
        Some(EngineEvent::Extracted {
            cycle: 4,
            result: Err(LoadError::NoActiveTarget),
        })
    );
}

#[test]
fn resolve_reports_video_for_entry() {
    let engine = handle();
    engine.resolve(2, 3, "Quantum Computing");

    assert_eq!(
        engine.recv_timeout(WAIT).unwrap(),
        Some(EngineEvent::VideoResolved {
            cycle: 2,
            entry: 3,
            video_id: "vid-Quantum-Computing".to_string(),
        })
    );
}

#[test]
fn cancelled_cycle_emits_nothing() {
    let engine = EngineHandle::with_services(services(Duration::from_millis(300), Arc::default()))
        .expect("engine starts");
    engine.resolve(5, 0, "Slow Lookup");
    engine.cancel(5);

    assert_eq!(engine.recv_timeout(Duration::from_millis(800)).unwrap(), None);
}

#[test]
fn new_extraction_retires_older_lookups() {
    let engine = EngineHandle::with_services(services(Duration::from_millis(300), Arc::default()))
        .expect("engine starts");
    engine.resolve(1, 0, "Old Cycle");
    engine.extract(2, None);

    assert_eq!(
        engine.recv_timeout(WAIT).unwrap(),
        Some(EngineEvent::Extracted {
            cycle: 2,
            result: Err(LoadError::NoActiveTarget),
        })
    );
    assert_eq!(engine.recv_timeout(Duration::from_millis(800)).unwrap(), None);
}

#[test]
fn copy_writes_raw_text_and_acknowledges() {
    let clipboard = Arc::new(RecordingClipboard::default());
    let engine = EngineHandle::with_services(services(Duration::ZERO, clipboard.clone()))
        .expect("engine starts");
    engine.copy(1, 0, "Tom & Jerry <3");

    assert_eq!(
        engine.recv_timeout(WAIT).unwrap(),
        Some(EngineEvent::ClipboardWritten { cycle: 1, entry: 0 })
    );
    assert_eq!(*clipboard.written.lock().unwrap(), vec!["Tom & Jerry <3"]);
}

#[test]
fn copy_failure_is_reported() {
    let clipboard = Arc::new(RecordingClipboard {
        fail: true,
        ..RecordingClipboard::default()
    });
    let engine =
        EngineHandle::with_services(services(Duration::ZERO, clipboard)).expect("engine starts");
    engine.copy(1, 2, "anything");

    assert_eq!(
        engine.recv_timeout(WAIT).unwrap(),
        Some(EngineEvent::ClipboardFailed {
            cycle: 1,
            entry: 2,
            reason: "clipboard access failed: denied".to_string(),
        })
    );
}

#[test]
fn copy_reset_fires_after_delay() {
    let engine = handle();
    engine.schedule_copy_reset(3, 1, Duration::from_millis(50));

    assert_eq!(engine.try_recv(), None);
    assert_eq!(
        engine.recv_timeout(WAIT).unwrap(),
        Some(EngineEvent::CopyAckElapsed { cycle: 3, entry: 1 })
    );
}
