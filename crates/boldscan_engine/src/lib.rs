//! Boldscan engine: page loading, phrase extraction, video lookup and effect execution.
mod clipboard;
mod decode;
mod engine;
mod extract;
mod fetch;
mod page;
mod persist;
mod phrase;
mod resolve;
mod style;
mod types;

pub use clipboard::{ClipboardError, ClipboardWriter, SystemClipboard};
pub use decode::{decode_html, DecodedHtml};
pub use engine::{EngineConfig, EngineHandle, EngineServices};
pub use extract::{
    BoldPhraseExtractor, PhraseExtractor, CONTENT_ROOT_SELECTORS, EXCLUDED_REGION_SELECTORS,
};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use page::{LoadError, LoadedPage, PageLoader, PageTarget};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use phrase::{accepts as accepts_phrase, PhraseSet, MAX_PHRASE_TOKENS, MIN_PHRASE_CHARS};
pub use resolve::{
    LookupFailure, ResolverSettings, VideoResolver, YoutubeResolver, DEFAULT_FALLBACK_VIDEO_ID,
    DEFAULT_SEARCH_ENDPOINT,
};
pub use style::{is_bold, ComputedWeights, StyleSheet, WeightValue, BOLD_THRESHOLD};
pub use types::{
    CycleId, EngineEvent, EngineStopped, EntryId, FailureKind, FetchError, FetchMetadata,
    FetchOutput,
};
