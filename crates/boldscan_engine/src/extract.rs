use std::iter;
use std::sync::LazyLock;

use boldscan_logging::scan_debug;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::phrase::PhraseSet;
use crate::style::ComputedWeights;

/// Guesses at the primary content region, tried in order.
pub const CONTENT_ROOT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "section",
    ".content",
    ".article",
    ".post",
    ".text",
    ".body",
    ".main-content",
];

/// Page chrome whose bold text is never a phrase.
pub const EXCLUDED_REGION_SELECTORS: &[&str] = &[
    "nav", "header", "footer", "aside", ".nav", ".menu", ".sidebar", ".ad", ".promo",
    ".banner", ".footer",
];

const STRUCTURAL_BOLD: &str = "b, strong, h1, h2, h3, h4, h5, h6";
const UNRENDERED: &str = "script, style, noscript, template";

fn static_selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static CONTENT_ROOTS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    CONTENT_ROOT_SELECTORS
        .iter()
        .map(|css| static_selector(css))
        .collect()
});
static ANY_CONTENT_ROOT: LazyLock<Selector> =
    LazyLock::new(|| static_selector(&CONTENT_ROOT_SELECTORS.join(", ")));
static EXCLUDED_REGION: LazyLock<Selector> =
    LazyLock::new(|| static_selector(&EXCLUDED_REGION_SELECTORS.join(", ")));
static STRUCTURAL: LazyLock<Selector> = LazyLock::new(|| static_selector(STRUCTURAL_BOLD));
static UNRENDERED_TAGS: LazyLock<Selector> = LazyLock::new(|| static_selector(UNRENDERED));
static ANY_ELEMENT: LazyLock<Selector> = LazyLock::new(|| static_selector("*"));
static BODY: LazyLock<Selector> = LazyLock::new(|| static_selector("body"));

pub trait PhraseExtractor: Send + Sync {
    fn extract(&self, html: &str) -> Vec<String>;
}

/// Collects emphasized text from a page's main content.
///
/// - main content root: first element matching the first content-root selector that
///   matches anything, else `<body>`
/// - scans the root and, separately, every content-root match below it
/// - candidates: `b`/`strong`/headings, then any element whose computed weight is bold
/// - drops candidates inside navigation, headers, footers, asides and similar chrome
/// - text-level dedupe, first occurrence wins
#[derive(Debug, Default, Clone, Copy)]
pub struct BoldPhraseExtractor;

impl PhraseExtractor for BoldPhraseExtractor {
    fn extract(&self, html: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        self.extract_document(&doc)
    }
}

impl BoldPhraseExtractor {
    pub fn extract_document(&self, doc: &Html) -> Vec<String> {
        let root = content_root(doc);
        let mut weights = ComputedWeights::new(doc);
        let mut phrases = PhraseSet::new();

        let containers = iter::once(root).chain(root.select(&ANY_CONTENT_ROOT));
        for container in containers {
            scan_container(container, &mut weights, &mut phrases);
        }

        scan_debug!(
            "extracted {} phrases from <{}> root",
            phrases.len(),
            root.value().name()
        );
        phrases.into_phrases()
    }
}

fn content_root(doc: &Html) -> ElementRef<'_> {
    CONTENT_ROOTS
        .iter()
        .find_map(|sel| doc.select(sel).next())
        .or_else(|| doc.select(&BODY).next())
        .unwrap_or_else(|| doc.root_element())
}

fn scan_container(
    container: ElementRef<'_>,
    weights: &mut ComputedWeights,
    phrases: &mut PhraseSet,
) {
    for element in container.select(&STRUCTURAL) {
        if is_candidate(element) {
            phrases.insert(&visible_text(element));
        }
    }
    for element in container.select(&ANY_ELEMENT) {
        if weights.is_bold(element) && is_candidate(element) {
            phrases.insert(&visible_text(element));
        }
    }
}

fn is_candidate(element: ElementRef<'_>) -> bool {
    !self_or_ancestor_matches(element, &EXCLUDED_REGION)
        && !self_or_ancestor_matches(element, &UNRENDERED_TAGS)
}

fn self_or_ancestor_matches(element: ElementRef<'_>, selector: &Selector) -> bool {
    iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .any(|el| selector.matches(&el))
}

/// Trimmed descendant text, leaving out script and style bodies.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != element.id())
            .filter_map(ElementRef::wrap)
            .any(|el| UNRENDERED_TAGS.matches(&el));
        if !hidden {
            out.push_str(text);
        }
    }
    out.trim().to_string()
}
