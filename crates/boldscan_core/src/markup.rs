//! Panel markup and terminal summary rendering.
//!
//! Every piece of page-derived text goes through [`escape_html`] before it is
//! interpolated, including attribute values and the embed URL.

use std::fmt::Write;

use crate::{AppViewModel, CopyState, Enrichment, EntryView, ResultsPane};

const EMBED_BASE: &str = "https://www.youtube.com/embed/";
const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";
const EMBED_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

const NO_RESULTS_TEXT: &str = "No bold content found in main text";

/// Escapes the five reserved markup characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

pub fn embed_url(video_id: &str) -> String {
    format!("{EMBED_BASE}{video_id}?autoplay=0&rel=0")
}

/// Renders the full contents of the results container.
pub fn render_panel(view: &AppViewModel) -> String {
    let mut out = String::new();
    match &view.pane {
        ResultsPane::Empty => {}
        ResultsPane::Loading => {
            let text = if view.enrich_with_video {
                "Extracting bold content and generating YouTube videos..."
            } else {
                "Extracting bold content..."
            };
            let _ = writeln!(out, r#"<div class="loading">{text}</div>"#);
        }
        ResultsPane::NoResults => {
            let _ = writeln!(out, r#"<div class="no-results">{NO_RESULTS_TEXT}</div>"#);
        }
        ResultsPane::Error(message) => {
            let _ = writeln!(
                out,
                r#"<div class="error">Error: {}</div>"#,
                escape_html(message)
            );
        }
        ResultsPane::Phrases => render_results(&mut out, view),
    }
    out
}

fn render_results(out: &mut String, view: &AppViewModel) {
    let heading = if view.enrich_with_video {
        "Key Bold Phrases with YouTube Videos"
    } else {
        "Bold Phrases"
    };
    let _ = writeln!(out, r#"<div class="bold-results">"#);
    let _ = writeln!(out, "  <h3>{heading} ({})</h3>", view.entries.len());
    let _ = writeln!(out, r#"  <div id="phrases-container">"#);
    for entry in &view.entries {
        render_entry(out, entry);
    }
    let _ = writeln!(out, "  </div>");
    let _ = writeln!(out, "</div>");
}

fn render_entry(out: &mut String, entry: &EntryView) {
    let phrase = escape_html(&entry.phrase);
    let _ = writeln!(
        out,
        r#"    <div class="bold-item" data-entry="{}">"#,
        entry.entry
    );
    let _ = writeln!(out, r#"      <div class="phrase-header">"#);
    let _ = writeln!(out, r#"        <span class="bold-text">{phrase}</span>"#);
    let _ = writeln!(
        out,
        r#"        <button class="copy-btn" data-phrase="{phrase}">{}</button>"#,
        entry.copy.label()
    );
    let _ = writeln!(out, "      </div>");
    match &entry.enrichment {
        None => {}
        Some(Enrichment::Pending) => {
            let _ = writeln!(
                out,
                r#"      <div class="video-loading">Loading YouTube video for &quot;{phrase}&quot;...</div>"#
            );
        }
        Some(Enrichment::Resolved { video_id }) => {
            let _ = writeln!(out, r#"      <div class="video-container">"#);
            let _ = writeln!(
                out,
                r#"        <iframe src="{}" frameborder="0" allow="{EMBED_ALLOW}" allowfullscreen></iframe>"#,
                escape_html(&embed_url(video_id))
            );
            let _ = writeln!(out, "      </div>");
        }
        Some(Enrichment::Failed) => {
            let _ = writeln!(
                out,
                r#"      <div class="video-error">Could not load YouTube video for &quot;{phrase}&quot;</div>"#
            );
        }
    }
    let _ = writeln!(out, "    </div>");
}

/// Renders a plain-text view of the results for terminals.
pub fn render_summary(view: &AppViewModel) -> String {
    let mut out = String::new();
    match &view.pane {
        ResultsPane::Empty => {}
        ResultsPane::Loading => {
            let _ = writeln!(out, "Extracting bold content...");
        }
        ResultsPane::NoResults => {
            let _ = writeln!(out, "{NO_RESULTS_TEXT}");
        }
        ResultsPane::Error(message) => {
            let _ = writeln!(out, "Error: {message}");
        }
        ResultsPane::Phrases => {
            let _ = writeln!(out, "Bold phrases ({}):", view.entries.len());
            for (index, entry) in view.entries.iter().enumerate() {
                let _ = write!(out, "{:>3}. {}", index + 1, entry.phrase);
                match &entry.enrichment {
                    None => {}
                    Some(Enrichment::Pending) => {
                        let _ = write!(out, "  (loading video)");
                    }
                    Some(Enrichment::Resolved { video_id }) => {
                        let _ = write!(out, "  -> {WATCH_BASE}{video_id}");
                    }
                    Some(Enrichment::Failed) => {
                        let _ = write!(out, "  (could not load video)");
                    }
                }
                if entry.copy == CopyState::Acknowledged {
                    let _ = write!(out, "  [{}]", entry.copy.label());
                }
                out.push('\n');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CycleStage;

    fn entry(phrase: &str, enrichment: Option<Enrichment>) -> EntryView {
        EntryView {
            entry: 0,
            phrase: phrase.to_string(),
            enrichment,
            copy: CopyState::Ready,
        }
    }

    fn phrases_view(entries: Vec<EntryView>, enrich: bool) -> AppViewModel {
        AppViewModel {
            trigger_enabled: true,
            cycle: 1,
            stage: CycleStage::Settled,
            enrich_with_video: enrich,
            pane: ResultsPane::Phrases,
            entries,
            in_flight_lookups: 0,
            dirty: false,
        }
    }

    #[test]
    fn escape_covers_all_reserved_characters() {
        assert_eq!(
            escape_html(r#"a & b < c > d "e" 'f'"#),
            "a &amp; b &lt; c &gt; d &quot;e&quot; &#039;f&#039;"
        );
    }

    #[test]
    fn script_phrase_is_not_live_markup() {
        let view = phrases_view(vec![entry("<script>alert(1)</script>", None)], false);
        let html = render_panel(&view);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn header_counts_entries_per_mode() {
        let plain = phrases_view(vec![entry("One", None), entry("Two", None)], false);
        assert!(render_panel(&plain).contains("<h3>Bold Phrases (2)</h3>"));

        let enriched = phrases_view(vec![entry("One", Some(Enrichment::Pending))], true);
        assert!(render_panel(&enriched).contains("<h3>Key Bold Phrases with YouTube Videos (1)</h3>"));
    }

    #[test]
    fn plain_mode_has_no_video_blocks() {
        let html = render_panel(&phrases_view(vec![entry("Quantum Computing", None)], false));
        assert!(!html.contains("video-"));
        assert!(!html.contains("iframe"));
    }

    #[test]
    fn enrichment_states_render_their_blocks() {
        let view = phrases_view(
            vec![
                entry("Pending one", Some(Enrichment::Pending)),
                entry(
                    "Found one",
                    Some(Enrichment::Resolved {
                        video_id: "abc123".to_string(),
                    }),
                ),
                entry("Broken one", Some(Enrichment::Failed)),
            ],
            true,
        );
        let html = render_panel(&view);
        assert!(html.contains(r#"Loading YouTube video for &quot;Pending one&quot;..."#));
        assert!(html.contains(
            r#"src="https://www.youtube.com/embed/abc123?autoplay=0&amp;rel=0""#
        ));
        assert!(html.contains(r#"Could not load YouTube video for &quot;Broken one&quot;"#));
    }

    #[test]
    fn error_pane_escapes_message() {
        let view = AppViewModel {
            pane: ResultsPane::Error("bad <b>input</b>".to_string()),
            ..AppViewModel::default()
        };
        assert_eq!(
            render_panel(&view),
            "<div class=\"error\">Error: bad &lt;b&gt;input&lt;/b&gt;</div>\n"
        );
    }

    #[test]
    fn summary_lists_watch_links() {
        let view = phrases_view(
            vec![entry(
                "Rust",
                Some(Enrichment::Resolved {
                    video_id: "xyz".to_string(),
                }),
            )],
            true,
        );
        assert_eq!(
            render_summary(&view),
            "Bold phrases (1):\n  1. Rust  -> https://www.youtube.com/watch?v=xyz\n"
        );
    }
}
