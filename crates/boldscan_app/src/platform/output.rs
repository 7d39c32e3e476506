use std::path::{Path, PathBuf};

use boldscan_core::{escape_html, render_panel, AppViewModel};
use boldscan_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use boldscan_logging::scan_error;
use chrono::Utc;

const PANEL_STYLE: &str = "body{font-family:sans-serif;max-width:720px;margin:1em auto}\
.bold-item{border-bottom:1px solid #ddd;padding:.5em 0}\
.phrase-header{display:flex;justify-content:space-between;align-items:center}\
.bold-text{font-weight:bold}\
.video-container iframe{width:100%;aspect-ratio:16/9}\
.error{color:#b00020}";

/// Writes the rendered panel as a standalone HTML document.
pub struct PanelWriter {
    writer: AtomicFileWriter,
    title: String,
}

impl PanelWriter {
    pub fn new(path: PathBuf, target: Option<&str>) -> Result<Self, PersistError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_output_dir(parent)?;
        }
        Ok(Self {
            writer: AtomicFileWriter::new(path),
            title: target.unwrap_or("no page").to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        self.writer.target()
    }

    pub fn write(&self, view: &AppViewModel) {
        let document = render_document(&self.title, view, &Utc::now().to_rfc3339());
        if let Err(err) = self.writer.write(&document) {
            scan_error!("Failed to write panel to {:?}: {}", self.path(), err);
        }
    }
}

fn render_document(title: &str, view: &AppViewModel, generated: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Boldscan: {title}</title>\n<style>{PANEL_STYLE}</style>\n</head>\n\
         <body>\n<!-- generated {generated} -->\n<div id=\"results\">\n{panel}</div>\n</body>\n</html>\n",
        title = escape_html(title),
        panel = render_panel(view),
    )
}

#[cfg(test)]
mod tests {
    use boldscan_core::ResultsPane;

    use super::*;

    #[test]
    fn document_escapes_title_and_embeds_panel() {
        let view = AppViewModel {
            pane: ResultsPane::NoResults,
            ..AppViewModel::default()
        };
        let doc = render_document("page?a=1&b=<2>", &view, "2026-01-01T00:00:00Z");
        assert!(doc.contains("<title>Boldscan: page?a=1&amp;b=&lt;2&gt;</title>"));
        assert!(doc.contains("No bold content found in main text"));
        assert!(doc.contains("<!-- generated 2026-01-01T00:00:00Z -->"));
    }

    #[test]
    fn writer_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/panel.html");
        let writer = PanelWriter::new(path.clone(), Some("file.html")).unwrap();

        writer.write(&AppViewModel::default());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
