//! Wikipedia (MediaWiki) adapter.

use scraper::Html;
use url::Url;

use articlecast_shared::SourceKind;

use super::{ContentAdapter, first_match, strip_elements};

/// Page furniture that carries no prose: citations, edit links, boxes, tables.
const NOISE: &str = "sup.reference, .mw-editsection, .navbox, .vertical-navbox, .infobox, \
    .sidebar, .hatnote, .reflist, .references, .reference, .thumb, .mw-empty-elt, \
    .metadata, .ambox, #toc, .toc, table, style, link";

pub struct WikipediaAdapter;

impl ContentAdapter for WikipediaAdapter {
    fn matches(&self, url: &Url) -> bool {
        SourceKind::classify(url) == Some(SourceKind::Wikipedia)
    }

    fn extract_content(&self, doc: &Html) -> Option<String> {
        let html = first_match(
            doc,
            &["#mw-content-text .mw-parser-output", "#mw-content-text", "#bodyContent"],
        )?;
        Some(strip_elements(&html, NOISE))
    }

    fn name(&self) -> &str {
        "wikipedia"
    }
}
