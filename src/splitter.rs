// ABOUTME: Section splitter for the cardpost application
// ABOUTME: Partitions a rendered document into one card section per level-2 heading

use crate::dom::{Document, Node};
use log::debug;

/// Heading tag that starts a new card
pub const SECTION_HEADING: &str = "h2";

/// Guidance shown instead of cards when a document has no section headings
pub const GUIDANCE_MESSAGE: &str = "Use level-2 headings (##) to split your note.\n\
Each level-2 heading becomes its own card image.\n\
Edit the document to see the preview update live.";

/// One heading-delimited chunk of a document, the unit of export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub index: usize,
    pub nodes: Vec<Node>,
}

impl Section {
    /// The heading node that opened this section
    pub fn heading(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn title(&self) -> String {
        self.heading()
            .and_then(Node::as_element)
            .map(|h| h.text_content().trim().to_string())
            .unwrap_or_default()
    }
}

/// Result of splitting a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The document has no qualifying heading; callers show guidance instead of cards
    NoValidContent,
    Sections {
        /// Content before the first qualifying heading, which no card includes
        preamble: Vec<Node>,
        sections: Vec<Section>,
    },
}

impl SplitOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, SplitOutcome::Sections { .. })
    }

    pub fn sections(&self) -> &[Section] {
        match self {
            SplitOutcome::NoValidContent => &[],
            SplitOutcome::Sections { sections, .. } => sections,
        }
    }

    pub fn into_sections(self) -> Vec<Section> {
        match self {
            SplitOutcome::NoValidContent => Vec::new(),
            SplitOutcome::Sections { sections, .. } => sections,
        }
    }
}

/// User-facing text rendered in place of cards for a document without sections
pub fn guidance_message() -> &'static str {
    GUIDANCE_MESSAGE
}

pub fn is_section_heading(node: &Node) -> bool {
    node.is_element(SECTION_HEADING)
}

/// True when the document contains at least one qualifying heading
pub fn has_valid_content(document: &Document) -> bool {
    document.nodes.iter().any(is_section_heading)
}

/// Split a document at each top-level section heading
pub fn split_sections(document: &Document) -> SplitOutcome {
    let Some(first) = document.nodes.iter().position(is_section_heading) else {
        debug!("No {} headings in document, nothing to split", SECTION_HEADING);
        return SplitOutcome::NoValidContent;
    };

    let preamble = document.nodes[..first].to_vec();
    let mut sections: Vec<Section> = Vec::new();

    for node in &document.nodes[first..] {
        if is_section_heading(node) {
            sections.push(Section {
                index: sections.len(),
                nodes: vec![node.clone()],
            });
        } else if let Some(current) = sections.last_mut() {
            current.nodes.push(node.clone());
        }
    }

    debug!(
        "Split document into {} sections ({} preamble nodes discarded)",
        sections.len(),
        preamble.len()
    );

    SplitOutcome::Sections { preamble, sections }
}
