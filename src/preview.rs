// ABOUTME: Card preview assembly for the cardpost application
// ABOUTME: Builds the styled card page, tracks per-section visibility and serializes full HTML pages

use crate::dom::{Element, Node, NodePath, element_at, element_at_mut};
use crate::pagination::NavState;
use crate::splitter::{GUIDANCE_MESSAGE, Section};
use crate::style::roles::IMAGE_PREVIEW_CLASS;
use crate::style::{Profile, StyleConfig, style_page};
use chrono::{DateTime, FixedOffset};
use log::{debug, info};
use url::Url;

pub const PREVIEW_CONTAINER_CLASS: &str = "cp-preview-container";
pub const SECTION_CLASS: &str = "cp-content-section";
pub const ACTIVE_CLASS: &str = "cp-section-active";
pub const VISIBLE_CLASS: &str = "cp-section-visible";
pub const HIDDEN_CLASS: &str = "cp-section-hidden";

const BASE_CSS: &str = r#"
body { margin: 0; padding: 24px 0; background: #f0f0f0; }
.cp-preview-container { display: flex; flex-direction: column; align-items: center; gap: 16px; }
.cp-image-preview { width: var(--cp-card-width); }
.cp-content-section { display: none; }
.cp-content-section.cp-section-active { display: block; }
.cp-content-section.cp-section-visible { display: block !important; }
.cp-content-section.cp-section-hidden { display: none !important; }
.cp-nav-container { display: flex; align-items: center; gap: 12px; font-family: sans-serif; }
.cp-nav-button { padding: 4px 12px; border: 1px solid #ccc; border-radius: 4px; background: #fff; color: #333; text-decoration: none; }
.cp-nav-button.cp-nav-hidden { visibility: hidden; }
.cp-page-indicator { min-width: 48px; text-align: center; color: #666; }
.cp-empty-message { max-width: 480px; margin: 48px auto; padding: 24px; background: #fff; border-radius: 8px; color: #666; font-family: sans-serif; line-height: 1.8; white-space: pre-line; text-align: center; }
"#;

/// Visibility classes carried by one content section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionFlags {
    pub active: bool,
    pub visible: bool,
    pub hidden: bool,
}

impl SectionFlags {
    /// Whether the section is displayed, following the stylesheet precedence
    pub fn is_shown(&self) -> bool {
        !self.hidden && (self.visible || self.active)
    }

    fn apply_to(&self, section: &mut Element) {
        section.toggle_class(ACTIVE_CLASS, self.active);
        section.toggle_class(VISIBLE_CLASS, self.visible);
        section.toggle_class(HIDDEN_CLASS, self.hidden);
    }
}

/// A styled card page holding every section of the document
#[derive(Debug, Clone, Default)]
pub struct Preview {
    page: Option<Element>,
    flags: Vec<SectionFlags>,
    container_path: NodePath,
}

impl Preview {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble and style the card page for the given sections
    pub fn build(
        sections: &[Section],
        config: &StyleConfig,
        profile: &Profile,
        now: &DateTime<FixedOffset>,
    ) -> Self {
        if sections.is_empty() {
            return Self::empty();
        }

        let mut container = Element::new("div").with_class("cp-content-container");
        for section in sections {
            let mut element = Element::new("section")
                .with_class(SECTION_CLASS)
                .with_attr("data-index", &section.index.to_string());
            element.children = section.nodes.clone();
            container = container.with_child(element);
        }

        let mut page = Element::new("div").with_class(IMAGE_PREVIEW_CLASS);
        if let Some(header) = config.template.build_header(profile, now) {
            page = page.with_child(header);
        }
        let content_index = page.children.len();
        page = page.with_child(
            Element::new("div")
                .with_class("cp-preview-content")
                .with_child(container),
        );
        if let Some(footer) = config.template.build_footer(profile) {
            page = page.with_child(footer);
        }

        info!(
            "Building preview with {} sections (theme '{}', template '{}')",
            sections.len(),
            config.theme.id,
            config.template.id
        );

        Self {
            page: Some(style_page(&page, config)),
            flags: vec![SectionFlags::default(); sections.len()],
            container_path: vec![content_index, 0],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn section_count(&self) -> usize {
        self.flags.len()
    }

    /// The styled page without visibility classes
    pub fn page(&self) -> Option<&Element> {
        self.page.as_ref()
    }

    pub fn flags(&self) -> &[SectionFlags] {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut [SectionFlags] {
        &mut self.flags
    }

    pub fn snapshot_flags(&self) -> Vec<SectionFlags> {
        self.flags.clone()
    }

    /// Put back flags captured by `snapshot_flags`; a snapshot of another length is ignored
    pub fn restore_flags(&mut self, snapshot: Vec<SectionFlags>) {
        if snapshot.len() == self.flags.len() {
            self.flags = snapshot;
        } else {
            debug!(
                "Discarding flag snapshot of {} sections for preview of {}",
                snapshot.len(),
                self.flags.len()
            );
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.flags.iter().position(|f| f.active)
    }

    /// Make `index` the only displayed section regardless of the active one
    pub fn force_visible(&mut self, index: usize) {
        for (i, flag) in self.flags.iter_mut().enumerate() {
            flag.visible = i == index;
            flag.hidden = i != index;
        }
    }

    /// Path of a section element from the page root
    pub fn section_path(&self, index: usize) -> Option<NodePath> {
        if index >= self.flags.len() {
            return None;
        }
        let mut path = self.container_path.clone();
        path.push(index);
        Some(path)
    }

    pub fn section(&self, index: usize) -> Option<&Element> {
        let path = self.section_path(index)?;
        element_at(self.page.as_ref()?, &path)
    }

    /// The page with each section's visibility classes applied
    pub fn render(&self) -> Option<Element> {
        let mut page = self.page.clone()?;
        for (index, flags) in self.flags.iter().enumerate() {
            let Some(path) = self.section_path(index) else {
                continue;
            };
            if let Some(section) = element_at_mut(&mut page, &path) {
                flags.apply_to(section);
            }
        }
        Some(page)
    }

    /// Indices of the sections a viewer would see right now
    pub fn shown_sections(&self) -> Vec<usize> {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_shown())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Page chrome around a rendered card
#[derive(Debug, Clone)]
pub struct PageShell {
    pub title: String,
    pub width: u32,
    /// Zoom applied to the card so screenshots come out at a higher pixel density
    pub scale: f64,
    pub base_href: Option<Url>,
    /// Complete `<style>` or `<link>` tags appended after the base stylesheet
    pub stylesheets: Vec<String>,
}

impl Default for PageShell {
    fn default() -> Self {
        Self {
            title: "cardpost preview".to_string(),
            width: 480,
            scale: 1.0,
            base_href: None,
            stylesheets: Vec::new(),
        }
    }
}

impl PageShell {
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Wrap a body element (and optional navigation) in a complete HTML document
    pub fn wrap(&self, body: &Element, nav: Option<&Element>) -> String {
        let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"UTF-8\">\n");
        if let Some(base) = &self.base_href {
            html.push_str(&format!("<base href=\"{}\">\n", base));
        }
        html.push_str(&format!("<title>{}</title>\n", escape_text(&self.title)));
        html.push_str("<style>");
        html.push_str(&format!(
            ":root {{ --cp-card-width: {}px; }}\n.cp-image-preview {{ zoom: {}; }}",
            self.width, self.scale
        ));
        html.push_str(BASE_CSS);
        html.push_str("</style>\n");
        for sheet in &self.stylesheets {
            html.push_str(sheet);
            html.push('\n');
        }
        html.push_str("</head>\n<body>\n");

        let mut container = Element::new("div")
            .with_class(PREVIEW_CONTAINER_CLASS)
            .with_child(body.clone());
        if let Some(nav) = nav {
            container = container.with_child(nav.clone());
        }
        html.push_str(&container.to_html());
        html.push_str("\n</body>\n</html>\n");
        html
    }
}

fn escape_text(text: &str) -> String {
    Node::text(text).to_html()
}

/// Message element shown when the document has no sections
pub fn guidance_element() -> Element {
    Element::new("div")
        .with_class("cp-empty-message")
        .with_text(GUIDANCE_MESSAGE)
}

/// Previous/next controls with the page indicator.
/// With `links` the buttons are anchors to `/prev` and `/next`.
pub fn nav_bar(nav: &NavState, links: bool) -> Element {
    let button = |direction: &str, label: &str, disabled: bool| {
        let mut el = if links {
            Element::new("a").with_attr("href", &format!("/{}", direction))
        } else {
            Element::new("button").with_attr("type", "button")
        };
        el = el
            .with_class("cp-nav-button")
            .with_attr("data-direction", direction)
            .with_text(label);
        if disabled {
            el.add_class("cp-nav-hidden");
        }
        el
    };

    Element::new("div")
        .with_class("cp-nav-container")
        .with_child(button("prev", "\u{2039}", nav.prev_disabled))
        .with_child(
            Element::new("span")
                .with_class("cp-page-indicator")
                .with_text(&nav.indicator),
        )
        .with_child(button("next", "\u{203a}", nav.next_disabled))
}
