// ABOUTME: Style applicator for the cardpost styling engine
// ABOUTME: Restructures headings and code blocks, then replaces inline styles per classified role

use super::StyleConfig;
use super::roles::{
    Classified, FooterRole, HEADING_AFTER_CLASS, HEADING_CONTENT_CLASS, HeaderRole, Role,
    WINDOW_CONTROLS_CLASS, classify,
};
use super::sheet::compose;
use crate::dom::{Element, Node, element_at_mut};
use log::debug;

const WINDOW_DOT_COLORS: [&str; 3] = ["#ff5f56", "#ffbd2e", "#27c93f"];
const WINDOW_CONTROLS_STYLE: &str = "margin: 8px 0 12px 0; display: flex; gap: 6px;";
const SOLE_IMAGE_NUDGE: &str = "text-align: center; margin: 1em 0";

/// Style a card page. The input is never mutated; the result can be fed back in
/// and yields an identical tree.
pub fn style_page(page: &Element, config: &StyleConfig) -> Element {
    let mut styled = restructure(page);
    let classified = classify(&styled);
    debug!("Classified {} styleable elements", classified.len());

    for Classified { role, path } in classified {
        let style = style_for(role, config);
        if let Some(element) = element_at_mut(&mut styled, &path) {
            if style.is_empty() {
                element.remove_attr("style");
            } else {
                element.set_attr("style", &style);
            }
        }
    }

    styled
}

/// Rebuild headings as content/after span pairs and prepend window controls to
/// code blocks. Elements already in that shape are carried over unchanged.
pub fn restructure(element: &Element) -> Element {
    let children: Vec<Node> = element
        .children
        .iter()
        .map(|child| match child {
            Node::Element(el) => Node::Element(restructure(el)),
            Node::Text(_) => child.clone(),
        })
        .collect();

    let mut rebuilt = Element {
        tag: element.tag.clone(),
        attrs: element.attrs.clone(),
        children,
    };

    if is_heading(&rebuilt) && !is_split_heading(&rebuilt) {
        let mut content = Element::new("span").with_class(HEADING_CONTENT_CLASS);
        content.children = std::mem::take(&mut rebuilt.children);
        rebuilt.children = vec![
            content.into(),
            Element::new("span").with_class(HEADING_AFTER_CLASS).into(),
        ];
    } else if rebuilt.is("pre") && !has_window_controls(&rebuilt) {
        rebuilt.children.insert(0, window_controls().into());
    }

    rebuilt
}

fn is_heading(element: &Element) -> bool {
    matches!(element.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn is_split_heading(heading: &Element) -> bool {
    match heading.children.as_slice() {
        [Node::Element(content), Node::Element(after)] => {
            content.is("span")
                && content.has_class(HEADING_CONTENT_CLASS)
                && after.is("span")
                && after.has_class(HEADING_AFTER_CLASS)
        }
        _ => false,
    }
}

fn has_window_controls(pre: &Element) -> bool {
    matches!(pre.children.first(), Some(Node::Element(first)) if first.has_class(WINDOW_CONTROLS_CLASS))
}

fn window_controls() -> Element {
    let mut controls = Element::new("div").with_class(WINDOW_CONTROLS_CLASS);
    for _ in WINDOW_DOT_COLORS {
        controls = controls.with_child(Element::new("span").with_class("cp-window-dot"));
    }
    controls
}

/// Compute the complete inline style for one role
pub fn style_for(role: Role, config: &StyleConfig) -> String {
    let styles = &config.theme.styles;
    let font = format!("font-family: {}", config.font_family);
    let size = format!("font-size: {}px", config.font_size);

    match role {
        Role::ImagePreview => compose(&[&styles.image_preview, &config.background.declarations()]),
        Role::Header(header) => {
            let h = &styles.header;
            compose(&[match header {
                HeaderRole::AvatarContainer => &h.avatar.container,
                HeaderRole::AvatarPlaceholder => &h.avatar.placeholder,
                HeaderRole::AvatarImage => &h.avatar.image,
                HeaderRole::NameContainer => &h.name_container,
                HeaderRole::UserName => &h.user_name,
                HeaderRole::UserId => &h.user_id,
                HeaderRole::PostTime => &h.post_time,
                HeaderRole::VerifiedIcon => &h.verified_icon,
            }])
        }
        Role::Footer(footer) => compose(&[match footer {
            FooterRole::Container => &styles.footer.container,
            FooterRole::Text => &styles.footer.text,
            FooterRole::Separator => &styles.footer.separator,
        }]),
        Role::Layout(layout) => compose(&[config.template.layout_style(layout)]),
        Role::Heading(level) => compose(&[&styles.title.for_level(level).base, &font]),
        Role::HeadingContent(level) => compose(&[&styles.title.for_level(level).content]),
        Role::HeadingAfter(level) => compose(&[&styles.title.for_level(level).after]),
        Role::Paragraph { centers_image } => {
            let nudge = if centers_image { SOLE_IMAGE_NUDGE } else { "" };
            compose(&[&styles.paragraph, &font, &size, nudge])
        }
        Role::QuoteParagraph => compose(&[&styles.quote_paragraph]),
        Role::List => compose(&[&styles.list.container]),
        Role::ListItem { task: false } => compose(&[&styles.list.item, &font, &size]),
        Role::ListItem { task: true } => {
            compose(&[&styles.list.item, &styles.list.task_list, &font, &size])
        }
        Role::Quote => compose(&[&styles.quote, &font, &size]),
        Role::CodeBlock => compose(&[&styles.code.block, &size]),
        Role::WindowControls => compose(&[WINDOW_CONTROLS_STYLE]),
        Role::WindowDot(index) => {
            let color = WINDOW_DOT_COLORS
                .get(index)
                .copied()
                .unwrap_or(WINDOW_DOT_COLORS[0]);
            compose(&[
                "width: 12px; height: 12px; border-radius: 50%",
                &format!("background-color: {}", color),
            ])
        }
        Role::InlineCode => compose(&[&styles.code.inline, &size]),
        Role::Link => compose(&[&styles.link]),
        Role::FootnoteRef => compose(&[&styles.footnote.reference]),
        Role::FootnoteBackref => compose(&[&styles.footnote.backref]),
        Role::Strong => compose(&[&styles.emphasis.strong]),
        Role::Emphasis => compose(&[&styles.emphasis.em]),
        Role::Strikethrough => compose(&[&styles.emphasis.del]),
        Role::Rule => compose(&[&styles.hr]),
        Role::Table => compose(&[&styles.table.container]),
        Role::TableHeader => compose(&[&styles.table.header, &font, &size]),
        Role::TableCell => compose(&[&styles.table.cell, &font, &size]),
        Role::Image => compose(&[&styles.image, &font]),
    }
}
