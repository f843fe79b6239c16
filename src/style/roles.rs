// ABOUTME: Role classification for the cardpost styling engine
// ABOUTME: Walks a card page once and tags every recognized element with its semantic role

use super::template::{FOOTER_CLASS, HEADER_CLASS, LayoutRole};
use crate::dom::{Element, NodePath};

pub const IMAGE_PREVIEW_CLASS: &str = "cp-image-preview";
pub const WINDOW_CONTROLS_CLASS: &str = "cp-window-controls";
pub const HEADING_CONTENT_CLASS: &str = "content";
pub const HEADING_AFTER_CLASS: &str = "after";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRole {
    AvatarContainer,
    AvatarPlaceholder,
    AvatarImage,
    NameContainer,
    UserName,
    UserId,
    PostTime,
    VerifiedIcon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterRole {
    Container,
    Text,
    Separator,
}

/// Closed set of styleable roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    ImagePreview,
    Header(HeaderRole),
    Footer(FooterRole),
    Layout(LayoutRole),
    Heading(u8),
    HeadingContent(u8),
    HeadingAfter(u8),
    /// Top-level paragraph; `centers_image` when an image is its only child
    Paragraph { centers_image: bool },
    QuoteParagraph,
    List,
    ListItem { task: bool },
    Quote,
    CodeBlock,
    WindowControls,
    WindowDot(usize),
    InlineCode,
    Link,
    FootnoteRef,
    FootnoteBackref,
    Strong,
    Emphasis,
    Strikethrough,
    Rule,
    Table,
    TableHeader,
    TableCell,
    Image,
}

/// A role paired with the path of the element it applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub role: Role,
    pub path: NodePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum TableScope {
    #[default]
    None,
    Content,
    Wrapper,
}

#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    in_header: bool,
    in_footer: bool,
    in_avatar: bool,
    in_pre: bool,
    in_quote: bool,
    in_paragraph: bool,
    in_window_controls: bool,
    heading: Option<u8>,
    table: TableScope,
}

/// Classify every element below (and including) `root`, in document order
pub fn classify(root: &Element) -> Vec<Classified> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    visit(root, Scope::default(), &mut path, &mut out);
    out
}

fn visit(element: &Element, scope: Scope, path: &mut NodePath, out: &mut Vec<Classified>) {
    let (role, child_scope) = role_of(element, scope);
    if let Some(role) = role {
        out.push(Classified {
            role,
            path: path.clone(),
        });
    }

    let mut dot_index = 0;
    for (idx, child) in element.children.iter().enumerate() {
        let Some(child) = child.as_element() else {
            continue;
        };
        path.push(idx);
        if child_scope.in_window_controls && !scope.in_window_controls {
            // Dots are positional, numbered among the marker's element children
            out.push(Classified {
                role: Role::WindowDot(dot_index),
                path: path.clone(),
            });
            dot_index += 1;
        } else {
            visit(child, child_scope, path, out);
        }
        path.pop();
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn role_of(element: &Element, scope: Scope) -> (Option<Role>, Scope) {
    let mut next = scope;

    if element.has_class(IMAGE_PREVIEW_CLASS) {
        return (Some(Role::ImagePreview), next);
    }
    if element.has_class(HEADER_CLASS) {
        next.in_header = true;
        return (None, next);
    }
    if element.has_class(FOOTER_CLASS) {
        next.in_footer = true;
        return (Some(Role::Footer(FooterRole::Container)), next);
    }
    if scope.in_header {
        return (header_role(element, &mut next), next);
    }
    if scope.in_footer {
        let role = if element.has_class("cp-footer-text") {
            Some(Role::Footer(FooterRole::Text))
        } else if element.has_class("cp-footer-separator") {
            Some(Role::Footer(FooterRole::Separator))
        } else {
            None
        };
        return (role, next);
    }

    if let Some(level) = heading_level(&element.tag) {
        next.heading = Some(level);
        return (Some(Role::Heading(level)), next);
    }
    if let Some(level) = scope.heading {
        // Only the direct spans of a heading are its content/after parts
        next.heading = None;
        if element.is("span") && element.has_class(HEADING_CONTENT_CLASS) {
            return (Some(Role::HeadingContent(level)), next);
        }
        if element.is("span") && element.has_class(HEADING_AFTER_CLASS) {
            return (Some(Role::HeadingAfter(level)), next);
        }
    }

    let role = match element.tag.as_str() {
        "p" => {
            next.in_paragraph = true;
            if scope.in_quote {
                Some(Role::QuoteParagraph)
            } else if scope.in_paragraph {
                None
            } else {
                Some(Role::Paragraph {
                    centers_image: has_sole_image(element),
                })
            }
        }
        "ul" | "ol" => Some(Role::List),
        "li" => Some(Role::ListItem {
            task: is_task_item(element),
        }),
        "blockquote" => {
            next.in_quote = true;
            Some(Role::Quote)
        }
        "pre" => {
            next.in_pre = true;
            Some(Role::CodeBlock)
        }
        "div" if element.has_class(WINDOW_CONTROLS_CLASS) => {
            next.in_window_controls = true;
            Some(Role::WindowControls)
        }
        "code" if !scope.in_pre => Some(Role::InlineCode),
        "a" if element.has_class("footnote-backref") => Some(Role::FootnoteBackref),
        "a" => Some(Role::Link),
        "strong" | "b" => Some(Role::Strong),
        "em" | "i" => Some(Role::Emphasis),
        "del" | "s" => Some(Role::Strikethrough),
        "hr" => Some(Role::Rule),
        "table" => {
            if element.has_descendant(&|e: &Element| e.is("table")) {
                next.table = TableScope::Wrapper;
                None
            } else {
                next.table = TableScope::Content;
                Some(Role::Table)
            }
        }
        "th" if scope.table == TableScope::Content => Some(Role::TableHeader),
        "td" if scope.table == TableScope::Content => Some(Role::TableCell),
        "img" => Some(Role::Image),
        _ if element.has_class("footnote-ref") => Some(Role::FootnoteRef),
        _ => None,
    };
    (role, next)
}

fn header_role(element: &Element, next: &mut Scope) -> Option<Role> {
    if element.has_class("cp-user-avatar") {
        next.in_avatar = true;
        return Some(Role::Header(HeaderRole::AvatarContainer));
    }
    if element.is("img") && next.in_avatar {
        return Some(Role::Header(HeaderRole::AvatarImage));
    }
    let classes: [(&str, Role); 12] = [
        ("cp-avatar-placeholder", Role::Header(HeaderRole::AvatarPlaceholder)),
        ("cp-user-name-container", Role::Header(HeaderRole::NameContainer)),
        ("cp-user-name", Role::Header(HeaderRole::UserName)),
        ("cp-user-id", Role::Header(HeaderRole::UserId)),
        ("cp-post-time", Role::Header(HeaderRole::PostTime)),
        ("cp-verified-icon", Role::Header(HeaderRole::VerifiedIcon)),
        ("cp-user-info", Role::Layout(LayoutRole::UserInfo)),
        ("cp-user-left", Role::Layout(LayoutRole::UserLeft)),
        ("cp-user-meta", Role::Layout(LayoutRole::UserMeta)),
        ("cp-user-right", Role::Layout(LayoutRole::UserRight)),
        ("cp-notes-bar", Role::Layout(LayoutRole::NotesBar)),
        ("cp-notes-actions", Role::Layout(LayoutRole::NotesActions)),
    ];
    classes
        .iter()
        .find(|(class, _)| element.has_class(class))
        .map(|(_, role)| *role)
}

/// True when the paragraph holds exactly one image and nothing else
fn has_sole_image(paragraph: &Element) -> bool {
    let mut children = paragraph.significant_children();
    matches!(
        (children.next(), children.next()),
        (Some(only), None) if only.is_element("img")
    )
}

/// Task items start with a checkbox, directly or inside a loose-list paragraph
fn is_task_item(item: &Element) -> bool {
    if item.has_class("task-list-item") {
        return true;
    }
    let first = item.significant_children().next().and_then(|n| n.as_element());
    let first = match first {
        Some(p) if p.is("p") => p.significant_children().next().and_then(|n| n.as_element()),
        other => other,
    };
    matches!(first, Some(input) if input.is("input") && input.attr("type") == Some("checkbox"))
}
