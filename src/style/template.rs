// ABOUTME: Layout templates for the cardpost application
// ABOUTME: Decides which card regions exist and builds header/footer markup from the user profile

use crate::dom::Element;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset};

pub const DEFAULT_TEMPLATE_ID: &str = "default";
pub const DEFAULT_TIME_FORMAT: &str = "%Y/%-m/%-d";

pub const HEADER_CLASS: &str = "cp-preview-header";
pub const FOOTER_CLASS: &str = "cp-preview-footer";

/// Identifier of a user-editable field rendered into the header or footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    UserAvatar,
    UserName,
    UserId,
    FooterLeft,
    FooterRight,
}

impl FieldId {
    pub const ALL: [FieldId; 5] = [
        FieldId::UserAvatar,
        FieldId::UserName,
        FieldId::UserId,
        FieldId::FooterLeft,
        FieldId::FooterRight,
    ];

    /// Value of the `data-field` attribute carried by the rendered field
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::UserAvatar => "user-avatar",
            FieldId::UserName => "user-name",
            FieldId::UserId => "user-id",
            FieldId::FooterLeft => "footer-left",
            FieldId::FooterRight => "footer-right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == value)
    }
}

/// Header and footer values, owned by the settings collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_avatar: String,
    pub user_name: String,
    pub user_id: String,
    pub show_time: bool,
    pub time_format: String,
    pub footer_left_text: String,
    pub footer_right_text: String,
}

/// Which regions a card contains besides its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub header: bool,
    pub footer: bool,
}

/// Structural layout roles whose styles belong to the template, not the theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutRole {
    UserInfo,
    UserLeft,
    UserMeta,
    UserRight,
    NotesBar,
    NotesActions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Profile,
    Notes,
}

/// A structural layout choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub regions: Regions,
    layout: Layout,
}

const TEMPLATES: [Template; 2] = [
    Template {
        id: DEFAULT_TEMPLATE_ID,
        name: "Default",
        regions: Regions {
            header: true,
            footer: true,
        },
        layout: Layout::Profile,
    },
    Template {
        id: "notes",
        name: "Notes",
        regions: Regions {
            header: true,
            footer: false,
        },
        layout: Layout::Notes,
    },
];

impl Default for Template {
    fn default() -> Self {
        TEMPLATES[0]
    }
}

impl Template {
    pub fn builtin() -> &'static [Template] {
        &TEMPLATES
    }

    pub fn by_id(id: &str) -> Option<Template> {
        TEMPLATES.iter().copied().find(|t| t.id == id)
    }

    /// Inline style for a template-owned layout role
    pub fn layout_style(&self, role: LayoutRole) -> &'static str {
        match role {
            LayoutRole::UserInfo => "display: flex; justify-content: space-between; align-items: center; margin-bottom: 16px",
            LayoutRole::UserLeft => "display: flex; align-items: center; gap: 12px",
            LayoutRole::UserMeta => "display: flex; flex-direction: column; gap: 2px",
            LayoutRole::UserRight => "display: flex; align-items: center",
            LayoutRole::NotesBar => "display: flex; align-items: center; justify-content: flex-end; height: 36px; margin-bottom: 12px; border-bottom: 1px solid rgba(0, 0, 0, 0.08)",
            LayoutRole::NotesActions => "width: 48px; height: 8px; border-radius: 4px; background: rgba(0, 0, 0, 0.12)",
        }
    }

    /// Build the header region, or None when this template has no header
    pub fn build_header(&self, profile: &Profile, now: &DateTime<FixedOffset>) -> Option<Element> {
        if !self.regions.header {
            return None;
        }
        let header = Element::new("div").with_class(HEADER_CLASS);
        Some(match self.layout {
            Layout::Profile => header.with_child(user_info(profile, now)),
            Layout::Notes => header.with_class("cp-notes-header").with_child(
                Element::new("div")
                    .with_class("cp-notes-bar")
                    .with_child(Element::new("div").with_class("cp-notes-actions")),
            ),
        })
    }

    /// Build the footer region, or None when this template has no footer
    pub fn build_footer(&self, profile: &Profile) -> Option<Element> {
        if !self.regions.footer {
            return None;
        }
        Some(
            Element::new("div")
                .with_class(FOOTER_CLASS)
                .with_child(footer_text(FieldId::FooterLeft, &profile.footer_left_text))
                .with_child(Element::new("div").with_class("cp-footer-separator").with_text("|"))
                .with_child(footer_text(FieldId::FooterRight, &profile.footer_right_text)),
        )
    }
}

fn user_info(profile: &Profile, now: &DateTime<FixedOffset>) -> Element {
    let avatar = Element::new("div")
        .with_class("cp-user-avatar")
        .with_attr("data-field", FieldId::UserAvatar.as_str())
        .with_attr("title", "Click to upload an avatar");
    let avatar = if profile.user_avatar.is_empty() {
        avatar.with_child(
            Element::new("div").with_class("cp-avatar-placeholder").with_child(
                Element::new("span")
                    .with_class("cp-avatar-upload-icon")
                    .with_text("\u{1f4f7}"),
            ),
        )
    } else {
        avatar.with_child(
            Element::new("img")
                .with_attr("src", &profile.user_avatar)
                .with_attr("alt", "avatar"),
        )
    };

    let meta = Element::new("div")
        .with_class("cp-user-meta")
        .with_child(
            Element::new("div")
                .with_class("cp-user-name-container")
                .with_child(
                    Element::new("div")
                        .with_class("cp-user-name")
                        .with_attr("data-field", FieldId::UserName.as_str())
                        .with_attr("title", "Click to edit the user name")
                        .with_text(&profile.user_name),
                )
                .with_child(Element::new("div").with_class("cp-verified-icon").with_text("\u{2713}")),
        )
        .with_child(
            Element::new("div")
                .with_class("cp-user-id")
                .with_attr("data-field", FieldId::UserId.as_str())
                .with_attr("title", "Click to edit the user id")
                .with_text(&profile.user_id),
        );

    let mut info = Element::new("div").with_class("cp-user-info").with_child(
        Element::new("div")
            .with_class("cp-user-left")
            .with_child(avatar)
            .with_child(meta),
    );

    if profile.show_time {
        info = info.with_child(
            Element::new("div").with_class("cp-user-right").with_child(
                Element::new("div")
                    .with_class("cp-post-time")
                    .with_text(&format_post_time(now, &profile.time_format)),
            ),
        );
    }

    info
}

fn footer_text(field: FieldId, text: &str) -> Element {
    Element::new("div")
        .with_class("cp-footer-text")
        .with_attr("data-field", field.as_str())
        .with_attr("title", "Click to edit")
        .with_text(text)
}

/// Format the post time, falling back to the default pattern when the configured one is invalid
pub fn format_post_time(now: &DateTime<FixedOffset>, pattern: &str) -> String {
    let valid = !pattern.is_empty()
        && !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error));
    let pattern = if valid { pattern } else { DEFAULT_TIME_FORMAT };
    now.format(pattern).to_string()
}
