// ABOUTME: Stylesheet model for the cardpost application
// ABOUTME: Nested tables of inline style strings, one per semantic role, grouped into themes

use serde::{Deserialize, Serialize};

/// Styles for one heading level: the heading itself and its two spans
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingStyle {
    pub base: String,
    pub content: String,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleStyles {
    pub h1: HeadingStyle,
    pub h2: HeadingStyle,
    pub h3: HeadingStyle,
    /// Shared fallback for levels 4-6
    pub base: HeadingStyle,
}

impl TitleStyles {
    pub fn for_level(&self, level: u8) -> &HeadingStyle {
        match level {
            1 => &self.h1,
            2 => &self.h2,
            3 => &self.h3,
            _ => &self.base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarStyles {
    pub container: String,
    pub placeholder: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderStyles {
    pub avatar: AvatarStyles,
    pub name_container: String,
    pub user_name: String,
    pub user_id: String,
    pub post_time: String,
    pub verified_icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterStyles {
    pub container: String,
    pub text: String,
    pub separator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListStyles {
    pub container: String,
    pub item: String,
    pub task_list: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeStyles {
    pub block: String,
    pub inline: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmphasisStyles {
    pub strong: String,
    pub em: String,
    pub del: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStyles {
    pub container: String,
    pub header: String,
    pub cell: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FootnoteStyles {
    #[serde(rename = "ref")]
    pub reference: String,
    pub backref: String,
}

/// Every role a theme can style
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleSheet {
    pub image_preview: String,
    pub header: HeaderStyles,
    pub footer: FooterStyles,
    pub title: TitleStyles,
    pub paragraph: String,
    /// Paragraphs nested in a quote
    pub quote_paragraph: String,
    pub list: ListStyles,
    pub quote: String,
    pub code: CodeStyles,
    pub image: String,
    pub link: String,
    pub emphasis: EmphasisStyles,
    pub table: TableStyles,
    pub hr: String,
    pub footnote: FootnoteStyles,
}

/// Colors and typography for one visual identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_preset: bool,
    pub styles: StyleSheet,
}

/// Join style declarations into one string, dropping empty parts.
/// Output is `a: 1; b: 2;` regardless of trailing semicolons in the parts.
pub fn compose(parts: &[&str]) -> String {
    let mut declarations: Vec<&str> = Vec::new();
    for part in parts {
        for decl in split_declarations(part) {
            let decl = decl.trim();
            if !decl.is_empty() {
                declarations.push(decl);
            }
        }
    }
    if declarations.is_empty() {
        return String::new();
    }
    let mut out = declarations.join("; ");
    out.push(';');
    out
}

/// Split a declaration list at `;` outside quotes, parentheses and escapes
fn split_declarations(rules: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, ch) in rules.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&rules[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&rules[start..]);
    parts
}
