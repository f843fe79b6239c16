// ABOUTME: Built-in themes for the cardpost application
// ABOUTME: Generates preset stylesheets from a small palette per visual identity

use super::sheet::{
    AvatarStyles, CodeStyles, EmphasisStyles, FooterStyles, FootnoteStyles, HeaderStyles,
    HeadingStyle, ListStyles, StyleSheet, TableStyles, Theme, TitleStyles,
};

pub const DEFAULT_THEME_ID: &str = "default";

/// Colors and decorations a preset is derived from
struct Palette {
    background: &'static str,
    text: &'static str,
    muted: &'static str,
    heading: &'static str,
    accent: &'static str,
    border: &'static str,
    code_background: &'static str,
    code_text: &'static str,
    quote_background: &'static str,
    radius: &'static str,
    /// Decoration under level-2 headings
    h2_after: &'static str,
}

const DEFAULT: Palette = Palette {
    background: "#ffffff",
    text: "#333333",
    muted: "#8a8a8a",
    heading: "#1a1a1a",
    accent: "#ff2442",
    border: "#eeeeee",
    code_background: "#f6f8fa",
    code_text: "#24292e",
    quote_background: "#fff5f6",
    radius: "12px",
    h2_after: "display: block; width: 40px; height: 4px; margin-top: 8px; border-radius: 2px; background: #ff2442",
};

const MINIMAL: Palette = Palette {
    background: "#fafafa",
    text: "#2c2c2c",
    muted: "#9e9e9e",
    heading: "#111111",
    accent: "#111111",
    border: "#e0e0e0",
    code_background: "#f0f0f0",
    code_text: "#2c2c2c",
    quote_background: "transparent",
    radius: "0",
    h2_after: "display: block; width: 100%; height: 1px; margin-top: 10px; background: #e0e0e0",
};

const ELEGANT: Palette = Palette {
    background: "#fdf8f2",
    text: "#4a3f35",
    muted: "#a39382",
    heading: "#3b2f25",
    accent: "#b08968",
    border: "#eadfd2",
    code_background: "#f5ece1",
    code_text: "#4a3f35",
    quote_background: "#f8efe4",
    radius: "8px",
    h2_after: "display: block; width: 24px; height: 2px; margin: 10px auto 0; background: #b08968",
};

const CYBER: Palette = Palette {
    background: "#0d0f1a",
    text: "#d6e4ff",
    muted: "#6b7aa6",
    heading: "#00f0ff",
    accent: "#ff00aa",
    border: "#26304d",
    code_background: "#151a2e",
    code_text: "#9efcff",
    quote_background: "#151a2e",
    radius: "4px",
    h2_after: "display: block; width: 60px; height: 3px; margin-top: 8px; background: linear-gradient(90deg, #00f0ff, #ff00aa)",
};

const FOREST: Palette = Palette {
    background: "#f3f7f0",
    text: "#2f3b2a",
    muted: "#7d8c74",
    heading: "#23401e",
    accent: "#4f7942",
    border: "#d7e3cf",
    code_background: "#e8f0e2",
    code_text: "#2f3b2a",
    quote_background: "#e8f0e2",
    radius: "10px",
    h2_after: "display: block; width: 32px; height: 4px; margin-top: 8px; border-radius: 2px; background: #4f7942",
};

const OCEAN: Palette = Palette {
    background: "#f2f8fc",
    text: "#24374a",
    muted: "#7a90a4",
    heading: "#0f3d5e",
    accent: "#1e88c7",
    border: "#d4e6f2",
    code_background: "#e6f1f8",
    code_text: "#24374a",
    quote_background: "#e6f1f8",
    radius: "10px",
    h2_after: "display: block; width: 48px; height: 4px; margin-top: 8px; border-radius: 2px; background: linear-gradient(90deg, #1e88c7, #7cc6f0)",
};

fn build(id: &str, name: &str, description: &str, p: &Palette) -> Theme {
    let heading = |size: &str, after: &str| HeadingStyle {
        base: format!(
            "margin: 24px 0 12px; font-size: {}; font-weight: bold; line-height: 1.4; color: {}",
            size, p.heading
        ),
        content: "display: inline".to_string(),
        after: after.to_string(),
    };

    let styles = StyleSheet {
        image_preview: format!(
            "background: {}; color: {}; border-radius: {}; padding: 24px 28px; box-sizing: border-box; overflow: hidden",
            p.background, p.text, p.radius
        ),
        header: HeaderStyles {
            avatar: AvatarStyles {
                container: format!(
                    "width: 44px; height: 44px; border-radius: 50%; overflow: hidden; border: 1px solid {}; cursor: pointer",
                    p.border
                ),
                placeholder: format!(
                    "width: 100%; height: 100%; display: flex; align-items: center; justify-content: center; background: {}",
                    p.code_background
                ),
                image: "width: 100%; height: 100%; object-fit: cover".to_string(),
            },
            name_container: "display: flex; align-items: center; gap: 4px".to_string(),
            user_name: format!("font-size: 16px; font-weight: bold; color: {}", p.heading),
            user_id: format!("font-size: 12px; color: {}", p.muted),
            post_time: format!("font-size: 12px; color: {}", p.muted),
            verified_icon: format!(
                "width: 14px; height: 14px; border-radius: 50%; background: {}; color: #ffffff; font-size: 10px; line-height: 14px; text-align: center",
                p.accent
            ),
        },
        footer: FooterStyles {
            container: format!(
                "display: flex; justify-content: center; align-items: center; gap: 8px; margin-top: 20px; padding-top: 12px; border-top: 1px solid {}",
                p.border
            ),
            text: format!("font-size: 12px; color: {}", p.muted),
            separator: format!("font-size: 12px; color: {}", p.border),
        },
        title: TitleStyles {
            h1: heading("26px", ""),
            h2: heading("22px", p.h2_after),
            h3: heading("18px", ""),
            base: heading("16px", ""),
        },
        paragraph: format!("margin: 12px 0; line-height: 1.8; color: {}", p.text),
        quote_paragraph: "margin: 0; padding: 0; line-height: inherit".to_string(),
        list: ListStyles {
            container: "margin: 12px 0; padding-left: 22px".to_string(),
            item: format!("margin: 6px 0; line-height: 1.7; color: {}", p.text),
            task_list: "list-style: none; margin-left: -22px".to_string(),
        },
        quote: format!(
            "margin: 16px 0; padding: 12px 16px; border-left: 4px solid {}; background: {}; color: {}",
            p.accent, p.quote_background, p.muted
        ),
        code: CodeStyles {
            block: format!(
                "margin: 16px 0; padding: 0 16px 16px; border-radius: 8px; background: {}; color: {}; overflow-x: auto; line-height: 1.6; font-family: Menlo, Consolas, monospace",
                p.code_background, p.code_text
            ),
            inline: format!(
                "padding: 2px 6px; border-radius: 4px; background: {}; color: {}; font-family: Menlo, Consolas, monospace",
                p.code_background, p.accent
            ),
        },
        image: "max-width: 100%; height: auto; display: block; margin: 1em auto; border-radius: 8px".to_string(),
        link: format!("color: {}; text-decoration: none; border-bottom: 1px solid {}", p.accent, p.accent),
        emphasis: EmphasisStyles {
            strong: format!("display: inline; font-weight: bold; color: {}", p.heading),
            em: "display: inline; font-style: italic".to_string(),
            del: format!("text-decoration: line-through; color: {}", p.muted),
        },
        table: TableStyles {
            container: "width: 100%; margin: 1em 0; border-collapse: collapse".to_string(),
            header: format!(
                "padding: 8px; border: 1px solid {}; background: {}; font-weight: bold; text-align: left",
                p.border, p.code_background
            ),
            cell: format!("padding: 8px; border: 1px solid {}", p.border),
        },
        hr: format!("margin: 20px 0; border: none; border-top: 1px solid {}", p.border),
        footnote: FootnoteStyles {
            reference: format!("color: {}; text-decoration: none; font-size: 0.8em", p.accent),
            backref: format!("color: {}; text-decoration: none", p.accent),
        },
    };

    Theme {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        is_preset: true,
        styles,
    }
}

/// All preset themes, default first
pub fn builtin_themes() -> Vec<Theme> {
    vec![
        build(DEFAULT_THEME_ID, "Default", "Clean white card with a red accent", &DEFAULT),
        build("minimal", "Minimal", "Monochrome with hairline rules", &MINIMAL),
        build("elegant", "Elegant", "Warm paper tones", &ELEGANT),
        build("cyber", "Cyber", "Dark neon for code-heavy notes", &CYBER),
        build("forest", "Forest", "Soft greens", &FOREST),
        build("ocean", "Ocean", "Cool blues with a gradient accent", &OCEAN),
    ]
}

pub fn default_theme() -> Theme {
    build(DEFAULT_THEME_ID, "Default", "Clean white card with a red accent", &DEFAULT)
}
