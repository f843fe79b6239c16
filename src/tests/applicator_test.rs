use crate::style::applicator::*;
use crate::style::StyleConfig;
use crate::style::roles::WINDOW_CONTROLS_CLASS;
use crate::style::sheet::compose;
use crate::dom::Element;
use crate::dom::{Document, element_at};
use crate::style::roles::IMAGE_PREVIEW_CLASS;
use crate::style::themes::builtin_themes;
use crate::style::template::Template;

fn page(html: &str) -> Element {
    let mut root = Element::new("div").with_class(IMAGE_PREVIEW_CLASS);
    root.children = Document::from_html(html).unwrap().nodes;
    root
}

fn config(theme_id: &str) -> StyleConfig {
    let theme = builtin_themes()
        .into_iter()
        .find(|t| t.id == theme_id)
        .unwrap();
    StyleConfig::new(theme, Template::default()).with_font("Georgia", 17)
}

const SAMPLE: &str = "<h2>Title <em>x</em></h2><p>Body <code>c</code> <a href=\"#\">l</a></p>\
<pre><code class=\"language-rust\">fn main() {}</code></pre><blockquote><p>q</p></blockquote>\
<ul><li><input type=\"checkbox\" disabled=\"\" /> t</li></ul><p><img src=\"a.png\" alt=\"a\" /></p>\
<table><thead><tr><th>h</th></tr></thead><tbody><tr><td>d</td></tr></tbody></table><hr />\
<h5>small</h5>";

#[test]
fn headings_are_split_once() {
    let styled = style_page(&page(SAMPLE), &config("default"));
    let h2 = element_at(&styled, &[0]).unwrap();
    assert_eq!(h2.children.len(), 2);
    let content = h2.children[0].as_element().unwrap();
    assert!(content.has_class("content"));
    assert_eq!(content.text_content(), "Title x");
    assert!(h2.attr("style").unwrap().ends_with("font-family: Georgia;"));
}

#[test]
fn styling_twice_equals_styling_once() {
    let cfg = config("default");
    let once = style_page(&page(SAMPLE), &cfg);
    let twice = style_page(&once, &cfg);
    assert_eq!(once, twice);
    assert_eq!(once.to_html(), twice.to_html());
}

#[test]
fn theme_round_trip_is_byte_identical() {
    let original = page(SAMPLE);
    let default_cfg = config("default");
    let direct = style_page(&original, &default_cfg);
    let switched = style_page(&style_page(&direct, &config("minimal")), &default_cfg);
    assert_eq!(direct.to_html(), switched.to_html());
}

#[test]
fn code_blocks_get_one_window_control_marker() {
    let cfg = config("default");
    let styled = style_page(&style_page(&page(SAMPLE), &cfg), &cfg);
    let pre = element_at(&styled, &[2]).unwrap();
    let markers = pre
        .element_children()
        .filter(|e| e.has_class(WINDOW_CONTROLS_CLASS))
        .count();
    assert_eq!(markers, 1);
    let dots: Vec<&Element> = pre.element_children().next().unwrap().element_children().collect();
    assert_eq!(dots.len(), 3);
    assert!(dots[2].attr("style").unwrap().contains("#27c93f"));
    // block code keeps only the block rule, nested code is untouched
    let inner_code = pre.element_children().nth(1).unwrap();
    assert_eq!(inner_code.attr("style"), None);
}

#[test]
fn font_overrides_reach_text_roles() {
    let styled = style_page(&page(SAMPLE), &config("default"));
    let p = element_at(&styled, &[1]).unwrap();
    let style = p.attr("style").unwrap();
    assert!(style.contains("font-family: Georgia"));
    assert!(style.contains("font-size: 17px"));
    let quote_p = element_at(&styled, &[3, 0]).unwrap();
    assert_eq!(quote_p.attr("style"), Some("margin: 0; padding: 0; line-height: inherit;"));
}

#[test]
fn sole_image_paragraph_is_centered() {
    let styled = style_page(&page(SAMPLE), &config("default"));
    let p = element_at(&styled, &[5]).unwrap();
    assert!(p.attr("style").unwrap().ends_with("text-align: center; margin: 1em 0;"));
    let img = element_at(&styled, &[5, 0]).unwrap();
    assert!(img.attr("style").unwrap().contains("font-family: Georgia"));
}

#[test]
fn task_items_layer_on_item_rule() {
    let cfg = config("default");
    let styled = style_page(&page(SAMPLE), &cfg);
    let li = element_at(&styled, &[4, 0]).unwrap();
    let styles = &cfg.theme.styles.list;
    let style = li.attr("style").unwrap();
    assert!(style.starts_with(&compose(&[&styles.item]).trim_end_matches(';').to_string()));
    assert!(style.contains("list-style: none"));
}

#[test]
fn small_headings_share_fallback_style() {
    let cfg = config("default");
    let styled = style_page(&page(SAMPLE), &cfg);
    let h5 = element_at(&styled, &[8]).unwrap();
    assert_eq!(
        h5.attr("style").unwrap(),
        compose(&[&cfg.theme.styles.title.base.base, "font-family: Georgia"])
    );
}

#[test]
fn empty_rules_remove_stale_styles() {
    let mut cfg = config("default");
    let styled = style_page(&page("<hr />"), &cfg);
    assert!(element_at(&styled, &[0]).unwrap().attr("style").is_some());
    cfg.theme.styles.hr.clear();
    let restyled = style_page(&styled, &cfg);
    assert_eq!(element_at(&restyled, &[0]).unwrap().attr("style"), None);
}

#[test]
fn background_image_lands_on_card_root_and_clears_again() {
    let data_url = "data:image/png;base64,iVBORw0KGgo=";
    let mut background = crate::style::Background::new(data_url);
    background.scale = 150;
    background.x = -20;
    background.y = 40;
    let with_background = config("default").with_background(background);

    let styled = style_page(&page(SAMPLE), &with_background);
    let style = styled.attr("style").unwrap();
    assert!(style.contains(&format!("background-image: url(\"{}\");", data_url)), "{}", style);
    assert!(style.contains("background-size: 150%;"));
    assert!(style.contains("background-position: -20px 40px;"));
    assert!(style.contains("background-repeat: no-repeat;"));

    let cleared = style_page(&styled, &config("default"));
    assert_eq!(cleared.to_html(), style_page(&page(SAMPLE), &config("default")).to_html());
}
