use crate::preview::*;
use crate::dom::element_at;
use crate::pagination::NavState;
use crate::style::{Profile, StyleConfig};
use chrono::{DateTime, FixedOffset};
use url::Url;
use crate::dom::Document;
use crate::splitter::split_sections;
use crate::style::template::{DEFAULT_TIME_FORMAT, Template};
use chrono::TimeZone;

fn profile() -> Profile {
    Profile {
        user_avatar: String::new(),
        user_name: "Ada".to_string(),
        user_id: "@ada".to_string(),
        show_time: false,
        time_format: DEFAULT_TIME_FORMAT.to_string(),
        footer_left_text: "left".to_string(),
        footer_right_text: "right".to_string(),
    }
}

fn now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .unwrap()
}

fn preview(html: &str, config: &StyleConfig) -> Preview {
    let doc = Document::from_html(html).unwrap();
    let outcome = split_sections(&doc);
    Preview::build(outcome.sections(), config, &profile(), &now())
}

#[test]
fn sections_are_addressable_by_path() {
    let p = preview("<h2>A</h2><p>a</p><h2>B</h2><p>b</p>", &StyleConfig::default());
    assert_eq!(p.section_count(), 2);
    let second = p.section(1).unwrap();
    assert_eq!(second.attr("data-index"), Some("1"));
    assert!(second.text_content().contains('b'));
    assert!(p.section(2).is_none());
}

#[test]
fn notes_template_moves_content_without_footer() {
    let config = StyleConfig::new(
        crate::style::themes::default_theme(),
        Template::by_id("notes").unwrap(),
    );
    let p = preview("<h2>A</h2>", &config);
    let page = p.page().unwrap();
    assert_eq!(page.element_children().count(), 2);
    assert_eq!(p.section(0).unwrap().attr("data-index"), Some("0"));
}

#[test]
fn render_applies_visibility_classes() {
    let mut p = preview("<h2>A</h2><h2>B</h2><h2>C</h2>", &StyleConfig::default());
    p.flags_mut()[1].active = true;
    let page = p.render().unwrap();
    let path = p.section_path(1).unwrap();
    assert!(element_at(&page, &path).unwrap().has_class(ACTIVE_CLASS));
    assert_eq!(p.shown_sections(), vec![1]);
    assert_eq!(p.active_index(), Some(1));

    p.force_visible(2);
    assert_eq!(p.shown_sections(), vec![2]);
    let page = p.render().unwrap();
    let first = element_at(&page, &p.section_path(0).unwrap()).unwrap();
    assert!(first.has_class(HIDDEN_CLASS));
    assert!(!first.has_class(ACTIVE_CLASS));
}

#[test]
fn flag_snapshot_restores_exact_state() {
    let mut p = preview("<h2>A</h2><h2>B</h2>", &StyleConfig::default());
    p.flags_mut()[0].active = true;
    let snapshot = p.snapshot_flags();
    p.force_visible(1);
    p.restore_flags(snapshot.clone());
    assert_eq!(p.flags(), snapshot.as_slice());
    p.restore_flags(vec![SectionFlags::default()]);
    assert_eq!(p.flags(), snapshot.as_slice());
}

#[test]
fn hidden_wins_over_visible_and_active() {
    let flags = SectionFlags {
        active: true,
        visible: true,
        hidden: true,
    };
    assert!(!flags.is_shown());
}

#[test]
fn shell_wraps_card_with_nav_and_base() {
    let p = preview("<h2>A</h2>", &StyleConfig::default());
    let nav = NavState {
        current: 0,
        count: 1,
        prev_disabled: true,
        next_disabled: true,
        indicator: "1/1".to_string(),
    };
    let shell = PageShell {
        base_href: Url::parse("file:///notes/").ok(),
        ..PageShell::default()
    }
    .with_scale(4.0);
    let html = shell.wrap(&p.render().unwrap(), Some(&nav_bar(&nav, true)));
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<base href=\"file:///notes/\">"));
    assert!(html.contains("zoom: 4"));
    assert!(html.contains("href=\"/next\""));
    assert!(html.contains(">1/1<"));
}

#[test]
fn empty_preview_has_no_page() {
    let p = preview("<p>no headings</p>", &StyleConfig::default());
    assert!(p.is_empty());
    assert!(p.render().is_none());
    assert!(guidance_element().text_content().contains("##"));
}
