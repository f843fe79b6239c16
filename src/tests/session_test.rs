use crate::session::*;
use crate::dom::Document;
use crate::pagination::Direction;
use crate::preview::PageShell;
use crate::style::{Profile, StyleConfig};
use chrono::FixedOffset;
use std::path::Path;
use crate::dom::element_at;
use crate::preview::ACTIVE_CLASS;
use crate::style::themes::builtin_themes;
use crate::style::template::{DEFAULT_TIME_FORMAT, Template};
use chrono::TimeZone;

fn profile() -> Profile {
    Profile {
        user_avatar: String::new(),
        user_name: "Ada".to_string(),
        user_id: "@ada".to_string(),
        show_time: true,
        time_format: DEFAULT_TIME_FORMAT.to_string(),
        footer_left_text: "l".to_string(),
        footer_right_text: "r".to_string(),
    }
}

fn session() -> PreviewSession {
    let posted = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
        .unwrap();
    PreviewSession::new(StyleConfig::default(), profile()).with_post_time(posted)
}

fn doc(html: &str) -> Document {
    Document::from_html(html).unwrap()
}

#[test]
fn first_rebuild_reports_validity() {
    let mut s = session();
    let outcome = s.open(Path::new("a.md"), doc("<h2>A</h2><h2>B</h2>"));
    assert_eq!(
        outcome,
        RebuildOutcome::Rebuilt {
            sections: 2,
            validity: Some(ValidityChange::BecameValid)
        }
    );
    assert!(s.is_valid());

    let outcome = s.rebuild(doc("<h2>A</h2>"));
    assert_eq!(
        outcome,
        RebuildOutcome::Rebuilt {
            sections: 1,
            validity: None
        }
    );

    let outcome = s.rebuild(doc("<p>none</p>"));
    assert_eq!(
        outcome,
        RebuildOutcome::Rebuilt {
            sections: 0,
            validity: Some(ValidityChange::BecameInvalid)
        }
    );
    assert!(s.to_html(&PageShell::default(), true, false).contains("cp-empty-message"));
}

#[test]
fn rebuild_always_resets_to_first_card() {
    let mut s = session();
    s.open(Path::new("a.md"), doc("<h2>A</h2><h2>B</h2><h2>C</h2>"));
    s.navigate(Direction::Next);
    s.navigate(Direction::Next);
    assert_eq!(s.current(), Some(2));
    s.rebuild(doc("<h2>A</h2><h2>B</h2><h2>C</h2>"));
    assert_eq!(s.current(), Some(0));
    assert_eq!(s.preview().active_index(), Some(0));
}

#[test]
fn restyle_keeps_current_card() {
    let mut s = session();
    s.open(Path::new("a.md"), doc("<h2>A</h2><h2>B</h2>"));
    s.navigate(Direction::Next);
    let minimal = builtin_themes().into_iter().find(|t| t.id == "minimal").unwrap();
    s.restyle(StyleConfig::new(minimal, Template::default()), profile());
    assert_eq!(s.current(), Some(1));
    assert_eq!(s.preview().active_index(), Some(1));
    assert_eq!(s.config().theme.id, "minimal");
}

#[test]
fn locked_preview_defers_until_unlocked() {
    let mut s = session();
    s.open(Path::new("a.md"), doc("<h2>A</h2>"));
    assert_eq!(s.set_locked(true), None);
    assert_eq!(s.rebuild(doc("<h2>A</h2><h2>B</h2>")), RebuildOutcome::Deferred);
    assert_eq!(s.preview().section_count(), 1);

    let outcome = s.set_locked(false).unwrap();
    assert!(matches!(outcome, RebuildOutcome::Rebuilt { sections: 2, .. }));
    assert_eq!(s.preview().section_count(), 2);
}

#[test]
fn opening_a_file_bypasses_the_lock() {
    let mut s = session();
    s.set_locked(true);
    s.open(Path::new("b.md"), doc("<h2>X</h2>"));
    assert_eq!(s.file(), Some(Path::new("b.md")));
    assert_eq!(s.preview().section_count(), 1);
}

#[test]
fn html_marks_the_active_section_and_navigation() {
    let mut s = session();
    s.open(Path::new("a.md"), doc("<h2>A</h2><h2>B</h2>"));
    s.navigate(Direction::Next);
    let html = s.to_html(&PageShell::default(), true, true);
    let page = s.preview().render().unwrap();
    let path = s.preview().section_path(1).unwrap();
    assert!(element_at(&page, &path).unwrap().has_class(ACTIVE_CLASS));
    assert!(html.contains(">2/2<"));
    assert!(html.contains(">2024/6/1<"));
}
