use crate::pagination::*;
use crate::preview::SectionFlags;

#[test]
fn reset_picks_first_or_empty() {
    let mut p = Paginator::new();
    p.reset(0);
    assert_eq!(p.state(), PaginationState::Empty);
    p.reset(3);
    assert_eq!(p.state(), PaginationState::Viewing(0));
}

#[test]
fn navigation_stops_at_both_ends() {
    let mut p = Paginator::new();
    p.reset(3);
    assert!(!p.navigate(Direction::Prev));
    assert_eq!(p.state(), PaginationState::Viewing(0));
    assert!(p.navigate(Direction::Next));
    assert!(p.navigate(Direction::Next));
    assert!(!p.navigate(Direction::Next));
    assert_eq!(p.state(), PaginationState::Viewing(2));
    assert!(p.navigate(Direction::Prev));
    assert_eq!(p.current(), Some(1));
}

#[test]
fn navigation_on_empty_is_a_no_op() {
    let mut p = Paginator::new();
    assert!(!p.navigate(Direction::Next));
    assert_eq!(p.state(), PaginationState::Empty);
    let nav = p.nav_state();
    assert!(nav.prev_disabled && nav.next_disabled);
}

#[test]
fn nav_state_reports_indicator_and_bounds() {
    let mut p = Paginator::new();
    p.reset(4);
    p.navigate(Direction::Next);
    let nav = p.nav_state();
    assert_eq!(nav.indicator, "2/4");
    assert_eq!(nav.to_string(), "2/4");
    assert!(!nav.prev_disabled);
    assert!(!nav.next_disabled);

    p.go_to(10);
    let nav = p.nav_state();
    assert_eq!(nav.current, 3);
    assert!(nav.next_disabled);
}

#[test]
fn apply_marks_exactly_one_active() {
    let mut p = Paginator::new();
    p.reset(3);
    p.navigate(Direction::Next);
    let mut flags = vec![SectionFlags::default(); 3];
    flags[0].active = true;
    p.apply(&mut flags);
    let active: Vec<bool> = flags.iter().map(|f| f.active).collect();
    assert_eq!(active, vec![false, true, false]);
}

#[test]
fn directions_parse_from_cli_words() {
    assert_eq!("prev".parse::<Direction>(), Ok(Direction::Prev));
    assert_eq!("Next".parse::<Direction>(), Ok(Direction::Next));
    assert!("up".parse::<Direction>().is_err());
}
