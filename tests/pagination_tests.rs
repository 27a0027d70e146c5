//! Integration tests for cursor pagination.
//!
//! Pages are anchored on a key and must be stable while the collection
//! changes between calls.

use keyed_order::prelude::*;
use rstest::{fixture, rstest};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Event {
    id: &'static str,
    at: u32,
    public: bool,
}

const fn event(id: &'static str, at: u32, public: bool) -> Event {
    Event { id, at, public }
}

type EventRules = Rules<
    Event,
    u32,
    fn(&Event) -> u32,
    fn(&u32, &u32) -> std::cmp::Ordering,
    keyed_order::rules::IdentityWith<fn(&Event) -> String>,
>;

type Events = KeyedCollection<Event, EventRules>;

fn event_at(value: &Event) -> u32 {
    value.at
}

fn event_id(value: &Event) -> String {
    value.id.to_string()
}

fn ids<'a>(page: &[&'a Event]) -> Vec<&'a str> {
    page.iter().map(|value| value.id).collect()
}

#[fixture]
fn events() -> Events {
    let rules = Rules::ordered(event_at as fn(&Event) -> u32)
        .with_identity(event_id as fn(&Event) -> String);
    KeyedCollection::try_from_iter(
        rules,
        [
            event("e1", 10, true),
            event("e2", 20, false),
            event("e3", 30, true),
            event("e4", 40, false),
            event("e5", 50, true),
            event("e6", 60, true),
        ],
    )
    .unwrap()
}

// =============================================================================
// Concrete Scenario
// =============================================================================

#[rstest]
fn test_scenario_pages() {
    let rules = Rules::ordered(|value: &(i32, &'static str)| value.0)
        .with_identity(|value: &(i32, &'static str)| value.1.to_string());
    let collection =
        KeyedCollection::try_from_iter(rules, [(5, "a"), (1, "b"), (3, "c")]).unwrap();

    assert_eq!(collection.paginated(Some(&1), 1, PageMode::After), vec![&(3, "c")]);
    assert_eq!(collection.paginated(Some(&3), 10, PageMode::Before), vec![&(1, "b")]);
}

// =============================================================================
// Unfiltered Pages
// =============================================================================

#[rstest]
#[case(None, 2, vec!["e1", "e2"])]
#[case(Some(20), 2, vec!["e3", "e4"])]
#[case(Some(25), 2, vec!["e3", "e4"])]
#[case(Some(50), 10, vec!["e6"])]
#[case(Some(60), 10, vec![])]
#[case(Some(0), 1, vec!["e1"])]
fn test_after_pages(
    events: Events,
    #[case] cursor: Option<u32>,
    #[case] limit: usize,
    #[case] expected: Vec<&str>,
) {
    let page = events.paginated(cursor.as_ref(), limit, PageMode::After);
    assert_eq!(ids(&page), expected);
}

#[rstest]
#[case(None, 2, vec!["e5", "e6"])]
#[case(Some(40), 2, vec!["e2", "e3"])]
#[case(Some(45), 2, vec!["e3", "e4"])]
#[case(Some(20), 10, vec!["e1"])]
#[case(Some(10), 10, vec![])]
#[case(Some(999), 1, vec!["e6"])]
fn test_before_pages(
    events: Events,
    #[case] cursor: Option<u32>,
    #[case] limit: usize,
    #[case] expected: Vec<&str>,
) {
    let page = events.paginated(cursor.as_ref(), limit, PageMode::Before);
    assert_eq!(ids(&page), expected);
}

#[rstest]
fn test_empty_collection_pages_are_empty() {
    let collection = KeyedCollection::new(Rules::ordered(|value: &u8| *value));
    assert!(collection.paginated(None, 5, PageMode::After).is_empty());
    assert!(collection.paginated(Some(&3), 5, PageMode::Before).is_empty());
}

// =============================================================================
// Filtered Pages
// =============================================================================

#[rstest]
fn test_filtered_after_skips_without_spending_limit(events: Events) {
    let page = events.paginated_where(Some(&10), 2, PageMode::After, |value| value.public);
    assert_eq!(ids(&page), vec!["e3", "e5"]);
}

#[rstest]
fn test_filtered_before_is_ascending(events: Events) {
    let page = events.paginated_where(None, 3, PageMode::Before, |value| value.public);
    assert_eq!(ids(&page), vec!["e3", "e5", "e6"]);
}

#[rstest]
fn test_filtered_page_stops_at_boundary(events: Events) {
    let page = events.paginated_where(Some(&30), 10, PageMode::Before, |value| !value.public);
    assert_eq!(ids(&page), vec!["e2"]);
}

// =============================================================================
// By Value
// =============================================================================

#[rstest]
fn test_paginated_by_value_uses_key_only(events: Events) {
    let probe = event("not-a-member", 30, false);
    assert_eq!(
        ids(&events.paginated_by_value(&probe, 2, PageMode::After)),
        vec!["e4", "e5"]
    );
    assert_eq!(
        ids(&events.paginated_by_value(&probe, 2, PageMode::Before)),
        vec!["e1", "e2"]
    );
    assert_eq!(
        ids(&events.paginated_by_value_where(&probe, 2, PageMode::After, |value| value.public)),
        vec!["e5", "e6"]
    );
}

// =============================================================================
// Live Collection
// =============================================================================

#[rstest]
fn test_paging_through_a_changing_collection(mut events: Events) {
    let first = events.paginated(None, 2, PageMode::After);
    let cursor = first.last().map(|value| value.at).unwrap();
    assert_eq!(cursor, 20);

    events.delete_by_id("e2", Presence::Required).unwrap();
    events.insert([event("e2b", 25, true)]).unwrap();
    events.delete_by_id("e3", Presence::Required).unwrap();

    let second = events.paginated(Some(&cursor), 2, PageMode::After);
    assert_eq!(ids(&second), vec!["e2b", "e4"]);
}

#[rstest]
fn test_next_page_starts_at_immediate_successor(events: Events) {
    let page = events.paginated(Some(&20), 2, PageMode::After);
    let cursor = page.last().map(|value| value.at).unwrap();
    let next = events.paginated(Some(&cursor), 1, PageMode::After);
    let successor = events.position_of(page[1].id).map(|position| position + 1);
    assert_eq!(
        next.first().map(|value| value.id),
        successor.and_then(|position| events.get_at(position)).map(|value| value.id)
    );
}
