use std::cell::Cell;

use super::*;
use crate::config::SessionConfig;

#[test]
fn durable_round_trip_and_remove() {
    let store = MemoryDurable::new();
    store.set_item("k", "v").unwrap();
    assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
    store.remove_item("k").unwrap();
    assert_eq!(store.get_item("k").unwrap(), None);
}

#[test]
fn tabs_share_backing_map() {
    let tab_a = MemoryDurable::new();
    let tab_b = tab_a.open_tab();
    tab_a.set_item("auth:token", "t").unwrap();
    assert_eq!(tab_b.get_item("auth:token").unwrap().as_deref(), Some("t"));
}

#[test]
fn writes_notify_only_other_tabs() {
    let tab_a = MemoryDurable::new();
    let tab_b = tab_a.open_tab();
    let seen_a = Rc::new(Cell::new(0));
    let seen_b = Rc::new(Cell::new(0));
    {
        let seen_a = Rc::clone(&seen_a);
        tab_a.subscribe(Rc::new(move |_| seen_a.set(seen_a.get() + 1)));
    }
    {
        let seen_b = Rc::clone(&seen_b);
        tab_b.subscribe(Rc::new(move |_| seen_b.set(seen_b.get() + 1)));
    }

    tab_a.set_item("auth:token", "t").unwrap();
    assert_eq!(seen_a.get(), 0);
    assert_eq!(seen_b.get(), 1);
}

#[test]
fn unchanged_value_does_not_notify() {
    let tab_a = MemoryDurable::new();
    let tab_b = tab_a.open_tab();
    let seen = Rc::new(Cell::new(0));
    {
        let seen = Rc::clone(&seen);
        tab_b.subscribe(Rc::new(move |_| seen.set(seen.get() + 1)));
    }
    tab_a.set_item("k", "v").unwrap();
    tab_a.set_item("k", "v").unwrap();
    tab_a.remove_item("missing").unwrap();
    assert_eq!(seen.get(), 1);
}

#[test]
fn unsubscribe_stops_notifications() {
    let tab_a = MemoryDurable::new();
    let tab_b = tab_a.open_tab();
    let seen = Rc::new(Cell::new(0));
    let id = {
        let seen = Rc::clone(&seen);
        tab_b.subscribe(Rc::new(move |_| seen.set(seen.get() + 1)))
    };
    tab_b.unsubscribe(id);
    tab_a.set_item("k", "v").unwrap();
    assert_eq!(seen.get(), 0);
    assert_eq!(tab_a.listener_count(), 0);
}

#[test]
fn failing_durable_writes_return_error() {
    let store = MemoryDurable::new();
    store.set_fail_writes(true);
    assert!(matches!(store.set_item("k", "v"), Err(StorageError::Write { .. })));
    assert_eq!(store.raw("k"), None);
}

#[test]
fn edge_records_set_and_clear() {
    let edge = MemoryEdge::new();
    let attrs = EdgeAttributes::from_config(&SessionConfig::default());
    edge.set_record("auth_token", "1", &attrs).unwrap();
    edge.set_record("role", "renter", &attrs).unwrap();
    assert_eq!(edge.get_record("role").as_deref(), Some("renter"));
    assert_eq!(edge.cookie_header(), "auth_token=1; role=renter");

    edge.clear_record("auth_token", &attrs).unwrap();
    assert_eq!(edge.get_record("auth_token"), None);
}

#[test]
fn edge_zero_lifetime_expires_record() {
    let edge = MemoryEdge::new();
    let mut attrs = EdgeAttributes::from_config(&SessionConfig::default());
    edge.set_record("role", "admin", &attrs).unwrap();
    attrs.max_age_secs = 0;
    edge.set_record("role", "admin", &attrs).unwrap();
    assert_eq!(edge.get_record("role"), None);
}
