// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Favorites persistence: dedup, bounding, removal, toggling, and teardown.

use unitconv_core::{ConversionCategory, Persistence, StoreError};
use unitconv_dry_tests::{favorite, history_record, InMemoryKvStore};

const FAVORITES_KEY: &str = "unitConverter_favorites";

fn fresh() -> (InMemoryKvStore, Persistence<InMemoryKvStore>) {
    let store = InMemoryKvStore::new();
    (store.clone(), Persistence::new(store))
}

#[test]
fn save_favorite_stores_pair() {
    let (_, p) = fresh();
    p.save_favorite(&favorite(ConversionCategory::Length, "km", "mi"));

    let favorites = p.get_favorites();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].from_unit, "km");
}

#[test]
fn favorites_are_most_recent_first() {
    let (_, p) = fresh();
    p.save_favorite(&favorite(ConversionCategory::Length, "km", "mi"));
    p.save_favorite(&favorite(ConversionCategory::Weight, "kg", "lb"));

    let favorites = p.get_favorites();
    assert_eq!(favorites.len(), 2);
    assert_eq!(favorites[0].category, ConversionCategory::Weight);
}

#[test]
fn duplicate_favorite_is_a_no_op() {
    let (store, p) = fresh();
    let pair = favorite(ConversionCategory::Length, "km", "mi");

    assert!(p.try_save_favorite(&pair).unwrap());
    let saves = store.save_count();
    assert!(!p.try_save_favorite(&pair).unwrap());
    p.save_favorite(&pair);

    assert_eq!(p.get_favorites().len(), 1);
    assert_eq!(store.save_count(), saves);
}

#[test]
fn favorites_keep_five_newest() {
    let (_, p) = fresh();
    for i in 1..=7 {
        p.save_favorite(&favorite(ConversionCategory::Length, &format!("unit{i}"), "mi"));
    }

    let favorites = p.get_favorites();
    assert_eq!(favorites.len(), 5);
    assert_eq!(favorites[0].from_unit, "unit7");
    assert_eq!(favorites[4].from_unit, "unit3");
}

#[test]
fn remove_favorite_only_removes_exact_triple() {
    let (_, p) = fresh();
    p.save_favorite(&favorite(ConversionCategory::Length, "km", "mi"));
    p.save_favorite(&favorite(ConversionCategory::Length, "mi", "km"));
    p.save_favorite(&favorite(ConversionCategory::Weight, "kg", "lb"));

    p.remove_favorite(&favorite(ConversionCategory::Length, "km", "mi"));

    let favorites = p.get_favorites();
    assert_eq!(
        favorites,
        vec![
            favorite(ConversionCategory::Weight, "kg", "lb"),
            favorite(ConversionCategory::Length, "mi", "km"),
        ]
    );
}

#[test]
fn remove_filters_accidental_duplicates() {
    let (store, p) = fresh();
    store.put_text(
        FAVORITES_KEY,
        r#"[{"category":"length","fromUnit":"km","toUnit":"mi"},
            {"category":"weight","fromUnit":"kg","toUnit":"lb"},
            {"category":"length","fromUnit":"km","toUnit":"mi"}]"#,
    );

    p.remove_favorite(&favorite(ConversionCategory::Length, "km", "mi"));
    assert_eq!(
        p.get_favorites(),
        vec![favorite(ConversionCategory::Weight, "kg", "lb")]
    );
}

#[test]
fn remove_missing_favorite_leaves_list_alone() {
    let (_, p) = fresh();
    p.save_favorite(&favorite(ConversionCategory::Weight, "kg", "lb"));
    p.try_remove_favorite(&favorite(ConversionCategory::Weight, "lb", "kg"))
        .unwrap();
    assert_eq!(p.get_favorites().len(), 1);
}

#[test]
fn is_favorite_matches_triple() {
    let (_, p) = fresh();
    let pair = favorite(ConversionCategory::Temperature, "C", "F");
    assert!(!p.is_favorite(&pair));
    p.save_favorite(&pair);
    assert!(p.is_favorite(&pair));
    assert!(!p.is_favorite(&favorite(ConversionCategory::Temperature, "F", "C")));
}

#[test]
fn toggle_favorite_flips_membership() {
    let (_, p) = fresh();
    let pair = favorite(ConversionCategory::Length, "m", "ft");

    assert!(p.toggle_favorite(&pair));
    assert!(p.is_favorite(&pair));
    assert!(!p.toggle_favorite(&pair));
    assert!(!p.is_favorite(&pair));
}

#[test]
fn record_pair_can_be_favorited() {
    let (_, p) = fresh();
    let record = history_record(5.0);
    p.save_favorite(&record.pair());
    assert!(p.is_favorite(&favorite(ConversionCategory::Length, "km", "mi")));
}

#[test]
fn corrupted_favorites_read_empty_and_are_removed() {
    let (store, p) = fresh();
    store.put_text(FAVORITES_KEY, "invalid json{{{");

    assert!(p.get_favorites().is_empty());
    assert!(!store.contains_key(FAVORITES_KEY));
    assert!(p.get_favorites().is_empty());
}

#[test]
fn corrupted_favorites_report_through_try() {
    let (store, p) = fresh();
    store.put_text(FAVORITES_KEY, r#"{"category":"length"}"#);
    assert!(matches!(
        p.try_get_favorites(),
        Err(StoreError::Corrupted { .. })
    ));
}

#[test]
fn unreadable_entries_are_skipped_not_fatal() {
    let (store, p) = fresh();
    store.put_text(
        FAVORITES_KEY,
        r#"[1, {"category":"weight","fromUnit":"kg","toUnit":"lb"}, {"category":"volume"}]"#,
    );

    assert_eq!(
        p.try_get_favorites().unwrap(),
        vec![favorite(ConversionCategory::Weight, "kg", "lb")]
    );
    assert!(store.contains_key(FAVORITES_KEY));

    p.save_favorite(&favorite(ConversionCategory::Length, "km", "mi"));
    assert_eq!(p.get_favorites().len(), 2);
}

#[test]
fn failed_heal_still_reads_empty() {
    let (store, p) = fresh();
    store.put_text(FAVORITES_KEY, "garbage");
    store.set_fail_on_remove(true);

    assert!(p.get_favorites().is_empty());
    assert!(store.contains_key(FAVORITES_KEY));
}

#[test]
fn favorite_save_failure_is_swallowed() {
    let (store, p) = fresh();
    store.set_fail_on_save(true);
    p.save_favorite(&favorite(ConversionCategory::Length, "km", "mi"));
    assert!(p.get_favorites().is_empty());
}

#[test]
fn collections_are_independent() {
    let (_, p) = fresh();
    p.save_favorite(&favorite(ConversionCategory::Length, "km", "mi"));
    p.save_history(&history_record(1.0));
    p.clear_history();

    assert!(p.get_history().is_empty());
    assert_eq!(p.get_favorites().len(), 1);
}

#[test]
fn wipe_removes_both_collections() {
    let (store, p) = fresh();
    p.save_favorite(&favorite(ConversionCategory::Length, "km", "mi"));
    p.save_history(&history_record(1.0));

    p.wipe().unwrap();

    assert!(store.keys().is_empty());
    assert!(p.get_favorites().is_empty());
    assert!(p.get_history().is_empty());
}
