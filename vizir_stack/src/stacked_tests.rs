// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use vizir_data::{Dataset, DatasetArena, DatasetId, NormalizedKey, Scalar};

use crate::{
    ExtentFilter, StackedDatum, compute_stack_extent, compute_stack_information,
    domain_keys, try_compute_stack_information,
};

#[derive(Debug, Clone)]
struct Row {
    k: &'static str,
    v: f64,
}

fn rows(pairs: &[(&'static str, f64)]) -> Vec<Row> {
    pairs.iter().map(|&(k, v)| Row { k, v }).collect()
}

fn key(row: &Row, _: usize, _: &Dataset<Row>) -> &'static str {
    row.k
}

fn value(row: &Row, _: usize, _: &Dataset<Row>) -> f64 {
    row.v
}

fn stacked(value: f64, offset: f64) -> Option<StackedDatum> {
    Some(StackedDatum { value, offset })
}

fn assert_close(a: f64, b: f64) {
    let eps = 1e-9;
    assert!((a - b).abs() <= eps, "{a} != {b}");
}

#[test]
fn two_series_stack_away_from_zero_in_both_directions() {
    let a = Dataset::new(DatasetId(1), rows(&[("x", 3.0), ("y", -2.0)]));
    let b = Dataset::new(DatasetId(2), rows(&[("x", 4.0), ("y", -1.0)]));

    let info = compute_stack_information([&a, &b], key, value);

    assert_eq!(info.datum(a.id(), "x"), stacked(3.0, 0.0));
    assert_eq!(info.datum(b.id(), "x"), stacked(4.0, 3.0));
    assert_eq!(info.datum(a.id(), "y"), stacked(-2.0, 0.0));
    assert_eq!(info.datum(b.id(), "y"), stacked(-1.0, -2.0));

    let extent = compute_stack_extent(&info, key, &ExtentFilter::All);
    assert_eq!(extent, Ok((-3.0, 7.0)));
}

#[test]
fn empty_dataset_list_has_an_empty_layout_and_zero_extent() {
    let none: [&Dataset<Row>; 0] = [];
    let info = compute_stack_information(none, key, value);
    assert!(info.is_empty());
    assert_eq!(
        compute_stack_extent(&info, key, &ExtentFilter::All),
        Ok((0.0, 0.0))
    );

    // Empty datasets still get an (empty) entry.
    let empty = Dataset::<Row>::empty(DatasetId(3));
    let info = compute_stack_information([&empty], key, value);
    assert_eq!(info.len(), 1);
    assert!(info.get(DatasetId(3)).is_some_and(|e| e.is_empty()));
    assert_eq!(
        compute_stack_extent(&info, key, &ExtentFilter::All),
        Ok((0.0, 0.0))
    );
}

#[test]
fn zero_is_stacked_with_the_positives() {
    let a = Dataset::new(DatasetId(0), rows(&[("z", 0.0)]));
    let b = Dataset::new(DatasetId(1), rows(&[("z", 2.0)]));
    let c = Dataset::new(DatasetId(2), rows(&[("z", -1.0)]));

    let info = compute_stack_information([&a], key, value);
    assert_eq!(info.datum(a.id(), "z"), stacked(0.0, 0.0));
    assert_eq!(
        compute_stack_extent(&info, key, &ExtentFilter::All),
        Ok((0.0, 0.0))
    );

    // The zero seeded the positive total, so `b` still starts at 0 and `c` has its own baseline.
    let info = compute_stack_information([&a, &b, &c], key, value);
    assert_eq!(info.datum(b.id(), "z"), stacked(2.0, 0.0));
    assert_eq!(info.datum(c.id(), "z"), stacked(-1.0, 0.0));
}

#[test]
fn last_contributor_offset_plus_value_is_the_running_sum() {
    let series: Vec<Dataset<Row>> = [
        [3.0, -1.0, 0.5],
        [-2.0, 4.0, 0.0],
        [1.5, -0.5, -7.0],
        [2.0, 2.0, 2.0],
        [-3.0, -3.0, 1.0],
    ]
    .iter()
    .zip(0_u64..)
    .map(|(values, id)| {
        let data = ["a", "b", "c"]
            .iter()
            .zip(values)
            .map(|(&k, &v)| Row { k, v })
            .collect::<Vec<_>>();
        Dataset::new(DatasetId(id), data)
    })
    .collect();

    let info = compute_stack_information(&series, key, value);

    for k in ["a", "b", "c"] {
        let mut sums: HashMap<bool, f64> = HashMap::new();
        let mut last: HashMap<bool, StackedDatum> = HashMap::new();
        for dataset in &series {
            let datum = info.datum(dataset.id(), k).unwrap();
            let positive = datum.value >= 0.0;
            let sum = sums.entry(positive).or_insert(0.0);
            // Offsets are the sum of everything of the same sign stacked before.
            assert_close(datum.offset, *sum);
            *sum += datum.value;
            last.insert(positive, datum);
        }
        for (sign, datum) in &last {
            assert_close(datum.end(), sums[sign]);
        }
    }

    // The extent is the largest positive and the smallest negative stack end.
    let extent = compute_stack_extent(&info, key, &ExtentFilter::All).unwrap();
    assert_eq!(extent, (-7.0, 6.5));
}

#[test]
fn aggregation_is_idempotent() {
    let a = Dataset::new(DatasetId(1), rows(&[("x", 1.0), ("y", -4.0)]));
    let b = Dataset::new(DatasetId(2), rows(&[("y", -2.0), ("x", 6.0)]));

    let first = compute_stack_information([&a, &b], key, value);
    let second = compute_stack_information([&a, &b], key, value);
    assert_eq!(first, second);
    assert_eq!(a.data()[1].v, -4.0, "inputs are never mutated");
}

#[test]
fn reversing_the_stack_moves_the_baseline() {
    let a = Dataset::new(DatasetId(1), rows(&[("x", 3.0), ("solo", 1.0)]));
    let b = Dataset::new(DatasetId(2), rows(&[("x", 4.0)]));

    let forward = compute_stack_information([&a, &b], key, value);
    let backward = compute_stack_information([&b, &a], key, value);

    assert_eq!(forward.datum(a.id(), "x").map(|d| d.offset), Some(0.0));
    assert_eq!(forward.datum(b.id(), "x").map(|d| d.offset), Some(3.0));
    assert_eq!(backward.datum(b.id(), "x").map(|d| d.offset), Some(0.0));
    assert_eq!(backward.datum(a.id(), "x").map(|d| d.offset), Some(4.0));

    // A key with a single contributor is unaffected by order.
    assert_eq!(
        forward.datum(a.id(), "solo"),
        backward.datum(a.id(), "solo")
    );
    assert_ne!(forward, backward);
}

#[test]
fn reject_all_filters_yield_a_zero_extent() {
    let a = Dataset::new(DatasetId(1), rows(&[("x", 3.0), ("y", -2.0)]));
    let info = compute_stack_information([&a], key, value);

    let by_datum = ExtentFilter::datum(|_: &Row, _, _: &Dataset<Row>| false);
    assert_eq!(compute_stack_extent(&info, key, &by_datum), Ok((0.0, 0.0)));

    let by_key = ExtentFilter::key(|_: &NormalizedKey| false);
    assert_eq!(compute_stack_extent(&info, key, &by_key), Ok((0.0, 0.0)));
}

#[test]
fn key_filters_select_the_same_points_as_datum_filters() {
    let a = Dataset::new(DatasetId(1), rows(&[("x", 3.0), ("y", -2.0), ("z", 8.0)]));
    let b = Dataset::new(DatasetId(2), rows(&[("x", 4.0), ("y", -1.0), ("z", 1.0)]));
    let info = compute_stack_information([&a, &b], key, value);

    let by_datum = ExtentFilter::datum(|r: &Row, _, _: &Dataset<Row>| r.k != "z");
    let by_key = ExtentFilter::key(|k: &NormalizedKey| k.as_str() != "z");

    let expected = Ok((-3.0, 7.0));
    assert_eq!(compute_stack_extent(&info, key, &by_datum), expected);
    assert_eq!(compute_stack_extent(&info, key, &by_key), expected);
}

#[test]
fn filter_sees_original_index_and_dataset() {
    let a = Dataset::new(DatasetId(1), rows(&[("x", 3.0), ("y", 5.0)]));
    let b = Dataset::new(DatasetId(2), rows(&[("x", 4.0), ("y", 1.0)]));
    let info = compute_stack_information([&a, &b], key, value);

    // Hide the second series entirely, and the first datum of the first.
    let hidden = DatasetId(2);
    let filter = ExtentFilter::datum(move |_: &Row, i, ds: &Dataset<Row>| {
        ds.id() != hidden && i != 0
    });
    assert_eq!(compute_stack_extent(&info, key, &filter), Ok((0.0, 5.0)));
}

#[test]
fn heterogeneous_keys_share_a_bucket() {
    let numbers = Dataset::new(DatasetId(1), vec![(Scalar::Number(1.0), 2.0)]);
    let text = Dataset::new(DatasetId(2), vec![(Scalar::from("1"), 5.0)]);

    let info = compute_stack_information(
        [&numbers, &text],
        |d, _, _| d.0.clone(),
        |d, _, _| d.1,
    );
    assert_eq!(info.datum(text.id(), "1"), stacked(5.0, 2.0));
    assert_eq!(
        domain_keys([&numbers, &text], |d, _, _| d.0.clone()),
        vec![NormalizedKey::from("1")]
    );
}

#[test]
fn signed_zero_float_keys_share_a_bucket() {
    let a = Dataset::new(DatasetId(1), vec![(0.0_f64, 2.0)]);
    let b = Dataset::new(DatasetId(2), vec![(-0.0_f64, 5.0)]);
    let c = Dataset::new(DatasetId(3), vec![(Scalar::Number(0.0), 1.0)]);

    let info = compute_stack_information([&a, &b], |d, _, _| d.0, |d, _, _| d.1);
    assert_eq!(info.datum(b.id(), "0"), stacked(5.0, 2.0));
    assert_eq!(
        compute_stack_extent(&info, |d, _, _| d.0, &ExtentFilter::All),
        Ok((0.0, 7.0))
    );

    let keys = domain_keys([&a, &b], |d, _, _| d.0);
    assert_eq!(keys, vec![NormalizedKey::from("0")]);

    // A bare float key and a `Scalar` number produce the same domain.
    let scalar_keys = domain_keys([&c], |d, _, _| d.0.clone());
    assert_eq!(scalar_keys, keys);
}

#[test]
fn loose_values_are_coerced_before_stacking() {
    let a = Dataset::new(
        DatasetId(1),
        vec![
            ("a", Scalar::from("2")),
            ("b", Scalar::Null),
            ("c", Scalar::Bool(true)),
        ],
    );
    let b = Dataset::new(
        DatasetId(2),
        vec![
            ("a", Scalar::from("0x10")),
            ("b", Scalar::from("")),
            ("c", Scalar::from("-1.5e0")),
        ],
    );

    let info = compute_stack_information([&a, &b], |d, _, _| d.0, |d, _, _| d.1.clone());
    assert_eq!(info.datum(b.id(), "a"), stacked(16.0, 2.0));
    assert_eq!(info.datum(b.id(), "b"), stacked(0.0, 0.0));
    assert_eq!(info.datum(b.id(), "c"), stacked(-1.5, 0.0));
    assert_eq!(
        compute_stack_extent(&info, |d, _, _| d.0, &ExtentFilter::All),
        Ok((-1.5, 18.0))
    );
}

#[test]
fn accessor_errors_abort_without_partial_output() {
    let a = Dataset::new(DatasetId(1), rows(&[("x", 1.0)]));
    let b = Dataset::new(DatasetId(2), rows(&[("x", 2.0), ("bad", 0.0)]));

    let result = try_compute_stack_information(
        [&a, &b],
        |r: &Row, _, _| {
            if r.k == "bad" {
                Err("unknown category")
            } else {
                Ok(r.k)
            }
        },
        |r: &Row, _, _| Ok(r.v),
    );
    assert_eq!(result.map(|info| info.len()), Err("unknown category"));
}

#[test]
fn arena_order_is_stacking_order() {
    let mut arena = DatasetArena::new();
    let low = arena.push(rows(&[("x", 1.0)]));
    let high = arena.push(rows(&[("x", 10.0)]));

    let info = compute_stack_information(&arena, key, value);
    assert_eq!(info.datum(high, "x").map(|d| d.offset), Some(1.0));

    arena.move_to(high, 0);
    let info = compute_stack_information(&arena, key, value);
    assert_eq!(info.datum(high, "x").map(|d| d.offset), Some(0.0));
    assert_eq!(info.datum(low, "x").map(|d| d.offset), Some(10.0));
    assert_eq!(info.dataset_ids().collect::<Vec<_>>(), vec![high, low]);
}
