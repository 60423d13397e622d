// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Example binary for `vizir_stack`.
//!
//! Run with `RUST_LOG=debug` to see recompute decisions.

use vizir_data::{Dataset, DatasetArena, DatasetId, Scalar};
use vizir_stack::{ExtentFilter, StackInformation, StackLayout, StackState};

#[derive(Debug, Clone)]
struct Sample {
    month: &'static str,
    amount: Scalar,
}

fn series(amounts: [(&'static str, Scalar); 3]) -> Vec<Sample> {
    amounts
        .into_iter()
        .map(|(month, amount)| Sample { month, amount })
        .collect()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut arena = DatasetArena::new();
    let hardware = arena.push(series([
        ("jan", Scalar::Number(3.0)),
        ("feb", Scalar::Number(5.0)),
        ("mar", Scalar::Number(2.0)),
    ]));
    let services = arena.push(series([
        ("jan", Scalar::Number(4.0)),
        ("feb", Scalar::from("1.5")),
        ("mar", Scalar::Null),
    ]));
    let refunds = arena.push(series([
        ("jan", Scalar::Number(-2.0)),
        ("feb", Scalar::Number(-1.0)),
        ("mar", Scalar::from("-0.5")),
    ]));
    let names = [(hardware, "hardware"), (services, "services"), (refunds, "refunds")];

    let layout = StackLayout::new(
        |s: &Sample, _, _| s.month,
        |s: &Sample, _, _| s.amount.clone(),
    );
    let keys = layout.domain_keys(&arena);
    println!(
        "domain: {}",
        keys.iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut state = StackState::new(layout.clone());
    report(&mut state, &arena, &names, "initial");
    report(&mut state, &arena, &names, "unchanged");

    arena.set_data(
        services,
        series([
            ("jan", Scalar::Number(6.0)),
            ("feb", Scalar::Number(2.0)),
            ("mar", Scalar::Number(1.0)),
        ]),
    );
    report(&mut state, &arena, &names, "services updated");

    arena.move_to(services, 0);
    report(&mut state, &arena, &names, "services moved to the baseline");

    let hidden = hardware;
    let visible =
        ExtentFilter::datum(move |_: &Sample, _, ds: &Dataset<Sample>| ds.id() != hidden);
    match layout.extent_filtered(state.info(), &visible) {
        Ok((min, max)) => println!("extent without hardware: [{min}, {max}]"),
        Err(err) => log::error!("extent failed: {err}"),
    }
}

fn report(
    state: &mut StackState<Sample>,
    arena: &DatasetArena<Sample>,
    names: &[(DatasetId, &str)],
    label: &str,
) {
    match state.update(arena) {
        Ok(true) => {
            println!("{label}: restacked");
            print_stack(state.info(), names);
            let (min, max) = state.extent();
            println!("  extent: [{min}, {max}]");
        }
        Ok(false) => println!("{label}: up to date"),
        Err(err) => log::error!("{label}: {err}"),
    }
}

fn print_stack(info: &StackInformation<Sample>, names: &[(DatasetId, &str)]) {
    for entry in info {
        let id = entry.dataset().id();
        let name = names
            .iter()
            .find(|(n, _)| *n == id)
            .map_or("?", |(_, name)| *name);
        for sample in entry.dataset().data() {
            if let Some(d) = entry.get(sample.month) {
                println!(
                    "  {name:>8} {}: {:>5} on {:>5} -> {:>5}",
                    sample.month,
                    d.value,
                    d.offset,
                    d.end()
                );
            }
        }
    }
}
