// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use diagram_maker::generate::generate_source;
use diagram_maker::generate::steps::extract_workflow;
use diagram_maker::route::resolve;

const APPROVAL: &str = "Submit a document for review, manager can approve or reject it, then \
                        complete the process.";
const FREEFORM: &str = "User logs in, then validate credentials. If the password is wrong show \
                        an error else open the dashboard, save the session to the database, \
                        either export a report or archive the data, then log out.";

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn criterion() -> Criterion {
    let sample_size = env_u64("BENCH_SAMPLE_SIZE", 60).clamp(10, 200) as usize;
    let warmup_secs = env_u64("BENCH_WARMUP_SECS", 3).clamp(1, 60);
    let measurement_secs = env_u64("BENCH_MEASUREMENT_SECS", 5).clamp(1, 120);

    Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(warmup_secs))
        .measurement_time(Duration::from_secs(measurement_secs))
}

// Group names (`generate.source`, `generate.extract`) and case ids stay stable so results remain
// comparable over time.
fn benches_generate(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("generate.source");

        for (case_id, category, description) in [
            ("flowchart_graphviz", "flowchart", APPROVAL),
            ("process_graphviz", "process", APPROVAL),
            ("freeform_mermaid", "mermaid", FREEFORM),
            ("freeform_plantuml", "plantuml", FREEFORM),
            ("freeform_excalidraw", "excalidraw", FREEFORM),
            ("sequence_mermaid", "sequence", APPROVAL),
        ] {
            let route = resolve(category);
            group.throughput(Throughput::Bytes(description.len() as u64));
            group.bench_function(case_id, move |b| {
                b.iter(|| {
                    let source = generate_source(black_box(description), &route).expect("source");
                    black_box(source.code().len())
                })
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("generate.extract");
        group.throughput(Throughput::Bytes(FREEFORM.len() as u64));
        group.bench_function("freeform", |b| {
            b.iter(|| {
                let workflow = extract_workflow(black_box(FREEFORM));
                black_box(workflow.steps.len() + workflow.conditionals.len())
            })
        });
        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = criterion();
    targets = benches_generate
}
criterion_main!(benches);
