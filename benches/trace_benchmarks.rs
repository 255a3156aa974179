use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tracegraph::analytics;
use tracegraph::loader::{PersonRecord, PlaceRecord, VisitRecord};
use tracegraph::model::Person;
use tracegraph::traversal::{
    co_presences, healthy_companions_step, transitive_closure, ContactGraph,
};
use tracegraph::{Dataset, GraphStore};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap()
}

/// `people` people spread over `people / 10` places, three visits each;
/// every fifth person is sick
fn town(people: usize) -> GraphStore {
    let places = (people / 10).max(1);
    let mut dataset = Dataset::default();

    for p in 0..places {
        dataset.places.push(PlaceRecord::new(format!("Place{}", p), "Shop"));
    }
    for i in 0..people {
        let name = format!("Person{}", i);
        if i % 5 == 0 {
            dataset.people.push(PersonRecord::sick(name.clone(), base()));
        } else {
            dataset.people.push(PersonRecord::healthy(name.clone()));
        }
        for v in 0..3 {
            let place = format!("Place{}", (i * 7 + v * 13) % places);
            let start = base() + Duration::minutes(((i * 37 + v * 211) % 1440) as i64 + 60);
            dataset
                .visits
                .push(VisitRecord::new(name.clone(), place, start, start + Duration::minutes(90)));
        }
    }

    dataset.into_store().unwrap_or_default()
}

/// Benchmark sick/healthy co-presence enumeration
fn bench_co_presence(c: &mut Criterion) {
    let mut group = c.benchmark_group("co_presence");

    for size in [100, 1000, 5000].iter() {
        let store = town(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let graph = ContactGraph::new(&store);
                let hits = co_presences(&graph, Person::is_sick, |_| true, Person::is_healthy);
                black_box(hits.len());
            });
        });
    }
    group.finish();
}

/// Benchmark the three-hop healthy companion closure
fn bench_companion_closure(c: &mut Criterion) {
    let mut group = c.benchmark_group("companion_closure");

    for size in [100, 1000, 5000].iter() {
        let store = town(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let graph = ContactGraph::new(&store);
                let Some(seed) = graph.person_by_name("Person1") else {
                    return;
                };
                let closure =
                    transitive_closure(seed.id, 3, |p| healthy_companions_step(&graph, p));
                black_box(closure.final_layer().len());
            });
        });
    }
    group.finish();
}

/// Benchmark exposure grouping for people to inform
fn bench_people_to_inform(c: &mut Criterion) {
    let mut group = c.benchmark_group("people_to_inform");

    for size in [100, 1000].iter() {
        let store = town(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let lists = analytics::people_to_inform(&store, Duration::minutes(30));
                black_box(lists.map(|l| l.len()).unwrap_or_default());
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_co_presence,
    bench_companion_closure,
    bench_people_to_inform
);
criterion_main!(benches);
