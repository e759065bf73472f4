use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tabjoin_core::join::{Cardinality, JoinKey, JoinType};
use tabjoin_core::types::{Scalar, Table};
use tabjoin_exec::Engine;
use tabjoin_operators::HashJoin;
use tabjoin_planner::{resolve, JoinRequest};

const CUSTOMERS: usize = 1_000;

fn orders(rows: usize) -> Table {
    let rows = (0..rows)
        .map(|i| {
            vec![
                Scalar::I64(i as i64),
                Scalar::I64((i % CUSTOMERS) as i64),
                Scalar::F64((i % 100) as f64 + 0.5),
            ]
        })
        .collect();
    Table::from_rows(&["order_id", "customer_id", "amount"], rows).unwrap()
}

fn customers() -> Table {
    let rows = (0..CUSTOMERS)
        .map(|i| {
            vec![
                Scalar::I64(i as i64),
                Scalar::Str(format!("region-{}", i % 7)),
            ]
        })
        .collect();
    Table::from_rows(&["customer_id", "region"], rows).unwrap()
}

fn bench_lookup_join(c: &mut Criterion) {
    let right = customers();
    let op = HashJoin::new(
        JoinKey::natural("customer_id"),
        JoinType::Left,
        Cardinality::ManyToOne,
    );

    let mut group = c.benchmark_group("join_many_to_one");
    group.sample_size(10);
    for rows in [10_000usize, 50_000, 200_000] {
        let left = orders(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &left, |b, left| {
            b.iter(|| op.run(left, &right).unwrap())
        });
    }
    group.finish();
}

fn bench_engine_csv(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let left = dir.path().join("orders.csv");
    let right = dir.path().join("customers.csv");
    let engine = Engine::default();

    tabjoin_io::write_table(&orders(50_000), &left).unwrap();
    tabjoin_io::write_table(&customers(), &right).unwrap();

    let plan = resolve(&JoinRequest {
        left: left.display().to_string(),
        right: right.display().to_string(),
        left_key: "customer_id".into(),
        right_key: None,
        join_type: JoinType::Left,
        cardinality: Cardinality::ManyToOne,
        output: dir.path().join("joined.csv").display().to_string(),
    })
    .unwrap();

    let mut group = c.benchmark_group("engine_csv");
    group.sample_size(10);
    group.bench_function("orders_50k", |b| b.iter(|| engine.run(&plan).unwrap()));
    group.finish();
}

criterion_group!(benches, bench_lookup_join, bench_engine_csv);
criterion_main!(benches);
