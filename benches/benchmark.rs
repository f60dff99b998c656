use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use pinpoint::persist::parse_table;
use pinpoint::predicate::PredicateSet;
use pinpoint::query::translate;
use pinpoint::table::Table;
use pinpoint::value::Value;

fn synthetic(rows: usize) -> Table {
    let columns = vec![
        "id".to_string(),
        "temperature".to_string(),
        "pressure".to_string(),
        "element".to_string(),
    ];
    let elements = ["Si", "C", "Ge", "Sn"];
    let records = (0..rows)
        .map(|n| {
            vec![
                Value::Int(n as i64),
                Value::Int(200 + (n % 400) as i64),
                Value::Float((n % 7) as f64 * 0.5),
                Value::from(elements[n % elements.len()]),
            ]
        })
        .collect();
    Table::from_records(columns, records).expect("synthetic table")
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let predicates = PredicateSet::from_json_str(
        r#"{"temperature": ["> 300", "< 550"], "pressure": "<= 1.5", "element": "== 'Si'"}"#,
    )
    .expect("valid predicates");
    let query = translate(&predicates);
    println!("{}", query);

    for rows in [1_000, 10_000, 100_000] {
        let table = synthetic(rows);
        c.bench_function(&format!("filter {}", rows), |b| {
            b.iter(|| query.filter(black_box(&table)).expect("filter").len())
        });
    }

    c.bench_function("translate", |b| b.iter(|| translate(black_box(&predicates))));

    let mut text = String::from("# pinpoint export: bench\nid,temperature,pressure,element,atomic_positions_x\n");
    for n in 0..10_000 {
        text.push_str(&format!("{},{},{:?},Si,\"[0.0, {}.5]\"\n", n, 200 + n % 400, (n % 7) as f64 * 0.5, n));
    }
    c.bench_function("parse 10k", |b| b.iter(|| parse_table(black_box(&text), "bench").expect("parsed")));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
