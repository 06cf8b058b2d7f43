use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::Value;

fn build_document(fields: usize) -> String {
    let mut doc = String::from("{");
    for i in 0..fields {
        if i > 0 {
            doc.push(',');
        }
        doc.push_str(&format!(
            r#""field_{i}":{{"id":{i},"name":"entry number {i}","tags":["a","b","c"]}}"#
        ));
    }
    doc.push('}');
    doc
}

fn bench_lazy_access(c: &mut Criterion) {
    let doc = build_document(1000);

    c.bench_function("lazy_get_early_field", |b| {
        b.iter(|| {
            let mut root = lazy_json::attach_str(black_box(&doc));
            let name = root
                .get("field_10")
                .unwrap()
                .unwrap()
                .get("name")
                .unwrap()
                .unwrap()
                .decode()
                .unwrap();
            black_box(name)
        })
    });

    c.bench_function("lazy_get_last_field", |b| {
        b.iter(|| {
            let mut root = lazy_json::attach_str(black_box(&doc));
            let name = root
                .get("field_999")
                .unwrap()
                .unwrap()
                .get("name")
                .unwrap()
                .unwrap()
                .decode()
                .unwrap();
            black_box(name)
        })
    });

    c.bench_function("serde_json_full_parse", |b| {
        b.iter(|| {
            let value: Value = serde_json::from_str(black_box(&doc)).unwrap();
            black_box(value["field_10"]["name"].clone())
        })
    });
}

criterion_group!(benches, bench_lazy_access);
criterion_main!(benches);
