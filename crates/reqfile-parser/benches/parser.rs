//! Benchmarks for the `.http` scanner and parser.
//!
//! - Simple constructs (a bare request, a request with headers and a body)
//! - Interpolation-heavy requests
//! - Scaling with increasing file size
//!
//! Run with: `cargo bench --package reqfile-parser`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use reqfile_parser::Parser;

const SIMPLE_REQUEST: &str = r"### get item
GET https://example.com/items/1
";

const REQUEST_WITH_HEADERS_AND_BODY: &str = r#"### create item
POST https://example.com/items
Content-Type: application/json
Accept: application/json

{"name": "widget", "quantity": 3}
"#;

const INTERPOLATION_HEAVY: &str = r"@base = {{ host }}
@prompt token: your API token

### create item
POST {{ base }}/items
Authorization: Bearer {{ token }}
Content-Type: application/json

{"owner": "{{ user }}"}

> out.json
<> expected.json
";

const COMPREHENSIVE: &str = r#"@base = https://example.com
@timeout = 5000
@prompt token: your API token

# shared variables above, one request per separator below

### list items
GET {{ base }}/items
Authorization: Bearer {{ token }}

### create item
POST {{ base }}/items
Content-Type: application/json

{"name": "widget"}

> out.json

### delete item
# @no-redirect
DELETE {{ base }}/items/1
Authorization: Bearer {{ token }}
"#;

fn bench_simple_request(crit: &mut Criterion) {
    let _ = crit.bench_function("parse_simple_request", |bencher| {
        bencher.iter(|| {
            let mut parser = Parser::new("bench.http", black_box(SIMPLE_REQUEST.as_bytes()));
            parser.parse()
        });
    });
}

fn bench_headers_and_body(crit: &mut Criterion) {
    let _ = crit.bench_function("parse_headers_and_body", |bencher| {
        bencher.iter(|| {
            let mut parser =
                Parser::new("bench.http", black_box(REQUEST_WITH_HEADERS_AND_BODY.as_bytes()));
            parser.parse()
        });
    });
}

fn bench_interpolation_heavy(crit: &mut Criterion) {
    let mut group = crit.benchmark_group("parse_interpolation_heavy");
    let _ = group.throughput(Throughput::Bytes(INTERPOLATION_HEAVY.len() as u64));
    let _ = group.bench_function("interpolation_heavy", |bencher| {
        bencher.iter(|| {
            let mut parser = Parser::new("bench.http", black_box(INTERPOLATION_HEAVY.as_bytes()));
            parser.parse()
        });
    });
    group.finish();
}

fn bench_comprehensive(crit: &mut Criterion) {
    let mut group = crit.benchmark_group("parse_comprehensive");
    let _ = group.throughput(Throughput::Bytes(COMPREHENSIVE.len() as u64));
    let _ = group.bench_function("comprehensive", |bencher| {
        bencher.iter(|| {
            let mut parser = Parser::new("bench.http", black_box(COMPREHENSIVE.as_bytes()));
            parser.parse()
        });
    });
    group.finish();
}

/// Parsing with a file made of an increasing number of independent requests.
fn bench_scaling(crit: &mut Criterion) {
    let mut group = crit.benchmark_group("parse_scaling");

    for size in &[10, 50, 100, 500] {
        let source = (0..*size).fold(String::new(), |mut acc, idx| {
            acc.push_str(&format!(
                "### request {idx}\nGET https://example.com/items/{idx}\nAccept: application/json\n\n"
            ));
            acc
        });

        let _ = group.throughput(Throughput::Bytes(source.len() as u64));
        let _ =
            group.bench_with_input(BenchmarkId::from_parameter(size), &source, |bencher, source| {
                bencher.iter(|| {
                    let mut parser = Parser::new("bench.http", black_box(source.as_bytes()));
                    parser.parse()
                });
            });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simple_request,
    bench_headers_and_body,
    bench_interpolation_heavy,
    bench_comprehensive,
    bench_scaling,
);
criterion_main!(benches);
