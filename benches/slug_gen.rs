//! 短码工具性能基准测试

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use snaplink::utils::url_validator::validate_url;
use snaplink::utils::{DEFAULT_SLUG_LENGTH, generate_slug, is_valid_slug};

// ============== generate_slug 基准测试 ==============

fn bench_generate_slug(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/generate_slug");

    for len in [DEFAULT_SLUG_LENGTH, 8, 16, 32] {
        group.bench_with_input(BenchmarkId::new("length", len), &len, |b, &len| {
            b.iter(|| {
                let slug = generate_slug(len);
                assert_eq!(slug.len(), len);
            });
        });
    }

    group.finish();
}

// ============== is_valid_slug 基准测试 ==============

fn bench_is_valid_slug(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/is_valid_slug");

    group.bench_function("valid_simple", |b| {
        b.iter(|| {
            assert!(is_valid_slug("abc123"));
        });
    });

    group.bench_function("valid_with_separators", |b| {
        b.iter(|| {
            assert!(is_valid_slug("my-link_2026"));
        });
    });

    group.bench_function("invalid_special_chars", |b| {
        b.iter(|| {
            assert!(!is_valid_slug("'; DROP TABLE--"));
        });
    });

    let max_len_slug = "a".repeat(64);
    group.bench_function("valid_max_length", |b| {
        b.iter(|| {
            assert!(is_valid_slug(&max_len_slug));
        });
    });

    group.finish();
}

// ============== validate_url 基准测试 ==============

fn bench_validate_url(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/validate_url");

    group.bench_function("valid_https", |b| {
        b.iter(|| {
            assert!(validate_url("https://example.com/path?query=1").is_ok());
        });
    });

    group.bench_function("dangerous_protocol", |b| {
        b.iter(|| {
            assert!(validate_url("javascript:alert(1)").is_err());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_generate_slug,
    bench_is_valid_slug,
    bench_validate_url
);
criterion_main!(benches);
