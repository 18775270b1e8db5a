// Benchmark for token issuance and verification
// Run with: cargo bench

use authlab::web::token::TokenService;
use criterion::{Criterion, criterion_group, criterion_main};

fn bench_issue(c: &mut Criterion) {
    let service = TokenService::new(b"bench-secret", 24 * 3600);
    c.bench_function("issue HS256 token", |b| {
        b.iter(|| {
            let token = service.issue("admin").unwrap();
            assert!(!token.is_empty());
        });
    });
}

fn bench_verify(c: &mut Criterion) {
    let service = TokenService::new(b"bench-secret", 24 * 3600);
    let token = service.issue("admin").unwrap();
    c.bench_function("verify HS256 token", |b| {
        b.iter(|| {
            assert!(service.verify(&token).is_some());
        });
    });
    c.bench_function("reject forged token", |b| {
        let forged = TokenService::new(b"other-secret", 24 * 3600).issue("admin").unwrap();
        b.iter(|| {
            assert!(service.verify(&forged).is_none());
        });
    });
}

criterion_group!(benches, bench_issue, bench_verify);
criterion_main!(benches);
