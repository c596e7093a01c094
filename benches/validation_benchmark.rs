use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rokto::services::accounts;
use rokto::validation;

fn benchmark_identity_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("donor_validation");

    group.bench_function("normalize_mobile_prefixed", |b| {
        b.iter(|| validation::normalize_mobile(black_box("+8801511111111")))
    });

    group.bench_function("consistent_identity_triple", |b| {
        b.iter(|| {
            let dept = validation::validate_department_code(black_box("101")).unwrap();
            validation::validate_student_id(black_box("20101004"), dept).unwrap();
            validation::validate_academic_year(black_box("20101004"), black_box("2019-2020"))
        })
    });

    group.bench_function("department_mismatch_rejection", |b| {
        b.iter(|| {
            let dept = validation::validate_department_code(black_box("101")).unwrap();
            validation::validate_student_id(black_box("20102004"), dept)
        })
    });

    group.finish();
}

fn benchmark_password_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("password_hashing");
    // Argon2 costs tens of milliseconds per call on purpose.
    group.sample_size(10);

    group.bench_function("hash_password", |b| {
        b.iter(|| accounts::hash_password(black_box("secret123")))
    });

    let hash = accounts::hash_password("secret123").expect("Failed to hash fixture password");
    group.bench_function("verify_password", |b| {
        b.iter(|| accounts::verify_password(black_box("secret123"), &hash))
    });

    group.finish();
}

criterion_group!(benches, benchmark_identity_validation, benchmark_password_hashing);
criterion_main!(benches);
