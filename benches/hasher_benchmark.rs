use criterion::{criterion_group, criterion_main, Criterion};
use digest::Digest;
use rand::Rng;
use streamdigest::{sm3, Sm3Digest, TupleHash128};

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut rnd = rand::thread_rng();
    let mut buf = [0; 600];
    for i in buf.iter_mut() {
        *i = rnd.gen();
    }

    c.bench_function("sm3 hash 600 bytes", |b| {
        b.iter(|| {
            let mut h = sm3::new();
            h.write(&buf).unwrap();
            h.finalize().unwrap().to_vec()
        })
    });

    c.bench_function("sm3 digest core 600 bytes", |b| {
        b.iter(|| Sm3Digest::digest(buf))
    });

    c.bench_function("tuple hash 128 three elements", |b| {
        b.iter(|| {
            let mut h = TupleHash128::new(32, b"bench").unwrap();
            for e in buf.chunks(200) {
                h.next_data(e).unwrap();
            }
            h.finalize().unwrap().to_vec()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
