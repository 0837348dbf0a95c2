use ::baghash::derivation::baghash::double::DoubleBuffer;
use ::baghash::derivation::baghash::params::Dimensions;
use ::baghash::derivation::{BagHashParams, CombineMode, baghash};
use ::baghash::rng::Bitstream;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

pub fn bench_session(c: &mut Criterion) {
    let params = BagHashParams {
        n_blocks: 4096,
        block_size: 64,
        rounds: 1,
        ..BagHashParams::default()
    };

    c.bench_function("baghash 256 KiB, 1 round", |b| {
        b.iter(|| baghash(black_box(b"password"), black_box(b"saltsalt"), &params))
    });
}

pub fn bench_round(c: &mut Criterion) {
    let dims = Dimensions::new(4096, 64).unwrap();

    for (name, mode) in [
        ("mix round default", CombineMode::Default),
        ("mix round xor", CombineMode::Xor),
    ] {
        c.bench_function(name, |b| {
            let mut buffer = vec![0u8; dims.total_len()];
            let mut stream = Bitstream::from_seed(b"saltsalt");
            let mut state = DoubleBuffer::init(&mut buffer, dims, mode, 3).unwrap();
            state.fill(b"password", b"saltsalt").unwrap();

            b.iter(|| state.mix(black_box(&mut stream)).unwrap())
        });
    }
}

criterion_group!(benches, bench_session, bench_round);
criterion_main!(benches);
