use std::iter;

use baghash::derivation::CombineMode;
use baghash::derivation::baghash::block::{CompressError, MAX_COMPRESS_BLOCKS, compress};
use baghash::derivation::baghash::boundary::expand_into;
use baghash::hash::hash_long;

#[test]
fn compress_rejects_no_inputs() {
    let mut out = [0u8; 16];
    let mut acc = [0u8; 16];
    assert_eq!(
        compress(&mut out, iter::empty(), CombineMode::Default, &mut acc),
        Err(CompressError::NoInputs)
    );
}

#[test]
fn compress_rejects_too_many_inputs() {
    let block = [1u8; 8];
    let inputs = vec![&block[..]; MAX_COMPRESS_BLOCKS + 1];
    let mut out = [0u8; 8];
    let mut acc = [0u8; 8];

    assert_eq!(
        compress(&mut out, inputs.iter().copied(), CombineMode::Xor, &mut acc),
        Err(CompressError::TooManyInputs(MAX_COMPRESS_BLOCKS + 1))
    );

    // the maximum itself is accepted
    assert!(compress(&mut out, inputs[1..].iter().copied(), CombineMode::Xor, &mut acc).is_ok());
}

#[test]
fn compress_rejects_mismatched_block() {
    let a = [1u8; 8];
    let b = [2u8; 7];
    let mut out = [0u8; 8];
    let mut acc = [0u8; 8];

    assert_eq!(
        compress(&mut out, [&a[..], &b[..]], CombineMode::Default, &mut acc),
        Err(CompressError::BlockSizeMismatch {
            index: 1,
            expected: 8,
            actual: 7
        })
    );
    assert_eq!(out, [0u8; 8]);
}

#[test]
fn xor_mode_rejects_wrong_accumulator() {
    let a = [1u8; 8];
    let mut out = [0u8; 8];
    let mut short = [0u8; 7];

    assert_eq!(
        compress(&mut out, [&a[..]], CombineMode::Xor, &mut short),
        Err(CompressError::AccumulatorSize {
            expected: 8,
            actual: 7
        })
    );

    // default mode never touches the accumulator
    assert!(compress(&mut out, [&a[..]], CombineMode::Default, &mut []).is_ok());
}

#[test]
fn xor_mode_ignores_stale_accumulator_and_wipes_it() {
    let a = [1u8; 32];
    let b = [2u8; 32];
    let mut clean = [0u8; 32];
    let mut dirty = [0u8; 32];
    let mut acc = [0u8; 32];

    compress(&mut clean, [&a[..], &b[..]], CombineMode::Xor, &mut acc).unwrap();
    assert_eq!(acc, [0u8; 32]);

    acc = [0xffu8; 32];
    compress(&mut dirty, [&a[..], &b[..]], CombineMode::Xor, &mut acc).unwrap();
    assert_eq!(clean, dirty);
    assert_eq!(acc, [0u8; 32]);
}

#[test]
fn default_mode_depends_on_input_order() {
    let a = [1u8; 32];
    let b = [2u8; 32];
    let mut ab = [0u8; 32];
    let mut ba = [0u8; 32];

    compress(&mut ab, [&a[..], &b[..]], CombineMode::Default, &mut []).unwrap();
    compress(&mut ba, [&b[..], &a[..]], CombineMode::Default, &mut []).unwrap();
    assert_ne!(ab, ba);
}

#[test]
fn xor_mode_ignores_input_order() {
    let a = [1u8; 32];
    let b = [2u8; 32];
    let c = [3u8; 32];
    let mut abc = [0u8; 32];
    let mut cab = [0u8; 32];
    let mut acc = [0u8; 32];

    compress(&mut abc, [&a[..], &b[..], &c[..]], CombineMode::Xor, &mut acc).unwrap();
    compress(&mut cab, [&c[..], &a[..], &b[..]], CombineMode::Xor, &mut acc).unwrap();
    assert_eq!(abc, cab);
}

#[test]
fn modes_are_domain_separated() {
    let a = [9u8; 64];
    let mut default = [0u8; 64];
    let mut xor = [0u8; 64];
    let mut acc = [0u8; 64];

    compress(&mut default, [&a[..]], CombineMode::Default, &mut acc).unwrap();
    compress(&mut xor, [&a[..]], CombineMode::Xor, &mut acc).unwrap();
    assert_ne!(default, xor);
}

#[test]
fn compress_fills_odd_block_sizes() {
    for size in [63, 65, 200] {
        let a = vec![0xabu8; size];
        let mut out = vec![0u8; size];
        compress(&mut out, [&a[..], &a[..]], CombineMode::Default, &mut []).unwrap();
        assert!(out.iter().any(|&b| b != 0));
    }
}

#[test]
fn hash_long_binds_part_boundaries() {
    let mut split_late = [0u8; 32];
    let mut split_early = [0u8; 32];

    hash_long(&mut split_late, [&b"ab"[..], &b"c"[..]]);
    hash_long(&mut split_early, [&b"a"[..], &b"bc"[..]]);
    assert_ne!(split_late, split_early);
}

#[test]
fn expander_output_is_prefix_stable() {
    let mut short = [0u8; 10];
    let mut long = [0u8; 300];

    expand_into(&mut short, b"password", b"saltsalt");
    expand_into(&mut long, b"password", b"saltsalt");
    assert_eq!(short[..], long[..10]);
}

#[test]
fn expander_distinguishes_empty_salt() {
    let mut with_salt = [0u8; 32];
    let mut without = [0u8; 32];

    expand_into(&mut with_salt, b"passwordsalt", b"");
    expand_into(&mut without, b"password", b"salt");
    assert_ne!(with_salt, without);
}
