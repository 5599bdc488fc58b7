use std::ptr;

use kmeanspp::{
    Buf, CKmeansOptions, ERR_DEGENERATE, ERR_FIT, ERR_INVALID_ARGS, ERR_VALIDATION, OK, free_, kmeans_fit,
    kmeans_run, kmeans_seed,
    utilities::{KmeansOptions, init_centroids_seeded, run_pipeline},
};

mod helpers;
use helpers::two_blobs;

fn empty_buf() -> Buf {
    Buf {
        ptr: ptr::null_mut(),
        len: 0,
    }
}

fn take(buf: Buf) -> Vec<u8> {
    let v = unsafe { std::slice::from_raw_parts(buf.ptr, buf.len) }.to_vec();
    unsafe { free_(buf.ptr, buf.len) };
    v
}

fn flat_blobs() -> Vec<f64> {
    two_blobs().as_slice().iter().flatten().copied().collect()
}

#[test]
fn seed_writes_indices_and_centroids_as_json() {
    let data = flat_blobs();
    let mut out = empty_buf();
    let code = unsafe { kmeans_seed(data.as_ptr(), 6, 2, 2, 7, &mut out) };
    assert_eq!(code, OK);

    let v: serde_json::Value = serde_json::from_slice(&take(out)).unwrap();
    let expected = init_centroids_seeded(&two_blobs(), 2, 7).unwrap();
    let indices: Vec<usize> = serde_json::from_value(v["indices"].clone()).unwrap();
    let centroids: Vec<Vec<f64>> = serde_json::from_value(v["centroids"].clone()).unwrap();
    assert_eq!(indices, expected.indices());
    assert_eq!(centroids, expected.centroids());
}

#[test]
fn seed_reports_degenerate_input() {
    let data = vec![1.0; 8];
    let mut out = empty_buf();
    let code = unsafe { kmeans_seed(data.as_ptr(), 4, 2, 2, 0, &mut out) };
    assert_eq!(code, ERR_DEGENERATE);
}

#[test]
fn fit_writes_final_centroids_row_major() {
    let data = flat_blobs();
    let init = [8.0, 8.0, 1.5, 2.0];
    let mut out = empty_buf();
    let code = unsafe { kmeans_fit(data.as_ptr(), 6, 2, init.as_ptr(), 2, 300, 0.001, &mut out) };
    assert_eq!(code, OK);

    let bytes = take(out);
    assert_eq!(bytes.len(), 4 * 8);
    let vals: Vec<f64> = bytes
        .chunks_exact(8)
        .map(|c| f64::from_ne_bytes(c.try_into().unwrap()))
        .collect();
    assert_eq!(vals[0], 8.5);
    assert_eq!(vals[1], 8.5);
    assert!((vals[2] - 3.5 / 3.0).abs() < 1e-12);
    assert_eq!(vals[3], 1.5);
}

#[test]
fn run_matches_library_pipeline() {
    let data = flat_blobs();
    let opts = CKmeansOptions {
        k: 2,
        max_iter: 0,
        eps: 0.001,
        seed: 3,
    };
    let mut out = empty_buf();
    let code = unsafe { kmeans_run(data.as_ptr(), 6, 2, &opts, &mut out) };
    assert_eq!(code, OK);

    let text = String::from_utf8(take(out)).unwrap();
    let expected = run_pipeline(
        &two_blobs(),
        &KmeansOptions {
            k: 2,
            max_iter: 300,
            eps: 0.001,
            seed: 3,
        },
    )
    .unwrap()
    .render();
    assert_eq!(text, expected);
}

#[test]
fn run_writes_validation_messages() {
    let data = flat_blobs();
    let opts = CKmeansOptions {
        k: -1,
        max_iter: 1000,
        eps: 0.001,
        seed: 0,
    };
    let mut out = empty_buf();
    let code = unsafe { kmeans_run(data.as_ptr(), 6, 2, &opts, &mut out) };
    assert_eq!(code, ERR_VALIDATION);
    let text = String::from_utf8(take(out)).unwrap();
    assert_eq!(text, "Invalid number of clusters!\nInvalid maximum max_iteration!\n");
}

#[test]
fn run_with_nan_eps_fails_the_fit() {
    let data = flat_blobs();
    let opts = CKmeansOptions {
        k: 2,
        max_iter: 300,
        eps: f64::NAN,
        seed: 0,
    };
    let mut out = empty_buf();
    let code = unsafe { kmeans_run(data.as_ptr(), 6, 2, &opts, &mut out) };
    assert_eq!(code, ERR_FIT);
    assert_eq!(String::from_utf8(take(out)).unwrap(), "An Error Has Occurred\n");
}

#[test]
fn null_or_empty_arguments_are_rejected() {
    let data = flat_blobs();
    let mut out = empty_buf();
    unsafe {
        assert_eq!(kmeans_seed(ptr::null(), 6, 2, 2, 0, &mut out), ERR_INVALID_ARGS);
        assert_eq!(kmeans_seed(data.as_ptr(), 0, 2, 2, 0, &mut out), ERR_INVALID_ARGS);
        assert_eq!(
            kmeans_seed(data.as_ptr(), 6, 2, 2, 0, ptr::null_mut()),
            ERR_INVALID_ARGS
        );
        assert_eq!(
            kmeans_fit(data.as_ptr(), 6, 2, data.as_ptr(), 0, 300, 0.001, &mut out),
            ERR_INVALID_ARGS
        );
    }
}
