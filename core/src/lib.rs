use core::ffi::c_int;
use serde_json::json;
use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    ptr, slice,
};

pub mod utilities;
use utilities::{
    DEFAULT_ITER, KmeansError, KmeansOptions, Lloyd, VectorDataset, fit_centroids::fit_centroids,
    init_centroids::init_centroids_seeded, run_pipeline::run_pipeline, structs::FitRequest,
};

pub const OK: c_int = 0;
pub const ERR_INVALID_ARGS: c_int = 1;
pub const ERR_PANIC: c_int = 2;
pub const ERR_PARSE: c_int = 4;
pub const ERR_VALIDATION: c_int = 8;
pub const ERR_DEGENERATE: c_int = 16;
pub const ERR_FIT: c_int = 32;

#[repr(C)]
pub struct Buf {
    pub ptr: *mut u8,
    pub len: usize,
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct CKmeansOptions {
    pub k: c_int,
    pub max_iter: c_int,
    pub eps: f64,
    pub seed: u64,
}

/// Pretty-prints any serializable value to stderr.
#[inline]
pub fn log_json<T: serde::Serialize>(v: &T) {
    if let Ok(s) = serde_json::to_string_pretty(v) {
        eprintln!("{s}");
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alloc(size: usize) -> *mut u8 {
    if size == 0 {
        return core::ptr::null_mut();
    }
    let mut v = Vec::<u8>::with_capacity(size);
    let p = v.as_mut_ptr();
    core::mem::forget(v);
    p
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_(ptr_raw: *mut u8, size: usize) {
    if !ptr_raw.is_null() {
        let _ = unsafe { Vec::<u8>::from_raw_parts(ptr_raw, size, size) };
    }
}

/// k-means++ seeds as JSON: `{"indices": [...], "centroids": [[...], ...]}`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn kmeans_seed(
    data_ptr: *const f64,
    n_rows: usize,
    n_cols: usize,
    k: usize,
    seed: u64,
    out_json: *mut Buf,
) -> c_int {
    if data_ptr.is_null() || out_json.is_null() {
        return ERR_INVALID_ARGS;
    }
    let run = || -> Result<(), c_int> {
        let data = unsafe { read_matrix(data_ptr, n_rows, n_cols)? };
        let dataset = VectorDataset::from_flat(data, n_rows, n_cols).map_err(|e| error_code(&e))?;
        let seeds = init_centroids_seeded(&dataset, k, seed).map_err(|e| error_code(&e))?;
        let s = json!({
            "indices": seeds.indices(),
            "centroids": seeds.centroids(),
        })
        .to_string();
        write_buf(out_json, s.into_bytes().into_boxed_slice());
        Ok(())
    };
    match catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(())) => OK,
        Ok(Err(code)) => code,
        Err(_) => ERR_PANIC,
    }
}

/// Lloyd refinement from caller-supplied centroids. Writes the final
/// `k * n_cols` centroids as native-endian f64 bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn kmeans_fit(
    data_ptr: *const f64,
    n_rows: usize,
    n_cols: usize,
    centroids_ptr: *const f64,
    k: usize,
    max_iter: usize,
    eps: f64,
    out_centroids: *mut Buf,
) -> c_int {
    if data_ptr.is_null() || centroids_ptr.is_null() || out_centroids.is_null() || k == 0 {
        return ERR_INVALID_ARGS;
    }
    let run = || -> Result<(), c_int> {
        let data = unsafe { read_matrix(data_ptr, n_rows, n_cols)? };
        let init = unsafe { read_matrix(centroids_ptr, k, n_cols)? };
        let dataset = VectorDataset::from_flat(data, n_rows, n_cols).map_err(|e| error_code(&e))?;
        let request = FitRequest {
            dataset: &dataset,
            centroids: init.chunks_exact(n_cols).map(|c| c.to_vec()).collect(),
            max_iter,
            eps,
        };
        let centroids = fit_centroids(&request, &Lloyd).map_err(|e| error_code(&e))?;
        let flat: Vec<f64> = centroids.into_iter().flatten().collect();
        write_buf(out_centroids, f64_slice_to_u8_box(&flat));
        Ok(())
    };
    match catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(())) => OK,
        Ok(Err(code)) => code,
        Err(_) => ERR_PANIC,
    }
}

/// Full pipeline. On success `out_text` holds the formatted output; on a
/// validation or fit failure it holds the user-facing message lines.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn kmeans_run(
    data_ptr: *const f64,
    n_rows: usize,
    n_cols: usize,
    options: *const CKmeansOptions,
    out_text: *mut Buf,
) -> c_int {
    if data_ptr.is_null() || options.is_null() || out_text.is_null() {
        return ERR_INVALID_ARGS;
    }
    let run = || -> Result<(), c_int> {
        let data = unsafe { read_matrix(data_ptr, n_rows, n_cols)? };
        let opts = build_options(options);
        let result = VectorDataset::from_flat(data, n_rows, n_cols)
            .and_then(|dataset| run_pipeline(&dataset, &opts));
        match result {
            Ok(out) => {
                write_buf(out_text, out.render().into_bytes().into_boxed_slice());
                Ok(())
            }
            Err(e) => {
                let mut msg = e.user_messages().join("\n");
                msg.push('\n');
                write_buf(out_text, msg.into_bytes().into_boxed_slice());
                Err(error_code(&e))
            }
        }
    };
    match catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(())) => OK,
        Ok(Err(code)) => code,
        Err(_) => ERR_PANIC,
    }
}

pub fn error_code(e: &KmeansError) -> c_int {
    match e {
        KmeansError::EmptyDataset
        | KmeansError::DimensionMismatch { .. }
        | KmeansError::InvalidArguments(_) => ERR_INVALID_ARGS,
        KmeansError::Validation(_) => ERR_VALIDATION,
        KmeansError::DegenerateDataset { .. } => ERR_DEGENERATE,
        KmeansError::FitFailed => ERR_FIT,
        KmeansError::InputUnreadable(_) => ERR_PARSE,
    }
}

unsafe fn read_matrix<'a>(p: *const f64, rows: usize, cols: usize) -> Result<&'a [f64], c_int> {
    let n = rows.checked_mul(cols).ok_or(ERR_INVALID_ARGS)?;
    if n == 0 {
        return Err(ERR_INVALID_ARGS);
    }
    Ok(unsafe { slice::from_raw_parts(p, n) })
}

fn f64_slice_to_u8_box(v: &[f64]) -> Box<[u8]> {
    let n = v.len() * 8;
    let mut out = Vec::<u8>::with_capacity(n);
    unsafe {
        out.set_len(n);
        ptr::copy_nonoverlapping(v.as_ptr() as *const u8, out.as_mut_ptr(), n);
    }
    out.into_boxed_slice()
}

#[inline]
fn non_negative_usize(raw: c_int) -> usize {
    if raw > 0 { raw as usize } else { 0 }
}

fn write_buf(out: *mut Buf, bytes: Box<[u8]>) {
    let len = bytes.len();
    let ptr_bytes = Box::into_raw(bytes) as *mut u8;
    unsafe {
        ptr::write_unaligned(
            out,
            Buf {
                ptr: ptr_bytes,
                len,
            },
        )
    };
}

fn build_options(options: *const CKmeansOptions) -> KmeansOptions {
    let o = unsafe { *options };
    KmeansOptions {
        k: non_negative_usize(o.k),
        // 0 selects the default bound; negatives map to 0 and fail validation
        max_iter: if o.max_iter == 0 {
            DEFAULT_ITER
        } else {
            non_negative_usize(o.max_iter)
        },
        eps: o.eps,
        seed: o.seed,
    }
}
