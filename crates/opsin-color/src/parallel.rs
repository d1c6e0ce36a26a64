//! Row/stripe fan-out over an optional thread pool
//!
//! Partitions the rows of an output image into disjoint units and runs
//! a per-unit closure, either on a rayon pool or sequentially on the
//! calling thread when no pool is supplied. Units never overlap: each
//! worker receives its own mutable row chunks via `par_chunks_mut`, so
//! disjointness is enforced by construction rather than by locking.
//! The closure is identical on both paths, and the calling thread
//! blocks until every unit has completed, so the same inputs produce
//! bit-identical outputs with or without a pool.

use opsin_core::Image3F;
use rayon::prelude::*;
use rayon::ThreadPool;

/// Runs `task` once per chunk of `rows_per_chunk` consecutive rows of
/// `out` (the final chunk may be shorter). The closure receives the
/// starting row index and full-stride mutable slices of all three
/// planes for its rows. Read-only captures (input images, constant
/// tables) are shared across units; nothing mutable is.
pub fn for_each_row_chunk<F>(
    pool: Option<&ThreadPool>,
    out: &mut Image3F,
    rows_per_chunk: usize,
    task: F,
) where
    F: Fn(usize, [&mut [f32]; 3]) + Send + Sync,
{
    debug_assert!(rows_per_chunk > 0);
    if out.is_empty() {
        return;
    }
    let chunk_len = rows_per_chunk * out.stride();
    let [p0, p1, p2] = out.planes_data_mut();

    match pool {
        Some(pool) => pool.install(|| {
            p0.par_chunks_mut(chunk_len)
                .zip_eq(p1.par_chunks_mut(chunk_len))
                .zip_eq(p2.par_chunks_mut(chunk_len))
                .enumerate()
                .for_each(|(i, ((c0, c1), c2))| task(i * rows_per_chunk, [c0, c1, c2]));
        }),
        None => {
            for (i, ((c0, c1), c2)) in p0
                .chunks_mut(chunk_len)
                .zip(p1.chunks_mut(chunk_len))
                .zip(p2.chunks_mut(chunk_len))
                .enumerate()
            {
                task(i * rows_per_chunk, [c0, c1, c2]);
            }
        }
    }
}

/// Row-parallel fan-out writing two images at once: per row, the
/// closure receives mutable row slices of `a` and `b`. Used by the
/// fused sRGB path, where one worker linearizes a row into scratch
/// storage and immediately transforms it.
pub fn for_each_row_pair<F>(pool: Option<&ThreadPool>, a: &mut Image3F, b: &mut Image3F, task: F)
where
    F: Fn(usize, [&mut [f32]; 3], [&mut [f32]; 3]) + Send + Sync,
{
    assert_eq!(a.ysize(), b.ysize());
    if a.is_empty() {
        return;
    }
    let (sa, sb) = (a.stride(), b.stride());
    let [a0, a1, a2] = a.planes_data_mut();
    let [b0, b1, b2] = b.planes_data_mut();

    match pool {
        Some(pool) => pool.install(|| {
            a0.par_chunks_mut(sa)
                .zip_eq(a1.par_chunks_mut(sa))
                .zip_eq(a2.par_chunks_mut(sa))
                .zip_eq(b0.par_chunks_mut(sb))
                .zip_eq(b1.par_chunks_mut(sb))
                .zip_eq(b2.par_chunks_mut(sb))
                .enumerate()
                .for_each(|(y, (((((ra0, ra1), ra2), rb0), rb1), rb2))| {
                    task(y, [ra0, ra1, ra2], [rb0, rb1, rb2]);
                });
        }),
        None => {
            for (y, (((((ra0, ra1), ra2), rb0), rb1), rb2)) in a0
                .chunks_mut(sa)
                .zip(a1.chunks_mut(sa))
                .zip(a2.chunks_mut(sa))
                .zip(b0.chunks_mut(sb))
                .zip(b1.chunks_mut(sb))
                .zip(b2.chunks_mut(sb))
                .enumerate()
            {
                task(y, [ra0, ra1, ra2], [rb0, rb1, rb2]);
            }
        }
    }
}
