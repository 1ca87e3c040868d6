use ndarray::Array2;
use tadcaller::{tadbit, Speed, TadbitConfig};

fn config(speed: Speed) -> TadbitConfig {
    TadbitConfig {
        n_threads: 1,
        verbose: false,
        speed,
    }
}

/// Seed scenario 1: identity-like matrix, no removal, `speed = 0` disables
/// the pre-screen, every candidate cell gets computed, and with no real
/// block structure the optimiser should not find any break worth its
/// penalty.
#[test]
fn seed_1_identity_like_matrix_no_breaks() {
    let n = 8;
    let obs = Array2::from_shape_fn((n, n), |(i, j)| if i == j { 10.0 } else { 1.0 });

    let out = tadbit(&[obs], config(Speed::Off)).unwrap();

    assert_eq!(out.maxbreaks, n / 4);
    for i in 0..n {
        for j in 0..n {
            if j >= i + 3 {
                assert!(out.llikmat[[i, j]].is_finite(), "({i},{j}) should be computed");
            } else {
                assert!(out.llikmat[[i, j]].is_nan());
            }
        }
    }
    assert_eq!(out.nbreaks_opt, 0);
}

/// Seed scenario 2: as (1), but one diagonal entry is near zero and that
/// row/column is removed from every output.
#[test]
fn seed_2_low_diagonal_entry_is_removed() {
    let n = 8;
    let mut obs = Array2::from_shape_fn((n, n), |(i, j)| if i == j { 10.0 } else { 1.0 });
    obs[[3, 3]] = 0.5;

    let out = tadbit(&[obs], config(Speed::Off)).unwrap();

    assert_eq!(out.maxbreaks, (n - 1) / 4);
    for j in 0..n {
        assert!(out.llikmat[[3, j]].is_nan());
        assert!(out.llikmat[[j, 3]].is_nan());
    }
    for k in 0..out.maxbreaks {
        assert_eq!(out.bkpts[[3, k]], 0);
    }
}

/// Seed scenario 3: two blocks of 5 with strong within-block counts and
/// weak between-block counts. The optimiser should find exactly one break,
/// at the boundary between the two blocks.
#[test]
fn seed_3_block_diagonal_structure_finds_one_break() {
    let n = 10;
    let obs = Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            10.0
        } else if (i < 5) == (j < 5) {
            10.0
        } else {
            1.0
        }
    });

    let out = tadbit(&[obs], config(Speed::Off)).unwrap();

    assert_eq!(out.nbreaks_opt, 1);
    assert_eq!(out.bkpts[[4, 1]], 1);
    let total_flags: u32 = (0..n).map(|i| out.bkpts[[i, 1]] as u32).sum();
    assert_eq!(total_flags, 1);
}

/// Seed scenario 4: two replicates of the same block-diagonal structure,
/// scaled differently. The break count is unchanged and the combined
/// `mllik[1]` is the sum of the per-replicate contributions.
#[test]
fn seed_4_two_replicates_sum_their_log_likelihoods() {
    let n = 10;
    let base = Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            10.0
        } else if (i < 5) == (j < 5) {
            10.0
        } else {
            1.0
        }
    });
    let scaled = base.mapv(|v| v * 2.0);

    let out_single_a = tadbit(&[base.clone()], config(Speed::Off)).unwrap();
    let out_single_b = tadbit(&[scaled.clone()], config(Speed::Off)).unwrap();
    let out_combined = tadbit(&[base, scaled], config(Speed::Off)).unwrap();

    assert_eq!(out_combined.nbreaks_opt, 1);
    assert!(
        (out_combined.mllik[1] - (out_single_a.mllik[1] + out_single_b.mllik[1])).abs() < 1e-6
    );
}

/// Seed scenario 5: with `speed = 5`, spans larger than `n/8` are skipped
/// and the corresponding cells of `L` stay `NaN`.
#[test]
fn seed_5_fastest_speed_skips_large_spans() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let n = 20;
    let mut rng = StdRng::seed_from_u64(42);
    let mut obs = Array2::from_shape_fn((n, n), |_| rng.gen_range(1.0..20.0));
    // Symmetrize and keep diagonals healthy.
    for i in 0..n {
        for j in (i + 1)..n {
            let v = obs[[i, j]];
            obs[[j, i]] = v;
        }
        obs[[i, i]] = 10.0 + rng.gen_range(0.0..5.0);
    }

    let out = tadbit(&[obs], config(Speed::Fastest)).unwrap();

    let mut found_skipped_large_span = false;
    for i in 0..n {
        for j in 0..n {
            if j >= i + 3 && j - i > n / 8 {
                assert!(out.llikmat[[i, j]].is_nan());
                found_skipped_large_span = true;
            }
        }
    }
    assert!(found_skipped_large_span);
}

/// Seed scenario 6: thread count must not affect the result.
#[test]
fn seed_6_thread_count_is_deterministic() {
    let n = 16;
    let obs = Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            10.0
        } else {
            1.0 + ((i * 5 + j * 3) % 6) as f64
        }
    });

    let out1 = tadbit(&[obs.clone()], config(Speed::Off)).unwrap();
    let cfg8 = TadbitConfig {
        n_threads: 8,
        verbose: false,
        speed: Speed::Off,
    };
    let out8 = tadbit(&[obs], cfg8).unwrap();

    assert_eq!(out1.nbreaks_opt, out8.nbreaks_opt);
    for i in 0..n {
        for j in 0..n {
            let a = out1.llikmat[[i, j]];
            let b = out8.llikmat[[i, j]];
            assert!((a.is_nan() && b.is_nan()) || (a - b).abs() < 1e-9);
        }
    }
}

#[test]
fn degenerate_input_below_four_after_removal() {
    let n = 4;
    let mut obs = Array2::from_shape_fn((n, n), |(i, j)| if i == j { 10.0 } else { 1.0 });
    obs[[0, 0]] = 0.0;
    obs[[1, 1]] = 0.0;

    let out = tadbit(&[obs], config(Speed::Off)).unwrap();
    assert_eq!(out.maxbreaks, 0);
    assert_eq!(out.nbreaks_opt, 0);
    assert_eq!(out.mllik.len(), 0);
    assert_eq!(out.bkpts.shape(), &[n, 0]);
}
