mod support;

use approx::assert_abs_diff_eq;
use num_complex::Complex64;
use strided_fft::{Axis, Fft2, Fft2Par, Fft3, Fft3Par, FftError, SeparableFft};
use support::{init_tracing, random_complex};

fn assert_all_close(a: &[Complex64], b: &[Complex64]) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b) {
        assert_abs_diff_eq!(x.re, y.re, epsilon = 1e-9);
        assert_abs_diff_eq!(x.im, y.im, epsilon = 1e-9);
    }
}

#[test]
fn test_2d_parallel_equals_serial() {
    init_tracing();
    let (nr, nc) = (16, 24);
    let input = random_complex(nr * nc, 42);
    let mut expected = input.clone();
    let mut serial = Fft2::<f64>::new(nr, nc).unwrap();
    serial.fft(&mut expected).unwrap();

    for workers in [2, 4, 8] {
        let mut engine = Fft2Par::<f64>::new(nr, nc, workers).unwrap();
        assert_eq!(engine.workers(), workers);
        let mut buf = input.clone();
        engine.fft(&mut buf).unwrap();
        assert_all_close(&buf, &expected);
    }
}

#[test]
fn test_3d_parallel_equals_serial() {
    init_tracing();
    let (nr, nc, nd) = (8, 16, 5);
    let input = random_complex(nr * nc * nd, 7);
    let mut expected = input.clone();
    Fft3::<f64>::new(nr, nc, nd)
        .unwrap()
        .fft(&mut expected)
        .unwrap();

    for workers in [2, 4, 8] {
        let mut buf = input.clone();
        Fft3Par::<f64>::new(nr, nc, nd, workers)
            .unwrap()
            .fft(&mut buf)
            .unwrap();
        assert_all_close(&buf, &expected);
    }
}

#[test]
fn test_inverse_parallel_equals_serial() {
    let (nr, nc, nd) = (4, 8, 6);
    let input = random_complex(nr * nc * nd, 13);
    let mut expected = input.clone();
    Fft3::<f64>::new(nr, nc, nd)
        .unwrap()
        .ifft(&mut expected)
        .unwrap();
    let mut buf = input.clone();
    Fft3Par::<f64>::new(nr, nc, nd, 4)
        .unwrap()
        .ifft(&mut buf)
        .unwrap();
    assert_all_close(&buf, &expected);
}

#[test]
fn test_engine_reused_across_buffers() {
    let (nr, nc) = (8, 8);
    let mut engine = Fft2Par::<f64>::new(nr, nc, 4).unwrap();
    let mut serial = Fft2::<f64>::new(nr, nc).unwrap();
    for seed in 0..3 {
        let input = random_complex(nr * nc, seed);
        let mut a = input.clone();
        let mut b = input.clone();
        engine.fft(&mut a).unwrap();
        serial.fft(&mut b).unwrap();
        assert_all_close(&a, &b);

        engine.ifft(&mut a).unwrap();
        let scaled: Vec<Complex64> = input.iter().map(|x| x * (nr * nc) as f64).collect();
        assert_all_close(&a, &scaled);
    }
}

#[test]
fn test_uneven_partition_fails_at_construction() {
    assert_eq!(
        Fft2Par::<f64>::new(3, 4, 2).err(),
        Some(FftError::InvalidPartition {
            axis: Axis::Row,
            len: 3,
            workers: 2
        })
    );
    assert_eq!(
        Fft3Par::<f64>::new(4, 6, 3, 4).err(),
        Some(FftError::InvalidPartition {
            axis: Axis::Column,
            len: 6,
            workers: 4
        })
    );
    assert!(matches!(
        Fft2Par::<f64>::new(4, 4, 0),
        Err(FftError::InvalidShape(_))
    ));
}

#[test]
fn test_freq_matches_serial() {
    let par = Fft3Par::<f64>::new(4, 4, 3, 2).unwrap();
    let serial = Fft3::<f64>::new(4, 4, 3).unwrap();
    for i in 0..par.len() {
        assert_eq!(par.freq(i).unwrap(), serial.freq(i).unwrap());
    }
}

#[test]
fn test_single_worker_is_serial() {
    let input = random_complex(30, 1);
    let mut a = input.clone();
    let mut b = input;
    Fft2Par::<f64>::new(5, 6, 1).unwrap().fft(&mut a).unwrap();
    Fft2::<f64>::new(5, 6).unwrap().fft(&mut b).unwrap();
    assert_all_close(&a, &b);
}
