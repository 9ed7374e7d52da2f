//! End-to-end round trips through every catalog method.
//!
//! Each method saves an array, loads it back through [`TimedMethod`], and
//! must reproduce it exactly for every element type it supports.

use arrbench_core::{Array, Catalog, DType, Error, MethodKind, TimedMethod};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("arrbench_core=debug")
        .with_test_writer()
        .try_init();
}

fn path_for(dir: &Path, timed: &TimedMethod) -> PathBuf {
    dir.join(format!("{}.{}", timed.name(), timed.method().extension()))
}

fn random_array(dtype: DType, rows: usize, cols: usize, seed: u64) -> Array {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let len = rows * cols;
    match dtype {
        DType::Float64 => Array::new(rows, cols, (0..len).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect()),
        DType::Float32 => Array::new(rows, cols, (0..len).map(|_| rng.gen::<f32>() * 2.0 - 1.0).collect()),
        DType::Int64 => Array::new(rows, cols, (0..len).map(|_| rng.gen::<i64>()).collect()),
        DType::Int32 => Array::new(rows, cols, (0..len).map(|_| rng.gen::<i32>()).collect()),
        DType::UInt8 => Array::new(rows, cols, (0..len).map(|_| rng.gen::<u8>()).collect()),
    }
    .unwrap()
}

// =========================================================================
// Every method, every supported element type
// =========================================================================

#[test]
fn test_every_method_round_trips_supported_dtypes() {
    init_tracing();
    let dir = TempDir::new().unwrap();

    for (seed, dtype) in DType::ALL.into_iter().enumerate() {
        let array = random_array(dtype, 17, 5, seed as u64);

        for mut timed in Catalog::all().timed_methods() {
            if !timed.method().supports(dtype) {
                continue;
            }
            let path = path_for(dir.path(), &timed);

            let measurement = timed
                .round_trip(&array, &path)
                .unwrap_or_else(|e| panic!("{} failed on {dtype}: {e}", timed.name()));

            assert_eq!(measurement.method, timed.name());
            assert!(measurement.storage_space > 0, "{} wrote nothing", timed.name());
            assert!(!path.exists(), "{} left its file behind", timed.name());
        }
    }
}

#[test]
fn test_float64_is_supported_everywhere() {
    for method in Catalog::all().methods() {
        assert!(method.supports(DType::Float64), "{}", method.name());
    }
}

#[test]
fn test_unsupported_dtypes_are_refused() {
    let dir = TempDir::new().unwrap();
    let array = random_array(DType::UInt8, 3, 3, 7);

    for kind in [MethodKind::Csv, MethodKind::CsvGzip, MethodKind::Fortran] {
        let mut timed = TimedMethod::new(kind.build(6));
        let path = path_for(dir.path(), &timed);

        let err = timed.round_trip(&array, &path).unwrap_err();

        assert!(matches!(err, Error::UnsupportedElementType { dtype: DType::UInt8, .. }));
        assert!(!path.exists());
    }
}

#[test]
fn test_single_element_array() {
    let dir = TempDir::new().unwrap();
    let array = Array::new(1, 1, vec![42.0f64]).unwrap();

    for mut timed in Catalog::all().timed_methods() {
        let path = path_for(dir.path(), &timed);
        let checksum = {
            timed.time_save(&array, &path).unwrap();
            timed.time_load(&array, &path).unwrap()
        };
        assert!((checksum - 42.0).abs() < f64::EPSILON, "{}", timed.name());
    }
}

#[test]
fn test_wide_and_tall_shapes() {
    let dir = TempDir::new().unwrap();
    let shapes = [(1, 300), (300, 1)];

    for (rows, cols) in shapes {
        let array = random_array(DType::Float64, rows, cols, 99);
        for mut timed in Catalog::all().timed_methods() {
            let path = path_for(dir.path(), &timed);
            let measurement = timed.round_trip(&array, &path);
            assert!(measurement.is_ok(), "{} on {rows}x{cols}: {measurement:?}", timed.name());
        }
    }
}

#[test]
fn test_non_finite_floats_survive_binary_formats() {
    let dir = TempDir::new().unwrap();
    let array = Array::new(1, 3, vec![f64::INFINITY, f64::NEG_INFINITY, -0.0]).unwrap();
    let kinds = [
        MethodKind::Binary,
        MethodKind::BinaryGzip,
        MethodKind::Base64,
        MethodKind::Pickle,
        MethodKind::Npy,
        MethodKind::Npz,
        MethodKind::Png,
        MethodKind::Fortran,
        MethodKind::Mat,
    ];

    for kind in kinds {
        let mut timed = TimedMethod::new(kind.build(6));
        let path = path_for(dir.path(), &timed);
        timed.time_save(&array, &path).unwrap();

        let loaded = timed.method().load(&path).unwrap();

        assert_eq!(loaded, array, "{kind}");
    }
}

// =========================================================================
// Property-based round trips
// =========================================================================

mod proptest_tests {
    use super::*;

    fn shape_strategy() -> impl Strategy<Value = (usize, usize)> {
        (1usize..=8, 1usize..=8)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Property: every method reproduces any finite float64 array exactly.
        #[test]
        fn prop_float64_round_trip_is_exact(
            (rows, cols) in shape_strategy(),
            seed in any::<u64>(),
            scale in prop_oneof![Just(1.0f64), Just(1e-300), Just(1e300)],
        ) {
            let dir = TempDir::new().unwrap();
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let values: Vec<f64> = (0..rows * cols).map(|_| (rng.gen::<f64>() - 0.5) * scale).collect();
            let array = Array::new(rows, cols, values).unwrap();

            for mut timed in Catalog::all().timed_methods() {
                let path = path_for(dir.path(), &timed);
                let result = timed.round_trip(&array, &path);
                prop_assert!(result.is_ok(), "{} failed: {:?}", timed.name(), result);
            }
        }

        /// Property: integer arrays keep their element type through self-describing formats.
        #[test]
        fn prop_int32_keeps_dtype(
            (rows, cols) in shape_strategy(),
            values in proptest::collection::vec(any::<i32>(), 64),
        ) {
            let dir = TempDir::new().unwrap();
            let array = Array::new(rows, cols, values[..rows * cols].to_vec()).unwrap();

            for method in Catalog::all().methods() {
                if !method.supports(DType::Int32) {
                    continue;
                }
                let path = dir.path().join(format!("{}.{}", method.name(), method.extension()));
                method.save(&array, &path).unwrap();
                let loaded = method.load(&path).unwrap();
                prop_assert_eq!(loaded.dtype(), DType::Int32);
                prop_assert_eq!(loaded, array.clone());
            }
        }
    }
}
