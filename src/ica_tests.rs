#[cfg(test)]
mod tests {
    use crate::ica::{
        center, initial_weights, AlgorithmType, DeflationSolver, FastIca, FixedPointSolver,
        IcaConfig, NonlinearityKind, SymmetricSolver, Whitener,
    };
    use crate::metrics::max_abs_correlations;
    use crate::{Attribute, CancellationToken, Error, ExampleTable};
    use faer::{Mat, MatRef};
    use ndarray::{Array2, Axis};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Two independent sub-Gaussian sources (square wave, sawtooth), `samples × 2`.
    fn two_sources(n: usize) -> Array2<f64> {
        Array2::from_shape_fn((n, 2), |(i, j)| {
            let t = i as f64;
            if j == 0 {
                (t * 0.29).sin().signum()
            } else {
                ((t * 0.137) % 1.0) * 2.0 - 1.0
            }
        })
    }

    /// Mix two sources into three observed, offset columns.
    fn mix_into_three(sources: &Array2<f64>) -> Array2<f64> {
        let mixing = [[1.0, 0.5], [0.3, 1.0], [0.8, -0.6]];
        let offsets = [2.0, -1.0, 0.5];
        Array2::from_shape_fn((sources.nrows(), 3), |(i, j)| {
            mixing[j][0] * sources[[i, 0]] + mixing[j][1] * sources[[i, 1]] + offsets[j]
        })
    }

    fn random_full_rank(n: usize, m: usize, seed: u64) -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let sources: Array2<f64> = Array2::from_shape_fn((n, m), |_| rng.random_range(-1.0..1.0));
        let mixing: Array2<f64> = Array2::from_shape_fn((m, m), |(i, j)| {
            if i == j {
                2.0
            } else {
                rng.random_range(-0.5..0.5)
            }
        });
        sources.dot(&mixing.t())
    }

    fn frobenius_distance(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    fn assert_unit_rows(m: MatRef<'_, f64>) {
        for i in 0..m.nrows() {
            let norm: f64 = (0..m.ncols()).map(|j| m[(i, j)].powi(2)).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9, "row {i} norm {norm}");
        }
    }

    #[test]
    fn test_two_sources_recovered_by_deflation() {
        let sources = two_sources(100);
        let observed = mix_into_three(&sources);
        let config = IcaConfig::new()
            .with_n_components(2)
            .with_algorithm(AlgorithmType::Deflation)
            .with_nonlinearity(NonlinearityKind::LogCosh)
            .with_alpha(1.0)
            .with_max_iterations(200)
            .with_tolerance(1e-4)
            .with_seed(42);

        let model = FastIca::new(config).fit_array(observed.view()).unwrap();

        assert!(model.converged());
        for c in model.convergence() {
            assert!(c.iterations < 200, "took {} iterations", c.iterations);
        }

        let recovered = model.transform(observed.view()).unwrap();
        for (k, corr) in max_abs_correlations(recovered.view(), sources.view())
            .iter()
            .enumerate()
        {
            assert!(*corr > 0.9, "source {k} best |corr| = {corr}");
        }
    }

    #[test]
    fn test_zero_iterations_commits_initial_estimate() {
        let observed = mix_into_three(&two_sources(100));
        let config = IcaConfig::new()
            .with_n_components(2)
            .with_max_iterations(0)
            .with_seed(5);

        let model = FastIca::new(config.clone())
            .fit_array(observed.view())
            .unwrap();
        assert!(model.convergence().iter().all(|c| c.iterations == 0));
        assert!(!model.converged());

        // Rebuild the same pipeline by hand.
        let (centered, _) = center(observed.view()).unwrap();
        let whitening = Whitener::new(2).whiten(centered.view()).unwrap();
        let initial = initial_weights(2, &mut StdRng::seed_from_u64(5));
        let estimate = DeflationSolver::new(config.fixed_point_params())
            .solve(whitening.data(), initial.as_ref(), &CancellationToken::new())
            .unwrap();
        assert_unit_rows(estimate.matrix.as_ref());

        let expected = estimate.matrix.as_ref() * whitening.matrix();
        let actual = model.unmixing();
        for i in 0..2 {
            for j in 0..3 {
                assert!((expected[(i, j)] - actual[(i, j)]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_constant_column_fails_whitening() {
        let mut observed = mix_into_three(&two_sources(50));
        observed.column_mut(2).fill(1.25);

        let err = FastIca::new(IcaConfig::new().with_seed(1))
            .fit_array(observed.view())
            .unwrap_err();
        assert!(err.is_numerical());
        assert!(matches!(
            err,
            Error::NumericalInstability {
                stage: "whitening",
                ..
            }
        ));
    }

    #[test]
    fn test_constant_column_fails_whitening_with_fewer_components() {
        let mut observed = mix_into_three(&two_sources(100));
        observed.column_mut(2).fill(1.25);

        let err = FastIca::new(IcaConfig::new().with_n_components(2).with_seed(1))
            .fit_array(observed.view())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::NumericalInstability {
                stage: "whitening",
                ..
            }
        ));
    }

    #[test]
    fn test_same_seed_same_model() {
        let observed = random_full_rank(80, 3, 9);
        for algorithm in [AlgorithmType::Deflation, AlgorithmType::Parallel] {
            let ica = FastIca::new(
                IcaConfig::new()
                    .with_algorithm(algorithm)
                    .with_max_iterations(50)
                    .with_seed(1234),
            );
            let a = ica.fit_array(observed.view()).unwrap();
            let b = ica.fit_array(observed.view()).unwrap();
            assert_eq!(a.unmixing().to_owned(), b.unmixing().to_owned());
            assert_eq!(a.mixing().to_owned(), b.mixing().to_owned());
            assert_eq!(a.convergence(), b.convergence());
        }
    }

    #[test]
    fn test_reconstruction_improves_with_components() {
        let observed = random_full_rank(120, 4, 77);
        let scale = frobenius_distance(&observed, &Array2::zeros(observed.dim()));

        let mut previous = f64::INFINITY;
        for k in 1..=4 {
            let model = FastIca::new(
                IcaConfig::new()
                    .with_n_components(k)
                    .with_max_iterations(100)
                    .with_seed(3),
            )
            .fit_array(observed.view())
            .unwrap();
            let scores = model.transform(observed.view()).unwrap();
            let back = model.inverse_transform(scores.view()).unwrap();
            let error = frobenius_distance(&observed, &back);

            assert!(error <= previous + 1e-9 * scale, "k={k}: {error} > {previous}");
            previous = error;
        }
        assert!(previous < 1e-8 * scale, "full reconstruction error {previous}");
    }

    #[test]
    fn test_full_rank_reconstruction_with_parallel_scheme() {
        let observed = random_full_rank(90, 3, 21);
        let model = FastIca::new(
            IcaConfig::new()
                .with_algorithm(AlgorithmType::Parallel)
                .with_nonlinearity(NonlinearityKind::Exp)
                .with_max_iterations(40)
                .with_seed(8),
        )
        .fit_array(observed.view())
        .unwrap();

        let scores = model.transform(observed.view()).unwrap();
        let back = model.inverse_transform(scores.view()).unwrap();
        let scale = frobenius_distance(&observed, &Array2::zeros(observed.dim()));
        assert!(frobenius_distance(&observed, &back) < 1e-8 * scale);
    }

    #[test]
    fn test_whitening_through_model_has_unit_covariance() {
        let observed = random_full_rank(100, 3, 4);
        let model = FastIca::new(IcaConfig::new().with_seed(2))
            .fit_array(observed.view())
            .unwrap();
        let z = model.whiten(observed.view()).unwrap();
        let cov = z.t().dot(&z) / z.nrows() as f64;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((cov[[i, j]] - expected).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn test_table_fit_rejects_nominal_columns() {
        let values = mix_into_three(&two_sources(30));
        let table = ExampleTable::new(
            vec![
                Attribute::numeric("a"),
                Attribute::nominal("b"),
                Attribute::numeric("c"),
            ],
            values,
        )
        .unwrap();
        let err = FastIca::default().fit(&table).unwrap_err();
        assert_eq!(
            err,
            Error::NonNumericAttribute {
                name: "b".to_string()
            }
        );
    }

    #[test]
    fn test_table_fit_and_apply() {
        let values = random_full_rank(60, 3, 13);
        let table = ExampleTable::from_numeric(["x", "y", "z"], values).unwrap();
        let model = FastIca::new(IcaConfig::new().with_n_components(9).with_seed(6))
            .fit(&table)
            .unwrap();

        assert_eq!(model.n_components(), 3);
        assert_eq!(
            model.attribute_names().unwrap(),
            &["x".to_string(), "y".to_string(), "z".to_string()]
        );
        let out = model.apply(&table).unwrap();
        assert_eq!(out.attribute_names(), vec!["ic_1", "ic_2", "ic_3"]);
        assert_eq!(out.n_samples(), 60);
        // Input is left untouched.
        assert_eq!(table.n_attributes(), 3);
    }

    #[test]
    fn test_row_norm_model_applies_same_scaling() {
        let observed = random_full_rank(70, 3, 31);
        let model = FastIca::new(IcaConfig::new().with_row_norm(true).with_seed(2))
            .fit_array(observed.view())
            .unwrap();
        assert!(model.row_norm());
        let scores = model.transform(observed.view()).unwrap();
        assert!(scores.iter().all(|v| v.is_finite()));
        assert_eq!(scores.dim(), (70, 3));
    }

    proptest! {
        #[test]
        fn whitening_gives_identity_covariance(
            seed in 0u64..1000,
            n in 15usize..60,
            m in 2usize..5,
        ) {
            let observed = random_full_rank(n, m, seed);
            let (centered, _) = center(observed.view()).unwrap();
            let whitening = Whitener::new(m).whiten(centered.view());
            prop_assert!(whitening.is_ok(), "{:?}", whitening.as_ref().err());
            let whitening = whitening.unwrap();

            let x = Mat::from_fn(m, n, |i, j| centered[[j, i]]);
            let cov = Mat::from_fn(m, m, |i, j| {
                (0..n).map(|t| x[(i, t)] * x[(j, t)]).sum::<f64>() / n as f64
            });
            let k = whitening.matrix();
            let product = k * cov.as_ref() * k.transpose();
            for i in 0..m {
                for j in 0..m {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    prop_assert!((product[(i, j)] - expected).abs() < 1e-6);
                }
            }
        }

        #[test]
        fn solver_rows_stay_unit_norm(
            seed in 0u64..1000,
            n in 20usize..60,
            m in 2usize..5,
            max_iterations in 0usize..30,
            parallel in any::<bool>(),
        ) {
            let observed = random_full_rank(n, m, seed);
            let (centered, _) = center(observed.view()).unwrap();
            let whitening = Whitener::new(m).whiten(centered.view());
            prop_assert!(whitening.is_ok(), "{:?}", whitening.as_ref().err());
            let whitening = whitening.unwrap();

            let params = IcaConfig::new()
                .with_max_iterations(max_iterations)
                .fixed_point_params();
            let initial = initial_weights(m, &mut StdRng::seed_from_u64(seed));
            let cancel = CancellationToken::new();
            let estimate = if parallel {
                SymmetricSolver::new(params).solve(whitening.data(), initial.as_ref(), &cancel)
            } else {
                DeflationSolver::new(params).solve(whitening.data(), initial.as_ref(), &cancel)
            };
            prop_assert!(estimate.is_ok(), "{:?}", estimate.as_ref().err());
            let w = estimate.unwrap().matrix;

            for i in 0..m {
                let norm: f64 = (0..m).map(|j| w[(i, j)].powi(2)).sum::<f64>().sqrt();
                prop_assert!((norm - 1.0).abs() < 1e-9);
                if !parallel {
                    for u in 0..i {
                        let d: f64 = (0..m).map(|j| w[(i, j)] * w[(u, j)]).sum();
                        prop_assert!(d.abs() < 1e-9);
                    }
                }
            }
        }

        #[test]
        fn centering_twice_changes_nothing(
            seed in 0u64..1000,
            n in 2usize..30,
            m in 1usize..5,
        ) {
            let observed = random_full_rank(n, m, seed);
            let (once, _) = center(observed.view()).unwrap();
            let (twice, means) = center(once.view()).unwrap();
            prop_assert!(means.iter().all(|v| v.abs() < 1e-12));
            let diff = (&once - &twice).mapv(f64::abs).sum_axis(Axis(0));
            prop_assert!(diff.iter().all(|v| *v < 1e-10));
        }
    }
}
