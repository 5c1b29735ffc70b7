use ndarray::Array2;
use unmix::{
    amari_index, excess_kurtosis, max_abs_correlations, AlgorithmType, FastIca, IcaConfig,
    NonlinearityKind,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Three hidden signals, mixed into four observed channels, then unmixed with
    // both fixed-point schemes.
    let n = 500;
    let sources = Array2::from_shape_fn((n, 3), |(i, j)| {
        let t = i as f64 / 50.0;
        match j {
            0 => (2.0 * t).sin(),
            1 => (3.1 * t).sin().signum(),
            _ => ((1.7 * t) % 1.0) * 2.0 - 1.0,
        }
    });

    let mixing = [
        [1.0, 0.6, 0.2],
        [0.4, 1.0, -0.5],
        [-0.3, 0.2, 1.0],
        [0.5, -0.7, 0.3],
    ];
    let observed = Array2::from_shape_fn((n, 4), |(i, j)| {
        (0..3).map(|c| mixing[j][c] * sources[[i, c]]).sum::<f64>() + j as f64
    });

    for algorithm in [AlgorithmType::Deflation, AlgorithmType::Parallel] {
        let config = IcaConfig::new()
            .with_n_components(3)
            .with_algorithm(algorithm)
            .with_nonlinearity(NonlinearityKind::LogCosh)
            .with_seed(17);
        let model = FastIca::new(config).fit_array(observed.view())?;
        let recovered = model.transform(observed.view())?;

        // Unmixing times the true mixing should be close to a scaled permutation.
        let true_mixing = faer::Mat::from_fn(4, 3, |i, j| mixing[i][j]);
        let performance = model.unmixing() * true_mixing.as_ref();

        println!("{algorithm}:");
        println!(
            "  converged={} iterations={}",
            model.converged(),
            model.convergence().iter().map(|c| c.iterations).sum::<usize>()
        );
        println!(
            "  explained variance={:?}",
            model.explained_variance_ratio()
        );
        println!(
            "  best |corr| per source={:?}",
            max_abs_correlations(recovered.view(), sources.view())
        );
        println!("  amari index={:.4}", amari_index(performance.as_ref()));
        for (c, column) in recovered.columns().into_iter().enumerate() {
            println!(
                "  ic_{} excess kurtosis={:.3}",
                c + 1,
                excess_kurtosis(&column.to_vec())
            );
        }
    }

    Ok(())
}
