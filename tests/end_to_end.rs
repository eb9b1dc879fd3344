//! End-to-end tests through the public API with seeded synthetic data.

use robust_fit::config::FitConfig;
use robust_fit::data::{SampleSpec, generate_sample};
use robust_fit::domain::LossKind;
use robust_fit::error::FitError;
use robust_fit::fit::{IrlsFitter, MeritObjective, Rout, ns_tau_grid, robust_fit};
use robust_fit::models::{Model, NelsonSiegel, NsKind, Polynomial};
use robust_fit::stats::rsdr;

#[test]
fn rsdr_of_one_to_ten_is_seven() {
    let residuals: Vec<f64> = (1..=10).map(f64::from).collect();
    assert_eq!(rsdr(&residuals, 0).unwrap(), 7.0);
    assert_eq!(rsdr(&[], 0).unwrap_err(), FitError::EmptyResidualSet);
}

#[test]
fn rout_recovers_injected_outliers_on_a_line() {
    let truth = [2.0, -0.75];
    let spec = SampleSpec {
        n: 80,
        outlier_prob: 0.1,
        outlier_k: 50.0,
        seed: 2024,
        ..SampleSpec::default()
    };
    let data = generate_sample(&Polynomial::line(), &truth, &spec).unwrap();

    let config = FitConfig::default();
    let report = Rout::from_config(&config)
        .run(
            &Polynomial::line(),
            &data.points,
            &IrlsFitter::from_config(&config, LossKind::Lorentzian),
            &IrlsFitter::from_config(&config, LossKind::SquaredError),
        )
        .unwrap();

    assert_eq!(report.outlier_indices(), data.outliers);
    assert_eq!(report.cleaned.n, spec.n - data.outliers.len());
    assert!((report.robust.params[1] - truth[1]).abs() < 0.02, "{:?}", report.robust.params);
    assert!((report.cleaned.params[0] - truth[0]).abs() < 0.1, "{:?}", report.cleaned.params);
    assert!((report.cleaned.params[1] - truth[1]).abs() < 0.02, "{:?}", report.cleaned.params);

    // RSDR sits near the injected noise level once outliers are ignored.
    assert!(report.robust.rsdr > 0.5 * spec.noise_sd && report.robust.rsdr < 2.0 * spec.noise_sd);
}

#[test]
fn nelson_siegel_fit_tracks_the_true_curve() {
    let model = NelsonSiegel::new(NsKind::Ns);
    let truth = [3.0, -2.0, 1.0, 1.5];
    let spec = SampleSpec {
        n: 120,
        x_min: 0.1,
        x_max: 10.0,
        noise_sd: 0.02,
        outlier_prob: 0.05,
        outlier_k: 30.0,
        seed: 11,
    };
    let data = generate_sample(&model, &truth, &spec).unwrap();

    let grid = ns_tau_grid(NsKind::Ns, 0.2, 10.0, 25, 1.0).unwrap();
    let fitter = IrlsFitter::new(LossKind::Lorentzian).with_nonlinear_grid(grid);
    let report = robust_fit(&model, &data.points, &fitter).unwrap();

    assert_eq!(report.k, 4);
    for x in [0.5, 1.0, 2.0, 5.0, 9.0] {
        let fitted = model.evaluate(x, &report.params).unwrap();
        let expected = model.evaluate(x, &truth).unwrap();
        assert!((fitted - expected).abs() < 0.05, "x={x}: {fitted} vs {expected}");
    }

    let objective = MeritObjective::new(&model, &data.points);
    assert_eq!(objective.value(&report.params).unwrap(), report.merit);
}

#[test]
fn too_few_points_for_the_model() {
    let data = generate_sample(
        &Polynomial::new(3),
        &[1.0, 0.0, 0.0, 1.0],
        &SampleSpec { n: 4, ..SampleSpec::default() },
    )
    .unwrap();
    let err = robust_fit(&Polynomial::new(3), &data.points, &IrlsFitter::new(LossKind::Lorentzian))
        .unwrap_err();
    assert_eq!(err, FitError::DegenerateDegreesOfFreedom { n: 4, k: 4 });
}
