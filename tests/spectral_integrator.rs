use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use signal_lab::signal::{
    exponential, gaussian, rectangular, sinc, triangular, Gammatone,
};
use signal_lab::{
    band, fourier_transform, FourierIntegrator, Signal, SpectrumMode, TransformConfig,
};

#[test]
fn test_rectangular_dc_equals_duration() {
    for tau in [1e-3, 0.25, 1.0, 4.0] {
        let spectrum = fourier_transform(&rectangular, &[0.0], tau, 0.0, tau, SpectrumMode::Real).unwrap();
        assert_abs_diff_eq!(spectrum.values()[0], tau, epsilon = 1e-6);
    }
}

#[test]
fn test_rectangular_matches_sinc() {
    let tau = 0.5;
    let f_band = band::linear(0.0, 10.0, 21).unwrap();
    let spectrum = fourier_transform(&rectangular, &f_band, tau, 0.0, tau, SpectrumMode::Magnitude).unwrap();
    assert!(spectrum.is_complete());

    for (f, value) in f_band.iter().zip(spectrum.values()) {
        let expected = tau * sinc(f * tau).abs();
        assert_abs_diff_eq!(value, expected, epsilon = 1e-7);
    }
}

#[test]
fn test_rectangular_in_padded_window() {
    // Both pulse edges lie strictly inside [-tau, 2 tau]
    for tau in [1e-3, 0.25, 1.0] {
        let f_band: Vec<f64> = [0.0, 0.25, 0.5, 1.0, 1.5, 2.5].iter().map(|k| k / tau).collect();
        let spectrum =
            fourier_transform(&rectangular, &f_band, tau, -tau, 2.0 * tau, SpectrumMode::Magnitude)
                .unwrap();
        assert!(spectrum.is_complete(), "tau = {tau}: {:?}", spectrum.failures());

        for (f, value) in f_band.iter().zip(spectrum.values()) {
            let expected = tau * sinc(f * tau).abs();
            assert_abs_diff_eq!(value, expected, epsilon = 1e-7);
        }

        let dc = fourier_transform(&rectangular, &[0.0], tau, -tau, 2.0 * tau, SpectrumMode::Real)
            .unwrap()
            .strict()
            .unwrap();
        assert_abs_diff_eq!(dc[0], tau, epsilon = 1e-9);
    }
}

#[test]
fn test_triangular_is_real_sinc_squared() {
    let tau = 1.0;
    let f_band = [0.0, 0.25, 0.5, 1.0, 1.5];
    let integrator = FourierIntegrator::new();
    let re = integrator.transform(&triangular, &f_band, tau, -tau, tau, SpectrumMode::Real).unwrap();
    let im = integrator.transform(&triangular, &f_band, tau, -tau, tau, SpectrumMode::Imaginary).unwrap();

    for (i, f) in f_band.iter().enumerate() {
        let s = sinc(f * tau);
        assert_abs_diff_eq!(re.values()[i], tau * s * s, epsilon = 1e-7);
        assert_abs_diff_eq!(im.values()[i], 0.0, epsilon = 1e-7);
    }
}

#[test]
fn test_exponential_matches_lorentzian() {
    let tau = 0.2;
    let f_band = [0.0, 0.5, 1.0, 3.0];
    let spectrum = FourierIntegrator::new()
        .transform_complex(&exponential, &f_band, tau, 0.0, 40.0 * tau)
        .unwrap();
    assert!(spectrum.is_complete());

    for (f, x) in f_band.iter().zip(spectrum.values()) {
        let w = 2.0 * PI * f * tau;
        let denom = 1.0 + w * w;
        assert_abs_diff_eq!(x.re, tau / denom, epsilon = 1e-7);
        assert_abs_diff_eq!(x.im, -w * tau / denom, epsilon = 1e-7);
    }
}

#[test]
fn test_gammatone_peaks_at_center_frequency() {
    let tau = 0.25;
    let gammatone = Gammatone {
        order: 4,
        center_hz: 4.0,
    };
    let f_band = [2.0, 3.0, 4.0, 5.0, 6.0];
    let spectrum = fourier_transform(&gammatone, &f_band, tau, 0.0, 40.0 * tau, SpectrumMode::Magnitude).unwrap();
    assert!(spectrum.is_complete());

    let values = spectrum.values();
    let peak = values
        .iter()
        .enumerate()
        .max_by(|(_, x), (_, y)| x.total_cmp(y))
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(f_band[peak], 4.0);

    // Half of (n-1)! tau^n at the carrier
    assert_abs_diff_eq!(values[2], 3.0 * tau.powi(4), epsilon = 1e-5);
}

#[test]
fn test_magnitude_consistent_with_components() {
    let tau = 0.3;
    let f_band = band::linear(0.0, 6.0, 13).unwrap();
    let signal = |t: f64, tau: f64| exponential(t, tau) * (1.0 + t);
    let integrator = FourierIntegrator::new();

    let abs = integrator.transform(&signal, &f_band, tau, 0.0, 5.0, SpectrumMode::Magnitude).unwrap();
    let re = integrator.transform(&signal, &f_band, tau, 0.0, 5.0, SpectrumMode::Real).unwrap();
    let im = integrator.transform(&signal, &f_band, tau, 0.0, 5.0, SpectrumMode::Imaginary).unwrap();

    for i in 0..f_band.len() {
        let combined = re.values()[i].hypot(im.values()[i]);
        assert_abs_diff_eq!(abs.values()[i], combined, epsilon = 1e-12);
    }
}

#[test]
fn test_linearity() {
    let (a, b) = (2.5, -0.75);
    let tau = 1.0;
    let f_band = [0.0, 0.2, 0.9, 1.7];
    let mix = triangular.scaled(a).plus(gaussian.scaled(b));
    let integrator = FourierIntegrator::new();

    let x_mix = integrator.transform_complex(&mix, &f_band, tau, -2.0, 2.0).unwrap();
    let x_tri = integrator.transform_complex(&triangular, &f_band, tau, -2.0, 2.0).unwrap();
    let x_gauss = integrator.transform_complex(&gaussian, &f_band, tau, -2.0, 2.0).unwrap();

    for i in 0..f_band.len() {
        let expected = x_tri.values()[i] * a + x_gauss.values()[i] * b;
        assert_abs_diff_eq!(x_mix.values()[i].re, expected.re, epsilon = 1e-6);
        assert_abs_diff_eq!(x_mix.values()[i].im, expected.im, epsilon = 1e-6);
    }
}

#[test]
fn test_sequential_config() {
    let integrator = FourierIntegrator::with_config(TransformConfig {
        parallel: false,
        ..Default::default()
    });
    let f_band = band::symmetric(2.0, 9).unwrap();
    let spectrum = integrator
        .transform(&gaussian, &f_band, 1.0, -6.0, 6.0, SpectrumMode::Magnitude)
        .unwrap();

    // Real, even signal: symmetric magnitude
    let values = spectrum.values();
    for i in 0..values.len() / 2 {
        assert_abs_diff_eq!(values[i], values[values.len() - 1 - i], epsilon = 1e-9);
    }
}

#[test]
fn test_unknown_mode_rejected() {
    assert!("phase".parse::<SpectrumMode>().is_err());
    assert!("".parse::<SpectrumMode>().is_err());
    assert!("ABS".parse::<SpectrumMode>().is_err());
}

// Output order follows the band order for any permutation
proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_output_follows_band_order(
        shuffled in Just((0..12).map(|i| i as f64 * 0.45).collect::<Vec<f64>>()).prop_shuffle()
    ) {
        let sorted: Vec<f64> = (0..12).map(|i| i as f64 * 0.45).collect();
        let reference = fourier_transform(&gaussian, &sorted, 1.0, -5.0, 5.0, SpectrumMode::Real).unwrap();
        let permuted = fourier_transform(&gaussian, &shuffled, 1.0, -5.0, 5.0, SpectrumMode::Real).unwrap();

        prop_assert_eq!(permuted.frequencies(), shuffled.clone());
        for (i, f) in shuffled.iter().enumerate() {
            let j = sorted.iter().position(|g| g == f).unwrap();
            prop_assert_eq!(permuted.values()[i], reference.values()[j]);
        }
    }
}
