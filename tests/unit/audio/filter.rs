use super::*;

#[test]
fn impulse_response_is_the_taps() {
    let taps = [0.5, -0.25, 0.125];
    let mut x = vec![0.0; 6];
    x[0] = 1.0;
    assert_eq!(lfilter(&taps, &x), vec![0.5, -0.25, 0.125, 0.0, 0.0, 0.0]);
}

#[test]
fn causal_filter_starts_from_rest() {
    let taps = [1.0, 1.0, 1.0];
    let y = lfilter(&taps, &[1.0, 1.0, 1.0, 1.0]);
    assert_eq!(y, vec![1.0, 2.0, 3.0, 3.0]);
}

#[test]
fn long_inputs_span_several_chunks() {
    let taps = [0.25, 0.5, 0.25];
    let x: Vec<f64> = (0..(FILTER_CHUNK * 2 + 17)).map(|i| (i % 7) as f64).collect();
    let y = lfilter(&taps, &x);
    for n in [0, 1, FILTER_CHUNK - 1, FILTER_CHUNK, FILTER_CHUNK + 1, x.len() - 1] {
        let mut expect = 0.0;
        for (k, b) in taps.iter().enumerate() {
            if n >= k {
                expect += b * x[n - k];
            }
        }
        assert!((y[n] - expect).abs() < 1e-12, "sample {n}");
    }
}

#[test]
fn odd_extension_reflects_about_end_points() {
    assert_eq!(
        odd_extend(&[1.0, 2.0, 4.0], 2),
        vec![-2.0, 0.0, 1.0, 2.0, 4.0, 6.0, 7.0]
    );
    // Padding never exceeds len - 1.
    assert_eq!(odd_extend(&[1.0, 3.0], 10), vec![-1.0, 1.0, 3.0, 5.0]);
}

#[test]
fn steady_state_sums_remaining_taps() {
    assert_eq!(steady_state(&[1.0, 2.0, 3.0]), vec![5.0, 3.0]);
    assert!(steady_state(&[1.0]).is_empty());
}

#[test]
fn constant_input_has_no_edge_transient() {
    let taps = [0.1, 0.2, 0.4, 0.2, 0.1];
    let x = vec![3.0; 50];
    for v in filtfilt(&taps, &x) {
        assert!((v - 3.0).abs() < 1e-12);
    }
}

#[test]
fn forward_backward_is_zero_phase() {
    let taps = [0.25, 0.5, 0.25];
    let f = 0.01;
    let x: Vec<f64> = (0..2000).map(|n| (2.0 * PI * f * n as f64).sin()).collect();
    let y = filtfilt(&taps, &x);
    let gain = magnitude_response(&taps, f).powi(2);
    for n in 100..1900 {
        assert!((y[n] - gain * x[n]).abs() < 1e-9, "sample {n}");
    }
}

#[test]
fn short_inputs_are_filtered_without_panicking() {
    let taps = vec![1.0 / 151.0; 151];
    assert_eq!(filtfilt(&taps, &[0.5, -0.5, 0.25, 0.0, 1.0]).len(), 5);
    let one = filtfilt(&taps, &[2.0]);
    assert_eq!(one.len(), 1);
    assert!((one[0] - 2.0).abs() < 1e-9);
    assert!(filtfilt(&taps, &[]).is_empty());
}

#[test]
fn magnitude_response_of_moving_average() {
    let taps = [0.5, 0.5];
    assert!((magnitude_response(&taps, 0.0) - 1.0).abs() < 1e-12);
    assert!(magnitude_response(&taps, 0.5) < 1e-12);
}
