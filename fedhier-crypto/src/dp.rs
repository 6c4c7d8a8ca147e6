//! L2 gradient clipping and the analytic Gaussian mechanism, mirroring
//! `ProductionDifferentialPrivacy.clip_gradients` /
//! `add_gaussian_noise`.

use rand_distr::{Distribution, Normal};

/// Scales `layer` down so its L2 norm does not exceed `max_norm`;
/// leaves it untouched if already within bound.
pub fn clip_l2(layer: &mut [f32], max_norm: f32) {
    let norm = layer.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > max_norm && norm > 0.0 {
        let scale = max_norm / norm;
        for v in layer.iter_mut() {
            *v *= scale;
        }
    }
}

/// The analytic Gaussian mechanism's noise scale:
/// `sigma = sqrt(2 * ln(1.25 / delta)) * sensitivity / epsilon`.
pub fn gaussian_sigma(epsilon: f64, delta: f64, sensitivity: f64) -> f64 {
    (2.0 * (1.25 / delta).ln()).sqrt() * sensitivity / epsilon
}

/// Adds i.i.d. Gaussian noise with the calibrated `sigma` to every
/// element of `layer`.
pub fn add_gaussian_noise(layer: &mut [f32], sigma: f64, rng: &mut impl rand::RngCore) {
    if sigma <= 0.0 {
        return;
    }
    let dist = Normal::new(0.0, sigma).expect("sigma is finite and positive");
    for v in layer.iter_mut() {
        *v += dist.sample(rng) as f32;
    }
}

/// Clips then noises every layer of a weight vector in place, per
/// `spec.md` §4.1 step 3.
pub fn privatize(layers: &mut [Vec<f32>], clip_norm: f32, epsilon: f64, delta: f64) {
    let mut rng = rand::thread_rng();
    let sigma = gaussian_sigma(epsilon, delta, clip_norm as f64);
    for layer in layers.iter_mut() {
        clip_l2(layer, clip_norm);
        add_gaussian_noise(layer, sigma, &mut rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_leaves_small_vectors_untouched() {
        let mut v = vec![0.1, 0.2, 0.0];
        let before = v.clone();
        clip_l2(&mut v, 10.0);
        assert_eq!(v, before);
    }

    #[test]
    fn clip_shrinks_to_the_bound() {
        let mut v = vec![3.0, 4.0]; // norm = 5
        clip_l2(&mut v, 1.0);
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn sigma_grows_as_epsilon_shrinks() {
        let wide = gaussian_sigma(0.1, 1e-5, 1.0);
        let narrow = gaussian_sigma(10.0, 1e-5, 1.0);
        assert!(wide > narrow);
    }
}
