#![allow(dead_code)]

use lcv::SummaryVectors;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// LD scores uniform on [1, 50] and `Z = sqrt(ell) * N(0, 1)` for trait 1;
/// trait 2 is identical.
pub fn identical_traits(m: usize, seed: u64) -> SummaryVectors {
    let mut rng = StdRng::seed_from_u64(seed);
    let ell: Vec<f64> = (0..m).map(|_| rng.gen_range(1.0..=50.0)).collect();
    let z: Vec<f64> = ell
        .iter()
        .map(|l| {
            let draw: f64 = StandardNormal.sample(&mut rng);
            l.sqrt() * draw
        })
        .collect();
    SummaryVectors::new(ell, z.clone(), z, None).expect("vectors")
}

/// Trait 1 as in [`identical_traits`]; trait 2 is standard normal noise.
pub fn noise_second_trait(m: usize, seed: u64) -> SummaryVectors {
    let mut rng = StdRng::seed_from_u64(seed);
    let ell: Vec<f64> = (0..m).map(|_| rng.gen_range(1.0..=50.0)).collect();
    let z1: Vec<f64> = ell
        .iter()
        .map(|l| {
            let draw: f64 = StandardNormal.sample(&mut rng);
            l.sqrt() * draw
        })
        .collect();
    let z2: Vec<f64> = (0..m).map(|_| StandardNormal.sample(&mut rng)).collect();
    SummaryVectors::new(ell, z1, z2, None).expect("vectors")
}

/// Same variants with the two traits exchanged.
pub fn swap_traits(data: &SummaryVectors) -> SummaryVectors {
    SummaryVectors {
        ell: data.ell.clone(),
        z1: data.z2.clone(),
        z2: data.z1.clone(),
        weights: data.weights.clone(),
    }
}

pub fn bits(values: &[f64]) -> Vec<u64> {
    values.iter().map(|v| v.to_bits()).collect()
}
