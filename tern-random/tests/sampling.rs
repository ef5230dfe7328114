use tern_random::{
    Bernoulli, LogNormal, LogNormalMode, Normal, Poisson, Statistics, StdEngine, UniformInt,
    UniformReal,
};

const SAMPLES: usize = 100_000;

fn collect(mut f: impl FnMut(&mut StdEngine) -> f64) -> Statistics {
    let mut rng = StdEngine::new(0x5eed);
    let mut stats = Statistics::new();
    for _ in 0..SAMPLES {
        stats.push(f(&mut rng));
    }
    stats
}

#[test]
fn uniform_int_empirical_moments() {
    let dist = UniformInt::new(1, 6).unwrap();
    let stats = collect(|rng| dist.sample(rng) as f64);

    // mean -> (a + b) / 2, variance -> ((b - a + 1)^2 - 1) / 12
    assert!((stats.mean() - 3.5).abs() < 0.02, "mean {}", stats.mean());
    assert!(
        (stats.variance() - 35.0 / 12.0).abs() < 0.05,
        "variance {}",
        stats.variance()
    );
    assert_eq!(stats.min(), 1.0);
    assert_eq!(stats.max(), 6.0);
}

#[test]
fn uniform_real_stays_in_range() {
    let dist = UniformReal::new(-2.0, 2.0).unwrap();
    let stats = collect(|rng| dist.sample(rng));
    assert!(stats.min() >= -2.0 && stats.max() < 2.0);
    assert!(stats.mean().abs() < 0.02);
    assert!((stats.variance() - 16.0 / 12.0).abs() < 0.03);
}

#[test]
fn bernoulli_hit_rate() {
    let dist = Bernoulli::ratio(1, 4).unwrap();
    let stats = collect(|rng| dist.sample(rng) as u8 as f64);
    assert!((stats.mean() - 0.25).abs() < 0.01);
    assert!((stats.variance() - dist.variance()).abs() < 0.01);
}

#[test]
fn normal_empirical_moments() {
    let dist = Normal::new(10.0, 3.0).unwrap();
    let stats = collect(|rng| dist.sample(rng));
    assert!((stats.mean() - 10.0).abs() < 0.05);
    assert!((stats.sd() - 3.0).abs() < 0.05);
    assert!(stats.skewness().abs() < 0.05);
    assert!(stats.kurtosis().abs() < 0.1);
}

#[test]
fn log_normal_median() {
    let dist = LogNormal::new(1.0, 0.5, LogNormalMode::Natural).unwrap();
    let stats = collect(|rng| dist.sample(rng).ln());
    // ln of the samples is normal(1, 0.5).
    assert!((stats.mean() - 1.0).abs() < 0.01);
    assert!((stats.sd() - 0.5).abs() < 0.01);
    assert!((dist.median() - 1.0f64.exp()).abs() < 1e-12);
}

#[test]
fn poisson_exact_and_approximate() {
    // Small rate: exact inversion sampling.
    let small = Poisson::new(4.0).unwrap();
    let stats = collect(|rng| small.sample(rng) as f64);
    assert!((stats.mean() - 4.0).abs() < 0.05);
    assert!((stats.variance() - 4.0).abs() < 0.2);

    // Large rate: normal approximation path.
    let large = Poisson::new(200.0).unwrap();
    let stats = collect(|rng| large.sample(rng) as f64);
    assert!((stats.mean() - 200.0).abs() < 0.5);
    assert!((stats.variance() - 200.0).abs() < 10.0);
}

#[test]
fn identical_seeds_identical_streams() {
    let dist = UniformInt::new(0, 1_000_000).unwrap();
    let mut a = StdEngine::new(12345);
    let mut b = StdEngine::new(12345);
    for _ in 0..1000 {
        assert_eq!(dist.sample(&mut a), dist.sample(&mut b));
    }
}
