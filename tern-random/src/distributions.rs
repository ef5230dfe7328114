use std::f64::consts::{LN_10, PI};

use rand::RngCore;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    #[error("invalid distribution parameter: {0}")]
    InvalidParameter(String),
}

fn invalid(msg: &str) -> DistributionError {
    DistributionError::InvalidParameter(msg.to_owned())
}

/// Uniform value in `[0, 1)` with 53 bits of precision.
fn unit<R: RngCore>(rng: &mut R) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Uniform value in `(0, 1]`, safe to take logs of.
fn unit_open<R: RngCore>(rng: &mut R) -> f64 {
    1.0 - unit(rng)
}

// erfc with fractional error below 1.2e-7 everywhere (Numerical Recipes
// Chebyshev fit).
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.26551223
        + t * (1.00002368
            + t * (0.37409196
                + t * (0.09678418
                    + t * (-0.18628806
                        + t * (0.27886807
                            + t * (-1.13520398
                                + t * (1.48851587 + t * (-0.82215223 + t * 0.17087277))))))));
    let ans = t * poly.exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

fn std_normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

// Acklam's rational approximation to the standard normal quantile,
// relative error below 1.15e-9 over the open unit interval.
fn std_normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    debug_assert!(p > 0.0 && p < 1.0);

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

// Lanczos approximation, g = 7, for x > 0.
fn ln_gamma(x: f64) -> f64 {
    const COEF: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if x < 0.5 {
        // Reflection.
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut acc = COEF[0];
    for (i, &c) in COEF.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

/// Coin flip with success probability `p`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bernoulli {
    p: f64,
}

impl Bernoulli {
    pub fn new(p: f64) -> Result<Self, DistributionError> {
        if (0.0..=1.0).contains(&p) {
            Ok(Self { p })
        } else {
            Err(invalid("Bernoulli probability must be in [0, 1]"))
        }
    }

    /// Probability given as the ratio `num / den`.
    pub fn ratio(num: u64, den: u64) -> Result<Self, DistributionError> {
        if den == 0 || num > den {
            return Err(invalid("Bernoulli ratio must satisfy num <= den, den > 0"));
        }
        Ok(Self {
            p: num as f64 / den as f64,
        })
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn sample<R: RngCore>(&self, rng: &mut R) -> bool {
        unit(rng) < self.p
    }

    pub fn pdf(&self, success: bool) -> f64 {
        if success {
            self.p
        } else {
            1.0 - self.p
        }
    }

    pub fn mean(&self) -> f64 {
        self.p
    }

    pub fn variance(&self) -> f64 {
        self.p * (1.0 - self.p)
    }

    pub fn sd(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Uniform integers on the inclusive range `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformInt {
    lo: i64,
    hi: i64,
}

impl UniformInt {
    pub fn new(lo: i64, hi: i64) -> Result<Self, DistributionError> {
        if lo <= hi {
            Ok(Self { lo, hi })
        } else {
            Err(invalid("uniform range must have lo <= hi"))
        }
    }

    fn width(&self) -> u128 {
        (self.hi as i128 - self.lo as i128 + 1) as u128
    }

    pub fn sample<R: RngCore>(&self, rng: &mut R) -> i64 {
        // Widening multiply maps the 64-bit draw onto the range without
        // modulo bias.
        let draw = rng.next_u64() as u128;
        let offset = (draw * self.width()) >> 64;
        (self.lo as i128 + offset as i128) as i64
    }

    pub fn pdf(&self, x: i64) -> f64 {
        if x < self.lo || x > self.hi {
            0.0
        } else {
            1.0 / self.width() as f64
        }
    }

    /// P(X <= x).
    pub fn cdf(&self, x: i64) -> f64 {
        if x < self.lo {
            0.0
        } else if x >= self.hi {
            1.0
        } else {
            (x as i128 - self.lo as i128 + 1) as f64 / self.width() as f64
        }
    }

    /// P(X >= x).
    pub fn ccdf(&self, x: i64) -> f64 {
        if x <= self.lo {
            1.0
        } else if x > self.hi {
            0.0
        } else {
            (self.hi as i128 - x as i128 + 1) as f64 / self.width() as f64
        }
    }

    pub fn mean(&self) -> f64 {
        (self.lo as f64 + self.hi as f64) / 2.0
    }

    pub fn variance(&self) -> f64 {
        let n = self.width() as f64;
        (n * n - 1.0) / 12.0
    }

    pub fn sd(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Uniform reals on `[lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformReal {
    lo: f64,
    hi: f64,
}

impl UniformReal {
    pub fn new(lo: f64, hi: f64) -> Result<Self, DistributionError> {
        if lo.is_finite() && hi.is_finite() && lo < hi {
            Ok(Self { lo, hi })
        } else {
            Err(invalid("uniform range must be finite with lo < hi"))
        }
    }

    pub fn sample<R: RngCore>(&self, rng: &mut R) -> f64 {
        self.lo + (self.hi - self.lo) * unit(rng)
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x < self.lo || x >= self.hi {
            0.0
        } else {
            1.0 / (self.hi - self.lo)
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        ((x - self.lo) / (self.hi - self.lo)).clamp(0.0, 1.0)
    }

    pub fn ccdf(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    pub fn quantile(&self, p: f64) -> f64 {
        self.lo + (self.hi - self.lo) * p.clamp(0.0, 1.0)
    }

    pub fn cquantile(&self, p: f64) -> f64 {
        self.quantile(1.0 - p)
    }

    pub fn mean(&self) -> f64 {
        (self.lo + self.hi) / 2.0
    }

    pub fn variance(&self) -> f64 {
        let w = self.hi - self.lo;
        w * w / 12.0
    }

    pub fn sd(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Log-uniform distribution on `[lo, hi)`: the logarithm of the variate is
/// uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogUniform {
    lo: f64,
    hi: f64,
}

impl LogUniform {
    pub fn new(lo: f64, hi: f64) -> Result<Self, DistributionError> {
        if lo.is_finite() && hi.is_finite() && 0.0 < lo && lo < hi {
            Ok(Self { lo, hi })
        } else {
            Err(invalid("log-uniform range must satisfy 0 < lo < hi"))
        }
    }

    pub fn sample<R: RngCore>(&self, rng: &mut R) -> f64 {
        (self.lo.ln() + (self.hi / self.lo).ln() * unit(rng)).exp()
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x < self.lo || x >= self.hi {
            0.0
        } else {
            1.0 / (x * (self.hi / self.lo).ln())
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x <= self.lo {
            0.0
        } else if x >= self.hi {
            1.0
        } else {
            (x / self.lo).ln() / (self.hi / self.lo).ln()
        }
    }

    pub fn ccdf(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    pub fn quantile(&self, p: f64) -> f64 {
        self.lo * (self.hi / self.lo).powf(p.clamp(0.0, 1.0))
    }

    pub fn cquantile(&self, p: f64) -> f64 {
        self.quantile(1.0 - p)
    }
}

/// Normal distribution, sampled with the Box-Muller transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    mean: f64,
    sd: f64,
}

impl Normal {
    pub fn new(mean: f64, sd: f64) -> Result<Self, DistributionError> {
        if sd > 0.0 && mean.is_finite() && sd.is_finite() {
            Ok(Self { mean, sd })
        } else {
            Err(invalid("normal distribution needs finite mean and sd > 0"))
        }
    }

    pub fn standard() -> Self {
        Self { mean: 0.0, sd: 1.0 }
    }

    pub fn sample<R: RngCore>(&self, rng: &mut R) -> f64 {
        let r = (-2.0 * unit_open(rng).ln()).sqrt();
        let theta = 2.0 * PI * unit(rng);
        self.mean + self.sd * r * theta.cos()
    }

    pub fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.sd;
        (-0.5 * z * z).exp() / (self.sd * (2.0 * PI).sqrt())
    }

    pub fn cdf(&self, x: f64) -> f64 {
        std_normal_cdf((x - self.mean) / self.sd)
    }

    pub fn ccdf(&self, x: f64) -> f64 {
        std_normal_cdf((self.mean - x) / self.sd)
    }

    pub fn quantile(&self, p: f64) -> f64 {
        self.mean + self.sd * std_normal_quantile(p)
    }

    pub fn cquantile(&self, p: f64) -> f64 {
        self.quantile(1.0 - p)
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sd(&self) -> f64 {
        self.sd
    }

    pub fn variance(&self) -> f64 {
        self.sd * self.sd
    }

    pub fn skewness(&self) -> f64 {
        0.0
    }

    /// Excess kurtosis.
    pub fn kurtosis(&self) -> f64 {
        0.0
    }
}

/// Which logarithm the log-normal parameters are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogNormalMode {
    #[default]
    Natural,
    Common,
}

/// Log-normal distribution: `exp` (or `10^`) of a normal variate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormal {
    log: Normal,
}

impl LogNormal {
    pub fn new(mu: f64, sigma: f64, mode: LogNormalMode) -> Result<Self, DistributionError> {
        let (mu, sigma) = match mode {
            LogNormalMode::Natural => (mu, sigma),
            LogNormalMode::Common => (mu * LN_10, sigma * LN_10),
        };
        Ok(Self {
            log: Normal::new(mu, sigma)?,
        })
    }

    pub fn sample<R: RngCore>(&self, rng: &mut R) -> f64 {
        self.log.sample(rng).exp()
    }

    pub fn pdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            self.log.pdf(x.ln()) / x
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            self.log.cdf(x.ln())
        }
    }

    pub fn ccdf(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    pub fn quantile(&self, p: f64) -> f64 {
        self.log.quantile(p).exp()
    }

    pub fn cquantile(&self, p: f64) -> f64 {
        self.quantile(1.0 - p)
    }

    pub fn mean(&self) -> f64 {
        (self.log.mean() + self.log.variance() / 2.0).exp()
    }

    pub fn median(&self) -> f64 {
        self.log.mean().exp()
    }

    pub fn variance(&self) -> f64 {
        let s2 = self.log.variance();
        (s2.exp() - 1.0) * (2.0 * self.log.mean() + s2).exp()
    }

    pub fn sd(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Poisson distribution: exact inversion sampling for small rates, normal
/// approximation with continuity correction for large ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poisson {
    lambda: f64,
}

impl Poisson {
    const EXACT_LIMIT: f64 = 30.0;

    pub fn new(lambda: f64) -> Result<Self, DistributionError> {
        if lambda > 0.0 && lambda.is_finite() {
            Ok(Self { lambda })
        } else {
            Err(invalid("Poisson rate must be positive and finite"))
        }
    }

    pub fn sample<R: RngCore>(&self, rng: &mut R) -> u64 {
        if self.lambda < Self::EXACT_LIMIT {
            // Knuth's product-of-uniforms inversion.
            let limit = (-self.lambda).exp();
            let mut k = 0u64;
            let mut product = unit_open(rng);
            while product > limit {
                k += 1;
                product *= unit_open(rng);
            }
            k
        } else {
            let approx = Normal {
                mean: self.lambda,
                sd: self.lambda.sqrt(),
            };
            let x = approx.sample(rng) + 0.5;
            if x < 0.0 {
                0
            } else {
                x.floor() as u64
            }
        }
    }

    pub fn pdf(&self, k: u64) -> f64 {
        let k = k as f64;
        (k * self.lambda.ln() - self.lambda - ln_gamma(k + 1.0)).exp()
    }

    /// P(X <= k).
    pub fn cdf(&self, k: u64) -> f64 {
        let kf = k as f64;
        // Beyond this point the tail mass is below double precision.
        if kf > self.lambda + 40.0 * self.lambda.sqrt() + 40.0 {
            return 1.0;
        }
        if self.lambda < Self::EXACT_LIMIT || kf < 4.0 * Self::EXACT_LIMIT {
            let mut term = (-self.lambda).exp();
            let mut total = term;
            for i in 1..=k {
                term *= self.lambda / i as f64;
                total += term;
            }
            total.min(1.0)
        } else {
            let z = (kf + 0.5 - self.lambda) / self.lambda.sqrt();
            std_normal_cdf(z)
        }
    }

    /// P(X >= k).
    pub fn ccdf(&self, k: u64) -> f64 {
        if k == 0 {
            1.0
        } else {
            1.0 - self.cdf(k - 1)
        }
    }

    pub fn mean(&self) -> f64 {
        self.lambda
    }

    pub fn variance(&self) -> f64 {
        self.lambda
    }

    pub fn sd(&self) -> f64 {
        self.lambda.sqrt()
    }

    pub fn skewness(&self) -> f64 {
        1.0 / self.lambda.sqrt()
    }

    /// Excess kurtosis.
    pub fn kurtosis(&self) -> f64 {
        1.0 / self.lambda
    }
}
