//! Seedable random number generation.
//!
//! Every stochastic step of a run draws from one generator owned by the
//! runner, so a fixed seed reproduces a run exactly.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from `seed`.
///
/// ```
/// use rand::Rng;
/// use u_moea::random::create_rng;
///
/// let a: u64 = create_rng(7).random();
/// let b: u64 = create_rng(7).random();
/// assert_eq!(a, b);
/// ```
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from `seed`, or from OS entropy when `None`.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}
