pub mod drill;
pub mod init;
pub mod listen;
pub mod stats;
pub mod validate;
pub mod voices;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seeded generator when `seed` is given, OS-seeded otherwise.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
