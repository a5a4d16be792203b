//! Deterministic seed mixing and pseudo-random stream helpers for map generation.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;
use xxhash_rust::xxh3::xxh3_64;

use crate::types::WorldSquare;

pub(crate) fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}

/// Generation seed for the map on `square`, derived from the world seed string.
pub(crate) fn derive_map_seed(seed_string: &str, square: WorldSquare) -> u64 {
    let mut mixed = xxh3_64(seed_string.as_bytes()) ^ 0x9E37_79B9_7F4A_7C15;
    mixed ^= (square.x as i64 as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= (square.z as i64 as u64).wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}

/// Uniform index in `0..len`. `len` must be non-zero.
pub(crate) fn random_index(rng: &mut ChaCha8Rng, len: usize) -> usize {
    debug_assert!(len > 0);
    (rng.next_u64() % len as u64) as usize
}

const SEED_STRING_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const SEED_STRING_LEN: usize = 10;

/// Fresh lowercase world seed string.
pub(crate) fn random_seed_string(rng: &mut ChaCha8Rng) -> String {
    (0..SEED_STRING_LEN)
        .map(|_| SEED_STRING_ALPHABET[random_index(rng, SEED_STRING_ALPHABET.len())] as char)
        .collect()
}
