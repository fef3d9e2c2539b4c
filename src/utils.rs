use fnv::FnvHasher;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::{
    collections::{HashMap, HashSet},
    hash::{BuildHasherDefault, Hash}
};

pub type FnvHashSet<T> = HashSet<T, BuildHasherDefault<FnvHasher>>;
pub type FnvHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FnvHasher>>;

/// The random source threaded through every grid operation, generator and builder run.
pub type MazeRng = Xoshiro256PlusPlus;

/// Construct a hash set with the specified capacity. The hashing algorithm is much faster than the default
/// on short keys such as integers and small strings.
/// On large keys it is actually slower.
/// Note it is less robust against security attacks on key collisions.
pub fn fnv_hashset<T: Hash + Eq>(capacity: usize) -> FnvHashSet<T> {
    let fnv = BuildHasherDefault::<FnvHasher>::default();
    HashSet::<T, _>::with_capacity_and_hasher(capacity, fnv)
}

/// Construct a hash map with the specified capacity. The hashing algorithm is much faster than the default
/// on short keys such as integers and small strings.
/// On large keys it is actually slower.
/// Note it is less robust against security attacks on key collisions.
pub fn fnv_hashmap<K: Hash + Eq, V>(capacity: usize) -> FnvHashMap<K, V> {
    let fnv = BuildHasherDefault::<FnvHasher>::default();
    HashMap::<K, V, _>::with_capacity_and_hasher(capacity, fnv)
}

/// A seeded generator gives a reproducible maze, `None` seeds from the operating system.
pub fn maze_rng(seed: Option<u64>) -> MazeRng {
    match seed {
        Some(s) => MazeRng::seed_from_u64(s),
        None => MazeRng::from_entropy(),
    }
}

/// Pick one element uniformly at random.
///
/// # Panics
///
/// Sampling from an empty slice is a broken algorithm invariant, not a recoverable condition.
pub fn sample<T: Copy>(rng: &mut MazeRng, items: &[T]) -> T {
    assert!(!items.is_empty(), "Cannot sample from an empty collection.");
    items[rng.gen_range(0..items.len())]
}

/// One in `total` odds.
#[inline]
pub fn choose(rng: &mut MazeRng, total: u32) -> bool {
    rng.gen_range(0..total) == 0
}

/// Fair coin flip.
#[inline]
pub fn coin_flip(rng: &mut MazeRng) -> bool {
    choose(rng, 2)
}

/// A ratio in the half open range [0, 1).
#[inline]
pub fn ratio(rng: &mut MazeRng) -> f32 {
    rng.gen::<f32>()
}

/// Inclusive of both `min` and `max`.
#[inline]
pub fn random_between(rng: &mut MazeRng, min: usize, max: usize) -> usize {
    rng.gen_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_rngs_repeat() {
        let mut a = maze_rng(Some(42));
        let mut b = maze_rng(Some(42));
        let xs: Vec<usize> = (0..20).map(|_| random_between(&mut a, 0, 1000)).collect();
        let ys: Vec<usize> = (0..20).map(|_| random_between(&mut b, 0, 1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn random_between_is_inclusive() {
        let mut rng = maze_rng(Some(7));
        let mut seen = fnv_hashset(4);
        for _ in 0..500 {
            let n = random_between(&mut rng, 2, 6);
            assert!(n >= 2 && n <= 6);
            seen.insert(n);
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn ratio_in_unit_range() {
        let mut rng = maze_rng(Some(3));
        for _ in 0..1000 {
            let r = ratio(&mut rng);
            assert!(r >= 0.0 && r < 1.0);
        }
    }

    #[test]
    fn sample_single_element() {
        let mut rng = maze_rng(Some(1));
        assert_eq!(sample(&mut rng, &[9]), 9);
    }

    #[test]
    #[should_panic]
    fn sample_empty_panics() {
        let mut rng = maze_rng(Some(1));
        let empty: [u8; 0] = [];
        sample(&mut rng, &empty);
    }
}
