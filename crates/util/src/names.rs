//! Unique name allocation.
//!
//! A [`NameAllocator`] turns a proposed name into one which is not part of a
//! set of names already in use, by appending a suffix when needed.

use std::collections::HashSet;
use std::hash::BuildHasher;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use rand::{rngs::OsRng, Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// A set of names already in use.
pub trait NameSet {
    fn contains_name(&self, name: &str) -> bool;

    fn name_count(&self) -> usize;
}

impl<S: BuildHasher> NameSet for HashSet<String, S> {
    fn contains_name(&self, name: &str) -> bool {
        self.contains(name)
    }

    fn name_count(&self) -> usize {
        self.len()
    }
}

impl<V, S: BuildHasher> NameSet for IndexMap<String, V, S> {
    fn contains_name(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn name_count(&self) -> usize {
        self.len()
    }
}

/// Both sets are in use.
impl<A: NameSet, B: NameSet> NameSet for (&A, &B) {
    fn contains_name(&self, name: &str) -> bool {
        self.0.contains_name(name) || self.1.contains_name(name)
    }

    fn name_count(&self) -> usize {
        self.0.name_count() + self.1.name_count()
    }
}

/// Produces names unique within a [`NameSet`].
pub trait NameAllocator: Send + Sync {
    /// Returns `name` itself when it is free, otherwise `name` followed by a
    /// suffix which makes it free.
    fn unique_name(&self, name: &str, taken: &dyn NameSet) -> String;
}

/// Appends a random number drawn from `0..max(taken, 1000)`.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use mapgraph_util::names::{NameAllocator, RandomNames};
///
/// let names = RandomNames::seeded([7; 32]);
/// let taken: HashSet<String> = ["a".to_string()].into_iter().collect();
///
/// assert_eq!(names.unique_name("b", &taken), "b");
/// let unique = names.unique_name("a", &taken);
/// assert!(unique.starts_with('a') && unique != "a");
/// ```
pub struct RandomNames {
    rng: Option<Arc<Mutex<Xoshiro256StarStar>>>,
}

impl Default for RandomNames {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomNames {
    /// Draws suffixes from the thread-local RNG.
    pub fn new() -> Self {
        Self { rng: None }
    }

    /// Draws suffixes from a xoshiro256** generator seeded with `seed`, for
    /// reproducible names.
    pub fn seeded(seed: [u8; 32]) -> Self {
        Self {
            rng: Some(Arc::new(Mutex::new(Xoshiro256StarStar::from_seed(seed)))),
        }
    }

    /// Seeded from the operating system.
    ///
    /// ```
    /// use std::collections::HashSet;
    /// use mapgraph_util::names::{NameAllocator, RandomNames};
    ///
    /// let taken: HashSet<String> = ["node".to_string()].into();
    /// let name = RandomNames::from_entropy().unique_name("node", &taken);
    /// assert!(name.starts_with("node") && name != "node");
    /// assert!(name["node".len()..].parse::<usize>().is_ok());
    /// ```
    pub fn from_entropy() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self::seeded(seed)
    }

    fn next_suffix(&self, range: usize) -> usize {
        match &self.rng {
            Some(rng) => match rng.lock() {
                Ok(mut rng) => rng.gen_range(0..range),
                Err(poisoned) => poisoned.into_inner().gen_range(0..range),
            },
            None => rand::thread_rng().gen_range(0..range),
        }
    }
}

impl NameAllocator for RandomNames {
    fn unique_name(&self, name: &str, taken: &dyn NameSet) -> String {
        if !taken.contains_name(name) {
            return name.to_string();
        }
        let range = taken.name_count().max(1000);
        let mut unique = String::with_capacity(name.len() + 4);
        loop {
            unique.clear();
            unique.push_str(name);
            unique.push_str(&self.next_suffix(range).to_string());
            if !taken.contains_name(&unique) {
                return unique;
            }
        }
    }
}

/// Appends the first free number of a sequence, `2, 3, ...` by default.
///
/// ```
/// use std::collections::HashSet;
/// use mapgraph_util::names::{NameAllocator, SequentialNames};
///
/// let taken: HashSet<String> = ["a".to_string(), "a2".to_string()].into_iter().collect();
/// assert_eq!(SequentialNames::default().unique_name("a", &taken), "a3");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SequentialNames {
    pub start: usize,
}

impl Default for SequentialNames {
    fn default() -> Self {
        Self { start: 2 }
    }
}

impl NameAllocator for SequentialNames {
    fn unique_name(&self, name: &str, taken: &dyn NameSet) -> String {
        if !taken.contains_name(name) {
            return name.to_string();
        }
        (self.start..)
            .map(|n| format!("{name}{n}"))
            .find(|candidate| !taken.contains_name(candidate))
            .unwrap_or_else(|| name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_free_name_is_kept() {
        let names = taken(&["x"]);
        assert_eq!(RandomNames::new().unique_name("y", &names), "y");
        assert_eq!(SequentialNames::default().unique_name("y", &names), "y");
    }

    #[test]
    fn test_random_suffix_is_numeric_and_free() {
        let names = taken(&["obj_ref_a", "obj_ref_a1", "obj_ref_a2"]);
        let allocator = RandomNames::seeded([1; 32]);
        for _ in 0..50 {
            let unique = allocator.unique_name("obj_ref_a", &names);
            let suffix = unique.strip_prefix("obj_ref_a").unwrap();
            assert!(!names.contains(&unique));
            let n: usize = suffix.parse().unwrap();
            assert!(n < 1000);
        }
    }

    #[test]
    fn test_seeded_allocation_is_reproducible() {
        let names = taken(&["a"]);
        let first = RandomNames::seeded([9; 32]).unique_name("a", &names);
        let second = RandomNames::seeded([9; 32]).unique_name("a", &names);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sequential_custom_start() {
        let names = taken(&["n", "n0"]);
        assert_eq!(SequentialNames { start: 0 }.unique_name("n", &names), "n1");
    }

    #[test]
    fn test_index_map_and_pair_sets() {
        let mut objects: IndexMap<String, ()> = IndexMap::new();
        objects.insert("a".to_string(), ());
        let reserved = taken(&["a2"]);
        let both = (&objects, &reserved);
        assert!(both.contains_name("a2"));
        assert_eq!(both.name_count(), 2);
        assert_eq!(SequentialNames::default().unique_name("a", &both), "a3");
    }
}
