use std::collections::{HashMap, HashSet};
use std::hash::BuildHasherDefault;

use seahash::SeaHasher;

/// A `HashMap` using the non-cryptographic seahash.
pub type FastHashMap<K, V> = HashMap<K, V, BuildHasherDefault<SeaHasher>>;

/// A `HashSet` using the non-cryptographic seahash.
pub type FastHashSet<K> = HashSet<K, BuildHasherDefault<SeaHasher>>;
