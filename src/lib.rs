// MIT License
//
// Copyright (c) 2019 Gregory Meyer
//
// Permission is hereby granted, free of charge, to any person
// obtaining a copy of this software and associated documentation files
// (the "Software"), to deal in the Software without restriction,
// including without limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of the Software,
// and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS
// BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN
// ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! An in-memory hash map implemented with separate chaining.
//!
//! Collisions are resolved by keeping every key that hashes to a bucket on
//! that bucket's singly linked chain, and the bucket array doubles whenever
//! the load factor reaches 0.7, so lookups stay O(1) on average as the map
//! fills. See [`map::HashMap`] for the full contract.

pub mod map;

pub use map::HashMap;

#[cfg(test)]
mod tests {
    use super::*;

    use std::hash::{BuildHasher, Hasher};

    #[test]
    fn hash_map_basics() {
        let mut map = HashMap::new();

        assert_eq!(map.insert("foo".to_string(), 5), None);
        assert_eq!(map.insert("bar".to_string(), 10), None);
        assert_eq!(map.insert("baz".to_string(), 15), None);
        assert_eq!(map.insert("qux".to_string(), 20), None);

        assert_eq!(map.get("foo"), Some(&5));
        assert_eq!(map.get("bar"), Some(&10));
        assert_eq!(map.get("baz"), Some(&15));
        assert_eq!(map.get("qux"), Some(&20));

        assert_eq!(map.insert("qux".to_string(), 5), Some(20));
        assert_eq!(map.insert("baz".to_string(), 10), Some(15));
        assert_eq!(map.insert("bar".to_string(), 15), Some(10));
        assert_eq!(map.insert("foo".to_string(), 20), Some(5));

        assert_eq!(map.len(), 4);
    }

    #[test]
    fn hash_map_growth() {
        const MAX_VALUE: i32 = 512;

        let mut map = HashMap::new();

        for i in 0..MAX_VALUE {
            assert_eq!(map.insert(i, i), None);
        }

        for i in 0..MAX_VALUE {
            assert_eq!(map.get(&i), Some(&i));
            assert_eq!(map.insert(i, i), Some(i));
        }

        assert_eq!(map.len(), MAX_VALUE as usize);
    }

    #[test]
    fn hash_map_removal() {
        const MAX_VALUE: i32 = 512;

        let mut map = HashMap::new();

        for i in 0..MAX_VALUE {
            assert_eq!(map.insert(i, i), None);
        }

        for i in 0..MAX_VALUE {
            assert_eq!(map.remove(&i), Some(i));
        }

        for i in 0..MAX_VALUE {
            assert_eq!(map.get(&i), None);
        }

        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn len_tracks_distinct_keys() {
        let mut map = HashMap::new();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());

        map.insert(1, "one");
        map.insert(2, "two");
        assert_eq!(map.len(), 2);
        assert!(!map.is_empty());

        // overwriting an existing key must not change the count
        map.insert(2, "zwei");
        assert_eq!(map.len(), 2);

        // removing an absent key must not change the count
        assert_eq!(map.remove(&3), None);
        assert_eq!(map.len(), 2);

        assert_eq!(map.remove(&1), Some("one"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn remove_on_empty_map_is_a_noop() {
        let mut map: HashMap<String, String> = HashMap::new();

        assert_eq!(map.remove("anything"), None);
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn reinsert_after_removal() {
        let mut map = HashMap::new();

        map.insert("k".to_string(), 1);
        assert_eq!(map.remove("k"), Some(1));
        assert_eq!(map.get("k"), None);

        // a fresh insert, not an overwrite
        assert_eq!(map.insert("k".to_string(), 2), None);
        assert_eq!(map.get("k"), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn growth_is_transparent_to_lookups() {
        let mut map = HashMap::new();
        assert_eq!(map.bucket_count(), 20);

        // 15 entries push the load factor past 0.7 on a 20-bucket array
        for i in 0..15 {
            map.insert(i, i * 10);
        }

        assert_eq!(map.bucket_count(), 40);
        assert_eq!(map.len(), 15);

        for i in 0..15 {
            assert_eq!(map.get(&i), Some(&(i * 10)));
        }
    }

    #[test]
    fn student_records_scenario() {
        let mut students = HashMap::new();

        students.insert("17354".to_string(), "Arnav".to_string());
        students.insert("23234".to_string(), "Michael".to_string());
        students.insert("435t57".to_string(), "Larry".to_string());

        assert_eq!(students.len(), 3);

        let rendered = students.to_string();
        assert!(rendered.contains("17354"));
        assert!(rendered.contains("23234"));
        assert!(rendered.contains("435t57"));

        students.remove("23234");

        assert_eq!(students.len(), 2);
        assert_eq!(students.get("23234"), None);
        assert_eq!(students.get("17354"), Some(&"Arnav".to_string()));
        assert!(!students.to_string().contains("Michael"));
    }

    #[test]
    fn display_renders_one_line_per_entry() {
        let mut map = HashMap::new();
        assert_eq!(map.to_string(), "");

        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);

        let rendered = map.to_string();
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.lines().all(|line| line.contains(" -> ")));
    }

    #[test]
    fn iteration_covers_every_entry() {
        let mut map = HashMap::new();

        for i in 0..100 {
            map.insert(i, i * 2);
        }

        let mut seen: Vec<i32> = map.iter().map(|(&k, _)| k).collect();
        seen.sort_unstable();

        assert_eq!(map.iter().len(), 100);
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
        assert!(map.iter().all(|(&k, &v)| v == k * 2));
    }

    #[test]
    fn with_capacity_avoids_growth() {
        let mut map = HashMap::with_capacity(100);
        let initial_buckets = map.bucket_count();

        assert!(map.capacity() >= 100);

        for i in 0..100 {
            map.insert(i, i);
        }

        assert_eq!(map.bucket_count(), initial_buckets);
    }

    #[test]
    fn from_iterator_and_extend() {
        let mut map: HashMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
        assert_eq!(map.len(), 10);

        map.extend((10..20).map(|i| (i, i)));
        assert_eq!(map.len(), 20);

        for i in 0..20 {
            assert_eq!(map.get(&i), Some(&i));
        }
    }

    #[test]
    fn clear_empties_the_map() {
        let mut map = HashMap::new();

        for i in 0..50 {
            map.insert(i, i);
        }

        let buckets = map.bucket_count();
        map.clear();

        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.get(&0), None);
        assert_eq!(map.bucket_count(), buckets);

        assert_eq!(map.insert(0, 1), None);
        assert_eq!(map.get(&0), Some(&1));
    }

    /// Hashes every key to the same value, forcing all entries onto one
    /// chain.
    struct Colliding;

    struct CollidingHasher;

    impl BuildHasher for Colliding {
        type Hasher = CollidingHasher;

        fn build_hasher(&self) -> CollidingHasher {
            CollidingHasher
        }
    }

    impl Hasher for CollidingHasher {
        fn finish(&self) -> u64 {
            0
        }

        fn write(&mut self, _bytes: &[u8]) {}
    }

    #[test]
    fn colliding_keys_share_a_chain() {
        let mut map = HashMap::with_hasher(Colliding);

        for i in 0..10 {
            assert_eq!(map.insert(i, i), None);
        }

        for i in 0..10 {
            assert_eq!(map.get(&i), Some(&i));
        }

        assert_eq!(map.insert(5, 50), Some(5));
        assert_eq!(map.get(&5), Some(&50));
        assert_eq!(map.len(), 10);
    }

    #[test]
    fn removal_at_every_chain_position() {
        // entries are pushed at the chain head, so the last insert is the
        // head and the first is the tail
        let mut map = HashMap::with_hasher(Colliding);

        for i in 0..5 {
            map.insert(i, i);
        }

        // head
        assert_eq!(map.remove(&4), Some(4));
        // tail
        assert_eq!(map.remove(&0), Some(0));
        // interior
        assert_eq!(map.remove(&2), Some(2));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1), Some(&1));
        assert_eq!(map.get(&3), Some(&3));
        assert_eq!(map.get(&2), None);

        assert_eq!(map.remove(&2), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn growth_preserves_a_fully_collided_chain() {
        let mut map = HashMap::with_hasher(Colliding);

        for i in 0..20 {
            map.insert(i, i);
        }

        assert!(map.bucket_count() > 20);

        for i in 0..20 {
            assert_eq!(map.get(&i), Some(&i));
        }
    }
}
