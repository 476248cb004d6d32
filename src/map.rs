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

//! A hash map implemented with separate chaining and amortized growth.

use std::{
    borrow::Borrow,
    fmt,
    hash::{BuildHasher, Hash, Hasher},
    mem, slice,
};

/// Default hasher for `HashMap`.
///
/// This is currently [aHash], a hashing algorithm designed around acceleration
/// by the [AES-NI] instruction set on x86 processors. aHash is not
/// cryptographically secure, but is fast and resistant to DoS attacks.
///
/// [aHash]: https://docs.rs/ahash
/// [AES-NI]: https://en.wikipedia.org/wiki/AES_instruction_set
pub type DefaultHashBuilder = ahash::RandomState;

/// Number of buckets a map is created with.
const INITIAL_BUCKETS: usize = 20;

/// Bucket count doubles once `len / bucket_count` reaches this threshold.
const MAX_LOAD_FACTOR: f64 = 0.7;

/// A hash map implemented with separate chaining.
///
/// Keys are assigned to buckets by their hash modulo the current bucket count;
/// keys that share a bucket are kept on a singly linked chain, each entry
/// owning its successor. Lookups walk the chain comparing keys for equality,
/// so `get`, `insert`, and `remove` are O(1) on average and O(chain length) in
/// the worst case. Whenever an insertion pushes the load factor (entries per
/// bucket) to 0.7 or above, the bucket count doubles and every entry is
/// relinked into the larger array; the map never shrinks.
///
/// The default hashing algorithm is [aHash]. The hashing algorithm to be used
/// can be chosen on a per-`HashMap` basis using the [`with_hasher`] and
/// [`with_capacity_and_hasher`] methods.
///
/// Key types must implement [`Hash`] and [`Eq`], and the two must agree: keys
/// that compare equal must hash identically. The map does not detect
/// violations of that contract, and lookups are unspecified (though memory
/// safe) in its absence.
///
/// `HashMap` is not internally synchronized. Share it between threads the same
/// way as any other `&mut`-mutated structure, behind a `Mutex` or `RwLock`.
///
/// [aHash]: https://docs.rs/ahash
/// [`with_hasher`]: #method.with_hasher
/// [`with_capacity_and_hasher`]: #method.with_capacity_and_hasher
/// [`Hash`]: https://doc.rust-lang.org/std/hash/trait.Hash.html
/// [`Eq`]: https://doc.rust-lang.org/std/cmp/trait.Eq.html
pub struct HashMap<K: Hash + Eq, V, S: BuildHasher = DefaultHashBuilder> {
    buckets: Vec<Chain<K, V>>,
    len: usize,
    hash_builder: S,
}

/// The head link of one bucket's collision chain, or `None` if the bucket is
/// empty. Entries after the head are owned transitively through `Entry::next`.
type Chain<K, V> = Option<Box<Entry<K, V>>>;

impl<K: Hash + Eq, V> HashMap<K, V, DefaultHashBuilder> {
    /// Creates an empty `HashMap` with the default initial bucket count of 20.
    pub fn new() -> HashMap<K, V, DefaultHashBuilder> {
        HashMap::with_capacity_and_hasher(0, DefaultHashBuilder::default())
    }

    /// Creates an empty `HashMap` with space for at least `capacity` elements
    /// without growing.
    ///
    /// The map allocates enough buckets that inserting `capacity` elements
    /// keeps the load factor below the growth threshold.
    pub fn with_capacity(capacity: usize) -> HashMap<K, V, DefaultHashBuilder> {
        HashMap::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> HashMap<K, V, S> {
    /// Creates an empty `HashMap` that will use `hash_builder` to hash keys.
    pub fn with_hasher(hash_builder: S) -> HashMap<K, V, S> {
        HashMap::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty `HashMap` that will hold at least `capacity` elements
    /// without growing and that uses `hash_builder` to hash keys.
    ///
    /// At least 20 buckets are allocated regardless of `capacity`.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> HashMap<K, V, S> {
        let num_buckets = buckets_for_capacity(capacity);

        HashMap {
            buckets: empty_buckets(num_buckets),
            len: 0,
            hash_builder,
        }
    }

    /// Returns the number of elements in this map.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if this `HashMap` contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements this `HashMap` can hold without growing
    /// its bucket array.
    pub fn capacity(&self) -> usize {
        // largest len that keeps len / bucket_count strictly below the
        // growth threshold
        (self.buckets.len() as f64 * MAX_LOAD_FACTOR).ceil() as usize - 1
    }

    /// Returns the current number of buckets.
    ///
    /// The bucket count starts at 20 and doubles on each growth; it never
    /// decreases.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns a reference to the value corresponding to `key`, or [`None`] if
    /// this map contains no such key.
    ///
    /// `Q` can be any borrowed form of `K`, but [`Hash`] and [`Eq`] on `Q`
    /// *must* match that of `K`.
    ///
    /// [`None`]: https://doc.rust-lang.org/std/option/enum.Option.html#variant.None
    /// [`Hash`]: https://doc.rust-lang.org/std/hash/trait.Hash.html
    /// [`Eq`]: https://doc.rust-lang.org/std/cmp/trait.Eq.html
    pub fn get<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the key-value pair corresponding to `key`, or [`None`] if this
    /// map contains no such key.
    ///
    /// `Q` can be any borrowed form of `K`, but [`Hash`] and [`Eq`] on `Q`
    /// *must* match that of `K`.
    ///
    /// [`None`]: https://doc.rust-lang.org/std/option/enum.Option.html#variant.None
    /// [`Hash`]: https://doc.rust-lang.org/std/hash/trait.Hash.html
    /// [`Eq`]: https://doc.rust-lang.org/std/cmp/trait.Eq.html
    pub fn get_key_value<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
    {
        let index = self.bucket_index(key);
        let mut current = self.buckets[index].as_deref();

        while let Some(entry) = current {
            if entry.key.borrow() == key {
                return Some((&entry.key, &entry.value));
            }

            current = entry.next.as_deref();
        }

        None
    }

    /// Returns a mutable reference to the value corresponding to `key`, or
    /// [`None`] if this map contains no such key.
    ///
    /// `Q` can be any borrowed form of `K`, but [`Hash`] and [`Eq`] on `Q`
    /// *must* match that of `K`.
    ///
    /// [`None`]: https://doc.rust-lang.org/std/option/enum.Option.html#variant.None
    /// [`Hash`]: https://doc.rust-lang.org/std/hash/trait.Hash.html
    /// [`Eq`]: https://doc.rust-lang.org/std/cmp/trait.Eq.html
    pub fn get_mut<Q: ?Sized + Hash + Eq>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
    {
        let index = self.bucket_index(key);
        let mut current = self.buckets[index].as_deref_mut();

        while let Some(entry) = current {
            if entry.key.borrow() == key {
                return Some(&mut entry.value);
            }

            current = entry.next.as_deref_mut();
        }

        None
    }

    /// Returns true if this map contains a value associated with `key`.
    ///
    /// `Q` can be any borrowed form of `K`, but [`Hash`] and [`Eq`] on `Q`
    /// *must* match that of `K`.
    ///
    /// [`Hash`]: https://doc.rust-lang.org/std/hash/trait.Hash.html
    /// [`Eq`]: https://doc.rust-lang.org/std/cmp/trait.Eq.html
    pub fn contains_key<Q: ?Sized + Hash + Eq>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
    {
        self.get_key_value(key).is_some()
    }

    /// Inserts a key-value pair into the map, returning the value previously
    /// associated with `key`.
    ///
    /// If the key was not previously present in this hash map, [`None`] is
    /// returned. The key itself is never replaced: repeated insertions with an
    /// equal key keep the first key and overwrite the value in place.
    ///
    /// A new key is inserted at the head of its bucket's chain. If that
    /// insertion pushes the load factor to 0.7 or above, the bucket array
    /// doubles and every entry is relinked before this method returns, so the
    /// map observed by the caller is always fully consistent.
    ///
    /// [`None`]: https://doc.rust-lang.org/std/option/enum.Option.html#variant.None
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_index(&key);
        let mut current = self.buckets[index].as_deref_mut();

        while let Some(entry) = current {
            if entry.key == key {
                return Some(mem::replace(&mut entry.value, value));
            }

            current = entry.next.as_deref_mut();
        }

        let next = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Entry { key, value, next }));
        self.len += 1;

        if self.load_factor() >= MAX_LOAD_FACTOR {
            self.grow();
        }

        None
    }

    /// Removes the value associated with `key` from this map, returning it if
    /// there was one.
    ///
    /// Removing a key that is not present, including from an entirely empty
    /// map, is a no-op that returns [`None`].
    ///
    /// `Q` can be any borrowed form of `K`, but [`Hash`] and [`Eq`] on `Q`
    /// *must* match that of `K`.
    ///
    /// [`None`]: https://doc.rust-lang.org/std/option/enum.Option.html#variant.None
    /// [`Hash`]: https://doc.rust-lang.org/std/hash/trait.Hash.html
    /// [`Eq`]: https://doc.rust-lang.org/std/cmp/trait.Eq.html
    pub fn remove<Q: ?Sized + Hash + Eq>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
    {
        let index = self.bucket_index(key);
        let mut cursor = &mut self.buckets[index];

        // walk the chain one link at a time; on a match, splice the entry's
        // successor into the link that held it. The bucket head is just the
        // first link, so an empty bucket falls out as the first `None`.
        loop {
            match cursor {
                None => return None,
                Some(entry) if entry.key.borrow() == key => {
                    let next = entry.next.take();
                    let removed = mem::replace(cursor, next);
                    self.len -= 1;

                    return removed.map(|entry| entry.value);
                }
                Some(entry) => cursor = &mut entry.next,
            }
        }
    }

    /// Removes all elements from this map.
    ///
    /// The bucket array keeps its current size.
    pub fn clear(&mut self) {
        for slot in &mut self.buckets {
            drop_chain(slot.take());
        }

        self.len = 0;
    }

    /// Returns an iterator visiting every key-value pair in this map.
    ///
    /// Pairs are yielded in bucket order, then chain order within a bucket.
    /// That order is an artifact of hashing and insertion history; no ordering
    /// is guaranteed and none should be relied upon.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
            remaining: self.len,
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> HashMap<K, V, S> {
    fn get_hash<Q: ?Sized + Hash>(&self, key: &Q) -> u64 {
        let mut hasher = self.hash_builder.build_hasher();
        key.hash(&mut hasher);

        hasher.finish()
    }

    /// Maps `key` to a slot of the current bucket array.
    ///
    /// The hash is an unsigned 64-bit value, so the remainder is already
    /// within `[0, bucket_count)`; no sign normalization is required.
    fn bucket_index<Q: ?Sized + Hash>(&self, key: &Q) -> usize {
        (self.get_hash(key) % self.buckets.len() as u64) as usize
    }

    fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Doubles the bucket array and relinks every entry by its recomputed
    /// index.
    ///
    /// Each entry is unlinked from its old chain and pushed onto the head of
    /// its new one, so every entry moves exactly once and no entry is ever
    /// cloned or reallocated.
    fn grow(&mut self) {
        let new_num_buckets = self.buckets.len() * 2;
        let old_buckets = mem::replace(&mut self.buckets, empty_buckets(new_num_buckets));

        for mut chain in old_buckets {
            while let Some(mut entry) = chain {
                chain = entry.next.take();

                let index = self.bucket_index(&entry.key);
                entry.next = self.buckets[index].take();
                self.buckets[index] = Some(entry);
            }
        }
    }
}

impl<K: Hash + Eq, V> Default for HashMap<K, V, DefaultHashBuilder> {
    fn default() -> HashMap<K, V, DefaultHashBuilder> {
        HashMap::new()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Drop for HashMap<K, V, S> {
    fn drop(&mut self) {
        // unlink each chain iteratively; recursing through `Entry::next`
        // drops would overflow the stack on a sufficiently long chain
        for slot in &mut self.buckets {
            drop_chain(slot.take());
        }
    }
}

impl<K: Hash + Eq + fmt::Debug, V: fmt::Debug, S: BuildHasher> fmt::Debug for HashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Renders one `key -> value` line per entry, in bucket order then chain
/// order. Diagnostic output only; the line order is not a stable contract.
impl<K: Hash + Eq + fmt::Display, V: fmt::Display, S: BuildHasher> fmt::Display
    for HashMap<K, V, S>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.iter() {
            writeln!(f, "{} -> {}", key, value)?;
        }

        Ok(())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> FromIterator<(K, V)> for HashMap<K, V, S> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> HashMap<K, V, S> {
        let iter = iter.into_iter();
        let (lower_bound, _) = iter.size_hint();

        let mut map = HashMap::with_capacity_and_hasher(lower_bound, S::default());
        map.extend(iter);

        map
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Extend<(K, V)> for HashMap<K, V, S> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Hash + Eq, V, S: BuildHasher> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// An iterator over the entries of a `HashMap`, created by
/// [`HashMap::iter`](struct.HashMap.html#method.iter).
pub struct Iter<'a, K, V> {
    buckets: slice::Iter<'a, Chain<K, V>>,
    current: Option<&'a Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        loop {
            if let Some(entry) = self.current {
                self.current = entry.next.as_deref();
                self.remaining -= 1;

                return Some((&entry.key, &entry.value));
            }

            self.current = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// One key-value pair on a bucket's chain. Each entry exclusively owns its
/// successor.
struct Entry<K, V> {
    key: K,
    value: V,
    next: Option<Box<Entry<K, V>>>,
}

fn empty_buckets<K, V>(num_buckets: usize) -> Vec<Chain<K, V>> {
    std::iter::repeat_with(|| None).take(num_buckets).collect()
}

/// Smallest bucket count that holds `capacity` entries under the growth
/// threshold, floored at `INITIAL_BUCKETS`.
fn buckets_for_capacity(capacity: usize) -> usize {
    let min_buckets = (capacity as f64 / MAX_LOAD_FACTOR).floor() as usize + 1;

    min_buckets.max(INITIAL_BUCKETS)
}

fn drop_chain<K, V>(mut chain: Chain<K, V>) {
    while let Some(mut entry) = chain {
        chain = entry.next.take();
    }
}
