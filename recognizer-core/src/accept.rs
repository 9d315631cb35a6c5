//! Accepting-set membership.
//!
//! The evaluator only ever asks "is this state accepting?", so the accepting
//! set is a query rather than a container type. Implementations are provided
//! for the standard sets and maps, slices and vectors, arbitrary predicates
//! (via [`Predicate`]) and a dense bit-set ([`StateSet`]).

use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::{BuildHasher, Hash};

/// A set of accepting states.
pub trait Accept<S: ?Sized> {
    /// Returns true if `state` is accepting.
    fn accepts(&self, state: &S) -> bool;
}

impl<S: ?Sized, P: Accept<S> + ?Sized> Accept<S> for &P {
    fn accepts(&self, state: &S) -> bool {
        (**self).accepts(state)
    }
}

impl<S: Eq + Hash, H: BuildHasher> Accept<S> for HashSet<S, H> {
    fn accepts(&self, state: &S) -> bool {
        self.contains(state)
    }
}

impl<S: Ord> Accept<S> for BTreeSet<S> {
    fn accepts(&self, state: &S) -> bool {
        self.contains(state)
    }
}

/// A state maps to its accepting flag; states absent from the map reject.
impl<S: Eq + Hash, H: BuildHasher> Accept<S> for HashMap<S, bool, H> {
    fn accepts(&self, state: &S) -> bool {
        self.get(state).copied().unwrap_or(false)
    }
}

impl<S: PartialEq> Accept<S> for [S] {
    fn accepts(&self, state: &S) -> bool {
        self.contains(state)
    }
}

impl<S: PartialEq, const N: usize> Accept<S> for [S; N] {
    fn accepts(&self, state: &S) -> bool {
        self.contains(state)
    }
}

impl<S: PartialEq> Accept<S> for Vec<S> {
    fn accepts(&self, state: &S) -> bool {
        self.contains(state)
    }
}

/// Accepting set given by a predicate over states.
///
/// ```
/// use recognizer_core::{Accept, Predicate};
///
/// let divisible = Predicate(|q: &u32| *q == 0);
/// assert!(divisible.accepts(&0));
/// assert!(!divisible.accepts(&2));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Predicate<F>(pub F);

impl<S: ?Sized, F> Accept<S> for Predicate<F>
where
    F: Fn(&S) -> bool,
{
    fn accepts(&self, state: &S) -> bool {
        (self.0)(state)
    }
}

const WORD_BITS: usize = u64::BITS as usize;

/// Growable bit-set over dense state indices.
#[derive(Debug, Clone, Default)]
pub struct StateSet {
    words: Vec<u64>,
    len: usize,
}

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with room for indices below `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
            len: 0,
        }
    }

    /// Inserts `index`. Returns true if it was not already present.
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, mask) = Self::locate(index);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }

        let fresh = self.words[word] & mask == 0;
        if fresh {
            self.words[word] |= mask;
            self.len += 1;
        }
        fresh
    }

    /// Removes `index`. Returns true if it was present.
    pub fn remove(&mut self, index: usize) -> bool {
        let (word, mask) = Self::locate(index);
        match self.words.get_mut(word) {
            Some(w) if *w & mask != 0 => {
                *w &= !mask;
                self.len -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        let (word, mask) = Self::locate(index);
        self.words.get(word).is_some_and(|w| w & mask != 0)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over the members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            (0..WORD_BITS)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| i * WORD_BITS + bit)
        })
    }

    fn locate(index: usize) -> (usize, u64) {
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }
}

impl FromIterator<usize> for StateSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = StateSet::new();
        for index in iter {
            set.insert(index);
        }
        set
    }
}

impl Accept<usize> for StateSet {
    fn accepts(&self, state: &usize) -> bool {
        self.contains(*state)
    }
}
