use std::{collections::BTreeSet, hash::Hash};

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// A partition groups elements of type `I` into disjoint classes. Each class is identified
/// by its position, which is what [`Partition::class_of`] returns.
#[derive(Debug, Clone)]
pub struct Partition<I: Hash + Eq>(Vec<BTreeSet<I>>);

impl<I: Hash + Eq> std::ops::Deref for Partition<I> {
    type Target = Vec<BTreeSet<I>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<I: Hash + Eq> PartialEq for Partition<I> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|o| other.contains(o))
    }
}
impl<I: Hash + Eq> Eq for Partition<I> {}

impl<I: Hash + Eq + Ord> Partition<I> {
    /// Returns the size of the partition, i.e. the number of classes.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a new partition from an iterator that yields iterators
    /// which yield elements of type `I`.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|it| it.into_iter().collect::<BTreeSet<_>>())
                .collect(),
        )
    }

    /// Builds a partition from a class assignment, where `classes[i]` is the class of the
    /// element `elements[i]`. Class ids need not be contiguous, empty classes are dropped.
    pub fn from_assignment<X>(elements: X, classes: &[usize]) -> Self
    where
        X: IntoIterator<Item = I>,
    {
        let mut blocks: Vec<BTreeSet<I>> = vec![];
        for (element, &class) in elements.into_iter().zip(classes) {
            if blocks.len() <= class {
                blocks.resize_with(class + 1, BTreeSet::new);
            }
            blocks[class].insert(element);
        }
        blocks.retain(|block| !block.is_empty());
        Self(blocks)
    }

    /// Returns the position of the class containing `element`, if any.
    pub fn class_of(&self, element: &I) -> Option<usize> {
        self.0.iter().position(|class| class.contains(element))
    }
}

#[cfg(test)]
mod tests {
    use super::Partition;

    #[test]
    fn partition_from_assignment() {
        let partition = Partition::from_assignment(['a', 'b', 'c', 'd'], &[2, 0, 2, 0]);
        assert_eq!(partition.size(), 2);
        assert_eq!(partition.class_of(&'a'), partition.class_of(&'c'));
        assert_ne!(partition.class_of(&'a'), partition.class_of(&'b'));
        assert_eq!(partition, Partition::new([vec!['b', 'd'], vec!['a', 'c']]));
    }
}
