//! Regions: arbitrary sets of grid locations and their algebra
//!
//! Backed by an ordered set so that iteration (and every float sum taken
//! over a region) is reproducible between runs.

use std::collections::{BTreeSet, VecDeque};

use crate::core::types::Location;

/// Set of grid locations with no implied shape
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Region {
    locations: BTreeSet<Location>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    /// Half-open rectangle `[min_x, max_x) x [min_y, max_y)`
    pub fn rect(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self::from_fn(min_x, max_x, min_y, max_y, |_| true)
    }

    /// All locations in the half-open bounding box satisfying `keep`
    pub fn from_fn(
        min_x: i32,
        max_x: i32,
        min_y: i32,
        max_y: i32,
        mut keep: impl FnMut(Location) -> bool,
    ) -> Self {
        (min_x..max_x)
            .flat_map(|x| (min_y..max_y).map(move |y| Location::new(x, y)))
            .filter(|&loc| keep(loc))
            .collect()
    }

    pub fn single(location: Location) -> Self {
        std::iter::once(location).collect()
    }

    #[inline]
    pub fn contains(&self, location: &Location) -> bool {
        self.locations.contains(location)
    }

    pub fn insert(&mut self, location: Location) -> bool {
        self.locations.insert(location)
    }

    pub fn remove(&mut self, location: &Location) -> bool {
        self.locations.remove(location)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> + '_ {
        self.locations.iter()
    }

    pub fn union(&self, other: &Region) -> Region {
        self.locations.union(&other.locations).copied().collect()
    }

    pub fn intersection(&self, other: &Region) -> Region {
        self.locations.intersection(&other.locations).copied().collect()
    }

    pub fn difference(&self, other: &Region) -> Region {
        self.locations.difference(&other.locations).copied().collect()
    }

    /// True when the two regions share at least one location
    pub fn intersects(&self, other: &Region) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().any(|loc| large.contains(loc))
    }

    pub fn is_subset(&self, other: &Region) -> bool {
        self.locations.is_subset(&other.locations)
    }

    pub fn extend(&mut self, other: &Region) {
        self.locations.extend(other.locations.iter().copied());
    }

    /// Partition into maximal 8-connected components
    ///
    /// Components are pairwise disjoint and their union is `self`. The order
    /// of the returned components carries no meaning.
    pub fn split_into_components(&self) -> Vec<Region> {
        let mut remaining = self.locations.clone();
        let mut components = Vec::new();

        while let Some(seed) = remaining.pop_first() {
            let mut component = Region::single(seed);
            let mut frontier = VecDeque::from([seed]);

            while let Some(location) = frontier.pop_front() {
                for neighbor in location.neighbors() {
                    if remaining.remove(&neighbor) {
                        component.insert(neighbor);
                        frontier.push_back(neighbor);
                    }
                }
            }

            components.push(component);
        }

        components
    }
}

impl FromIterator<Location> for Region {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        Self {
            locations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Region {
    type Item = &'a Location;
    type IntoIter = std::collections::btree_set::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

impl IntoIterator for Region {
    type Item = Location;
    type IntoIter = std::collections::btree_set::IntoIter<Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.into_iter()
    }
}
