//! City adjacency.

/// Number of cities on the map.
pub const CITY_COUNT: usize = 6;

/// Position of a city in the world's city list.
pub type CityIndex = usize;

/// Explicit neighbor table: city index to the sorted set of adjacent indices.
///
/// The game uses [`Adjacency::linear`], but lookups never assume a line, so
/// any undirected topology built with [`Adjacency::from_edges`] works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    neighbors: Vec<Vec<CityIndex>>,
}

impl Adjacency {
    /// Cities in a row: `i` touches `i - 1` and `i + 1` when those exist.
    #[must_use]
    pub fn linear(len: usize) -> Self {
        Self::from_edges(len, (1..len).map(|i| (i - 1, i)))
    }

    /// Build an undirected table from edge pairs. Self-loops and edges
    /// touching an index `>= len` are ignored.
    #[must_use]
    pub fn from_edges(len: usize, edges: impl IntoIterator<Item = (CityIndex, CityIndex)>) -> Self {
        let mut neighbors = vec![Vec::new(); len];
        for (a, b) in edges {
            if a == b || a >= len || b >= len {
                continue;
            }
            neighbors[a].push(b);
            neighbors[b].push(a);
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        Self { neighbors }
    }

    /// Neighbors of `city` in ascending index order. Empty for unknown indices.
    #[must_use]
    pub fn neighbors(&self, city: CityIndex) -> &[CityIndex] {
        self.neighbors.get(city).map_or(&[], Vec::as_slice)
    }

    /// Whether `a` and `b` share an edge.
    #[must_use]
    pub fn are_adjacent(&self, a: CityIndex, b: CityIndex) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Number of cities the table covers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether the table covers no cities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}

impl Default for Adjacency {
    fn default() -> Self {
        Self::linear(CITY_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_interior() {
        let adjacency = Adjacency::linear(CITY_COUNT);
        assert_eq!(adjacency.neighbors(3), &[2, 4]);
    }

    #[test]
    fn test_linear_ends_have_one_neighbor() {
        let adjacency = Adjacency::linear(CITY_COUNT);
        assert_eq!(adjacency.neighbors(0), &[1]);
        assert_eq!(adjacency.neighbors(5), &[4]);
    }

    #[test]
    fn test_out_of_range_has_no_neighbors() {
        let adjacency = Adjacency::linear(CITY_COUNT);
        assert!(adjacency.neighbors(6).is_empty());
        assert!(!adjacency.are_adjacent(5, 6));
    }

    #[test]
    fn test_are_adjacent_symmetric() {
        let adjacency = Adjacency::linear(CITY_COUNT);
        assert!(adjacency.are_adjacent(1, 2));
        assert!(adjacency.are_adjacent(2, 1));
        assert!(!adjacency.are_adjacent(1, 3));
        assert!(!adjacency.are_adjacent(2, 2));
    }

    #[test]
    fn test_from_edges_ring() {
        let ring = Adjacency::from_edges(4, [(0, 1), (1, 2), (2, 3), (3, 0), (3, 0), (2, 2), (1, 9)]);
        assert_eq!(ring.neighbors(0), &[1, 3]);
        assert_eq!(ring.neighbors(3), &[0, 2]);
        assert_eq!(ring.neighbors(2), &[1, 3]);
        assert_eq!(ring.len(), 4);
    }
}
