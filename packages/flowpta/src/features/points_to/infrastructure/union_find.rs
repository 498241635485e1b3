//! Union-Find (Disjoint Set Union) Data Structure
//!
//! Path compression + union by rank over dense `u32` elements. Field
//! co-propagation uses it to group variables connected by copy edges.
//!
//! # References
//! - Tarjan, R. E. "Efficiency of a Good But Not Linear Set Union Algorithm" (1975)

/// Union-Find with path compression and union by rank
#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    /// Parent pointers (self-loop = root)
    parent: Vec<u32>,

    /// Rank (tree height upper bound) for union by rank
    rank: Vec<u8>,

    /// Number of disjoint sets
    set_count: usize,
}

impl UnionFind {
    /// Create a new Union-Find with n elements (0..n-1)
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
            rank: vec![0; n],
            set_count: n,
        }
    }

    /// Ensure element exists in the structure
    pub fn make_set(&mut self, x: u32) {
        let idx = x as usize;
        let old_len = self.parent.len();
        if idx >= old_len {
            self.parent.extend(old_len as u32..=x);
            self.rank.resize(idx + 1, 0);
            self.set_count += idx + 1 - old_len;
        }
    }

    /// Find the representative (root) of element x with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        self.make_set(x);

        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        // Path compression
        let mut current = x;
        while self.parent[current as usize] != root {
            let next = self.parent[current as usize];
            self.parent[current as usize] = root;
            current = next;
        }
        root
    }

    /// Union two sets by rank, returning the new representative
    pub fn union(&mut self, x: u32, y: u32) -> u32 {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return root_x;
        }

        let rx = root_x as usize;
        let ry = root_y as usize;
        self.set_count -= 1;

        if self.rank[rx] < self.rank[ry] {
            self.parent[rx] = root_y;
            root_y
        } else if self.rank[rx] > self.rank[ry] {
            self.parent[ry] = root_x;
            root_x
        } else {
            self.parent[ry] = root_x;
            self.rank[rx] += 1;
            root_x
        }
    }

    /// Number of disjoint sets
    #[inline]
    pub fn set_count(&self) -> usize {
        self.set_count
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}
