//! Lexicographic k-subsets of `0..n` (indices ascending within each subset).

/// Iterator over all `k`-element index subsets of `0..n` in lexicographic order.
///
/// `k == 0` yields a single empty subset; `k > n` yields nothing.
#[derive(Clone, Debug)]
pub struct Combinations {
    n: usize,
    idx: Vec<usize>,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            idx: (0..k).collect(),
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let current = self.idx.clone();
        let k = self.idx.len();
        // rightmost position that can still move up
        match (0..k).rev().find(|&i| self.idx[i] < self.n - k + i) {
            Some(i) => {
                self.idx[i] += 1;
                for j in i + 1..k {
                    self.idx[j] = self.idx[j - 1] + 1;
                }
            }
            None => self.done = true,
        }
        Some(current)
    }
}
