//! Per-vertex epsilon groups read from an epsilon sidecar file.
//!
//! Each `eps` line opens a new group (ids start at 1) and every following
//! `id` line adds vertex indices to that group. Group 0 collects ids seen
//! before any `eps` line and has no epsilon value.
//!
//! A vertex listed in several groups resolves to the highest group id:
//! later groups overwrite earlier ones, in file order.

use std::collections::BTreeMap;

/// Value of vertices not listed in any group.
pub const UNSET_EPSILON: f64 = -1.0;

/// Group id → epsilon and group id → vertex indices.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EpsilonMap {
    group_count: u32,
    epsilons: BTreeMap<u32, f64>,
    members: BTreeMap<u32, Vec<usize>>,
}

impl EpsilonMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `eps` groups opened so far.
    pub fn group_count(&self) -> u32 {
        self.group_count
    }

    /// Open a new group with `epsilon` and return its id.
    pub fn begin_group(&mut self, epsilon: f64) -> u32 {
        self.group_count += 1;
        self.epsilons.insert(self.group_count, epsilon);
        self.group_count
    }

    /// Add vertex indices to the current group.
    pub fn extend_current<I: IntoIterator<Item = usize>>(&mut self, ids: I) {
        self.members
            .entry(self.group_count)
            .or_default()
            .extend(ids);
    }

    pub fn epsilon(&self, group: u32) -> Option<f64> {
        self.epsilons.get(&group).copied()
    }

    pub fn members(&self, group: u32) -> &[usize] {
        self.members.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Vertex ids listed before the first `eps` line.
    pub fn orphans(&self) -> &[usize] {
        self.members(0)
    }

    /// Group a vertex resolves to (last group wins).
    pub fn group_of(&self, vertex: usize) -> Option<u32> {
        (1..=self.group_count)
            .rev()
            .find(|g| self.members(*g).contains(&vertex))
    }

    /// Project onto a per-vertex array of length `num_vertices`.
    ///
    /// Unlisted vertices get [`UNSET_EPSILON`]. Returns the indices that were
    /// out of range so the caller can report them.
    pub fn project(&self, num_vertices: usize) -> (Vec<f64>, Vec<usize>) {
        let mut values = vec![UNSET_EPSILON; num_vertices];
        let mut out_of_range = Vec::new();
        for group in 1..=self.group_count {
            let Some(eps) = self.epsilon(group) else {
                continue;
            };
            for &id in self.members(group) {
                match values.get_mut(id) {
                    Some(slot) => *slot = eps,
                    None => out_of_range.push(id),
                }
            }
        }
        (values, out_of_range)
    }
}
