//! Labelings and the cluster sets derived from them
//!
//! A [`Labeling`] maps each record to a cluster. A [`ClusterSet`] is the
//! inverse view (cluster to members) and only lives for the duration of a
//! single computation.

use crate::{Error, RecordId, Result};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Identifier of a (predicted or true) cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(pub u64);

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ClusterId {
    fn from(id: u64) -> Self {
        ClusterId(id)
    }
}

/// Number of unordered pairs among `n` items
#[inline]
pub fn pair_count(n: usize) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}

/// Mapping from record id to cluster id, one entry per record.
///
/// Serialized as a list of `[record_id, cluster_id]` pairs so that integer
/// record ids survive JSON round trips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(RecordId, ClusterId)>", into = "Vec<(RecordId, ClusterId)>")]
pub struct Labeling {
    assignments: AHashMap<RecordId, ClusterId>,
}

impl Labeling {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a labeling, failing if any record is assigned twice
    pub fn from_pairs<I, R, C>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (R, C)>,
        R: Into<RecordId>,
        C: Into<ClusterId>,
    {
        let mut labeling = Self::new();
        for (record, cluster) in pairs {
            labeling.assign(record.into(), cluster.into())?;
        }
        Ok(labeling)
    }

    pub fn assign(&mut self, record: RecordId, cluster: ClusterId) -> Result<()> {
        if self.assignments.contains_key(&record) {
            return Err(Error::DuplicateRecord(record.to_string()));
        }
        self.assignments.insert(record, cluster);
        Ok(())
    }

    pub fn cluster_of(&self, record: &RecordId) -> Option<ClusterId> {
        self.assignments.get(record).copied()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecordId, ClusterId)> {
        self.assignments.iter().map(|(r, c)| (r, *c))
    }

    /// Group records by cluster
    pub fn clusters(&self) -> ClusterSet {
        ClusterSet::from_labeling(self)
    }
}

impl TryFrom<Vec<(RecordId, ClusterId)>> for Labeling {
    type Error = Error;

    fn try_from(pairs: Vec<(RecordId, ClusterId)>) -> Result<Self> {
        Labeling::from_pairs(pairs)
    }
}

impl From<Labeling> for Vec<(RecordId, ClusterId)> {
    fn from(labeling: Labeling) -> Self {
        let mut pairs: Vec<_> = labeling.assignments.into_iter().collect();
        pairs.sort();
        pairs
    }
}

/// The members of one cluster, sorted by record id
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub id: ClusterId,
    pub members: Vec<RecordId>,
}

impl Cluster {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Number of within-cluster (swoosh) pairs
    pub fn pair_count(&self) -> u64 {
        pair_count(self.members.len())
    }

    /// All unordered member pairs, `(members[i], members[j])` with `i < j`
    pub fn pairs(&self) -> impl Iterator<Item = (&RecordId, &RecordId)> + '_ {
        self.members
            .iter()
            .enumerate()
            .flat_map(move |(i, a)| self.members[i + 1..].iter().map(move |b| (a, b)))
    }
}

/// Clusters of a labeling, ordered by cluster id
#[derive(Debug, Clone, Default)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
    records: usize,
}

impl ClusterSet {
    pub fn from_labeling(labeling: &Labeling) -> Self {
        let mut grouped: AHashMap<ClusterId, Vec<RecordId>> = AHashMap::new();
        for (record, cluster) in labeling.iter() {
            grouped.entry(cluster).or_default().push(record.clone());
        }

        let mut clusters: Vec<Cluster> = grouped
            .into_iter()
            .map(|(id, mut members)| {
                members.sort();
                Cluster { id, members }
            })
            .collect();
        clusters.sort_by_key(|c| c.id);

        Self {
            clusters,
            records: labeling.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    /// Clusters holding at least one pair
    pub fn non_singletons(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(|c| c.size() >= 2)
    }

    /// Total number of within-cluster pairs, Σ k(k-1)/2
    pub fn intra_pair_count(&self) -> u64 {
        self.clusters.iter().map(Cluster::pair_count).sum()
    }
}

impl<'a> IntoIterator for &'a ClusterSet {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}
