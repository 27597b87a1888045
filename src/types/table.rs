//! Group tables
//!
//! A [GroupTable] maps each [GroupKey] to its running [Aggregate]. The same type backs both the
//! worker-private local tables and the merged global table.

use hashbrown::HashMap;

use crate::error::SensorStatsError;
use crate::types::{Aggregate, GroupKey, GroupKeyRef};

/// Hash-keyed mapping from group key to aggregate, with an optional limit on distinct keys.
#[derive(Clone, Debug, Default)]
pub struct GroupTable {
    /// Aggregates by group.
    groups: HashMap<GroupKey, Aggregate>,

    /// Optional maximum number of distinct groups.
    max_groups: Option<usize>,
}

impl GroupTable {
    /// Returns an empty table.
    ///
    /// # Arguments
    ///
    /// * `max_groups`: Optional maximum number of distinct groups. Inserting a group beyond this
    ///   limit is an error. `None` allows unbounded growth.
    pub fn new(max_groups: Option<usize>) -> Self {
        Self {
            groups: HashMap::new(),
            max_groups,
        }
    }

    /// Folds a single value into the group identified by `key`, creating the group if needed.
    ///
    /// Lookups use the borrowed key, so only the first value of a group allocates.
    pub fn update(&mut self, key: GroupKeyRef<'_>, value: f64) -> Result<(), SensorStatsError> {
        if let Some(aggregate) = self.groups.get_mut(&key) {
            aggregate.update(value);
            return Ok(());
        }
        self.insert_new(key.into_owned(), Aggregate::new(value))
    }

    /// Merges a partial aggregate into the group identified by `key`.
    ///
    /// A group new to this table takes the incoming aggregate verbatim.
    pub fn merge_aggregate(
        &mut self,
        key: GroupKey,
        aggregate: Aggregate,
    ) -> Result<(), SensorStatsError> {
        if let Some(existing) = self.groups.get_mut(&key) {
            existing.merge(&aggregate);
            return Ok(());
        }
        self.insert_new(key, aggregate)
    }

    /// Merges every group of `other` into this table, consuming it.
    pub fn merge(&mut self, other: GroupTable) -> Result<(), SensorStatsError> {
        for (key, aggregate) in other.groups {
            self.merge_aggregate(key, aggregate)?;
        }
        Ok(())
    }

    /// Replaces the limit on distinct groups, failing if the table already exceeds it.
    pub fn with_max_groups(mut self, max_groups: Option<usize>) -> Result<Self, SensorStatsError> {
        if let Some(capacity) = max_groups {
            if self.groups.len() > capacity {
                return Err(SensorStatsError::GroupCapacityExceeded { capacity });
            }
        }
        self.max_groups = max_groups;
        Ok(self)
    }

    fn insert_new(&mut self, key: GroupKey, aggregate: Aggregate) -> Result<(), SensorStatsError> {
        if let Some(max_groups) = self.max_groups {
            if self.groups.len() >= max_groups {
                return Err(SensorStatsError::GroupCapacityExceeded {
                    capacity: max_groups,
                });
            }
        }
        self.groups
            .try_reserve(1)
            .map_err(|_| SensorStatsError::ResourceExhaustion {
                context: "growing group table",
            })?;
        self.groups.insert(key, aggregate);
        Ok(())
    }

    /// Returns the aggregate for a group, if present.
    pub fn get(&self, key: GroupKeyRef<'_>) -> Option<&Aggregate> {
        self.groups.get(&key)
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn max_groups(&self) -> Option<usize> {
        self.max_groups
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &Aggregate)> {
        self.groups.iter()
    }
}

impl IntoIterator for GroupTable {
    type Item = (GroupKey, Aggregate);
    type IntoIter = hashbrown::hash_map::IntoIter<GroupKey, Aggregate>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}
