//! Group keys
//!
//! Readings are grouped by device, calendar month and sensor channel. The set of channels is
//! fixed, so it is modelled as a closed enum rather than a string.

use std::cmp::Ordering;

use hashbrown::Equivalent;
use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};

/// Sensor channels reported by every device.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, IntoStaticStr, PartialEq, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Temperature,
    Humidity,
    Luminosity,
    Noise,
    Eco2,
    Etvoc,
}

impl Channel {
    /// All channels, in the order they appear in an input record.
    pub const ALL: [Channel; 6] = [
        Channel::Temperature,
        Channel::Humidity,
        Channel::Luminosity,
        Channel::Noise,
        Channel::Eco2,
        Channel::Etvoc,
    ];

    /// Returns the lowercase name of the channel.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Owned key of one aggregation bucket.
///
/// Two keys are equal iff device, month and channel are all equal. No normalisation is applied.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct GroupKey {
    pub device: String,
    pub month: String,
    pub channel: Channel,
}

impl GroupKey {
    pub fn new(device: impl Into<String>, month: impl Into<String>, channel: Channel) -> Self {
        Self {
            device: device.into(),
            month: month.into(),
            channel,
        }
    }

    /// Returns a borrowed view of this key.
    pub fn borrowed(&self) -> GroupKeyRef<'_> {
        GroupKeyRef {
            device: &self.device,
            month: &self.month,
            channel: self.channel,
        }
    }

    /// Canonical ordering: device, then month, then channel name, all ascending.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.borrowed().canonical_cmp(&other.borrowed())
    }
}

/// Borrowed key used to look up a bucket without allocating.
///
/// Field order and types hash identically to [GroupKey].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GroupKeyRef<'a> {
    pub device: &'a str,
    pub month: &'a str,
    pub channel: Channel,
}

impl<'a> GroupKeyRef<'a> {
    pub fn new(device: &'a str, month: &'a str, channel: Channel) -> Self {
        Self {
            device,
            month,
            channel,
        }
    }

    pub fn into_owned(self) -> GroupKey {
        GroupKey::new(self.device, self.month, self.channel)
    }

    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        (self.device, self.month, self.channel.name()).cmp(&(
            other.device,
            other.month,
            other.channel.name(),
        ))
    }
}

impl Equivalent<GroupKey> for GroupKeyRef<'_> {
    fn equivalent(&self, key: &GroupKey) -> bool {
        self.device == key.device && self.month == key.month && self.channel == key.channel
    }
}
