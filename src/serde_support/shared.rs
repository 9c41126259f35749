//! Serde support for [`SharedCuckooFilter`].
//!
//! Serialization holds the read lock for the duration of the encode, so the
//! output is a consistent image between whole batches. Metrics are not part
//! of the image; a deserialized filter starts with fresh counters.

use crate::filters::CuckooFilter;
use crate::hash::ElementHasher;
use crate::sync::SharedCuckooFilter;
use serde::{Deserialize, Serialize};

impl<H: ElementHasher + Clone> Serialize for SharedCuckooFilter<H> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.with_shared(|filter| filter.serialize(serializer))
    }
}

impl<'de, H: ElementHasher + Clone + Default> Deserialize<'de> for SharedCuckooFilter<H> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        CuckooFilter::<H>::deserialize(deserializer).map(SharedCuckooFilter::from_filter)
    }
}
