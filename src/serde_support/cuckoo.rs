//! Serde support for [`CuckooFilter`].
//!
//! The filter goes through a flat, versioned intermediate struct. The hasher
//! is not serialized: deserialization builds it with `H::default()`, so a
//! filter written with a custom-seeded hasher must be restored through
//! [`CuckooFilter::from_raw_slots`] instead.

use super::SERIALIZATION_VERSION;
use crate::core::params::{DuplicatePolicy, FilterConfig};
use crate::core::table::Fingerprint;
use crate::error::{CuckooCraftError, Result};
use crate::filters::CuckooFilter;
use crate::hash::ElementHasher;
use serde::{Deserialize, Serialize};

/// Serializable representation of a cuckoo filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CuckooFilterSerde {
    /// Format version for compatibility
    version: u16,
    table_size: usize,
    bucket_capacity: usize,
    fingerprint_bits: u32,
    max_kicks: u32,
    seed: u64,
    duplicate_policy: DuplicatePolicy,
    /// Occupied slots at serialization time
    count: usize,
    /// Raw slot array, bucket-major
    slots: Vec<Fingerprint>,
}

impl CuckooFilterSerde {
    fn from_filter<H: ElementHasher>(filter: &CuckooFilter<H>) -> Self {
        let config = filter.config();
        Self {
            version: SERIALIZATION_VERSION,
            table_size: config.table_size,
            bucket_capacity: config.bucket_capacity,
            fingerprint_bits: config.fingerprint_bits,
            max_kicks: config.max_kicks,
            seed: config.seed,
            duplicate_policy: config.duplicate_policy,
            count: filter.len(),
            slots: filter.raw_slots().to_vec(),
        }
    }

    fn into_filter<H: ElementHasher + Default>(self) -> Result<CuckooFilter<H>> {
        if self.version != SERIALIZATION_VERSION {
            return Err(CuckooCraftError::serialization_error(format!(
                "incompatible serialization version: expected {SERIALIZATION_VERSION}, got {}",
                self.version
            )));
        }

        let config = FilterConfig::new(self.table_size, self.bucket_capacity, self.fingerprint_bits)
            .with_max_kicks(self.max_kicks)
            .with_seed(self.seed)
            .with_duplicate_policy(self.duplicate_policy);

        let filter = CuckooFilter::from_raw_slots(config, H::default(), self.slots)?;
        if filter.len() != self.count {
            return Err(CuckooCraftError::serialization_error(format!(
                "count mismatch: stored {}, table holds {}",
                self.count,
                filter.len()
            )));
        }
        Ok(filter)
    }
}

impl<H: ElementHasher> Serialize for CuckooFilter<H> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        CuckooFilterSerde::from_filter(self).serialize(serializer)
    }
}

impl<'de, H: ElementHasher + Default> Deserialize<'de> for CuckooFilter<H> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        CuckooFilterSerde::deserialize(deserializer)?
            .into_filter()
            .map_err(serde::de::Error::custom)
    }
}
