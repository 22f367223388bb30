//! Compact integer collections: index arrays, index sets and index pair sets.
//!
//! All inputs are checked to be `Int` before the runtime is touched, so a
//! rejected conversion allocates nothing.

use std::collections::{BTreeMap, BTreeSet};

use ocbridge_runtime::{Handle, Owned};

use crate::dispatch::Bridge;
use crate::error::{BridgeError, Result};
use crate::value::HostValue;

/// Extract integers, rejecting anything else (booleans included).
fn integers(values: &[HostValue], what: &str) -> Result<Vec<i64>> {
    values
        .iter()
        .map(|value| integer(value, what))
        .collect()
}

fn integer(value: &HostValue, what: &str) -> Result<i64> {
    value.as_int().ok_or_else(|| {
        BridgeError::type_error(format!(
            "{} requires integers, got {}",
            what,
            value.type_name()
        ))
    })
}

impl<'rt> Bridge<'rt> {
    // === Index arrays ===

    pub fn index_array_to_foreign(&self, values: &[HostValue]) -> Result<Owned<'rt>> {
        let values = integers(values, "index array")?;
        let rt = self.runtime;
        let staging = Owned::adopt(rt, rt.index_array_create_mutable(values.len())?);
        for value in values {
            rt.index_array_append(staging.handle(), value)?;
        }
        self.seal(staging, "OCIndexArray", |rt, h| rt.index_array_create_copy(h))
    }

    pub fn foreign_to_index_array(&self, array: Handle) -> Result<Vec<i64>> {
        let rt = self.runtime;
        let count = rt.index_array_count(array)?;
        (0..count)
            .map(|i| rt.index_array_value_at(array, i).map_err(BridgeError::from))
            .collect()
    }

    // === Index sets ===

    pub fn index_set_to_foreign(&self, values: &[HostValue]) -> Result<Owned<'rt>> {
        let values = integers(values, "index set")?;
        let rt = self.runtime;
        let staging = Owned::adopt(rt, rt.index_set_create_mutable()?);
        for value in values {
            rt.index_set_add(staging.handle(), value)?;
        }
        self.seal(staging, "OCIndexSet", |rt, h| rt.index_set_create_copy(h))
    }

    /// Read an index set back.
    ///
    /// The runtime only reports count, first and last. Empty sets, singletons
    /// and contiguous ranges come back exactly; any other set comes back as
    /// just its first and last index, with a warning.
    pub fn foreign_to_index_set(&self, set: Handle) -> Result<BTreeSet<i64>> {
        let rt = self.runtime;
        let count = rt.index_set_count(set)?;
        let (Some(first), Some(last)) = (rt.index_set_first(set)?, rt.index_set_last(set)?) else {
            return Ok(BTreeSet::new());
        };
        if count == 1 {
            return Ok(BTreeSet::from([first]));
        }

        let span = i128::from(last) - i128::from(first) + 1;
        if span == count as i128 {
            return Ok((first..=last).collect());
        }

        tracing::warn!(
            count,
            first,
            last,
            "index set is not contiguous, only its bounds are recovered"
        );
        Ok(BTreeSet::from([first, last]))
    }

    // === Index pair sets ===

    pub fn index_pair_map_to_foreign(
        &self,
        entries: &[(HostValue, HostValue)],
    ) -> Result<Owned<'rt>> {
        let pairs = entries
            .iter()
            .map(|(index, value)| -> Result<(i64, i64)> {
                Ok((
                    integer(index, "index pair map")?,
                    integer(value, "index pair map")?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let rt = self.runtime;
        let staging = Owned::adopt(rt, rt.index_pair_set_create_mutable()?);
        for (index, value) in pairs {
            rt.index_pair_set_add(staging.handle(), index, value)?;
        }
        self.seal(staging, "OCIndexPairSet", |rt, h| {
            rt.index_pair_set_create_copy(h)
        })
    }

    /// Read an index pair set back.
    ///
    /// The runtime has no enumeration, so indices `0..index_pair_probe_limit`
    /// are probed until `count` pairs are found. Pairs outside the window
    /// are lost, with a warning.
    pub fn foreign_to_index_pair_map(&self, set: Handle) -> Result<BTreeMap<i64, i64>> {
        let rt = self.runtime;
        let count = rt.index_pair_set_count(set)?;
        let limit = self.config.index_pair_probe_limit;

        let mut pairs = BTreeMap::new();
        for index in 0..limit as i64 {
            if pairs.len() == count {
                break;
            }
            if let Some(value) = rt.index_pair_set_value_for_index(set, index)? {
                pairs.insert(index, value);
            }
        }

        if pairs.len() < count {
            tracing::warn!(
                found = pairs.len(),
                count,
                limit,
                "index pair set has pairs outside the probe window"
            );
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;
    use crate::error::ErrorKind;
    use crate::extension::ExtensionRegistry;
    use ocbridge_memory_runtime::MemoryRuntime;
    use tracing_test::traced_test;

    fn ints(values: &[i64]) -> Vec<HostValue> {
        values.iter().copied().map(HostValue::Int).collect()
    }

    #[test]
    fn index_array_round_trip() {
        let rt = MemoryRuntime::new();
        let bridge = Bridge::new(&rt);
        let foreign = bridge.index_array_to_foreign(&ints(&[3, -1, 3, 0])).unwrap();
        assert_eq!(
            bridge.foreign_to_index_array(foreign.handle()).unwrap(),
            vec![3, -1, 3, 0]
        );
        assert_eq!(
            bridge.from_foreign(foreign.handle()).unwrap(),
            HostValue::list(ints(&[3, -1, 3, 0]))
        );
    }

    #[test]
    fn non_integers_allocate_nothing() {
        let rt = MemoryRuntime::new();
        let bridge = Bridge::new(&rt);

        let mut mixed = ints(&[1, 2]);
        mixed.push("x".into());
        let err = bridge.index_array_to_foreign(&mixed).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        let err = bridge.index_set_to_foreign(&[true.into()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        let err = bridge
            .index_pair_map_to_foreign(&[(1.into(), "x".into())])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);

        assert_eq!(rt.allocations(), 0);
    }

    #[test]
    fn contiguous_index_sets_are_exact() {
        let rt = MemoryRuntime::new();
        let bridge = Bridge::new(&rt);
        for values in [vec![], vec![7], vec![4, 5, 6, 7]] {
            let foreign = bridge.index_set_to_foreign(&ints(&values)).unwrap();
            let back = bridge.foreign_to_index_set(foreign.handle()).unwrap();
            assert_eq!(back, values.into_iter().collect::<BTreeSet<_>>());
        }
    }

    #[test]
    #[traced_test]
    fn sparse_index_set_keeps_only_bounds() {
        let rt = MemoryRuntime::new();
        let bridge = Bridge::new(&rt);
        let foreign = bridge.index_set_to_foreign(&ints(&[1, 5, 9])).unwrap();
        let back = bridge.foreign_to_index_set(foreign.handle()).unwrap();
        assert_eq!(back, BTreeSet::from([1, 9]));
        assert!(logs_contain("index set is not contiguous"));
    }

    #[test]
    fn pair_map_round_trip() {
        let rt = MemoryRuntime::new();
        let bridge = Bridge::new(&rt);
        let foreign = bridge
            .index_pair_map_to_foreign(&[(0.into(), 10.into()), (42.into(), (-1).into())])
            .unwrap();
        assert_eq!(
            bridge.foreign_to_index_pair_map(foreign.handle()).unwrap(),
            BTreeMap::from([(0, 10), (42, -1)])
        );
    }

    #[test]
    #[traced_test]
    fn pairs_outside_the_window_are_lost() {
        let rt = MemoryRuntime::new();
        let config = BridgeConfig {
            index_pair_probe_limit: 16,
            ..BridgeConfig::default()
        };
        let bridge = Bridge::with_config(&rt, ExtensionRegistry::new(), config);
        let foreign = bridge
            .index_pair_map_to_foreign(&[(3.into(), 30.into()), (100.into(), 1.into())])
            .unwrap();
        assert_eq!(
            bridge.foreign_to_index_pair_map(foreign.handle()).unwrap(),
            BTreeMap::from([(3, 30)])
        );
        assert!(logs_contain("outside the probe window"));
    }
}
