//! Generic containers exercised alongside the record.
//!
//! Both are encoded through the ordinary [`crate::Pack`] / [`crate::Unpack`]
//! impls for `HashMap` and `Vec`; this module only fixes how the sample data
//! is generated so every codec sees the same input.

use std::collections::HashMap;

/// `i64 → f64` mapping. Iteration (and therefore encoded) order is
/// unspecified.
pub type Int64FloatMap = HashMap<i64, f64>;

/// Ordered sequence of maps; order survives every round trip.
pub type MapSequence = Vec<Int64FloatMap>;

/// Keys `0..n`, each mapped to itself as a float.
pub fn new_int64_float_map(n: usize) -> Int64FloatMap {
    (0..n as i64).map(|k| (k, k as f64)).collect()
}

/// `n` maps of `n` entries each.
pub fn new_map_sequence(n: usize) -> MapSequence {
    (0..n).map(|_| new_int64_float_map(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_holds_keys_as_values() {
        let map = new_int64_float_map(4);
        assert_eq!(map.len(), 4);
        for k in 0..4 {
            assert_eq!(map[&k], k as f64);
        }
        assert!(new_int64_float_map(0).is_empty());
    }

    #[test]
    fn sequence_is_square() {
        let seq = new_map_sequence(3);
        assert_eq!(seq.len(), 3);
        assert!(seq.iter().all(|m| m.len() == 3));
        assert!(new_map_sequence(0).is_empty());
    }
}
