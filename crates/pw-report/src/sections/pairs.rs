//! Special pairs section: twin, cousin and sexy primes.

use pw_common::{PairKind, PrimePair};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Full count of one pair kind plus a capped sample.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PairStats {
    /// Number of pairs over the whole gap list.
    pub count: u64,
    /// First pairs in sequence order.
    pub sample: Vec<PrimePair>,
}

impl PairStats {
    fn record(&mut self, pair: PrimePair, cap: usize) {
        self.count = self.count.saturating_add(1);
        if self.sample.len() < cap {
            self.sample.push(pair);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpecialPairsSection {
    pub twin: PairStats,
    pub cousin: PairStats,
    pub sexy: PairStats,
}

impl SpecialPairsSection {
    pub fn get(&self, kind: PairKind) -> &PairStats {
        match kind {
            PairKind::Twin => &self.twin,
            PairKind::Cousin => &self.cousin,
            PairKind::Sexy => &self.sexy,
        }
    }

    fn get_mut(&mut self, kind: PairKind) -> &mut PairStats {
        match kind {
            PairKind::Twin => &mut self.twin,
            PairKind::Cousin => &mut self.cousin,
            PairKind::Sexy => &mut self.sexy,
        }
    }

    /// Classify `(low, high)` by `gap` and record it. Returns the kind, if any.
    pub fn record(&mut self, low: u128, high: u128, gap: u128, cap: usize) -> Option<PairKind> {
        let kind = PairKind::from_gap(gap)?;
        self.get_mut(kind).record(PrimePair::new(low, high), cap);
        Some(kind)
    }

    /// Pairs of every kind.
    pub fn total(&self) -> u64 {
        PairKind::ALL
            .iter()
            .fold(0u64, |acc, &k| acc.saturating_add(self.get(k).count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_gap() {
        let mut pairs = SpecialPairsSection::default();
        assert_eq!(pairs.record(11, 13, 2, 10), Some(PairKind::Twin));
        assert_eq!(pairs.record(13, 17, 4, 10), Some(PairKind::Cousin));
        assert_eq!(pairs.record(23, 29, 6, 10), Some(PairKind::Sexy));
        assert_eq!(pairs.record(31, 39, 8, 10), None);
        assert_eq!(pairs.total(), 3);
        assert_eq!(pairs.twin.sample, vec![PrimePair::new(11, 13)]);
    }

    #[test]
    fn count_is_complete_when_sample_is_capped() {
        let mut pairs = SpecialPairsSection::default();
        for low in (0..10u128).map(|k| 60 * k + 11) {
            pairs.record(low, low + 2, 2, 3);
        }
        assert_eq!(pairs.get(PairKind::Twin).count, 10);
        assert_eq!(pairs.get(PairKind::Twin).sample.len(), 3);
        assert_eq!(pairs.twin.sample[0], PrimePair::new(11, 13));
    }
}
