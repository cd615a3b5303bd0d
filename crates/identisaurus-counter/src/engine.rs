use identisaurus_ledger::{Ledger, LedgerRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a stored record name is matched against the base name being built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The stored name starts with the base name. A base name that is a
    /// prefix of an unrelated longer name (`foo` vs `foobar`) matches it.
    #[default]
    Prefix,
    /// The stored name equals the base name.
    Exact,
}

impl MatchMode {
    pub fn matches(self, stored: &str, base_name: &str) -> bool {
        match self {
            Self::Prefix => stored.starts_with(base_name),
            Self::Exact => stored == base_name,
        }
    }
}

/// Applies build-count updates to a ledger.
///
/// The first matching record in ledger order wins; later matches are never
/// considered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterEngine {
    mode: MatchMode,
}

impl CounterEngine {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// First record matching `base_name`, if any.
    pub fn find<'a>(&self, ledger: &'a Ledger, base_name: &str) -> Option<&'a LedgerRecord> {
        ledger
            .iter()
            .find(|record| self.mode.matches(&record.name, base_name))
    }

    pub fn find_mut<'a>(
        &self,
        ledger: &'a mut Ledger,
        base_name: &str,
    ) -> Option<&'a mut LedgerRecord> {
        ledger
            .records_mut()
            .iter_mut()
            .find(|record| self.mode.matches(&record.name, base_name))
    }

    /// Bump the matching record, or append `{base_name, 1}` if none matches.
    /// Returns the count after the update.
    pub fn increment(&self, ledger: &mut Ledger, base_name: &str) -> u64 {
        if let Some(record) = self.find_mut(ledger, base_name) {
            record.build_count = record.build_count.saturating_add(1);
            debug!(name = %record.name, build_count = record.build_count, "updating count");
            return record.build_count;
        }

        debug!(name = base_name, "first build; adding record");
        ledger.push(LedgerRecord::new(base_name, 1));
        1
    }

    /// Count of the matching record, or 0 when nothing matches.
    pub fn current_count(&self, ledger: &Ledger, base_name: &str) -> u64 {
        self.find(ledger, base_name)
            .map_or(0, |record| record.build_count)
    }

    /// Overwrite the matching record's count, appending a record if none
    /// matches. Lower values are accepted as-is.
    pub fn set(&self, ledger: &mut Ledger, base_name: &str, build_count: u64) {
        match self.find_mut(ledger, base_name) {
            Some(record) => record.build_count = build_count,
            None => ledger.push(LedgerRecord::new(base_name, build_count)),
        }
    }
}

/// [`CounterEngine::find`] with prefix matching.
pub fn find_record<'a>(ledger: &'a Ledger, base_name: &str) -> Option<&'a LedgerRecord> {
    CounterEngine::default().find(ledger, base_name)
}

/// [`CounterEngine::increment`] with prefix matching.
pub fn increment(ledger: &mut Ledger, base_name: &str) -> u64 {
    CounterEngine::default().increment(ledger, base_name)
}

/// [`CounterEngine::current_count`] with prefix matching.
pub fn current_count(ledger: &Ledger, base_name: &str) -> u64 {
    CounterEngine::default().current_count(ledger, base_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(entries: &[(&str, u64)]) -> Ledger {
        entries
            .iter()
            .map(|(name, count)| LedgerRecord::new(*name, *count))
            .collect()
    }

    #[test]
    fn increment_existing_keeps_record_count() {
        let mut l = ledger(&[("main", 4), ("util", 2)]);
        assert_eq!(increment(&mut l, "util"), 3);
        assert_eq!(l.len(), 2);
        assert_eq!(l.records()[0], LedgerRecord::new("main", 4));
        assert_eq!(l.records()[1], LedgerRecord::new("util", 3));
    }

    #[test]
    fn increment_missing_appends_at_one() {
        let mut l = ledger(&[("main", 4)]);
        assert_eq!(increment(&mut l, "util"), 1);
        assert_eq!(l.len(), 2);
        assert_eq!(l.records()[1], LedgerRecord::new("util", 1));
    }

    #[test]
    fn increment_on_empty_ledger() {
        let mut l = Ledger::new();
        increment(&mut l, "foo");
        assert_eq!(l.records(), &[LedgerRecord::new("foo", 1)]);
    }

    #[test]
    fn current_count_reads_back_increment() {
        let mut l = ledger(&[("a", 9)]);
        assert_eq!(current_count(&l, "b"), 0);
        increment(&mut l, "b");
        assert_eq!(current_count(&l, "b"), 1);
        assert_eq!(current_count(&l, "a"), 9);
    }

    #[test]
    fn prefix_match_first_in_order_wins() {
        let l = ledger(&[("foo", 3), ("foobar", 7)]);
        assert_eq!(find_record(&l, "foo").unwrap().name, "foo");
        assert_eq!(find_record(&l, "fo").unwrap().name, "foo");
        assert_eq!(find_record(&l, "foob").unwrap().name, "foobar");
        assert!(find_record(&l, "foobarbaz").is_none());
    }

    #[test]
    fn prefix_match_hits_unrelated_longer_name() {
        // A lone `foobar` record absorbs builds of `foo`.
        let mut l = ledger(&[("foobar", 7), ("foo", 3)]);
        assert_eq!(find_record(&l, "foo").unwrap().name, "foobar");

        increment(&mut l, "foo");
        assert_eq!(l.records()[0].build_count, 8);
        assert_eq!(l.records()[1].build_count, 3);
    }

    #[test]
    fn duplicate_names_only_first_is_updated() {
        let mut l = ledger(&[("dup", 1), ("dup", 50)]);
        increment(&mut l, "dup");
        assert_eq!(l.records()[0].build_count, 2);
        assert_eq!(l.records()[1].build_count, 50);
    }

    #[test]
    fn exact_mode_ignores_longer_names() {
        let engine = CounterEngine::new(MatchMode::Exact);
        let mut l = ledger(&[("foobar", 7)]);
        assert!(engine.find(&l, "foo").is_none());

        assert_eq!(engine.increment(&mut l, "foo"), 1);
        assert_eq!(l.records(), &[LedgerRecord::new("foobar", 7), LedgerRecord::new("foo", 1)]);
    }

    #[test]
    fn lowered_count_is_not_corrected() {
        let mut l = ledger(&[("main", 100)]);
        l.records_mut()[0].build_count = 5;
        assert_eq!(increment(&mut l, "main"), 6);
    }

    #[test]
    fn set_overwrites_or_appends() {
        let engine = CounterEngine::default();
        let mut l = ledger(&[("main", 100)]);
        engine.set(&mut l, "main", 2);
        engine.set(&mut l, "new", 40);
        assert_eq!(l.records(), &[LedgerRecord::new("main", 2), LedgerRecord::new("new", 40)]);
    }

    #[test]
    fn increment_saturates() {
        let mut l = ledger(&[("big", u64::MAX)]);
        assert_eq!(increment(&mut l, "big"), u64::MAX);
    }

    #[test]
    fn match_mode_serde_names() {
        assert_eq!(serde_json::to_string(&MatchMode::Exact).unwrap(), "\"exact\"");
        assert_eq!(serde_json::from_str::<MatchMode>("\"prefix\"").unwrap(), MatchMode::Prefix);
    }
}
