use serde::{Deserialize, Serialize};

/// One `(name, build_count)` entry in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Artifact base name: the source file name without directory or final
    /// extension.
    pub name: String,
    /// Number of stamped builds of this artifact.
    pub build_count: u64,
}

impl LedgerRecord {
    pub fn new(name: impl Into<String>, build_count: u64) -> Self {
        Self {
            name: name.into(),
            build_count,
        }
    }
}

/// Ordered collection of [`LedgerRecord`]s.
///
/// Insertion order is file order and is preserved across a load/save cycle.
/// New records are only ever appended; existing ones are mutated in place.
/// Name uniqueness is not enforced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    records: Vec<LedgerRecord>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the end of the ledger.
    pub fn push(&mut self, record: LedgerRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[LedgerRecord] {
        &self.records
    }

    /// Mutable access to existing records. Records cannot be added or
    /// removed through the slice, only updated in place.
    pub fn records_mut(&mut self) -> &mut [LedgerRecord] {
        &mut self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LedgerRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<LedgerRecord> {
        self.records
    }
}

impl From<Vec<LedgerRecord>> for Ledger {
    fn from(records: Vec<LedgerRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<LedgerRecord> for Ledger {
    fn from_iter<I: IntoIterator<Item = LedgerRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a LedgerRecord;
    type IntoIter = std::slice::Iter<'a, LedgerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
