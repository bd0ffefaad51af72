//! Label taxonomy
//!
//! A read-only mapping from slash-separated condition paths
//! (`word/prime/female/adult`) to the integer codes written into the
//! relabeled trigger stream. A taxonomy is built once and passed explicitly
//! to the relabeler; there is no process-wide table.

mod tables;

pub use tables::{PRIME_ANCHORED_TABLE, TARGET_ANCHORED_TABLE};

use crate::error::RelabelError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label path → trigger code mapping with unique labels and unique codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct LabelTaxonomy {
    by_label: BTreeMap<String, u32>,
    by_code: BTreeMap<u32, String>,
}

impl LabelTaxonomy {
    /// Build a taxonomy, rejecting duplicate labels, duplicate codes and code 0
    pub fn from_entries<I, S>(entries: I) -> Result<Self, RelabelError>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut by_label = BTreeMap::new();
        let mut by_code = BTreeMap::new();

        for (label, code) in entries {
            let label = label.into();
            if code == 0 {
                return Err(RelabelError::InvalidConfig(format!(
                    "label {label} has code 0; codes must be positive"
                )));
            }
            if by_label.contains_key(&label) {
                return Err(RelabelError::DuplicateLabel(label));
            }
            if by_code.contains_key(&code) {
                return Err(RelabelError::DuplicateCode { code, label });
            }
            by_label.insert(label.clone(), code);
            by_code.insert(code, label);
        }

        Ok(Self { by_label, by_code })
    }

    /// Taxonomy for the target-anchored labeling convention (A)
    pub fn convention_a() -> Self {
        Self::from_table(TARGET_ANCHORED_TABLE)
    }

    /// Taxonomy for the prime-anchored labeling convention (B)
    pub fn convention_b() -> Self {
        Self::from_table(PRIME_ANCHORED_TABLE)
    }

    // Static tables are checked for uniqueness by the tests below.
    fn from_table(table: &[(&str, u32)]) -> Self {
        let by_label: BTreeMap<String, u32> = table
            .iter()
            .map(|&(label, code)| (label.to_string(), code))
            .collect();
        let by_code = by_label
            .iter()
            .map(|(label, &code)| (code, label.clone()))
            .collect();
        Self { by_label, by_code }
    }

    /// Subset of entries whose code satisfies `keep`
    pub(crate) fn filtered(&self, keep: impl Fn(u32) -> bool) -> Self {
        let by_code: BTreeMap<u32, String> = self
            .by_code
            .iter()
            .filter(|(&code, _)| keep(code))
            .map(|(&code, label)| (code, label.clone()))
            .collect();
        let by_label = by_code
            .iter()
            .map(|(&code, label)| (label.clone(), code))
            .collect();
        Self { by_label, by_code }
    }

    /// Resolve a label path to its code
    ///
    /// A miss means the trial data and the taxonomy disagree; it is never
    /// defaulted.
    pub fn code(&self, label: &str) -> Result<u32, RelabelError> {
        self.by_label
            .get(label)
            .copied()
            .ok_or_else(|| RelabelError::UnknownLabel(label.to_string()))
    }

    /// Reverse lookup
    pub fn label(&self, code: u32) -> Option<&str> {
        self.by_code.get(&code).map(String::as_str)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.by_label.contains_key(label)
    }

    pub fn contains_code(&self, code: u32) -> bool {
        self.by_code.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }

    /// Entries ordered by label path
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.by_label.iter().map(|(label, &code)| (label.as_str(), code))
    }

    /// All codes in ascending order
    pub fn codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.by_code.keys().copied()
    }
}

impl TryFrom<BTreeMap<String, u32>> for LabelTaxonomy {
    type Error = RelabelError;

    fn try_from(map: BTreeMap<String, u32>) -> Result<Self, Self::Error> {
        Self::from_entries(map)
    }
}

impl From<LabelTaxonomy> for BTreeMap<String, u32> {
    fn from(taxonomy: LabelTaxonomy) -> Self {
        taxonomy.by_label
    }
}
