use serde::{Deserialize, Serialize};

/// A person record returned by the directory.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DirectoryEntry {
    pub last_name: String,
    pub first_name: String,
    /// Absent only when the filter did not require a number.
    pub number: Option<String>,
}

impl DirectoryEntry {
    #[must_use]
    pub fn new(
        last_name: Option<String>,
        first_name: Option<String>,
        number: Option<String>,
    ) -> Self {
        Self {
            last_name: last_name.unwrap_or_default(),
            first_name: first_name.unwrap_or_default(),
            number,
        }
    }

    /// Name as shown on the phone screen, e.g. `Lee, Ann`.
    pub fn display_name(&self) -> String {
        match (self.last_name.is_empty(), self.first_name.is_empty()) {
            (false, false) => format!("{}, {}", self.last_name, self.first_name),
            (false, true) => self.last_name.clone(),
            (true, false) => self.first_name.clone(),
            (true, true) => String::new(),
        }
    }
}

/// Orders entries by last name, then first name.
///
/// Byte-wise comparison; the sort is stable so entries with equal names keep
/// the order the directory returned them in.
pub fn sort_entries(entries: &mut [DirectoryEntry]) {
    entries.sort_by(|a, b| {
        a.last_name
            .cmp(&b.last_name)
            .then_with(|| a.first_name.cmp(&b.first_name))
    });
}
