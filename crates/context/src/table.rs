//! Reference tables
//!
//! A [`ReferenceTable`] is an immutable catalog of one reference entity kind.
//! Records are stored in file order and the declared `id` of every record must
//! equal its row index, so an ID is also the record's position in the table.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use hermes_core::{Id, Reference};
use serde::de::DeserializeOwned;

use crate::error::{LoadError, LookupError};

/// A reference entity that can be read from a delimited file
pub trait TableRecord: Reference + Sized {
    /// Raw row as it appears in the file
    type Row: DeserializeOwned;

    /// Table name used in logs and errors
    const TABLE: &'static str;

    /// Build a record from the row at `index` (0-based, header excluded)
    fn from_row(row: Self::Row, index: usize) -> Result<Self, LoadError>;

    /// Resolve cross-row references once every row is loaded
    fn link(_records: &mut [Self]) {}
}

/// Immutable name to ID catalog for one entity kind
#[derive(Debug, Clone)]
pub struct ReferenceTable<T> {
    entries: Vec<T>,
    ids: HashMap<String, Id>,
}

impl<T: Reference> ReferenceTable<T> {
    /// Build a table from records already in ID order
    pub fn from_entries(entries: Vec<T>) -> Result<Self, LoadError> {
        let mut ids = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if entry.id() as usize != index {
                return Err(LoadError::NonContiguousId {
                    expected: index,
                    found: entry.id(),
                });
            }
            if ids.insert(entry.name().to_string(), entry.id()).is_some() {
                return Err(LoadError::DuplicateName(entry.name().to_string()));
            }
        }
        Ok(Self { entries, ids })
    }

    /// Look up a record by ID
    pub fn get(&self, id: Id) -> Result<&T, LookupError> {
        self.entries
            .get(id as usize)
            .ok_or(LookupError::IdOutOfRange {
                id,
                count: self.entries.len(),
            })
    }

    /// Look up a record by name
    pub fn get_by_name(&self, name: &str) -> Result<&T, LookupError> {
        let id = self
            .get_id(name)
            .ok_or_else(|| LookupError::NotFound(name.to_string()))?;
        self.get(id)
    }

    /// ID of the record called `name`, if any
    pub fn get_id(&self, name: &str) -> Option<Id> {
        self.ids.get(name).copied()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_id(&self, id: Id) -> bool {
        (id as usize) < self.entries.len()
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }

    /// Records in ID order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Give the records back, in ID order
    pub fn into_entries(self) -> Vec<T> {
        self.entries
    }
}

impl<T: TableRecord> ReferenceTable<T> {
    /// Load a table from a CSV file with a header row
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::load_from_reader(file)?;
        log::debug!(
            "[context] Loaded {} {} records from {}",
            table.count(),
            T::TABLE,
            path.display()
        );
        Ok(table)
    }

    /// Load a table from any CSV stream with a header row
    pub fn load_from_reader<R: io::Read>(reader: R) -> Result<Self, LoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for (index, row) in csv_reader.deserialize::<T::Row>().enumerate() {
            let record = T::from_row(row?, index)?;
            if record.id() as usize != index {
                return Err(LoadError::NonContiguousId {
                    expected: index,
                    found: record.id(),
                });
            }
            entries.push(record);
        }

        T::link(&mut entries);
        Self::from_entries(entries)
    }
}

impl<T> Default for ReferenceTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            ids: HashMap::new(),
        }
    }
}

impl<'a, T> IntoIterator for &'a ReferenceTable<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use hermes_core::Account;

    use super::*;

    const ACCOUNTS: &str = "id,name,alias\n0,acc001,main\n1,acc002,hedge\n";

    #[test]
    fn test_load_well_formed() {
        let table = ReferenceTable::<Account>::load_from_reader(ACCOUNTS.as_bytes()).unwrap();

        assert_eq!(table.count(), 2);
        for account in &table {
            assert_eq!(table.get_id(&account.name), Some(account.id));
            assert_eq!(table.get(account.id).unwrap().name, account.name);
        }
        assert_eq!(table.get_by_name("acc002").unwrap().alias, "hedge");
    }

    #[test]
    fn test_non_contiguous_id_fails() {
        let data = "id,name,alias\n0,acc001,main\n2,acc002,hedge\n";
        let err = ReferenceTable::<Account>::load_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::NonContiguousId {
                expected: 1,
                found: 2
            }
        ));
    }

    #[test]
    fn test_duplicate_name_fails() {
        let data = "id,name,alias\n0,acc001,main\n1,acc001,hedge\n";
        let err = ReferenceTable::<Account>::load_from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateName(name) if name == "acc001"));
    }

    #[test]
    fn test_lookup_errors() {
        let table = ReferenceTable::<Account>::load_from_reader(ACCOUNTS.as_bytes()).unwrap();

        assert_eq!(
            table.get(5).unwrap_err(),
            LookupError::IdOutOfRange { id: 5, count: 2 }
        );
        assert_eq!(
            table.get_by_name("nope").unwrap_err(),
            LookupError::NotFound("nope".to_string())
        );
        assert_eq!(table.get_id("nope"), None);
        assert!(table.has_id(1));
        assert!(!table.has_id(2));
        assert!(table.has_name("acc001"));
    }

    #[test]
    fn test_missing_file() {
        let err = ReferenceTable::<Account>::load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_empty_table() {
        let table = ReferenceTable::<Account>::load_from_reader("id,name,alias\n".as_bytes())
            .unwrap();
        assert!(table.is_empty());
        assert_eq!(table.count(), 0);
    }
}
