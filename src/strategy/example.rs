use crate::cursor::{SimpleColumn, SimpleResultSet};

/// A named fixture showing the data shape a strategy expects.
///
/// Used as in-app documentation and as regression material: every example
/// must render with the strategy that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleCase {
    pub name: &'static str,
    pub description: &'static str,
    /// Query that would produce `data` against a typical database.
    pub query: &'static str,
    pub data: SimpleResultSet,
}

impl ExampleCase {
    /// Build an example from columns. Example data is authored in this crate,
    /// so ragged columns are a programming error and degrade to an empty set.
    pub fn new(
        name: &'static str,
        description: &'static str,
        query: &'static str,
        columns: Vec<SimpleColumn>,
    ) -> Self {
        let data = SimpleResultSet::new(columns).unwrap_or_else(|e| {
            log::error!("example '{}' has inconsistent columns: {}", name, e);
            SimpleResultSet::default()
        });
        Self {
            name,
            description,
            query,
            data,
        }
    }

    /// Fresh cursor over the example data.
    pub fn cursor(&self) -> SimpleResultSet {
        self.data.clone()
    }
}
