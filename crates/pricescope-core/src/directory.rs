//! Read-only list of every company the service knows about

use std::collections::HashSet;

/// Company names for browse/select, loaded once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyDirectory {
    names: Vec<String>,
}

impl CompanyDirectory {
    /// Build from server order, dropping blanks and repeated names
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut seen = HashSet::new();
        let names = names
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty() && seen.insert(name.clone()))
            .collect();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Names containing `fragment`, case-insensitively, in directory order
    pub fn filter(&self, fragment: &str) -> Vec<&str> {
        let needle = fragment.trim().to_lowercase();
        self.names
            .iter()
            .filter(|name| needle.is_empty() || name.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}
