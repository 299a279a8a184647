use indexmap::IndexMap;

/// Symbol table: label name to word address, populated by pass 1 while in
/// the `DATA` section. Insertion order is kept for the `--dump` listing.
pub struct Labels(IndexMap<String, u8>);

impl Labels {
    pub fn new() -> Self {
        Labels(IndexMap::new())
    }

    /// Returns the previous address on redefinition (last write wins).
    pub fn insert(&mut self, name: &str, addr: u8) -> Option<u8> {
        self.0.insert(name.to_string(), addr)
    }

    pub fn get(&self, name: &str) -> Option<u8> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::new()
    }
}
