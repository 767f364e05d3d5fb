//! Thin facade wiring keyword add/remove/query onto the autocomplete
//! index.

use std::sync::Arc;

use crate::{
  error::{Error, Result},
  trie::KeywordIndex,
};

/// Exposed to external callers; delegates directly to [`KeywordIndex`].
#[derive(Clone)]
pub struct KeywordAdmin {
  index: Arc<KeywordIndex>,
}

impl KeywordAdmin {
  pub fn new(index: Arc<KeywordIndex>) -> Self {
    Self { index }
  }

  pub fn add_keyword(&self, keyword: &str) {
    self.index.insert(keyword);
  }

  pub fn remove_keyword(&self, keyword: &str) {
    self.index.remove(keyword);
  }

  /// All stored keywords starting with `prefix`, lexicographically.
  pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
    self.index.prefix_search(prefix)
  }

  /// Company-name lookup through the store rather than the index.
  /// Deliberately unimplemented — an open item, not to be designed here.
  pub fn company_names_by_keyword(&self, _keyword: &str) -> Result<Vec<String>> {
    Err(Error::Unimplemented("store-backed keyword search"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn facade_delegates_to_the_index() {
    let index = Arc::new(KeywordIndex::new());
    let admin = KeywordAdmin::new(Arc::clone(&index));

    admin.add_keyword("Apple Inc.");
    admin.add_keyword("Applied Materials");
    assert_eq!(admin.autocomplete("Appl"), vec![
      "Apple Inc.",
      "Applied Materials"
    ]);

    admin.remove_keyword("Apple Inc.");
    assert_eq!(admin.autocomplete("Appl"), vec!["Applied Materials"]);

    // Removing twice is a no-op, not an error.
    admin.remove_keyword("Apple Inc.");
  }

  #[test]
  fn store_backed_search_is_unimplemented() {
    let admin = KeywordAdmin::new(Arc::new(KeywordIndex::new()));
    let err = admin.company_names_by_keyword("apple").unwrap_err();
    assert!(matches!(err, Error::Unimplemented(_)));
  }
}
