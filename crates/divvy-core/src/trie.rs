//! A compressed radix trie over keyword strings, plus its thread-safe
//! wrapper [`KeywordIndex`].
//!
//! Backs company-name autocomplete: tens of thousands of keywords with
//! sublinear insert/remove and prefix enumeration that never scans the
//! whole set. Edge labels are compressed — one edge carries as many bytes
//! as its subtree shares — so long overlapping names do not cost one node
//! per character.
//!
//! Keys are handled as UTF-8 bytes. Byte order on UTF-8 equals code-point
//! order, so enumeration comes out lexicographic without any extra sort.

use std::{
  collections::{BTreeMap, btree_map::Entry},
  sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

// ─── Nodes ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Node {
  /// True when the path from the root to this node spells a stored keyword.
  terminal: bool,
  /// Outgoing edges keyed by their first byte. No two sibling labels share
  /// a first byte, and `BTreeMap` iteration yields them in byte order.
  children: BTreeMap<u8, Edge>,
}

#[derive(Debug)]
struct Edge {
  label: Vec<u8>,
  node:  Node,
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
  a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

// ─── Trie ────────────────────────────────────────────────────────────────────

/// An ordered set of keyword strings with prefix enumeration.
///
/// The trie itself is single-threaded; share it via [`KeywordIndex`].
#[derive(Debug, Default)]
pub struct Trie {
  root: Node,
  len:  usize,
}

impl Trie {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of stored keywords.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Add `keyword` to the set. Idempotent — inserting an existing keyword
  /// is a no-op. No length or character-set restriction applies.
  pub fn insert(&mut self, keyword: &str) {
    let mut node = &mut self.root;
    let mut key: &[u8] = keyword.as_bytes();

    loop {
      if key.is_empty() {
        if !node.terminal {
          node.terminal = true;
          self.len += 1;
        }
        return;
      }

      match node.children.entry(key[0]) {
        Entry::Vacant(slot) => {
          slot.insert(Edge {
            label: key.to_vec(),
            node:  Node {
              terminal: true,
              ..Node::default()
            },
          });
          self.len += 1;
          return;
        }
        Entry::Occupied(slot) => {
          let edge = slot.into_mut();
          let common = common_prefix(&edge.label, key);

          if common < edge.label.len() {
            // The key diverges (or ends) inside this edge: split it at the
            // divergence point and hang the old subtree off the new middle
            // node.
            let rest_label = edge.label.split_off(common);
            let rest_first = rest_label[0];
            let detached = std::mem::take(&mut edge.node);
            edge.node.children.insert(rest_first, Edge {
              label: rest_label,
              node:  detached,
            });

            if common == key.len() {
              edge.node.terminal = true;
            } else {
              let rest_key = &key[common..];
              edge.node.children.insert(rest_key[0], Edge {
                label: rest_key.to_vec(),
                node:  Node {
                  terminal: true,
                  ..Node::default()
                },
              });
            }
            self.len += 1;
            return;
          }

          // Full edge consumed; descend.
          key = &key[common..];
          node = &mut edge.node;
        }
      }
    }
  }

  /// Remove `keyword` if present, returning whether it was stored.
  /// Removing an absent keyword is a no-op, not an error.
  pub fn remove(&mut self, keyword: &str) -> bool {
    let removed = remove_rec(&mut self.root, keyword.as_bytes());
    if removed {
      self.len -= 1;
    }
    removed
  }

  pub fn contains(&self, keyword: &str) -> bool {
    let mut node = &self.root;
    let mut key: &[u8] = keyword.as_bytes();

    while !key.is_empty() {
      let Some(edge) = node.children.get(&key[0]) else {
        return false;
      };
      if !key.starts_with(&edge.label) {
        return false;
      }
      key = &key[edge.label.len()..];
      node = &edge.node;
    }
    node.terminal
  }

  /// Every stored keyword starting with `prefix`, in ascending
  /// lexicographic order, as a materialised vector. An empty prefix
  /// returns all keywords. No result limit applies; callers slice.
  pub fn prefix_search(&self, prefix: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut node = &self.root;
    let mut acc: Vec<u8> = Vec::new();
    let mut rest: &[u8] = prefix.as_bytes();

    while !rest.is_empty() {
      let Some(edge) = node.children.get(&rest[0]) else {
        return out;
      };
      let common = common_prefix(&edge.label, rest);

      if common == rest.len() {
        // Prefix ends on (or inside) this edge: everything below it
        // matches, since the label extends the prefix.
        acc.extend_from_slice(&edge.label);
        node = &edge.node;
        rest = &[];
        break;
      }
      if common < edge.label.len() {
        // Diverged mid-edge: nothing matches.
        return out;
      }

      acc.extend_from_slice(&edge.label);
      node = &edge.node;
      rest = &rest[common..];
    }

    collect(node, &mut acc, &mut out);
    out
  }
}

/// Returns whether the keyword was present. Prunes emptied nodes and
/// re-merges single-child pass-through nodes on the way back up, so the
/// structure after a removal is identical to one that never held the key.
fn remove_rec(node: &mut Node, key: &[u8]) -> bool {
  if key.is_empty() {
    if !node.terminal {
      return false;
    }
    node.terminal = false;
    return true;
  }

  let first = key[0];
  let removed = match node.children.get_mut(&first) {
    Some(edge) if key.starts_with(&edge.label) => {
      remove_rec(&mut edge.node, &key[edge.label.len()..])
    }
    _ => false,
  };

  if removed {
    let (prune, collapse) = match node.children.get(&first) {
      Some(e) if !e.node.terminal && e.node.children.is_empty() => (true, false),
      Some(e) if !e.node.terminal && e.node.children.len() == 1 => (false, true),
      _ => (false, false),
    };

    if prune {
      node.children.remove(&first);
    } else if collapse
      && let Some(edge) = node.children.get_mut(&first)
      && let Some((_, grand)) = edge.node.children.pop_first()
    {
      edge.label.extend_from_slice(&grand.label);
      edge.node = grand.node;
    }
  }

  removed
}

fn collect(node: &Node, acc: &mut Vec<u8>, out: &mut Vec<String>) {
  if node.terminal {
    // Terminal paths always spell complete original keywords, so this is
    // valid UTF-8; lossy conversion just avoids an unreachable error path.
    out.push(String::from_utf8_lossy(acc).into_owned());
  }
  for edge in node.children.values() {
    acc.extend_from_slice(&edge.label);
    collect(&edge.node, acc, out);
    acc.truncate(acc.len() - edge.label.len());
  }
}

// ─── Shared index ────────────────────────────────────────────────────────────

/// Thread-safe wrapper around [`Trie`].
///
/// Mutations serialise against each other and against reads; concurrent
/// prefix queries proceed in parallel. Nothing under the lock blocks on
/// I/O, so hold times stay short. The node structure is never exposed.
#[derive(Debug, Default)]
pub struct KeywordIndex {
  inner: RwLock<Trie>,
}

impl KeywordIndex {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&self, keyword: &str) {
    self.write().insert(keyword);
  }

  pub fn remove(&self, keyword: &str) -> bool {
    self.write().remove(keyword)
  }

  pub fn contains(&self, keyword: &str) -> bool {
    self.read().contains(keyword)
  }

  pub fn prefix_search(&self, prefix: &str) -> Vec<String> {
    self.read().prefix_search(prefix)
  }

  pub fn len(&self) -> usize {
    self.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.read().is_empty()
  }

  // The trie holds no invariant a panicked writer could break mid-way that
  // a reader would observe, so a poisoned lock is recovered, not propagated.
  fn read(&self) -> RwLockReadGuard<'_, Trie> {
    self.inner.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> RwLockWriteGuard<'_, Trie> {
    self.inner.write().unwrap_or_else(PoisonError::into_inner)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
