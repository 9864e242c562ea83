//! Flat global variable table
//!
//! Every traced program runs in a single namespace. Assignments and function
//! parameter bindings both write here, so a parameter named like an existing global
//! overwrites it. There is no per-call scoping.
//!
//! The table keeps first-insertion order, which is the order variables appear in
//! every snapshot.

use super::value::{Value, ValueKind};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Outcome of writing a variable, relative to its previous value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Created,
    Modified,
    Unchanged,
}

/// Names touched during a single step
#[derive(Debug, Clone, Default)]
pub struct StepChanges {
    pub created: Vec<String>,
    pub modified: Vec<String>,
}

impl StepChanges {
    /// A name created earlier in the same step stays only new
    pub fn record(&mut self, name: &str, change: Change) {
        match change {
            Change::Created => self.created.push(name.to_string()),
            Change::Modified if self.is_new(name) || self.is_modified(name) => {}
            Change::Modified => self.modified.push(name.to_string()),
            Change::Unchanged => {}
        }
    }

    pub fn is_new(&self, name: &str) -> bool {
        self.created.iter().any(|n| n == name)
    }

    pub fn is_modified(&self, name: &str) -> bool {
        self.modified.iter().any(|n| n == name)
    }
}

/// A variable as it appears in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: Value,
    #[serde(rename = "type")]
    pub kind: ValueKind,
    pub scope: String,
    pub is_new: bool,
    pub is_modified: bool,
}

impl Variable {
    pub fn new(name: &str, value: Value, scope: &str, changes: &StepChanges) -> Self {
        Variable {
            name: name.to_string(),
            kind: value.kind(),
            value,
            scope: scope.to_string(),
            is_new: changes.is_new(name),
            is_modified: changes.is_modified(name),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    entries: Vec<(String, Value)>,
    index: FxHashMap<String, usize>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write a variable, creating it on first use and mutating it in place after
    pub fn assign(&mut self, name: &str, value: Value) -> Change {
        match self.index.get(name) {
            Some(&i) => {
                let slot = &mut self.entries[i].1;
                let change = if *slot == value {
                    Change::Unchanged
                } else {
                    Change::Modified
                };
                *slot = value;
                change
            }
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), value));
                Change::Created
            }
        }
    }

    /// Build the snapshot view of every tracked variable
    pub fn snapshot(&self, scope: &str, changes: &StepChanges) -> Vec<Variable> {
        self.entries
            .iter()
            .map(|(name, value)| Variable::new(name, value.clone(), scope, changes))
            .collect()
    }
}
