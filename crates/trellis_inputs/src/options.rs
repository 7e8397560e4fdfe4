//! Options for selection widgets
//!
//! A [`Choice`] is one label/value pair; an [`OptionSet`] is an ordered
//! sequence of choices sharing a single value type. Sets are built once
//! per binding (from an enumeration shape, a value collection, or by the
//! caller) and treated as immutable afterwards.

use trellis_core::{CellBind, CellType, CellValue, EnumShape};

/// One selectable entry
#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    /// Display label
    pub label: String,
    /// The value stored in the cell when selected
    pub value: CellValue,
    /// Optional group header for the presentation layer
    pub group: Option<String>,
    /// Whether this entry can be selected
    pub disabled: bool,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: CellValue) -> Self {
        Self {
            label: label.into(),
            value,
            group: None,
            disabled: false,
        }
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Case-insensitive label match against a filter query
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.label.to_lowercase().contains(&query)
    }
}

/// Ordered, single-typed collection of choices
#[derive(Clone, Debug)]
pub struct OptionSet {
    value_type: CellType,
    entries: Vec<Choice>,
}

impl OptionSet {
    /// An empty set for the given value type
    pub fn new(value_type: CellType) -> Self {
        Self {
            value_type,
            entries: Vec::new(),
        }
    }

    /// Derive a set from an enumeration shape, one entry per case in
    /// declaration order
    pub fn from_shape(shape: &EnumShape) -> Self {
        let entries = shape
            .cases()
            .enumerate()
            .map(|(index, case)| {
                Choice::new(
                    case,
                    CellValue::Enum {
                        shape: shape.clone(),
                        index,
                    },
                )
            })
            .collect();
        Self {
            value_type: CellType::Enum(shape.clone()),
            entries,
        }
    }

    /// Build a set from statically typed values and a labeler
    pub fn from_values<T, I, F>(values: I, label: F) -> Self
    where
        T: CellBind,
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> String,
    {
        let entries = values
            .into_iter()
            .map(|v| {
                let text = label(&v);
                Choice::new(text, v.into_value())
            })
            .collect();
        Self {
            value_type: T::cell_type(),
            entries,
        }
    }

    /// Append an entry whose value matches the set's type
    ///
    /// Mismatched entries are dropped (and reported false); a set never
    /// mixes value types.
    pub fn push(&mut self, choice: Choice) -> bool {
        if !self.value_type.admits(&choice.value) {
            return false;
        }
        self.entries.push(choice);
        true
    }

    pub fn value_type(&self) -> &CellType {
        &self.value_type
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Choice> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.entries.iter()
    }

    /// Position of the entry holding `value`, if any
    pub fn position_of(&self, value: &CellValue) -> Option<usize> {
        self.entries.iter().position(|c| &c.value == value)
    }

    /// Whether `value` is one of the entries
    pub fn contains_value(&self, value: &CellValue) -> bool {
        self.position_of(value).is_some()
    }

    /// Label of the entry holding `value`, if any
    pub fn label_of(&self, value: &CellValue) -> Option<&str> {
        self.position_of(value)
            .map(|i| self.entries[i].label.as_str())
    }

    /// Narrow to the entries matching a filter query (combobox behavior)
    pub fn filter(&self, query: &str) -> OptionSet {
        OptionSet {
            value_type: self.value_type.clone(),
            entries: self
                .entries
                .iter()
                .filter(|c| c.matches(query))
                .cloned()
                .collect(),
        }
    }
}
