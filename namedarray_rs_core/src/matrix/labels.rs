use std::collections::HashMap;

use crate::error::{LabeledError, Result};

/// Ordered, duplicate-free labels of one axis, together with the reverse
/// `label -> position` lookup.
#[derive(Debug, Clone)]
pub struct Labels {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl PartialEq for Labels {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}
impl Eq for Labels {}

impl Labels {
    /// `"0".."len - 1"`
    pub fn default_for(len: usize) -> Self {
        let names = (0..len).map(|i| i.to_string()).collect::<Vec<_>>();
        let positions = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, positions }
    }

    /// Validates `names` as the labels of `axis`, which holds `len` entries.
    pub fn new(axis: usize, names: Vec<String>, len: usize) -> Result<Self> {
        if names.len() != len {
            let what = if axis == 0 { "row" } else { "column" };
            return Err(LabeledError::Validation(format!(
                "Number of {what} labels {} does not match number of {what}s {len}.",
                names.len()
            )));
        }
        Self::unique(axis, names)
    }

    /// Validates uniqueness only, the length is taken from `names`.
    pub(crate) fn unique(axis: usize, names: Vec<String>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if positions.insert(name.clone(), i).is_some() {
                return Err(LabeledError::Validation(format!(
                    "Labels must be unique, {name:?} appears more than once on axis {axis}."
                )));
            }
        }
        Ok(Self { names, positions })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.names.iter()
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(String::as_str)
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    pub(crate) fn locate(&self, axis: usize, label: &str) -> Result<usize> {
        self.position(label).ok_or_else(|| LabeledError::Key {
            axis,
            label: label.to_string(),
        })
    }

    /// Labels at `positions`, in that order. Repeated positions are rejected since
    /// the result would no longer be unique.
    pub(crate) fn select(&self, axis: usize, positions: &[usize]) -> Result<Self> {
        let names = positions
            .iter()
            .map(|&i| self.names[i].clone())
            .collect::<Vec<_>>();
        Self::unique(axis, names)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.names
    }
}

impl<'a> IntoIterator for &'a Labels {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_labels() {
        let labels = Labels::default_for(3);
        assert_eq!(labels.as_slice(), &strings(&["0", "1", "2"])[..]);
        assert_eq!(labels.position("2"), Some(2));
        assert_eq!(labels.position("3"), None);
        assert!(Labels::default_for(0).is_empty());
    }

    #[test]
    fn test_validation() {
        let labels = Labels::new(0, strings(&["a", "b"]), 2).unwrap();
        assert_eq!(labels.position("b"), Some(1));
        assert_eq!(labels.get(0), Some("a"));
        assert!(matches!(
            Labels::new(0, strings(&["a", "a"]), 2),
            Err(LabeledError::Validation(_))
        ));
        assert!(matches!(
            Labels::new(1, strings(&["a", "b", "c"]), 2),
            Err(LabeledError::Validation(_))
        ));
    }

    #[test]
    fn test_locate_and_select() {
        let labels = Labels::new(1, strings(&["x", "y", "z"]), 3).unwrap();
        assert_eq!(labels.locate(1, "z").unwrap(), 2);
        match labels.locate(1, "w") {
            Err(LabeledError::Key { axis, label }) => {
                assert_eq!(axis, 1);
                assert_eq!(label, "w");
            }
            other => panic!("unexpected {other:?}"),
        }
        let selected = labels.select(1, &[2, 0]).unwrap();
        assert_eq!(selected.as_slice(), &strings(&["z", "x"])[..]);
        assert_eq!(selected.position("x"), Some(1));
        assert!(labels.select(1, &[0, 0]).is_err());
    }
}
