use super::labels::Labels;
use crate::{error::Result, toolkit::array::AFloat};
use ndarray::{Array1, ArrayView1};

/// One-dimensional values with one label per entry.
///
/// Produced when a read keeps a single axis, or when a reduction collapses one.
/// `name` holds the label of the dropped axis, if there was one.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSeries<T: AFloat> {
    values: Array1<T>,
    labels: Labels,
    name: Option<String>,
}

impl<T: AFloat> LabeledSeries<T> {
    pub fn new(values: Array1<T>, labels: Option<Vec<String>>) -> Result<Self> {
        let labels = match labels {
            None => Labels::default_for(values.len()),
            Some(labels) => Labels::new(0, labels, values.len())?,
        };
        Ok(Self::from_parts(values, labels, None))
    }

    pub(crate) fn from_parts(values: Array1<T>, labels: Labels, name: Option<String>) -> Self {
        debug_assert_eq!(values.len(), labels.len());
        Self {
            values,
            labels,
            name,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn labels(&self) -> &[String] {
        self.labels.as_slice()
    }

    pub fn values(&self) -> ArrayView1<'_, T> {
        self.values.view()
    }

    pub fn into_values(self) -> Array1<T> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, label: &str) -> Result<T> {
        Ok(self.values[self.labels.locate(0, label)?])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, T)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}
