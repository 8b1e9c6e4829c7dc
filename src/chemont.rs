use std::collections::HashMap;
use std::io::BufRead;

use tracing::debug;

use crate::domain::ChemontId;
use crate::error::HmdbError;

/// Label to identifier index over the ChemOnt OBO release.
#[derive(Debug, Clone, Default)]
pub struct ChemontLookup {
    by_label: HashMap<String, ChemontId>,
}

impl ChemontLookup {
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, HmdbError> {
        let mut by_label = HashMap::new();
        let mut current: Option<ChemontId> = None;

        for line in reader.lines() {
            let line = line.map_err(|err| HmdbError::InputRead {
                path: "chemont".to_string(),
                message: err.to_string(),
            })?;
            let line = line.trim_end_matches('\r');
            if line.starts_with('[') {
                current = None;
            } else if let Some(value) = line.strip_prefix("id: ") {
                current = value.parse().ok();
            } else if let Some(label) = line.strip_prefix("name: ") {
                if label.is_empty() {
                    continue;
                }
                if let Some(id) = &current {
                    by_label.insert(label.to_string(), id.clone());
                }
            }
        }

        debug!(labels = by_label.len(), "chemont lookup built");
        Ok(Self { by_label })
    }

    pub fn from_pairs<I, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, ChemontId)>,
        L: Into<String>,
    {
        Self {
            by_label: pairs
                .into_iter()
                .map(|(label, id)| (label.into(), id))
                .collect(),
        }
    }

    pub fn resolve(&self, label: &str) -> Option<&ChemontId> {
        self.by_label.get(label)
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}
