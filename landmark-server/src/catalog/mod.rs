//! Landmark catalog.
//!
//! Landmarks and visitor feedback are read from a JSON snapshot of the
//! document store:
//!
//! ```json
//! {
//!   "landmarks": [{"id": "fort-santiago", "name": "Fort Santiago", ...}],
//!   "feedback": [{"location": "Fort Santiago", "rating": 5}]
//! }
//! ```
//!
//! The snapshot is loaded once at startup and never modified.

mod error;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::domain::{Landmark, LandmarkId};
use crate::ratings::{Feedback, RatingSummary, summarize_feedback};

pub use error::CatalogError;

/// Raw contents of a catalog snapshot file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub landmarks: Vec<Landmark>,

    #[serde(default)]
    pub feedback: Vec<Feedback>,
}

/// Landmarks sharing a category.
#[derive(Debug, Clone, PartialEq)]
pub struct Category<'a> {
    pub name: &'a str,
    pub landmarks: Vec<&'a Landmark>,
}

/// Read-only collection of landmarks and their feedback.
#[derive(Debug, Clone, Default)]
pub struct LandmarkCatalog {
    landmarks: Vec<Landmark>,
    by_id: HashMap<LandmarkId, usize>,
    feedback: Vec<Feedback>,
}

impl LandmarkCatalog {
    /// Build a catalog from a parsed snapshot.
    ///
    /// Fails if two landmarks share an id.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(snapshot.landmarks.len());

        for (idx, landmark) in snapshot.landmarks.iter().enumerate() {
            if by_id.insert(landmark.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateId(landmark.id.clone()));
            }
        }

        Ok(Self {
            landmarks: snapshot.landmarks,
            by_id,
            feedback: snapshot.feedback,
        })
    }

    /// Load a catalog from a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let snapshot: CatalogSnapshot =
            serde_json::from_str(&json).map_err(|source| CatalogError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let catalog = Self::from_snapshot(snapshot)?;
        info!(
            path = %path.display(),
            landmarks = catalog.len(),
            feedback = catalog.feedback.len(),
            "loaded landmark catalog"
        );

        Ok(catalog)
    }

    /// Number of landmarks.
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// Whether the catalog has no landmarks.
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// All landmarks, in snapshot order.
    pub fn all(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Look up a landmark by id.
    pub fn get(&self, id: &LandmarkId) -> Option<&Landmark> {
        self.by_id.get(id).map(|&idx| &self.landmarks[idx])
    }

    /// Landmarks whose name or category contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&Landmark> {
        self.landmarks.iter().filter(|l| l.matches(query)).collect()
    }

    /// Landmarks grouped by category, ignoring case, categories in
    /// alphabetical order.
    ///
    /// Each group is named with the first spelling seen in the snapshot.
    pub fn by_category(&self) -> Vec<Category<'_>> {
        let mut groups: BTreeMap<String, Category<'_>> = BTreeMap::new();
        for landmark in &self.landmarks {
            groups
                .entry(landmark.category.to_lowercase())
                .or_insert_with(|| Category {
                    name: &landmark.category,
                    landmarks: Vec::new(),
                })
                .landmarks
                .push(landmark);
        }
        groups.into_values().collect()
    }

    /// Feedback left about `landmark`.
    ///
    /// Feedback is keyed by landmark name, not id.
    pub fn feedback_for<'a>(&'a self, landmark: &'a Landmark) -> impl Iterator<Item = &'a Feedback> {
        self.feedback
            .iter()
            .filter(move |f| f.location == landmark.name)
    }

    /// Average rating of `landmark`.
    pub fn rating_summary(&self, landmark: &Landmark) -> RatingSummary {
        summarize_feedback(&self.feedback, &landmark.name)
    }
}
