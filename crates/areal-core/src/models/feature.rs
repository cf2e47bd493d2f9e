use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::attribute::{AttributeValue, Attributes};
use super::geometry::{Crs, Geometry, GeometryFamily};
use crate::error::{ArealError, Result};

/// One geometry plus its attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Geometry in the collection's planar coordinate reference
    pub geometry: Geometry,

    /// Ordered attribute mapping
    #[serde(default)]
    pub attributes: Attributes,
}

impl Feature {
    /// Create a new feature
    pub fn new(geometry: Geometry, attributes: Attributes) -> Self {
        Self { geometry, attributes }
    }

    /// Create a feature with no attributes
    pub fn from_geometry(geometry: Geometry) -> Self {
        Self { geometry, attributes: Attributes::new() }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn family(&self) -> GeometryFamily {
        self.geometry.family()
    }
}

/// Ordered set of features sharing a coordinate reference and geometry family
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    crs: Option<Crs>,
    family: Option<GeometryFamily>,
    features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create a collection, rejecting mixed geometry families
    pub fn new(crs: Option<Crs>, features: Vec<Feature>) -> Result<Self> {
        let mut family: Option<GeometryFamily> = None;
        for (index, feature) in features.iter().enumerate() {
            let current = feature.family();
            match family {
                None => family = Some(current),
                Some(first) if first != current => {
                    return Err(ArealError::MixedGeometryFamily {
                        first: first.to_string(),
                        second: current.to_string(),
                        index,
                    });
                }
                Some(_) => {}
            }
        }

        Ok(Self { crs, family, features })
    }

    /// Create an empty collection
    pub fn empty(crs: Option<Crs>) -> Self {
        Self { crs, family: None, features: Vec::new() }
    }

    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    /// Geometry family, `None` for an empty collection
    pub fn family(&self) -> Option<GeometryFamily> {
        self.family
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Assign a CRS to a collection that has none; an existing CRS is kept
    pub fn or_crs(mut self, crs: Option<Crs>) -> Self {
        if self.crs.is_none() {
            self.crs = crs;
        }
        self
    }

    /// Union of attribute names across all features, in first-seen order
    pub fn field_names(&self) -> Vec<String> {
        let names: IndexSet<&String> =
            self.features.iter().flat_map(|f| f.attributes.keys()).collect();
        names.into_iter().cloned().collect()
    }

    /// Check whether any feature carries the named attribute
    pub fn has_field(&self, name: &str) -> bool {
        self.features.iter().any(|f| f.attributes.contains_key(name))
    }

    /// Drop geometry explicitly, keeping only the attribute rows
    pub fn into_attribute_rows(self) -> Vec<Attributes> {
        self.features.into_iter().map(|f| f.attributes).collect()
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
