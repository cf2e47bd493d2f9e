use areal_core::error::{ArealError, Result};
use areal_core::models::{AttributeValue, Attributes, Feature, FeatureCollection};

/// Keep only the named attributes, in the requested order, with geometry attached.
///
/// A field carried by no feature is `MissingField`; a feature lacking a field
/// that others carry gets null. Use
/// [`FeatureCollection::into_attribute_rows`] to drop geometry instead.
pub fn project<S: AsRef<str>>(collection: &FeatureCollection, fields: &[S]) -> Result<FeatureCollection> {
    let known = collection.field_names();
    for field in fields {
        let field = field.as_ref();
        if !known.iter().any(|k| k == field) {
            return Err(ArealError::MissingField { field: field.to_string() });
        }
    }

    let features = collection
        .iter()
        .map(|feature| {
            let attributes: Attributes = fields
                .iter()
                .map(|field| {
                    let field = field.as_ref();
                    let value = feature.attribute(field).cloned().unwrap_or(AttributeValue::Null);
                    (field.to_string(), value)
                })
                .collect();
            Feature::new(feature.geometry.clone(), attributes)
        })
        .collect();

    FeatureCollection::new(collection.crs().cloned(), features)
}
