//! Raw record → [`Product`] normalization.
//!
//! Multi-value fields may arrive as a comma-delimited string or as a list.
//! Presence is the only thing checked; values are otherwise coerced
//! permissively.

use tracing::{debug, instrument};

use pagecraft_shared::{PagecraftError, Product, RawField, RawProduct, Result};

use crate::events::{PipelineEvent, SharedSink};
use crate::stage::Stage;

/// Keys every raw record must carry.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "name",
    "concentration",
    "skin_type",
    "key_ingredients",
    "benefits",
    "how_to_use",
    "side_effects",
    "price",
];

/// Stage that turns a raw record into a [`Product`].
pub struct Normalizer {
    sink: SharedSink,
}

impl Normalizer {
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }
}

impl Stage<RawProduct, Product> for Normalizer {
    fn name(&self) -> &'static str {
        "normalizer"
    }

    #[instrument(skip_all, fields(stage = "normalizer", keys = raw.0.len()))]
    fn run(&self, raw: &RawProduct) -> Result<Product> {
        self.sink.emit(&PipelineEvent::StageStarted { stage: self.name() });

        let product = normalize(raw)?;

        debug!(
            skin_types = product.skin_type.len(),
            ingredients = product.key_ingredients.len(),
            benefits = product.benefits.len(),
            "normalized raw record"
        );
        self.sink.emit(&PipelineEvent::StageCompleted {
            stage: self.name(),
            detail: format!("parsed product: {}", product.name),
        });

        Ok(product)
    }
}

/// Normalize a raw record. Fails with `MissingField` on the first absent key,
/// checked in [`REQUIRED_FIELDS`] order.
pub fn normalize(raw: &RawProduct) -> Result<Product> {
    if let Some(missing) = REQUIRED_FIELDS.iter().find(|k| raw.get(k).is_none()) {
        return Err(PagecraftError::missing_field(*missing));
    }

    Ok(Product {
        name: text_field(raw, "name")?,
        concentration: text_field(raw, "concentration")?,
        skin_type: list_field(raw, "skin_type")?,
        key_ingredients: list_field(raw, "key_ingredients")?,
        benefits: list_field(raw, "benefits")?,
        how_to_use: text_field(raw, "how_to_use")?,
        side_effects: text_field(raw, "side_effects")?,
        price: text_field(raw, "price")?,
    })
}

/// Split a delimited string on commas, trimming each element and dropping
/// empty segments.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn lookup<'a>(raw: &'a RawProduct, key: &str) -> Result<&'a RawField> {
    raw.get(key).ok_or_else(|| PagecraftError::missing_field(key))
}

fn text_field(raw: &RawProduct, key: &str) -> Result<String> {
    Ok(match lookup(raw, key)? {
        RawField::Text(s) => s.clone(),
        RawField::List(items) => items.join(", "),
        RawField::Other(value) => value_text(value),
    })
}

fn list_field(raw: &RawProduct, key: &str) -> Result<Vec<String>> {
    let items = match lookup(raw, key)? {
        RawField::Text(s) => split_list(s),
        RawField::List(items) => items.clone(),
        RawField::Other(serde_json::Value::Array(values)) => {
            values.iter().map(value_text).collect()
        }
        RawField::Other(value) => split_list(&value_text(value)),
    };

    // An empty list would break the non-empty invariant every page relies on.
    if items.is_empty() {
        return Err(PagecraftError::missing_field(key));
    }
    Ok(items)
}

/// Render a JSON scalar the way a user would write it (strings unquoted).
fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_raw() -> RawProduct {
        RawProduct::new()
            .with("name", "GlowBoost Vitamin C Serum")
            .with("concentration", "10% Vitamin C")
            .with("skin_type", "Oily, Combination")
            .with("key_ingredients", "Vitamin C, Hyaluronic Acid")
            .with("benefits", "Brightening, Fades dark spots")
            .with("how_to_use", "Apply 2-3 drops in the morning before sunscreen")
            .with("side_effects", "Mild tingling for sensitive skin")
            .with("price", "₹699")
    }

    #[test]
    fn splits_delimited_strings() {
        let product = normalize(&make_raw()).unwrap();
        assert_eq!(product.skin_type, vec!["Oily", "Combination"]);
        assert_eq!(product.key_ingredients, vec!["Vitamin C", "Hyaluronic Acid"]);
        assert_eq!(product.benefits, vec!["Brightening", "Fades dark spots"]);
        assert_eq!(product.price, "₹699");
    }

    #[test]
    fn lists_are_used_as_is() {
        let raw = make_raw().with(
            "skin_type",
            vec!["Oily".to_string(), " Combination ".to_string()],
        );
        let product = normalize(&raw).unwrap();
        // List elements are not trimmed or re-split.
        assert_eq!(product.skin_type, vec!["Oily", " Combination "]);
    }

    #[test]
    fn skin_type_non_empty_for_either_shape() {
        let from_string = normalize(&make_raw().with("skin_type", "Dry")).unwrap();
        let from_list = normalize(&make_raw().with("skin_type", vec!["Dry".to_string()])).unwrap();
        assert!(!from_string.skin_type.is_empty());
        assert_eq!(from_string.skin_type, from_list.skin_type);
    }

    #[test]
    fn missing_key_names_the_field() {
        let err = normalize(&make_raw().without("price")).unwrap_err();
        match err {
            PagecraftError::MissingField { field } => assert_eq!(field, "price"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_list_counts_as_missing() {
        let err = normalize(&make_raw().with("benefits", Vec::<String>::new())).unwrap_err();
        assert!(matches!(err, PagecraftError::MissingField { field } if field == "benefits"));

        let err = normalize(&make_raw().with("benefits", " , ")).unwrap_err();
        assert!(matches!(err, PagecraftError::MissingField { .. }));
    }

    #[test]
    fn scalars_are_coerced_permissively() {
        let mut raw = make_raw();
        raw.0.insert(
            "price".into(),
            RawField::Other(serde_json::json!(699)),
        );
        let product = normalize(&raw).unwrap();
        assert_eq!(product.price, "699");
    }

    #[test]
    fn split_list_trims_and_drops_empties() {
        assert_eq!(split_list(" a ,b,, c ,"), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn fixture_record_normalizes() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/glowboost.fixture.json")
            .expect("read fixture");
        let raw: RawProduct = serde_json::from_str(&fixture).expect("deserialize fixture");
        let product = normalize(&raw).unwrap();
        assert_eq!(product.name, "GlowBoost Vitamin C Serum");
        assert_eq!(product.skin_type.len(), 2);
    }
}
