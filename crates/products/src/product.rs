use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use catalog_core::{DomainError, DomainResult, ProductId};

/// Wire names of the fields a create request must carry.
pub const REQUIRED_FIELDS: [&str; 9] = [
    "gvtId",
    "name",
    "productTagline",
    "shortDescription",
    "longDescription",
    "productUrl",
    "voucherTypeName",
    "orderUrl",
    "productTitle",
];

const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";
const ID_KEY: &str = "id";

/// A catalog record describing a redeemable offer/voucher.
///
/// `id` is owned by the store. Every other key (`name`, `gvtId`,
/// `productTagline`, `__typename`, ...) lives in `attributes` exactly as the
/// caller sent it; values are not type-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// The `name` attribute, or `""` when it is absent or not a string.
    pub fn name(&self) -> &str {
        self.attributes
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

/// Create payload: a JSON object with every product key except `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductDraft(Map<String, Value>);

/// Update payload: keys to shallow-merge over the stored record.
///
/// An `id` key is discarded; the path id always wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductPatch(Map<String, Value>);

/// `null`, `false` and `""` do not count as supplying a field. `0` does.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

impl ProductDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any earlier value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    #[cfg(test)]
    pub(crate) fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Wire names of required fields that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .into_iter()
            .filter(|field| self.0.get(*field).is_none_or(is_blank))
            .collect()
    }

    /// Check required fields and build the record under `id`.
    pub fn into_product(self, id: ProductId) -> DomainResult<Product> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            tracing::debug!(?missing, "create rejected: required fields missing");
            return Err(DomainError::invalid_input(MISSING_REQUIRED_FIELDS));
        }

        let mut attributes = self.0;
        attributes.remove(ID_KEY);
        Ok(Product { id, attributes })
    }
}

impl ProductPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any earlier value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Shallow-merge this patch over `product`. The id is never touched.
    pub fn apply_to(self, product: &mut Product) {
        let mut fields = self.0;
        fields.remove(ID_KEY);
        product.attributes.extend(fields);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn draft(name: &str) -> ProductDraft {
        ProductDraft::new()
            .with("gvtId", 1001)
            .with("name", name)
            .with("productTagline", "Tagline")
            .with("shortDescription", "Short")
            .with("longDescription", "Long")
            .with("productUrl", "https://example.test/p")
            .with("voucherTypeName", "digital")
            .with("orderUrl", "https://example.test/order")
            .with("productTitle", format!("{name} title"))
    }

    pub(crate) fn product(id: i64, name: &str) -> Product {
        let mut p = draft("Placeholder").into_product(ProductId::new(id)).unwrap();
        p.attributes.insert("name".to_string(), json!(name));
        p
    }

    #[test]
    fn complete_draft_builds_product() {
        let p = draft("Alpha Pass").into_product(ProductId::new(2)).unwrap();
        assert_eq!(p.id, ProductId::new(2));
        assert_eq!(p.name(), "Alpha Pass");
        assert_eq!(p.attribute("logoLocation"), None);
    }

    #[test]
    fn missing_field_is_invalid_input() {
        let mut d = draft("Alpha Pass");
        d.remove("orderUrl");
        assert_eq!(d.missing_fields(), vec!["orderUrl"]);
        let err = d.into_product(ProductId::new(1)).unwrap_err();
        assert_eq!(err, DomainError::invalid_input("Missing required fields"));
    }

    #[test]
    fn empty_draft_misses_every_required_field() {
        assert_eq!(ProductDraft::default().missing_fields(), REQUIRED_FIELDS.to_vec());
    }

    #[test]
    fn blank_values_count_as_missing() {
        let d = draft("Alpha Pass")
            .with("name", "")
            .with("orderUrl", Value::Null)
            .with("productUrl", false);
        assert_eq!(d.missing_fields(), vec!["name", "productUrl", "orderUrl"]);
    }

    #[test]
    fn zero_gvt_id_is_accepted() {
        let d = draft("Alpha Pass").with("gvtId", 0);
        assert!(d.missing_fields().is_empty());
        let p = d.into_product(ProductId::new(1)).unwrap();
        assert_eq!(p.attribute("gvtId"), Some(&json!(0)));
    }

    #[test]
    fn field_types_are_not_checked() {
        let body = json!({
            "gvtId": "G-77",
            "name": 42,
            "productTagline": ["t"],
            "shortDescription": {"text": "s"},
            "longDescription": "l",
            "productUrl": "u",
            "voucherTypeName": true,
            "orderUrl": "o",
            "productTitle": "pt"
        });
        let d: ProductDraft = serde_json::from_value(body).unwrap();
        let p = d.into_product(ProductId::new(1)).unwrap();
        assert_eq!(p.attribute("gvtId"), Some(&json!("G-77")));
        assert_eq!(p.name(), "");
    }

    #[test]
    fn draft_json_keeps_unknown_keys_but_not_id() {
        let body = json!({
            "gvtId": 5,
            "name": "Beta Pass",
            "productTagline": "t",
            "shortDescription": "s",
            "longDescription": "l",
            "productUrl": "u",
            "voucherTypeName": "v",
            "orderUrl": "o",
            "productTitle": "pt",
            "id": 77,
            "badge": "new"
        });
        let d: ProductDraft = serde_json::from_value(body).unwrap();
        let p = d.into_product(ProductId::new(3)).unwrap();
        assert_eq!(p.id, ProductId::new(3));
        assert_eq!(p.attribute("badge"), Some(&json!("new")));

        let out = serde_json::to_value(&p).unwrap();
        assert_eq!(out["id"], 3);
        assert_eq!(out["badge"], "new");
        assert_eq!(out["gvtId"], 5);
    }

    #[test]
    fn patch_overwrites_only_given_fields() {
        let mut p = product(1, "Old Name");
        let before = p.clone();
        let patch: ProductPatch =
            serde_json::from_value(json!({ "name": "New Name", "gvtId": "5", "id": 99 })).unwrap();
        patch.apply_to(&mut p);

        assert_eq!(p.id, ProductId::new(1));
        assert_eq!(p.name(), "New Name");
        assert_eq!(p.attribute("gvtId"), Some(&json!("5")));
        assert_eq!(p.attribute("productTagline"), before.attribute("productTagline"));
        assert_eq!(p.attribute("id"), None);
    }

    #[test]
    fn patch_null_is_stored() {
        let mut p = product(1, "Alpha Pass");
        ProductPatch::new().with("logoLocation", Value::Null).apply_to(&mut p);
        assert_eq!(p.attribute("logoLocation"), Some(&Value::Null));
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut p = product(1, "Alpha Pass");
        let before = p.clone();
        ProductPatch::default().apply_to(&mut p);
        assert_eq!(p, before);
    }
}
