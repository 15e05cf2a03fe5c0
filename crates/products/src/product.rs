use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopledger_core::{Entity, LedgerError, LedgerResult, ProductId};

use crate::price::Price;

/// Catalog product.
///
/// Immutable once minted. Identity is the `id`: equality and hashing ignore
/// every other field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    unit_price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Product {
    /// Build a product from a validated request under a freshly generated id.
    ///
    /// Only the inventory mints products; everything else receives clones.
    pub fn mint(id: ProductId, request: &NewProduct) -> LedgerResult<Self> {
        let unit_price = request.validate()?;
        Ok(Self {
            id,
            name: request.name.trim().to_string(),
            unit_price,
            image_ref: request.image_ref.clone(),
            description: request.description.clone(),
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Price {
        self.unit_price
    }

    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Product {}

impl core::hash::Hash for Product {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Request to add a product to the catalog (the "mint" input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub unit_price: Decimal,
    pub initial_stock: u32,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, unit_price: Decimal, initial_stock: u32) -> Self {
        Self {
            name: name.into(),
            unit_price,
            initial_stock,
            image_ref: None,
            description: None,
        }
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate the request, returning the checked price.
    pub fn validate(&self) -> LedgerResult<Price> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::invalid("name cannot be empty"));
        }
        Price::new(self.unit_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn mint_copies_request_fields() {
        let id = ProductId::new();
        let request = NewProduct::new("  milk ", dec!(15.99), 10)
            .with_image("milk.png")
            .with_description("2L carton");

        let product = Product::mint(id, &request).unwrap();

        assert_eq!(product.id_typed(), id);
        assert_eq!(product.name(), "milk");
        assert_eq!(product.unit_price().amount(), dec!(15.99));
        assert_eq!(product.image_ref(), Some("milk.png"));
        assert_eq!(product.description(), Some("2L carton"));
    }

    #[test]
    fn mint_rejects_blank_name() {
        let err = Product::mint(ProductId::new(), &NewProduct::new("   ", dec!(1), 1)).unwrap_err();
        assert_eq!(err, LedgerError::invalid("name cannot be empty"));
    }

    #[test]
    fn mint_rejects_negative_price() {
        let err = Product::mint(ProductId::new(), &NewProduct::new("bread", dec!(-5.99), 1)).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
    }

    #[test]
    fn equality_is_by_id_only() {
        let id = ProductId::new();
        let a = Product::mint(id, &NewProduct::new("cheese", dec!(12.95), 1)).unwrap();
        let b = Product::mint(id, &NewProduct::new("other", dec!(1.00), 1)).unwrap();
        let c = Product::mint(ProductId::new(), &NewProduct::new("cheese", dec!(12.95), 1)).unwrap();

        assert_eq!(a, b);
        assert!(a.same_entity(&b));
        assert_ne!(a, c);
    }

    #[test]
    fn optional_metadata_is_omitted_from_json() {
        let product = Product::mint(ProductId::new(), &NewProduct::new("lettuce", dec!(6.79), 1)).unwrap();
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("image_ref").is_none());
        assert_eq!(json["name"], "lettuce");
        assert_eq!(json["unit_price"], "6.79");
    }
}
