use serde::Serialize;
use chrono::{DateTime, Utc};

use crate::error::SourceError;

pub const CURRENCY: &str = "ZAR";

/// One retailer's offer for a search query.
///
/// Built through [`PriceQuote::new`], which rejects non-positive or
/// non-finite prices. Fields are read-only after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    supplier: String,
    product: String,
    price: f64,
    currency: &'static str,
    in_stock: bool,
    stock_quantity: Option<u32>,
    link: Option<String>,
    #[serde(rename = "scraped_at")]
    fetched_at: DateTime<Utc>,
}

impl PriceQuote {
    pub fn new(
        supplier: impl Into<String>,
        product: impl Into<String>,
        price: f64,
        in_stock: bool,
        stock_quantity: Option<u32>,
        link: Option<String>,
    ) -> Result<Self, SourceError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(SourceError::InvalidQuote(format!(
                "price must be positive, got {}",
                price
            )));
        }

        Ok(PriceQuote {
            supplier: supplier.into(),
            product: product.into(),
            price,
            currency: CURRENCY,
            in_stock,
            stock_quantity,
            link,
            fetched_at: Utc::now(),
        })
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn currency(&self) -> &str {
        self.currency
    }

    pub fn in_stock(&self) -> bool {
        self.in_stock
    }

    pub fn stock_quantity(&self) -> Option<u32> {
        self.stock_quantity
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_price() {
        for price in [0.0, -12.5, f64::NAN, f64::INFINITY] {
            let err = PriceQuote::new("Cashbuild", "Cement", price, true, None, None).unwrap_err();
            assert!(matches!(err, SourceError::InvalidQuote(_)));
        }
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let quote = PriceQuote::new(
            "Cashbuild",
            "Cement - Value Pack",
            99.95,
            true,
            Some(40),
            Some("https://www.cashbuild.co.za".into()),
        )
        .unwrap();

        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["supplier"], "Cashbuild");
        assert_eq!(json["product"], "Cement - Value Pack");
        assert_eq!(json["price"], 99.95);
        assert_eq!(json["currency"], "ZAR");
        assert_eq!(json["in_stock"], true);
        assert_eq!(json["stock_quantity"], 40);
        assert_eq!(json["link"], "https://www.cashbuild.co.za");
        assert!(json["scraped_at"].is_string());
    }

    #[test]
    fn unknown_stock_serializes_as_null() {
        let quote = PriceQuote::new("Leroy Merlin", "Brick", 5.0, false, None, None).unwrap();
        let json = serde_json::to_value(&quote).unwrap();
        assert!(json["stock_quantity"].is_null());
        assert!(json["link"].is_null());
    }
}
