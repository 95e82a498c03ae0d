//! Document Types
//!
//! Wire DTOs for goods-introduction documents. Field names follow the
//! API's JSON contract (camelCase), dates serialize as `YYYY-MM-DD`, and
//! unset fields are omitted from the payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Production type for goods produced by the participant itself
pub const PRODUCTION_TYPE_OWN: &str = "OWN_PRODUCTION";

/// Goods-introduction document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsIntroductionDocument {
    /// Tax id of the participant introducing the goods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_inn: Option<String>,

    /// Date the goods were produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_date: Option<NaiveDate>,

    /// Production type, usually [`PRODUCTION_TYPE_OWN`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_type: Option<String>,

    /// Import request marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_request: Option<String>,

    /// Tax id of the goods owner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_inn: Option<String>,

    /// Tax id of the producer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_inn: Option<String>,

    /// Products covered by the document
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,

    /// Registration date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_date: Option<NaiveDate>,

    /// Registration number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_number: Option<String>,
}

impl GoodsIntroductionDocument {
    /// Empty document with the production type preset to own production
    pub fn own_production() -> Self {
        Self {
            production_type: Some(PRODUCTION_TYPE_OWN.to_string()),
            ..Self::default()
        }
    }

    /// Set the participant tax id
    pub fn with_participant_inn(mut self, inn: impl Into<String>) -> Self {
        self.participant_inn = Some(inn.into());
        self
    }

    /// Set the production date
    pub fn with_production_date(mut self, date: NaiveDate) -> Self {
        self.production_date = Some(date);
        self
    }

    /// Set the owner tax id
    pub fn with_owner_inn(mut self, inn: impl Into<String>) -> Self {
        self.owner_inn = Some(inn.into());
        self
    }

    /// Set the producer tax id
    pub fn with_producer_inn(mut self, inn: impl Into<String>) -> Self {
        self.producer_inn = Some(inn.into());
        self
    }

    /// Append a product
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }
}

/// Product entry inside a goods-introduction document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Conformity certificate kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_document: Option<String>,

    /// Certificate issue date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_document_date: Option<NaiveDate>,

    /// Certificate number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_document_number: Option<String>,

    /// Tax id of the goods owner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_inn: Option<String>,

    /// Tax id of the producer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_inn: Option<String>,

    /// Date this product was produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_date: Option<NaiveDate>,

    /// Customs classification code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tnved_code: Option<String>,

    /// Unit identification code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uit_code: Option<String>,

    /// Aggregated unit identification code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uitu_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> GoodsIntroductionDocument {
        GoodsIntroductionDocument::own_production()
            .with_participant_inn("7701234567")
            .with_owner_inn("7701234567")
            .with_producer_inn("7707654321")
            .with_production_date(NaiveDate::from_ymd_opt(2020, 1, 23).unwrap())
            .with_product(Product {
                tnved_code: Some("6403".to_string()),
                uit_code: Some("010463003407001221SgEKSPEC".to_string()),
                production_date: Some(NaiveDate::from_ymd_opt(2020, 1, 23).unwrap()),
                ..Product::default()
            })
    }

    #[test]
    fn test_serializes_wire_field_names() {
        let value = serde_json::to_value(sample_document()).unwrap();

        assert_eq!(value["participantInn"], "7701234567");
        assert_eq!(value["ownerInn"], "7701234567");
        assert_eq!(value["producerInn"], "7707654321");
        assert_eq!(value["productionType"], "OWN_PRODUCTION");
        assert_eq!(value["productionDate"], "2020-01-23");
        assert_eq!(value["products"][0]["tnvedCode"], "6403");
        assert_eq!(value["products"][0]["productionDate"], "2020-01-23");
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let value = serde_json::to_value(sample_document()).unwrap();
        let object = value.as_object().unwrap();

        assert!(!object.contains_key("importRequest"));
        assert!(!object.contains_key("regDate"));
        assert!(!object.contains_key("regNumber"));
    }

    #[test]
    fn test_empty_document_serializes_to_empty_object() {
        let value = serde_json::to_value(GoodsIntroductionDocument::default()).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_document_round_trips() {
        let document = sample_document();
        let json = serde_json::to_string(&document).unwrap();
        let parsed: GoodsIntroductionDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(document, parsed);
    }
}
