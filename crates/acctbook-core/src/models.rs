//! Item records and the item form

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::{AccountCategory, ItemType, TaxBracket};

/// A billable product or service, as stored in the external table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Assigned by the store, never changes
    pub id: i64,
    pub description: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "lenient_option")]
    pub account: Option<AccountCategory>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub tax: Option<TaxBracket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Build an item from a validated payload
    pub fn from_new(id: i64, new_item: NewItem) -> Self {
        Self {
            id,
            description: new_item.description,
            item_type: new_item.item_type,
            price: new_item.price,
            account: Some(new_item.account),
            discount: new_item.discount,
            tax: new_item.tax,
            created_at: None,
        }
    }

    /// Price as displayed and searched: no trailing zeros ("100", "49.5")
    pub fn price_text(&self) -> String {
        self.price.normalize().to_string()
    }

    /// Case-insensitive substring match on description, type and price.
    /// `query_lower` must already be lowercase.
    pub fn matches(&self, query_lower: &str) -> bool {
        self.description.to_lowercase().contains(query_lower)
            || self.item_type.to_string().contains(query_lower)
            || self.price_text().contains(query_lower)
    }
}

/// Unknown or empty values from the store are treated as unset
fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// Payload for inserting or updating an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub description: String,
    pub account: AccountCategory,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub tax: Option<TaxBracket>,
    #[serde(rename = "type", default)]
    pub item_type: ItemType,
}

impl NewItem {
    /// Check the invariants the form enforces
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.description.trim().is_empty() {
            return Err(CoreError::validation("description", "Description is required"));
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(CoreError::validation("price", "Price must not be negative"));
        }
        if let Some(discount) = self.discount {
            if discount.is_sign_negative() && !discount.is_zero() {
                return Err(CoreError::validation("discount", "Discount must not be negative"));
            }
        }
        Ok(())
    }
}

/// Raw add/edit form values, exactly as submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub discount: String,
    #[serde(default)]
    pub tax: String,
    #[serde(rename = "type", default = "default_form_type")]
    pub item_type: String,
}

fn default_form_type() -> String {
    ItemType::Service.to_string()
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            description: String::new(),
            account: String::new(),
            price: String::new(),
            discount: String::new(),
            tax: String::new(),
            item_type: default_form_type(),
        }
    }
}

impl ItemForm {
    /// Pre-fill the edit form from a stored item
    pub fn from_item(item: &Item) -> Self {
        Self {
            description: item.description.clone(),
            account: item.account.map(|a| a.to_string()).unwrap_or_default(),
            price: item.price_text(),
            discount: item.discount.map(|d| d.normalize().to_string()).unwrap_or_default(),
            tax: item.tax.map(|t| t.to_string()).unwrap_or_default(),
            item_type: item.item_type.to_string(),
        }
    }

    /// Parse and validate into a store payload
    pub fn validate(&self) -> Result<NewItem, CoreError> {
        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(CoreError::validation("description", "Description is required"));
        }

        if self.account.trim().is_empty() {
            return Err(CoreError::validation("account", "Account is required"));
        }
        let account = self
            .account
            .parse::<AccountCategory>()
            .map_err(|e| CoreError::validation("account", &e))?;

        let price = parse_amount("price", &self.price)?
            .ok_or_else(|| CoreError::validation("price", "Price is required"))?;
        let discount = parse_amount("discount", &self.discount)?;

        let tax = if self.tax.trim().is_empty() {
            None
        } else {
            Some(
                self.tax
                    .parse::<TaxBracket>()
                    .map_err(|e| CoreError::validation("tax", &e))?,
            )
        };

        let item_type = self
            .item_type
            .parse::<ItemType>()
            .map_err(|e| CoreError::validation("type", &e))?;

        let new_item = NewItem {
            description,
            account,
            price,
            discount,
            tax,
            item_type,
        };
        new_item.validate()?;
        Ok(new_item)
    }
}

/// Empty input is `None`; anything else must be a number
fn parse_amount(field: &str, raw: &str) -> Result<Option<Decimal>, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(trimmed)
        .map(Some)
        .map_err(|_| CoreError::validation(field, &format!("'{}' is not a number", trimmed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ItemForm {
        ItemForm {
            description: "Consulting Fee".to_string(),
            account: "sales".to_string(),
            price: "100".to_string(),
            discount: String::new(),
            tax: "VAT19".to_string(),
            item_type: "service".to_string(),
        }
    }

    #[test]
    fn test_item_deserializes_store_row() {
        let json = r#"{
            "id": 3,
            "created_at": "2024-11-02T10:15:00+00:00",
            "description": "Widget A",
            "account": "sales",
            "price": 49.5,
            "discount": null,
            "tax": "",
            "type": "good"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 3);
        assert_eq!(item.item_type, ItemType::Good);
        assert_eq!(item.price_text(), "49.5");
        assert_eq!(item.account, Some(AccountCategory::Sales));
        assert_eq!(item.tax, None);
        assert!(item.discount.is_none());
        assert!(item.created_at.is_some());
    }

    #[test]
    fn test_item_match_fields() {
        let item = Item::from_new(1, form().validate().unwrap());
        assert!(item.matches("consult"));
        assert!(item.matches("service"));
        assert!(item.matches("10"));
        assert!(!item.matches("widget"));
        // account and tax are not searched
        assert!(!item.matches("sales"));
        assert!(!item.matches("vat"));
    }

    #[test]
    fn test_price_text_drops_trailing_zeros() {
        let mut item = Item::from_new(1, form().validate().unwrap());
        item.price = Decimal::from_str("100.50").unwrap();
        assert_eq!(item.price_text(), "100.5");
        item.price = Decimal::from_str("100.00").unwrap();
        assert_eq!(item.price_text(), "100");
    }

    #[test]
    fn test_form_validate_ok() {
        let new_item = form().validate().unwrap();
        assert_eq!(new_item.description, "Consulting Fee");
        assert_eq!(new_item.account, AccountCategory::Sales);
        assert_eq!(new_item.price, Decimal::from(100));
        assert_eq!(new_item.discount, None);
        assert_eq!(new_item.tax, Some(TaxBracket::Vat19));
        assert_eq!(new_item.item_type, ItemType::Service);
    }

    #[test]
    fn test_form_validate_errors() {
        let mut f = form();
        f.description = "   ".to_string();
        assert!(matches!(f.validate(), Err(CoreError::ValidationError { ref field, .. }) if field == "description"));

        let mut f = form();
        f.account = String::new();
        assert!(matches!(f.validate(), Err(CoreError::ValidationError { ref field, .. }) if field == "account"));

        let mut f = form();
        f.price = String::new();
        assert!(matches!(f.validate(), Err(CoreError::ValidationError { ref field, .. }) if field == "price"));

        let mut f = form();
        f.price = "abc".to_string();
        assert!(matches!(f.validate(), Err(CoreError::ValidationError { ref field, .. }) if field == "price"));

        let mut f = form();
        f.price = "-1".to_string();
        assert!(f.validate().is_err());

        let mut f = form();
        f.discount = "-5".to_string();
        assert!(matches!(f.validate(), Err(CoreError::ValidationError { ref field, .. }) if field == "discount"));

        let mut f = form();
        f.tax = "VAT7".to_string();
        assert!(matches!(f.validate(), Err(CoreError::ValidationError { ref field, .. }) if field == "tax"));
    }

    #[test]
    fn test_form_from_item_round_trip() {
        let mut new_item = form().validate().unwrap();
        new_item.discount = Some(Decimal::from_str("2.50").unwrap());
        let item = Item::from_new(9, new_item.clone());
        let prefilled = ItemForm::from_item(&item);
        assert_eq!(prefilled.discount, "2.5");
        assert_eq!(prefilled.validate().unwrap(), new_item);
    }

    #[test]
    fn test_new_item_serializes_store_payload() {
        let new_item = form().validate().unwrap();
        let value = serde_json::to_value(&new_item).unwrap();
        assert_eq!(value["type"], "service");
        assert_eq!(value["account"], "sales");
        assert_eq!(value["tax"], "VAT19");
        assert_eq!(value["price"], 100.0);
        assert!(value["discount"].is_null());
    }
}
