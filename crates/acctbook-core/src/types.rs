//! Enumerations shared by items and item forms

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of billable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Service,
    Good,
}

impl ItemType {
    pub const ALL: [ItemType; 2] = [ItemType::Service, ItemType::Good];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Service => "Service",
            ItemType::Good => "Good",
        }
    }
}

impl Default for ItemType {
    fn default() -> Self {
        ItemType::Service
    }
}

impl std::str::FromStr for ItemType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "service" => Ok(ItemType::Service),
            "good" => Ok(ItemType::Good),
            _ => Err(format!("Invalid item type: {}", s)),
        }
    }
}

/// Rows written by other clients may use any casing ("Good", "SERVICE")
impl<'de> Deserialize<'de> for ItemType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemType::Service => write!(f, "service"),
            ItemType::Good => write!(f, "good"),
        }
    }
}

/// Revenue account an item is booked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountCategory {
    /// Interest Income
    Interest,
    /// Other Revenue
    Other,
    /// Realised Gain on Foreign Exchange
    Gain,
    /// Sales
    Sales,
}

impl AccountCategory {
    pub const ALL: [AccountCategory; 4] = [
        AccountCategory::Interest,
        AccountCategory::Other,
        AccountCategory::Gain,
        AccountCategory::Sales,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AccountCategory::Interest => "Interest Income",
            AccountCategory::Other => "Other Revenue",
            AccountCategory::Gain => "Realised Gain on Foreign Exchange",
            AccountCategory::Sales => "Sales",
        }
    }
}

impl std::str::FromStr for AccountCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "interest" => Ok(AccountCategory::Interest),
            "other" => Ok(AccountCategory::Other),
            "gain" => Ok(AccountCategory::Gain),
            "sales" => Ok(AccountCategory::Sales),
            _ => Err(format!("Invalid account: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountCategory::Interest => write!(f, "interest"),
            AccountCategory::Other => write!(f, "other"),
            AccountCategory::Gain => write!(f, "gain"),
            AccountCategory::Sales => write!(f, "sales"),
        }
    }
}

/// Value added tax bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxBracket {
    #[serde(rename = "VAT19")]
    Vat19,
    #[serde(rename = "VAT9")]
    Vat9,
    #[serde(rename = "VAT5")]
    Vat5,
}

impl TaxBracket {
    pub const ALL: [TaxBracket; 3] = [TaxBracket::Vat19, TaxBracket::Vat9, TaxBracket::Vat5];

    /// Rate in percent
    pub fn rate(&self) -> Decimal {
        match self {
            TaxBracket::Vat19 => Decimal::from(19),
            TaxBracket::Vat9 => Decimal::from(9),
            TaxBracket::Vat5 => Decimal::from(5),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaxBracket::Vat19 => "VAT 19",
            TaxBracket::Vat9 => "VAT 9",
            TaxBracket::Vat5 => "VAT 5",
        }
    }
}

impl std::str::FromStr for TaxBracket {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(' ', "").as_str() {
            "VAT19" => Ok(TaxBracket::Vat19),
            "VAT9" => Ok(TaxBracket::Vat9),
            "VAT5" => Ok(TaxBracket::Vat5),
            _ => Err(format!("Invalid tax bracket: {}", s)),
        }
    }
}

impl std::fmt::Display for TaxBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxBracket::Vat19 => write!(f, "VAT19"),
            TaxBracket::Vat9 => write!(f, "VAT9"),
            TaxBracket::Vat5 => write!(f, "VAT5"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_round_trip_text() {
        for t in ItemType::ALL {
            assert_eq!(t.to_string().parse::<ItemType>(), Ok(t));
        }
        assert_eq!("GOOD".parse::<ItemType>(), Ok(ItemType::Good));
        assert!("widget".parse::<ItemType>().is_err());
    }

    #[test]
    fn test_item_type_deserialize_any_case() {
        assert_eq!(serde_json::from_str::<ItemType>("\"Good\"").unwrap(), ItemType::Good);
        assert_eq!(serde_json::from_str::<ItemType>("\"SERVICE\"").unwrap(), ItemType::Service);
        assert!(serde_json::from_str::<ItemType>("\"widget\"").is_err());
        assert_eq!(serde_json::to_string(&ItemType::Good).unwrap(), "\"good\"");
    }

    #[test]
    fn test_tax_bracket_parsing() {
        assert_eq!("VAT19".parse::<TaxBracket>(), Ok(TaxBracket::Vat19));
        assert_eq!("vat 9".parse::<TaxBracket>(), Ok(TaxBracket::Vat9));
        assert_eq!(TaxBracket::Vat5.rate(), Decimal::from(5));
        assert_eq!(serde_json::to_string(&TaxBracket::Vat19).unwrap(), "\"VAT19\"");
    }

    #[test]
    fn test_account_labels() {
        assert_eq!(AccountCategory::Gain.label(), "Realised Gain on Foreign Exchange");
        assert_eq!("sales".parse::<AccountCategory>(), Ok(AccountCategory::Sales));
    }
}
