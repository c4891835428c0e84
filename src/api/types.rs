// Wire types for the finance API
//
// Field names follow the backend's camelCase JSON. Amounts are plain numbers
// on the wire and are kept as f64 here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category bucket type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    Profit,
    Expense,
}

impl CategoryType {
    /// Entry endpoint family that records entries of this type
    pub fn entry_kind(self) -> EntryKind {
        match self {
            Self::Profit => EntryKind::Profit,
            Self::Expense => EntryKind::Expense,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Profit => "PROFIT",
            Self::Expense => "EXPENSE",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Profit => Self::Expense,
            Self::Expense => Self::Profit,
        }
    }
}

/// Which entry resource a request targets (`/profits` or `/expenses`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Profit,
    Expense,
}

impl EntryKind {
    pub fn resource(self) -> &'static str {
        match self {
            Self::Profit => "/profits",
            Self::Expense => "/expenses",
        }
    }

    pub fn category_type(self) -> CategoryType {
        match self {
            Self::Profit => CategoryType::Profit,
            Self::Expense => CategoryType::Expense,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Profit => "Profit",
            Self::Expense => "Expense",
        }
    }
}

/// A named income or expense bucket (`CategoryResponse`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

impl From<&Category> for CategoryRequest {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            kind: category.kind,
        }
    }
}

/// Per-category total inside a summary bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category_id: i64,
    pub total_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_type: Option<CategoryType>,
}

#[cfg(test)]
impl CategoryTotal {
    pub fn new(category_id: i64, total_amount: f64) -> Self {
        Self {
            category_id,
            total_amount,
            category_name: None,
            category_type: None,
        }
    }
}

/// Aggregate snapshot returned by `GET /summary`
///
/// `net_worth` is expected to equal `total_profits - total_expenses` but the
/// client never recomputes or enforces it. Missing buckets decode as empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    #[serde(default)]
    pub total_profits: f64,
    #[serde(default)]
    pub total_expenses: f64,
    #[serde(default)]
    pub net_worth: f64,
    #[serde(default)]
    pub profits_by_category: Vec<CategoryTotal>,
    #[serde(default)]
    pub expenses_by_category: Vec<CategoryTotal>,
    #[serde(default)]
    pub all_categories: Vec<Category>,
}

impl FinancialSummary {
    /// Total for a category looked up in the bucket matching its type
    ///
    /// A category with no entry in its bucket contributes zero.
    pub fn category_total(&self, category: &Category) -> f64 {
        let bucket = match category.kind {
            CategoryType::Profit => &self.profits_by_category,
            CategoryType::Expense => &self.expenses_by_category,
        };
        bucket
            .iter()
            .find(|total| total.category_id == category.id)
            .map(|total| total.total_amount)
            .unwrap_or(0.0)
    }
}

/// Payload for creating or updating a profit/expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRequest {
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category_id: i64,
}

impl EntryRequest {
    /// Rebuild an update request from a server response
    ///
    /// The category id always comes from the nested category object.
    pub fn from_response(entry: &EntryResponse) -> Self {
        Self {
            description: entry.description.clone(),
            amount: entry.amount,
            date: entry.date,
            category_id: entry.category.id,
        }
    }
}

/// A single dated transaction as returned by the entry endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryResponse {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub type RegisterRequest = LoginRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salary() -> Category {
        Category {
            id: 1,
            name: "Salary".to_string(),
            kind: CategoryType::Profit,
        }
    }

    #[test]
    fn test_summary_decodes_backend_shape() {
        let json = r#"{
            "totalProfits": 1000,
            "totalExpenses": 400.5,
            "netWorth": 599.5,
            "profitsByCategory": [
                {"categoryId": 1, "categoryName": "Salary", "categoryType": "PROFIT", "totalAmount": 1000}
            ],
            "expensesByCategory": [{"categoryId": 2, "totalAmount": 400.5}],
            "allCategories": [
                {"id": 1, "name": "Salary", "type": "PROFIT"},
                {"id": 2, "name": "Rent", "type": "EXPENSE"}
            ]
        }"#;

        let summary: FinancialSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_profits, 1000.0);
        assert_eq!(summary.total_expenses, 400.5);
        assert_eq!(summary.all_categories.len(), 2);
        assert_eq!(summary.all_categories[1].kind, CategoryType::Expense);
        assert_eq!(
            summary.profits_by_category[0].category_name.as_deref(),
            Some("Salary")
        );
        assert_eq!(summary.expenses_by_category[0].category_type, None);
    }

    #[test]
    fn test_summary_missing_buckets_default_to_empty() {
        let summary: FinancialSummary =
            serde_json::from_str(r#"{"totalProfits": 0, "totalExpenses": 0, "netWorth": 0}"#)
                .unwrap();
        assert!(summary.all_categories.is_empty());
        assert!(summary.profits_by_category.is_empty());
    }

    #[test]
    fn test_category_total_uses_matching_bucket() {
        let summary = FinancialSummary {
            // Same id in the wrong bucket must not be picked up
            expenses_by_category: vec![CategoryTotal::new(1, 99.0)],
            profits_by_category: vec![CategoryTotal::new(1, 250.0)],
            ..Default::default()
        };
        assert_eq!(summary.category_total(&salary()), 250.0);
    }

    #[test]
    fn test_category_total_missing_is_zero() {
        let summary = FinancialSummary::default();
        assert_eq!(summary.category_total(&salary()), 0.0);
    }

    #[test]
    fn test_entry_request_serializes_camel_case() {
        let request = EntryRequest {
            description: "Lunch".to_string(),
            amount: 12.5,
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            category_id: 7,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["categoryId"], 7);
        assert_eq!(value["date"], "2024-03-09");
    }

    #[test]
    fn test_entry_request_from_response_uses_nested_category() {
        let json = r#"{
            "id": 5,
            "description": "Paycheck",
            "amount": 1000,
            "date": "2024-01-31",
            "category": {"id": 42, "name": "Salary", "type": "PROFIT"}
        }"#;
        let entry: EntryResponse = serde_json::from_str(json).unwrap();
        let request = EntryRequest::from_response(&entry);
        assert_eq!(request.category_id, 42);
        assert_eq!(request.description, "Paycheck");
    }

    #[test]
    fn test_category_request_type_field() {
        let request = CategoryRequest {
            name: "Rent".to_string(),
            kind: CategoryType::Expense,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "EXPENSE");
    }
}
