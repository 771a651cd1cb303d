//! Typed filters for the return listing endpoints.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReturnRequestField {
    Id,
    OrderId,
    CustomerId,
    ReasonForReturn,
    RequestAction,
    ReturnRequestStatusId,
}

impl ReturnRequestField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::OrderId => "orderId",
            Self::CustomerId => "customerId",
            Self::ReasonForReturn => "reasonForReturn",
            Self::RequestAction => "requestAction",
            Self::ReturnRequestStatusId => "returnRequestStatusId",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchMode {
    #[default]
    Equals,
    NotEquals,
    Contains,
    StartsWith,
    Lt,
    Gt,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::Contains => "contains",
            Self::StartsWith => "startsWith",
            Self::Lt => "lt",
            Self::Gt => "gt",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    pub field: ReturnRequestField,
    pub match_mode: MatchMode,
    pub value: String,
}

impl ListFilter {
    pub fn new(field: ReturnRequestField, match_mode: MatchMode, value: impl ToString) -> Self {
        Self { field, match_mode, value: value.to_string() }
    }

    pub fn equals(field: ReturnRequestField, value: impl ToString) -> Self {
        Self::new(field, MatchMode::Equals, value)
    }
}

/// Renders filters as `field=value` plus `fieldMatchMode=mode` query pairs.
pub fn to_query_pairs(filters: &[ListFilter]) -> Vec<(String, String)> {
    filters
        .iter()
        .flat_map(|f| {
            let field = f.field.as_str();
            [
                (field.to_string(), f.value.clone()),
                (format!("{field}MatchMode"), f.match_mode.as_str().to_string()),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs() {
        let filters = [
            ListFilter::equals(ReturnRequestField::OrderId, 1001),
            ListFilter::new(ReturnRequestField::ReasonForReturn, MatchMode::Contains, "size"),
        ];
        let pairs = to_query_pairs(&filters);
        assert_eq!(pairs, vec![
            ("orderId".to_string(), "1001".to_string()),
            ("orderIdMatchMode".to_string(), "equals".to_string()),
            ("reasonForReturn".to_string(), "size".to_string()),
            ("reasonForReturnMatchMode".to_string(), "contains".to_string()),
        ]);
        assert!(to_query_pairs(&[]).is_empty());
    }

    #[test]
    fn test_serde_names_match_query_names() {
        let json = serde_json::to_value(ListFilter::new(ReturnRequestField::ReturnRequestStatusId, MatchMode::StartsWith, 4)).unwrap();
        assert_eq!(json["field"], ReturnRequestField::ReturnRequestStatusId.as_str());
        assert_eq!(json["matchMode"], MatchMode::StartsWith.as_str());
    }
}
