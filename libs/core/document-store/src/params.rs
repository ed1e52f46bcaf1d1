use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Listing options shared by every collection endpoint.
///
/// Every field is optional on the wire; missing fields take the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, IntoParams, Validate)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Sort key: `id`, `name`, `price` or `category`; anything else leaves
    /// results in natural order
    #[param(default = "id")]
    pub order_by: String,
    #[param(default = false)]
    pub ascending: bool,
    /// Case-insensitive substring of the display name
    #[param(default = "")]
    pub search: String,
    /// Include soft-deleted records and expose their `deleted` flag
    #[param(default = false)]
    pub deleted: bool,
    #[param(default = true)]
    pub paginated: bool,
    /// 1-based page number
    #[validate(range(min = 1, message = "page must be at least 1"))]
    #[param(default = 1, minimum = 1)]
    pub page: u64,
    #[validate(range(min = 1, message = "perPage must be at least 1"))]
    #[param(default = 10, minimum = 1)]
    pub per_page: u64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            order_by: "id".to_string(),
            ascending: false,
            search: String::new(),
            deleted: false,
            paginated: true,
            page: 1,
            per_page: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params, PaginationParams::default());
        assert_eq!(params.order_by, "id");
        assert!(!params.ascending);
        assert!(params.paginated);
        assert_eq!((params.page, params.per_page), (1, 10));
    }

    #[test]
    fn test_camel_case_wire_names() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"orderBy":"price","perPage":3,"ascending":true}"#).unwrap();
        assert_eq!(params.order_by, "price");
        assert_eq!(params.per_page, 3);
        assert!(params.ascending);
    }

    #[test]
    fn test_page_and_per_page_must_be_positive() {
        let params = PaginationParams {
            page: 0,
            per_page: 0,
            ..Default::default()
        };
        let errors = params.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("page"));
        assert!(fields.contains_key("per_page"));
    }
}
