//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure is an `invalid_request` error whose details name the
//! offending field and a stable code.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, ProductId, ProductStatus};

/// Validation codes specific to request parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidEnum,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidEnum => "invalid_enum",
        }
    }
}

pub(crate) fn field_error(
    field: &str,
    code: ValidationCode,
    message: impl Into<String>,
    value: Option<&str>,
) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field, "value": value, "code": code.as_str() }),
        None => json!({ "field": field, "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn require<T>(value: Option<T>, field: &str) -> Result<T, Error> {
    value.ok_or_else(|| {
        field_error(
            field,
            ValidationCode::MissingField,
            format!("missing required field: {field}"),
            None,
        )
    })
}

pub(crate) fn parse_product_id(raw: &str) -> Result<ProductId, Error> {
    ProductId::from_str(raw).map_err(|_| {
        field_error(
            "productId",
            ValidationCode::InvalidUuid,
            "productId must be a valid UUID",
            Some(raw),
        )
    })
}

pub(crate) fn parse_status(raw: &str) -> Result<ProductStatus, Error> {
    ProductStatus::from_str(raw).map_err(|error| {
        field_error(
            "productStatus",
            ValidationCode::InvalidEnum,
            error.to_string(),
            Some(raw),
        )
    })
}
