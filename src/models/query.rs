use serde_json::Value;

use crate::error::{AppError, AppResult};

use super::{Category, CategoryVector, CATEGORY_COUNT};

/// A recommendation request after shape and type checks.
///
/// Range checks that need the loaded catalog (known cluster, age bounds,
/// known gender) happen in the vector builder.
#[derive(Debug, Clone, PartialEq)]
pub struct UserQuery {
    pub cluster: u32,
    pub age: i64,
    pub gender: String,
    /// Declared spend per category in [`Category`] order
    pub spending: CategoryVector,
}

impl UserQuery {
    /// Builds a query from the raw JSON body, failing on the first bad field
    pub fn from_json(body: &Value) -> AppResult<Self> {
        let body = body
            .as_object()
            .ok_or_else(|| AppError::InvalidInput("request body must be a JSON object".into()))?;

        let cluster = body
            .get("cluster")
            .and_then(Value::as_u64)
            .and_then(|c| u32::try_from(c).ok())
            .ok_or_else(|| {
                AppError::InvalidInput("cluster must be a known cluster id".into())
            })?;

        let age = body
            .get("age")
            .and_then(Value::as_i64)
            .ok_or_else(|| AppError::InvalidInput("age must be an integer".into()))?;

        let gender = body
            .get("gender")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::InvalidInput("gender must be a string".into()))?
            .trim()
            .to_string();

        let spending = parse_spending(body.get("spending"))?;

        Ok(Self {
            cluster,
            age,
            gender,
            spending,
        })
    }
}

/// Reads the spending object into a category vector.
///
/// Unrecognized keys are ignored and missing categories stay at zero.
fn parse_spending(value: Option<&Value>) -> AppResult<CategoryVector> {
    let map = value
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::InvalidInput("spending must be an object".into()))?;

    let mut spending = [0.0; CATEGORY_COUNT];
    for category in Category::ALL {
        let Some(raw) = map
            .get(category.key())
            .or_else(|| map.get(category.legacy_key()))
        else {
            continue;
        };

        let amount = raw.as_f64().ok_or_else(|| {
            AppError::InvalidInput(format!("spending.{} must be a number", category))
        })?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "spending.{} must be a non-negative number",
                category
            )));
        }
        spending[category.index()] = amount;
    }

    Ok(spending)
}
