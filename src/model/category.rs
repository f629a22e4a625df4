use crate::validation::{FieldErrors, Fields};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub const NAME_MAX_LENGTH: usize = 255;

/// Named grouping. Unrelated to `Item::category`, which is free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct CategoryInput {
    pub name: String,
}

impl CategoryInput {
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let mut fields = Fields::new(body)?;
        let input = CategoryInput {
            name: fields.string("name", NAME_MAX_LENGTH),
        };
        fields.finish(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_is_required() {
        assert_eq!(
            CategoryInput::from_json(&json!({"name": "Cat1"})).unwrap().name,
            "Cat1"
        );
        let errors = CategoryInput::from_json(&json!({})).unwrap_err();
        assert_eq!(errors.messages("name"), ["This field is required."]);
    }
}
