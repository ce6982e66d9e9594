use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

#[cfg(feature = "database")]
use sea_orm::Value;

/// Where a course sits in a curriculum
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    General,
    Major,
    Elective,
    FreeElective,
}

impl Category {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn all() -> Vec<Category> {
        Category::iter().collect()
    }
}

/// How final grades are assigned
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GradingType {
    /// Graded on a curve
    Norm,
    /// Graded against fixed thresholds
    Criterion,
}

impl GradingType {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn all() -> Vec<GradingType> {
        GradingType::iter().collect()
    }
}

/// Stores a strum enum as its wire string in a text column
#[cfg(feature = "database")]
macro_rules! impl_text_value {
    ($ty:ident) => {
        impl sea_orm::sea_query::ValueType for $ty {
            fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
                match v {
                    Value::String(Some(s)) => {
                        s.parse().map_err(|_| sea_orm::sea_query::ValueTypeErr)
                    }
                    _ => Err(sea_orm::sea_query::ValueTypeErr),
                }
            }

            fn type_name() -> String {
                stringify!($ty).to_string()
            }

            fn array_type() -> sea_orm::sea_query::ArrayType {
                sea_orm::sea_query::ArrayType::String
            }

            fn column_type() -> sea_orm::sea_query::ColumnType {
                sea_orm::sea_query::ColumnType::Text
            }
        }

        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::String(Some(Box::new(value.as_str().to_string())))
            }
        }

        impl sea_orm::TryGetable for $ty {
            fn try_get_by<I: sea_orm::ColIdx>(
                res: &sea_orm::QueryResult,
                index: I,
            ) -> Result<Self, sea_orm::TryGetError> {
                let val = <String as sea_orm::TryGetable>::try_get_by(res, index)?;

                val.parse().map_err(|e| {
                    sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                        "Failed to parse {} from {val:?}: {e}",
                        stringify!($ty)
                    )))
                })
            }
        }

        impl sea_orm::sea_query::Nullable for $ty {
            fn null() -> Value {
                Value::String(None)
            }
        }
    };
}

#[cfg(feature = "database")]
impl_text_value!(Category);
#[cfg(feature = "database")]
impl_text_value!(GradingType);
