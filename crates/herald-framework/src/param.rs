//! Typed handler parameters.
//!
//! Handler arguments after the [`Context`](crate::Context) are bound, by name,
//! to command options (slash commands, autocomplete) or text-input fields
//! (modal submissions). [`FromOption`] converts the raw [`OptionValue`] into
//! the parameter's Rust type:
//!
//! | Rust type      | Option type | Absent value |
//! |----------------|-------------|--------------|
//! | `String`       | string      | error        |
//! | `i64`          | integer     | error        |
//! | `bool`         | boolean     | error        |
//! | `User`         | user        | error        |
//! | `Option<T>`    | as `T`      | `None`       |

use herald_core::{OptionType, OptionValue, User};

use crate::error::{ExtractError, ExtractResult};

/// A type that can be bound to a named event option.
pub trait FromOption: Sized + Send + 'static {
    /// The option type this parameter binds to.
    const TYPE: OptionType;

    /// Whether an absent value is an extraction error.
    const REQUIRED: bool = true;

    /// Converts the value of option `name`, `None` when the event lacks it.
    fn from_option(name: &str, value: Option<OptionValue>) -> ExtractResult<Self>;
}

macro_rules! impl_from_option {
    ($ty:ty, $variant:ident) => {
        impl FromOption for $ty {
            const TYPE: OptionType = OptionType::$variant;

            fn from_option(name: &str, value: Option<OptionValue>) -> ExtractResult<Self> {
                match value {
                    Some(OptionValue::$variant(v)) => Ok(v),
                    Some(other) => Err(ExtractError::TypeMismatch {
                        name: name.to_string(),
                        expected: Self::TYPE,
                        got: other.option_type(),
                    }),
                    None => Err(ExtractError::Missing {
                        name: name.to_string(),
                    }),
                }
            }
        }
    };
}

impl_from_option!(String, String);
impl_from_option!(i64, Integer);
impl_from_option!(bool, Boolean);
impl_from_option!(User, User);

impl<T: FromOption> FromOption for Option<T> {
    const TYPE: OptionType = T::TYPE;
    const REQUIRED: bool = false;

    fn from_option(name: &str, value: Option<OptionValue>) -> ExtractResult<Self> {
        match value {
            Some(v) => T::from_option(name, Some(v)).map(Some),
            None => Ok(None),
        }
    }
}

/// The type-level shape of one handler parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamShape {
    pub option_type: OptionType,
    pub required: bool,
}

impl ParamShape {
    pub fn of<T: FromOption>() -> Self {
        Self {
            option_type: T::TYPE,
            required: T::REQUIRED,
        }
    }
}

/// A parameter bound to an option name: the extraction rule the dispatcher
/// applies for every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub shape: ParamShape,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_string() {
        let value = Some(OptionValue::String("Pear".into()));
        assert_eq!(String::from_option("fruit", value), Ok("Pear".to_string()));

        let err = String::from_option("fruit", None).unwrap_err();
        assert_eq!(
            err,
            ExtractError::Missing {
                name: "fruit".into()
            }
        );
    }

    #[test]
    fn test_wrong_type_is_reported() {
        let err = i64::from_option("count", Some(OptionValue::Boolean(true))).unwrap_err();
        assert_eq!(
            err,
            ExtractError::TypeMismatch {
                name: "count".into(),
                expected: OptionType::Integer,
                got: OptionType::Boolean,
            }
        );
    }

    #[test]
    fn test_optional_absent_is_none() {
        assert_eq!(Option::<String>::from_option("description", None), Ok(None));
        assert_eq!(
            ParamShape::of::<Option<User>>(),
            ParamShape {
                option_type: OptionType::User,
                required: false
            }
        );
    }
}
