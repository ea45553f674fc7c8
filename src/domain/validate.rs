//! Required-flag validation
//!
//! Flags are checked after payload resolution, so a value may come from the command line
//! or from a payload file. All unset flags are reported at once.

use crate::domain::error::{DomainError, DomainResult};

/// A flag value that knows whether it still holds its type's zero value.
pub trait FlagValue {
    fn is_unset(&self) -> bool;
}

impl FlagValue for str {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl FlagValue for String {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<T: FlagValue + ?Sized> FlagValue for &T {
    fn is_unset(&self) -> bool {
        (**self).is_unset()
    }
}

impl<T: FlagValue> FlagValue for Option<T> {
    fn is_unset(&self) -> bool {
        self.as_ref().map_or(true, FlagValue::is_unset)
    }
}

impl<T> FlagValue for Vec<T> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl FlagValue for bool {
    fn is_unset(&self) -> bool {
        !*self
    }
}

macro_rules! numeric_flag_value {
    ($($t:ty),*) => {
        $(impl FlagValue for $t {
            fn is_unset(&self) -> bool {
                *self == 0
            }
        })*
    };
}

numeric_flag_value!(i32, i64, u16, u32, u64, usize);

/// Fail with one [`DomainError::MissingFlags`] naming every unset flag.
///
/// Pairs are checked in the given order and the error lists names in that order.
pub fn check_required(flags: &[(&str, &dyn FlagValue)]) -> DomainResult<()> {
    let missing: Vec<String> = flags
        .iter()
        .filter(|(_, value)| value.is_unset())
        .map(|(name, _)| (*name).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::MissingFlags(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_all_flags_set_when_checking_then_ok() {
        let cluster = "connect".to_string();
        let task = 1u32;
        assert!(check_required(&[("clusterName", &cluster), ("task", &task)]).is_ok());
    }

    #[test]
    fn given_unset_option_when_checking_then_reported() {
        let name: Option<String> = None;
        let err = check_required(&[("name", &name)]).unwrap_err();
        assert_eq!(err.missing_flags(), ["name".to_string()]);
    }

    #[test]
    fn given_option_with_empty_string_when_checking_then_reported() {
        let name = Some(String::new());
        assert!(check_required(&[("name", &name)]).is_err());
    }
}
