//! Per-record ownership guard.
//!
//! Every dog and medical record belongs to exactly one user. Lookups return
//! `Option<T>`; [`authorize`] collapses the absent and foreign-owned cases
//! into the errors the API promises: 404 when missing, 403 when owned by
//! someone else. Missing records are reported before ownership so callers
//! cannot probe for other users' data.

use crate::domain::error::Error;
use crate::domain::user::UserId;

/// Records that carry an owning user.
pub trait Owned {
    fn owner_id(&self) -> UserId;
}

/// Resolve a fetched record into an authorised value for `caller`.
///
/// `noun` names the record kind in error messages ("Dog", "Medical record").
pub fn authorize<T: Owned>(record: Option<T>, caller: UserId, noun: &str) -> Result<T, Error> {
    let record = record.ok_or_else(|| Error::not_found(format!("{noun} not found")))?;
    if record.owner_id() != caller {
        return Err(Error::forbidden(format!(
            "You do not have permission to access this {}",
            noun.to_lowercase()
        )));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;

    #[derive(Debug)]
    struct Item(UserId);

    impl Owned for Item {
        fn owner_id(&self) -> UserId {
            self.0
        }
    }

    #[test]
    fn missing_record_is_not_found() {
        let err = authorize(None::<Item>, UserId(1), "Dog").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Dog not found");
    }

    #[test]
    fn foreign_record_is_forbidden() {
        let err = authorize(Some(Item(UserId(2))), UserId(1), "Medical record").unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(
            err.message,
            "You do not have permission to access this medical record"
        );
    }

    #[test]
    fn owned_record_passes_through() {
        let item = authorize(Some(Item(UserId(1))), UserId(1), "Dog").expect("authorised");
        assert_eq!(item.owner_id(), UserId(1));
    }
}
