//! Password strength policy applied before account creation.
//!
//! Rules are evaluated in order and the first failure wins, so clients see
//! one actionable message at a time. The external auth provider applies its
//! own minimum on top of this; these rules are deliberately stricter.

/// Context a rule may inspect alongside the candidate password.
pub struct PasswordContext<'a> {
    pub username: &'a str,
    pub email: &'a str,
}

/// A single named policy rule. `check` returns true when the rule passes.
struct Rule {
    name: &'static str,
    message: &'static str,
    check: fn(&str, &PasswordContext<'_>) -> bool,
}

/// Frequently breached passwords rejected outright, compared case-insensitively.
const DENYLIST: [&str; 13] = [
    "12345678",
    "123456789",
    "password",
    "password1",
    "password123",
    "qwerty123",
    "abc12345",
    "abcd1234",
    "11111111",
    "welcome123",
    "admin123",
    "user1234",
    "letmein1",
];

const RULES: [Rule; 7] = [
    Rule {
        name: "required",
        message: "Password is required",
        check: |password, _| !password.is_empty(),
    },
    Rule {
        name: "length",
        message: "Password must be between 8 and 128 characters",
        check: |password, _| (8..=128).contains(&password.chars().count()),
    },
    Rule {
        name: "has_letter",
        message: "Password must contain at least one letter",
        check: |password, _| password.chars().any(char::is_alphabetic),
    },
    Rule {
        name: "has_digit",
        message: "Password must contain at least one number",
        check: |password, _| password.chars().any(|c| c.is_ascii_digit()),
    },
    Rule {
        name: "not_common",
        message: "Password is too common",
        check: |password, _| {
            let lowered = password.to_lowercase();
            !DENYLIST.contains(&lowered.as_str())
        },
    },
    Rule {
        name: "not_username",
        message: "Password must not contain your username",
        check: |password, ctx| {
            if ctx.username.is_empty() {
                return true;
            }
            no_mutual_containment(password, ctx.username)
        },
    },
    Rule {
        name: "not_email",
        message: "Password must not contain your email address",
        check: |password, ctx| {
            let local = ctx.email.split('@').next().unwrap_or("");
            if local.chars().count() <= 3 {
                return true;
            }
            no_mutual_containment(password, local)
        },
    },
];

fn no_mutual_containment(password: &str, other: &str) -> bool {
    let password = password.to_lowercase();
    let other = other.to_lowercase();
    !password.contains(&other) && !other.contains(&password)
}

/// Result of a failed policy check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct PasswordRejection {
    pub rule: &'static str,
    pub message: &'static str,
}

/// Validate `password` against the ordered rule table.
///
/// Returns the first failing rule, or `Ok(())` when all rules pass.
pub fn validate(password: &str, ctx: &PasswordContext<'_>) -> Result<(), PasswordRejection> {
    for rule in &RULES {
        if !(rule.check)(password, ctx) {
            return Err(PasswordRejection {
                rule: rule.name,
                message: rule.message,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ctx<'a>(username: &'a str, email: &'a str) -> PasswordContext<'a> {
        PasswordContext { username, email }
    }

    #[rstest]
    #[case("", "required")]
    #[case("ab1", "length")]
    #[case("12345678901", "has_letter")]
    #[case("abcdefghij", "has_digit")]
    #[case("Password123", "not_common")]
    #[case("QWERTY123", "not_common")]
    fn rejects_in_rule_order(#[case] password: &str, #[case] rule: &str) {
        let err = validate(password, &ctx("rexowner", "rex@example.com")).unwrap_err();
        assert_eq!(err.rule, rule);
    }

    #[test]
    fn rejects_over_long_password() {
        let password = "a1".repeat(65);
        let err = validate(&password, &ctx("rexowner", "rex@example.com")).unwrap_err();
        assert_eq!(err.rule, "length");
    }

    #[test]
    fn rejects_password_containing_username() {
        let err = validate("rexowner99x", &ctx("rexowner", "a@b.com")).unwrap_err();
        assert_eq!(err.rule, "not_username");
    }

    #[test]
    fn rejects_username_containing_password() {
        let err = validate("walkies99", &ctx("walkies99club", "a@b.com")).unwrap_err();
        assert_eq!(err.rule, "not_username");
    }

    #[test]
    fn rejects_password_containing_email_local_part() {
        let err = validate("dogfan42x9", &ctx("someone", "dogfan@example.com")).unwrap_err();
        assert_eq!(err.rule, "not_email");
    }

    #[test]
    fn short_email_local_part_is_not_matched() {
        assert!(validate("abz1efgh9", &ctx("someone", "ab@example.com")).is_ok());
    }

    #[test]
    fn empty_username_skips_username_rule() {
        assert!(validate("sunny4hounds", &ctx("", "owner@example.com")).is_ok());
    }

    #[rstest]
    #[case("sunny4hounds")]
    #[case("Tr1cky-Leash")]
    #[case("b0nesAndBiscuits")]
    fn accepts_reasonable_passwords(#[case] password: &str) {
        assert!(validate(password, &ctx("rexowner", "rex@example.com")).is_ok());
    }
}
