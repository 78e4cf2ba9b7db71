//! Validation of the public forms.
//!
//! Every form validates into either a value that is safe to store, or [`FieldErrors`]
//! keyed by the form field that was rejected.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::LazyLock};

pub const REQUIRED_FIELD: &str = "This field is required.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const COLLABORATOR_NAME_MAX_LEN: usize = 200;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .expect("Email pattern is a valid regex")
});

/// Error messages per form field.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

/// A syntactically valid email address.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    #[must_use]
    pub fn parse(address: &str) -> Option<Self> {
        let address = address.trim();
        (address.len() <= 254 && EMAIL_PATTERN.is_match(address))
            .then(|| Self(address.to_owned()))
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct CommentForm {
    pub body: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ValidComment {
    pub body: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<ValidComment, FieldErrors> {
        let mut errors = FieldErrors::default();
        let body = self.body.trim();

        if body.is_empty() {
            errors.add("body", REQUIRED_FIELD);
        }

        errors.into_result(|| ValidComment {
            body: body.to_owned(),
        })
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct CollaborationForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ValidCollaboration {
    pub name: String,
    pub email: EmailAddress,
    pub message: String,
}

impl CollaborationForm {
    pub fn validate(&self) -> Result<ValidCollaboration, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = self.name.trim();
        let message = self.message.trim();

        if name.is_empty() {
            errors.add("name", REQUIRED_FIELD);
        } else if name.chars().count() > COLLABORATOR_NAME_MAX_LEN {
            errors.add(
                "name",
                format!("Ensure this value has at most {COLLABORATOR_NAME_MAX_LEN} characters."),
            );
        }

        let email = if self.email.trim().is_empty() {
            errors.add("email", REQUIRED_FIELD);
            None
        } else {
            let email = EmailAddress::parse(&self.email);
            if email.is_none() {
                errors.add("email", INVALID_EMAIL);
            }
            email
        };

        if message.is_empty() {
            errors.add("message", REQUIRED_FIELD);
        }

        match email {
            Some(email) => errors.into_result(|| ValidCollaboration {
                name: name.to_owned(),
                email,
                message: message.to_owned(),
            }),
            None => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::validation::{
        CollaborationForm, CommentForm, EmailAddress, INVALID_EMAIL, REQUIRED_FIELD,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn comment_body_is_trimmed() {
        let form = CommentForm {
            body: "  This is a test comment.\n".to_owned(),
        };

        assert_eq!(form.validate().unwrap().body, "This is a test comment.");
    }

    #[test]
    fn blank_comment_is_rejected() {
        for body in ["", "   ", "\n\t"] {
            let errors = CommentForm {
                body: body.to_owned(),
            }
            .validate()
            .unwrap_err();

            assert_eq!(errors.get("body"), Some(&[REQUIRED_FIELD.to_owned()][..]));
        }
    }

    #[test]
    fn email_syntax() {
        for valid in [
            "test@email.com",
            "first.last+tag@sub.example.org",
            " padded@example.io ",
        ] {
            assert!(EmailAddress::parse(valid).is_some(), "{valid}");
        }

        for invalid in [
            "",
            "test",
            "test@",
            "@email.com",
            "test@email",
            "te st@email.com",
            "test@@email.com",
            ".test@email.com",
            "test..dots@email.com",
            "test@-email.com",
        ] {
            assert!(EmailAddress::parse(invalid).is_none(), "{invalid}");
        }
    }

    #[test]
    fn valid_collaboration() {
        let valid = CollaborationForm {
            name: "test name".to_owned(),
            email: "test@email.com".to_owned(),
            message: "test message".to_owned(),
        }
        .validate()
        .unwrap();

        assert_eq!(valid.name, "test name");
        assert_eq!(valid.email.get(), "test@email.com");
        assert_eq!(valid.message, "test message");
    }

    #[test]
    fn collaboration_collects_every_field_error() {
        let errors = CollaborationForm {
            name: " ".to_owned(),
            email: "not an email".to_owned(),
            message: String::new(),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.get("name"), Some(&[REQUIRED_FIELD.to_owned()][..]));
        assert_eq!(errors.get("email"), Some(&[INVALID_EMAIL.to_owned()][..]));
        assert_eq!(errors.get("message"), Some(&[REQUIRED_FIELD.to_owned()][..]));
    }

    #[test]
    fn missing_email_is_required_not_invalid() {
        let errors = CollaborationForm {
            name: "test name".to_owned(),
            email: String::new(),
            message: "test message".to_owned(),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.get("email"), Some(&[REQUIRED_FIELD.to_owned()][..]));
        assert_eq!(errors.get("name"), None);
    }

    #[test]
    fn long_name_is_rejected() {
        let errors = CollaborationForm {
            name: "n".repeat(201),
            email: "test@email.com".to_owned(),
            message: "test message".to_owned(),
        }
        .validate()
        .unwrap_err();

        assert!(errors.get("name").is_some());
    }
}
