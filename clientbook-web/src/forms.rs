use serde::{Deserialize, Serialize};

use clientbook_data::db::customers::NewCustomer;

/// Raw field values of the customer form, as submitted by the browser.
///
/// All fields default to empty so a partial submission still deserializes
/// and fails validation with a message instead of a bare 422.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl CustomerForm {
    /// Validate the submitted values into a customer draft.
    ///
    /// Browser-side `required` attributes are not trusted; everything is
    /// re-checked here.
    pub fn validate(&self) -> Result<NewCustomer, Vec<String>> {
        let name = self.name.trim();
        let email = self.email.trim();
        let phone = self.phone.trim();

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push("Name must not be empty.".to_string());
        }
        if email.is_empty() {
            errors.push("Email must not be empty.".to_string());
        } else if !valid_email(email) {
            errors.push("Email does not look valid.".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewCustomer {
            name: name.to_string(),
            email: email.to_string(),
            phone: if phone.is_empty() {
                None
            } else {
                Some(phone.to_string())
            },
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterForm {
    /// Returns `(name, email, password)` on success.
    pub fn validate(&self) -> Result<(String, String, String), Vec<String>> {
        let name = self.name.trim();
        let email = self.email.trim();
        let password = self.password.trim();

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push("Name must not be empty.".to_string());
        }
        if email.is_empty() {
            errors.push("Email must not be empty.".to_string());
        } else if !valid_email(email) {
            errors.push("Email does not look valid.".to_string());
        }
        if password.is_empty() {
            errors.push("Password must not be empty.".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok((name.to_string(), email.to_string(), password.to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    /// Returns `(email, password)` on success.
    pub fn validate(&self) -> Result<(String, String), Vec<String>> {
        let email = self.email.trim();
        let password = self.password.trim();

        if email.is_empty() || password.is_empty() {
            return Err(vec!["Fill in both email and password.".to_string()]);
        }
        Ok((email.to_string(), password.to_string()))
    }
}

/// Minimal structural check: one `@` with non-empty sides, no whitespace.
fn valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer_form(name: &str, email: &str, phone: &str) -> CustomerForm {
        CustomerForm {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn test_valid_submission() {
        let form = customer_form("Ana Silva", "ana@example.com", "");
        let new = form.validate().unwrap();
        assert_eq!(new.name, "Ana Silva");
        assert_eq!(new.email, "ana@example.com");
        assert!(new.phone.is_none());
    }

    #[test]
    fn test_fields_are_trimmed() {
        let form = customer_form("  Ana Silva  ", " ana@example.com ", " 555-0100 ");
        let new = form.validate().unwrap();
        assert_eq!(new.name, "Ana Silva");
        assert_eq!(new.email, "ana@example.com");
        assert_eq!(new.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let form = customer_form("", "x@example.com", "");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec!["Name must not be empty.".to_string()]);
    }

    #[test]
    fn test_whitespace_only_name_rejected() {
        let form = customer_form("   ", "x@example.com", "");
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_empty_email_rejected() {
        let form = customer_form("Ana", "", "");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec!["Email must not be empty.".to_string()]);
    }

    #[test]
    fn test_malformed_emails_rejected() {
        for email in ["no-at-sign", "@example.com", "ana@", "ana @example.com", "a@b@c"] {
            let form = customer_form("Ana", email, "");
            assert!(form.validate().is_err(), "accepted {email:?}");
        }
    }

    #[test]
    fn test_all_errors_reported_at_once() {
        let form = customer_form("", "", "");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_register_form_requires_password() {
        let form = RegisterForm {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: String::new(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec!["Password must not be empty.".to_string()]);
    }

    #[test]
    fn test_register_form_valid() {
        let form = RegisterForm {
            name: " Ana ".to_string(),
            email: "ana@example.com".to_string(),
            password: "long-password".to_string(),
        };
        let (name, email, password) = form.validate().unwrap();
        assert_eq!(name, "Ana");
        assert_eq!(email, "ana@example.com");
        assert_eq!(password, "long-password");
    }

    #[test]
    fn test_login_form_requires_both_fields() {
        let form = LoginForm {
            email: "ana@example.com".to_string(),
            password: String::new(),
        };
        assert!(form.validate().is_err());

        let form = LoginForm {
            email: String::new(),
            password: "pw".to_string(),
        };
        assert!(form.validate().is_err());
    }
}
