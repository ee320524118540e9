//! Sign-up schema: raw input in, validated payload or error snapshot out

use super::avatar::{format_size, SelectedFile, MIB};
use super::validation::{
    capitalize_words, coerce_number, Chain, FieldPath, ListRule, ValidationErrors,
};
use serde::{Serialize, Serializer};

/// Email suffix accepted by default
pub const DEFAULT_EMAIL_DOMAIN: &str = "@cast.com.br";

/// Largest avatar accepted by default
pub const DEFAULT_MAX_AVATAR_BYTES: u64 = 5 * MIB;

/// Minimum number of tech entries for a successful submit
pub const MIN_TECHS: usize = 2;

pub const KNOWLEDGE_MIN: f64 = 1.0;
pub const KNOWLEDGE_MAX: f64 = 100.0;

/// One tech row as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTech {
    pub title: String,
    pub knowledge: String,
}

impl RawTech {
    pub fn new(title: &str, knowledge: &str) -> Self {
        Self {
            title: title.to_string(),
            knowledge: knowledge.to_string(),
        }
    }
}

/// Unvalidated form values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSignup {
    /// Files picked in the avatar input, or why the input could not be read
    pub avatar: Result<Vec<SelectedFile>, String>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub techs: Vec<RawTech>,
}

/// A validated tech entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechEntry {
    pub title: String,
    #[serde(serialize_with = "serialize_knowledge")]
    pub knowledge: f64,
}

/// Whole levels print as integers (`80`), fractional ones as floats (`50.5`)
fn serialize_knowledge<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Validated and transformed form values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupPayload {
    pub avatar: SelectedFile,
    pub name: String,
    pub email: String,
    pub password: String,
    pub techs: Vec<TechEntry>,
}

impl SignupPayload {
    /// Pretty-printed JSON shown after a successful submit
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// The fixed rule set for the sign-up form
pub struct SignupSchema {
    max_avatar_bytes: u64,
    email_domain: String,
    name: Chain<String>,
    email: Chain<String>,
    password: Chain<String>,
    techs: ListRule,
    tech_title: Chain<String>,
    tech_knowledge: Chain<f64>,
}

impl SignupSchema {
    pub fn new(email_domain: &str, max_avatar_bytes: u64) -> Self {
        let domain = email_domain.to_lowercase();

        Self {
            max_avatar_bytes,
            email_domain: domain.clone(),
            name: Chain::new()
                .non_blank("name is required")
                .transform(|name| capitalize_words(&name)),
            email: Chain::new()
                .non_empty("email is required")
                .email("invalid email format")
                .lowercase()
                .ends_with(domain.clone(), format!("email must end with {domain}")),
            password: Chain::new().min_length(6, "password must be at least 6 characters"),
            techs: ListRule::min_items(
                MIN_TECHS,
                format!("at least {MIN_TECHS} technologies required"),
            ),
            tech_title: Chain::new().non_empty("technology title is required"),
            tech_knowledge: Chain::new()
                .not_nan("knowledge level must be a number")
                .min(KNOWLEDGE_MIN, "knowledge level must be at least 1")
                .max(KNOWLEDGE_MAX, "knowledge level must be at most 100"),
        }
    }

    pub fn email_domain(&self) -> &str {
        &self.email_domain
    }

    /// Validate every field independently and collect all failures
    pub fn validate(&self, raw: &RawSignup) -> Result<SignupPayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let avatar = errors.record(FieldPath::Avatar, self.validate_avatar(&raw.avatar));
        let name = errors.record(FieldPath::Name, self.name.run(raw.name.clone()));
        let email = errors.record(FieldPath::Email, self.email.run(raw.email.clone()));
        let password = errors.record(FieldPath::Password, self.password.run(raw.password.clone()));

        // List-level and per-entry rules are reported side by side
        errors.record(FieldPath::Techs, self.techs.run(&raw.techs));
        let mut techs = Vec::with_capacity(raw.techs.len());
        for (index, tech) in raw.techs.iter().enumerate() {
            let title = errors.record(
                FieldPath::TechTitle(index),
                self.tech_title.run(tech.title.clone()),
            );
            let knowledge = errors.record(
                FieldPath::TechKnowledge(index),
                self.tech_knowledge.run(coerce_number(&tech.knowledge)),
            );
            if let (Some(title), Some(knowledge)) = (title, knowledge) {
                techs.push(TechEntry { title, knowledge });
            }
        }

        match (avatar, name, email, password) {
            (Some(avatar), Some(name), Some(email), Some(password)) if errors.is_empty() => {
                Ok(SignupPayload {
                    avatar,
                    name,
                    email,
                    password,
                    techs,
                })
            }
            _ => Err(errors),
        }
    }

    fn validate_avatar(
        &self,
        selection: &Result<Vec<SelectedFile>, String>,
    ) -> Result<SelectedFile, String> {
        let files = selection.as_ref().map_err(Clone::clone)?;
        let file = match files.as_slice() {
            [file] => file,
            [] => return Err("avatar file is required".to_string()),
            _ => return Err("select a single avatar file".to_string()),
        };
        // The comparison is authoritative: anything up to and including the limit passes
        if file.size <= self.max_avatar_bytes {
            Ok(file.clone())
        } else {
            Err(format!(
                "file must not exceed {}",
                format_size(self.max_avatar_bytes)
            ))
        }
    }
}

impl Default for SignupSchema {
    fn default() -> Self {
        Self::new(DEFAULT_EMAIL_DOMAIN, DEFAULT_MAX_AVATAR_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn avatar(size: u64) -> SelectedFile {
        SelectedFile {
            name: "avatar.png".to_string(),
            size,
            path: PathBuf::from("/tmp/avatar.png"),
        }
    }

    fn valid_raw() -> RawSignup {
        RawSignup {
            avatar: Ok(vec![avatar(2 * MIB)]),
            name: "  john  doe ".to_string(),
            email: "JOHN@CAST.COM.BR".to_string(),
            password: "secret".to_string(),
            techs: vec![RawTech::new("Go", "80"), RawTech::new("Rust", "90")],
        }
    }

    fn errors_for(raw: &RawSignup) -> ValidationErrors {
        SignupSchema::default()
            .validate(raw)
            .expect_err("validation should fail")
    }

    mod success {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_valid_input_is_transformed() {
            let payload = SignupSchema::default().validate(&valid_raw()).unwrap();

            assert_eq!(payload.name, "John  Doe");
            assert_eq!(payload.email, "john@cast.com.br");
            assert_eq!(payload.password, "secret");
            assert_eq!(payload.avatar.name, "avatar.png");
            assert_eq!(
                payload.techs,
                vec![
                    TechEntry {
                        title: "Go".to_string(),
                        knowledge: 80.0
                    },
                    TechEntry {
                        title: "Rust".to_string(),
                        knowledge: 90.0
                    },
                ]
            );
        }

        #[test]
        fn test_output_json_has_numeric_knowledge() {
            let payload = SignupSchema::default().validate(&valid_raw()).unwrap();
            let json = payload.to_pretty_json().unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();

            assert_eq!(value["techs"][0]["knowledge"], serde_json::json!(80));
            assert_eq!(value["techs"][1]["knowledge"], serde_json::json!(90));
            assert_eq!(value["avatar"]["name"], "avatar.png");
            assert!(value["avatar"].get("path").is_none());
            assert!(json.contains('\n'));
        }

        #[test]
        fn test_avatar_exactly_at_limit_passes() {
            let mut raw = valid_raw();
            raw.avatar = Ok(vec![avatar(DEFAULT_MAX_AVATAR_BYTES)]);
            assert!(SignupSchema::default().validate(&raw).is_ok());
        }

        #[test]
        fn test_knowledge_bounds_inclusive() {
            let mut raw = valid_raw();
            raw.techs = vec![RawTech::new("A", "1"), RawTech::new("B", "100")];
            let payload = SignupSchema::default().validate(&raw).unwrap();
            assert_eq!(payload.techs[0].knowledge, 1.0);
            assert_eq!(payload.techs[1].knowledge, 100.0);
        }

        #[test]
        fn test_fractional_knowledge_is_accepted() {
            let mut raw = valid_raw();
            raw.techs[0].knowledge = "50.5".to_string();
            let payload = SignupSchema::default().validate(&raw).unwrap();
            assert_eq!(payload.techs[0].knowledge, 50.5);

            let value: serde_json::Value =
                serde_json::from_str(&payload.to_pretty_json().unwrap()).unwrap();
            assert_eq!(value["techs"][0]["knowledge"], serde_json::json!(50.5));
            assert_eq!(value["techs"][1]["knowledge"], serde_json::json!(90));
        }

        #[test]
        fn test_password_length_counts_utf16_units() {
            let mut raw = valid_raw();
            raw.password = "😀😀😀".to_string();
            assert!(SignupSchema::default().validate(&raw).is_ok());
        }
    }

    mod avatar_rules {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_oversized_avatar_fails() {
            let mut raw = valid_raw();
            raw.avatar = Ok(vec![avatar(6 * MIB)]);
            let errors = errors_for(&raw);
            assert_eq!(
                errors.get(FieldPath::Avatar),
                Some("file must not exceed 5 MiB")
            );
            assert_eq!(errors.len(), 1);
        }

        #[test]
        fn test_missing_avatar_fails() {
            let mut raw = valid_raw();
            raw.avatar = Ok(Vec::new());
            assert_eq!(
                errors_for(&raw).get(FieldPath::Avatar),
                Some("avatar file is required")
            );
        }

        #[test]
        fn test_multiple_files_fail() {
            let mut raw = valid_raw();
            raw.avatar = Ok(vec![avatar(1), avatar(2)]);
            assert_eq!(
                errors_for(&raw).get(FieldPath::Avatar),
                Some("select a single avatar file")
            );
        }

        #[test]
        fn test_unreadable_selection_message_is_kept() {
            let mut raw = valid_raw();
            raw.avatar = Err("cannot read /x.png".to_string());
            assert_eq!(
                errors_for(&raw).get(FieldPath::Avatar),
                Some("cannot read /x.png")
            );
        }

        #[test]
        fn test_custom_limit() {
            let schema = SignupSchema::new(DEFAULT_EMAIL_DOMAIN, 1000);
            let mut raw = valid_raw();
            raw.avatar = Ok(vec![avatar(1001)]);
            let errors = schema.validate(&raw).unwrap_err();
            assert_eq!(
                errors.get(FieldPath::Avatar),
                Some("file must not exceed 1000 bytes")
            );
        }
    }

    mod text_rules {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_empty_name_fails() {
            let mut raw = valid_raw();
            raw.name = String::new();
            assert_eq!(errors_for(&raw).get(FieldPath::Name), Some("name is required"));
        }

        #[test]
        fn test_blank_name_fails() {
            let mut raw = valid_raw();
            raw.name = "    ".to_string();
            assert_eq!(errors_for(&raw).get(FieldPath::Name), Some("name is required"));
        }

        #[test]
        fn test_names_are_capitalized_per_word() {
            let schema = SignupSchema::default();
            for (input, expected) in [
                ("  maria   da silva  ", "Maria   Da Silva"),
                ("ana", "Ana"),
                ("jOHN dOE", "JOHN DOE"),
            ] {
                let mut raw = valid_raw();
                raw.name = input.to_string();
                assert_eq!(schema.validate(&raw).unwrap().name, expected);
            }
        }

        #[test]
        fn test_empty_email_reports_required() {
            let mut raw = valid_raw();
            raw.email = String::new();
            assert_eq!(
                errors_for(&raw).get(FieldPath::Email),
                Some("email is required")
            );
        }

        #[test]
        fn test_malformed_email() {
            let mut raw = valid_raw();
            raw.email = "john.cast.com.br".to_string();
            assert_eq!(
                errors_for(&raw).get(FieldPath::Email),
                Some("invalid email format")
            );
        }

        #[test]
        fn test_foreign_domain_fails_even_when_well_formed() {
            for email in ["user@gmail.com", "john@cast.com", "john@cast.com.br.evil.io"] {
                let mut raw = valid_raw();
                raw.email = email.to_string();
                assert_eq!(
                    errors_for(&raw).get(FieldPath::Email),
                    Some("email must end with @cast.com.br"),
                    "email {email}"
                );
            }
        }

        #[test]
        fn test_custom_domain_is_lowercased() {
            let schema = SignupSchema::new("@Example.ORG", DEFAULT_MAX_AVATAR_BYTES);
            assert_eq!(schema.email_domain(), "@example.org");
            let mut raw = valid_raw();
            raw.email = "Jane@example.org".to_string();
            assert_eq!(schema.validate(&raw).unwrap().email, "jane@example.org");
        }

        #[test]
        fn test_short_password_fails() {
            let mut raw = valid_raw();
            raw.password = "12345".to_string();
            assert_eq!(
                errors_for(&raw).get(FieldPath::Password),
                Some("password must be at least 6 characters")
            );
        }
    }

    mod tech_rules {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_single_valid_tech_fails_at_list_level() {
            let mut raw = valid_raw();
            raw.techs = vec![RawTech::new("Go", "80")];
            let errors = errors_for(&raw);
            assert_eq!(
                errors.get(FieldPath::Techs),
                Some("at least 2 technologies required")
            );
            assert!(!errors.contains(FieldPath::TechTitle(0)));
            assert!(!errors.contains(FieldPath::TechKnowledge(0)));
        }

        #[test]
        fn test_empty_list_fails() {
            let mut raw = valid_raw();
            raw.techs = Vec::new();
            assert!(errors_for(&raw).contains(FieldPath::Techs));
        }

        #[test]
        fn test_list_and_entry_errors_reported_together() {
            let mut raw = valid_raw();
            raw.techs = vec![RawTech::new("", "1")];
            let errors = errors_for(&raw);
            assert!(errors.contains(FieldPath::Techs));
            assert_eq!(
                errors.get(FieldPath::TechTitle(0)),
                Some("technology title is required")
            );
        }

        #[test]
        fn test_knowledge_out_of_range() {
            for (input, message) in [
                ("0", "knowledge level must be at least 1"),
                ("", "knowledge level must be at least 1"),
                ("-5", "knowledge level must be at least 1"),
                ("101", "knowledge level must be at most 100"),
                ("abc", "knowledge level must be a number"),
                ("100.5", "knowledge level must be at most 100"),
                ("0.5", "knowledge level must be at least 1"),
            ] {
                let mut raw = valid_raw();
                raw.techs[1].knowledge = input.to_string();
                let errors = errors_for(&raw);
                assert_eq!(
                    errors.get(FieldPath::TechKnowledge(1)),
                    Some(message),
                    "input {input:?}"
                );
                assert!(!errors.contains(FieldPath::TechKnowledge(0)));
            }
        }

        #[test]
        fn test_errors_point_at_the_failing_entry() {
            let mut raw = valid_raw();
            raw.techs.push(RawTech::new("", "200"));
            let errors = errors_for(&raw);
            assert!(errors.contains(FieldPath::TechTitle(2)));
            assert!(errors.contains(FieldPath::TechKnowledge(2)));
            assert!(!errors.contains(FieldPath::Techs));
        }
    }

    #[test]
    fn test_every_field_reported_independently() {
        let raw = RawSignup {
            avatar: Ok(Vec::new()),
            name: String::new(),
            email: "bad".to_string(),
            password: "123".to_string(),
            techs: Vec::new(),
        };
        let errors = errors_for(&raw);
        let paths: Vec<FieldPath> = errors.iter().map(|(path, _)| path).collect();
        assert_eq!(
            paths,
            vec![
                FieldPath::Avatar,
                FieldPath::Name,
                FieldPath::Email,
                FieldPath::Password,
                FieldPath::Techs,
            ]
        );
    }
}
