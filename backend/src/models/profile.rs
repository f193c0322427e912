use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User-editable profile. Empty social fields mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub linkedin: String,
    pub github: String,
    pub twitter: String,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_linkedin(mut self, url: impl Into<String>) -> Self {
        self.linkedin = url.into();
        self
    }

    pub fn with_github(mut self, url: impl Into<String>) -> Self {
        self.github = url.into();
        self
    }

    pub fn with_twitter(mut self, url: impl Into<String>) -> Self {
        self.twitter = url.into();
        self
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            linkedin: self.linkedin.trim().to_string(),
            github: self.github.trim().to_string(),
            twitter: self.twitter.trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Linkedin => &self.linkedin,
            ProfileField::Github => &self.github,
            ProfileField::Twitter => &self.twitter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileField {
    Name,
    Linkedin,
    Github,
    Twitter,
}

impl ProfileField {
    pub const ALL: [ProfileField; 4] = [
        ProfileField::Name,
        ProfileField::Linkedin,
        ProfileField::Github,
        ProfileField::Twitter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Linkedin => "linkedin",
            ProfileField::Github => "github",
            ProfileField::Twitter => "twitter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let profile: Profile = serde_json::from_str(r#"{"name":"Ana"}"#).unwrap();
        assert_eq!(profile, Profile::new("Ana"));
        assert_eq!(profile.github, "");
    }

    #[test]
    fn test_normalized_trims_every_field() {
        let profile = Profile::new("  Ana ").with_github(" https://github.com/ana\n");
        let normalized = profile.normalized();
        assert_eq!(normalized.name, "Ana");
        assert_eq!(normalized.github, "https://github.com/ana");
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Profile::default().is_empty());
        assert!(!Profile::new("Bob").is_empty());
    }
}
