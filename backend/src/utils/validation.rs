use crate::{
    constants::{GITHUB_DOMAIN, LINKEDIN_DOMAIN, PROFILE_FIELD_MAX_LENGTH, TWITTER_DOMAINS},
    errors::ValidationErrors,
    models::{Profile, ProfileField},
};

/// Check a profile the way the profile form does: a name is required and
/// each social URL, when given, must point at its platform's domain.
///
/// Fields are checked after trimming. All failures are collected so the
/// caller can show every message at once.
pub fn validate_profile(profile: &Profile) -> Result<(), ValidationErrors> {
    let profile = profile.normalized();
    let mut errors = ValidationErrors::new();

    if profile.name.is_empty() {
        errors.add_field(ProfileField::Name, "Name is required");
    }

    if !profile.linkedin.is_empty() && !profile.linkedin.contains(LINKEDIN_DOMAIN) {
        errors.add_field(ProfileField::Linkedin, "Invalid LinkedIn URL");
    }

    if !profile.github.is_empty() && !profile.github.contains(GITHUB_DOMAIN) {
        errors.add_field(ProfileField::Github, "Invalid GitHub URL");
    }

    if !profile.twitter.is_empty()
        && !TWITTER_DOMAINS.iter().any(|domain| profile.twitter.contains(domain))
    {
        errors.add_field(ProfileField::Twitter, "Invalid Twitter URL");
    }

    for field in ProfileField::ALL {
        // Keep the more specific message when a field already failed.
        if errors.get(field.as_str()).is_some() {
            continue;
        }
        if profile.field(field).chars().count() > PROFILE_FIELD_MAX_LENGTH {
            errors.add_field(
                field,
                format!("Must be at most {} characters", PROFILE_FIELD_MAX_LENGTH),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
