use validator::ValidationError;

use crate::{entities::option_fields::OptionField, errors::new_validation_error};

pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_LENGTH: usize = 30;

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        Ok(_) => Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://")),
        Err(_) => Err(new_validation_error("invalid_url", "Must be a valid URL")),
    }
}

pub fn validate_optional_url_field(value: &OptionField<String>) -> Result<(), ValidationError> {
    match value.value_ref() {
        Some(url) => validate_url(url),
        None => Ok(()),
    }
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(new_validation_error("slug_empty", "Slug cannot be empty"));
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(new_validation_error("slug_invalid_chars", "Slug must contain only lowercase letters, digits, or hyphens"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(new_validation_error("slug_edge_hyphen", "Slug must not start or end with a hyphen"));
    }
    if slug.contains("--") {
        return Err(new_validation_error("slug_double_hyphen", "Slug must not contain consecutive hyphens"));
    }
    Ok(())
}

pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(new_validation_error("too_many_tags", "Too many tags provided"));
    }
    for tag in tags {
        if tag.is_empty() || tag.len() > MAX_TAG_LENGTH {
            return Err(new_validation_error("invalid_tag_length", "Tag length must be within allowed range"));
        }
        if !tag.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(new_validation_error("invalid_tag_chars", "Tags must be alphanumeric or hyphens"));
        }
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().len() != title.len() {
        return Err(new_validation_error("title_whitespace", "Title must not have leading or trailing whitespace"));
    }
    Ok(())
}

/// Every entry non-blank.
pub fn validate_string_list(items: &[String]) -> Result<(), ValidationError> {
    if items.iter().any(|item| item.trim().is_empty()) {
        return Err(new_validation_error("blank_entry", "Entries must not be blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs() {
        assert!(validate_slug("hello-world-2").is_ok());
        assert!(validate_slug("Hello").is_err());
        assert!(validate_slug("-edge").is_err());
        assert!(validate_slug("double--dash").is_err());
    }

    #[test]
    fn urls_need_http() {
        assert!(validate_url("https://github.com/me").is_ok());
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("nope").is_err());
        assert!(validate_optional_url_field(&OptionField::SetToNull).is_ok());
    }

    #[test]
    fn tags() {
        assert!(validate_tags(&["rust".into(), "web-dev".into()]).is_ok());
        assert!(validate_tags(&["has space".into()]).is_err());
        assert!(validate_tags(&vec!["t".to_string(); MAX_TAGS + 1]).is_err());
    }
}
