use crate::error::{CoreError, Result};
use url::Url;

/// Checks that `input` is an absolute `http://` or `https://` URL with a host.
///
/// The scheme is checked on the raw text as well as on the parsed URL, so
/// inputs that only become http(s) after normalisation are rejected.
pub fn validate_target(input: &str) -> Result<Url> {
    if input.is_empty() {
        return Err(CoreError::InvalidUrl("URL cannot be empty".to_string()));
    }

    if !(input.starts_with("http://") || input.starts_with("https://")) {
        return Err(CoreError::InvalidUrl(format!(
            "URL must start with http:// or https://: {input}"
        )));
    }

    let parsed = Url::parse(input).map_err(|e| CoreError::InvalidUrl(format!("{input}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(CoreError::InvalidUrl(format!(
                "URL scheme must be http or https: {other}"
            )))
        }
    }

    if parsed.host().is_none() {
        return Err(CoreError::InvalidUrl(format!("URL has no host: {input}")));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_target("https://example.com").is_ok());
        assert!(validate_target("http://example.com/a/b?c=d#e").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(validate_target("").is_err());
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(validate_target("javascript:alert(1)").is_err());
        assert!(validate_target("ftp://example.com").is_err());
        assert!(validate_target("mailto:someone@example.com").is_err());
    }

    #[test]
    fn rejects_missing_scheme() {
        assert!(validate_target("example.com").is_err());
        assert!(validate_target("www.example.com/path").is_err());
    }

    #[test]
    fn scheme_check_is_case_sensitive_on_input() {
        assert!(validate_target("HTTPS://example.com").is_err());
    }

    #[test]
    fn rejects_unparseable() {
        assert!(validate_target("https://").is_err());
        assert!(validate_target("http://exa mple.com").is_err());
    }
}
