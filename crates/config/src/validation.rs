use crate::ConfigResult;

/// Trait for configuration validation
pub trait ConfigValidator {
    fn validate(&self) -> ConfigResult<()>;
}

/// General validation utilities
pub struct ValidationUtils;

impl ValidationUtils {
    /// Validate that a string is not empty
    pub fn validate_not_empty(value: &str, field_name: &str) -> ConfigResult<()> {
        if value.trim().is_empty() {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} cannot be empty"
            )));
        }
        Ok(())
    }

    /// Validate that a timeout is reasonable
    pub fn validate_timeout_seconds(timeout_seconds: u64, field_name: &str) -> ConfigResult<()> {
        if timeout_seconds == 0 {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} must be greater than 0"
            )));
        }
        if timeout_seconds > 3600 {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} must be less than or equal to 3600"
            )));
        }
        Ok(())
    }

    /// Validate that a count is reasonable
    pub fn validate_count(count: usize, field_name: &str) -> ConfigResult<()> {
        if count == 0 {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} must be greater than 0"
            )));
        }
        if count > 10000 {
            return Err(crate::ConfigError::Validation(format!(
                "{field_name} must be less than or equal to 10000"
            )));
        }
        Ok(())
    }

    /// Validate that a URL parses and uses http or https
    pub fn validate_http_url(value: &str, field_name: &str) -> ConfigResult<()> {
        Self::validate_not_empty(value, field_name)?;

        let parsed = url::Url::parse(value)?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(crate::ConfigError::Validation(format!(
                "{field_name} must use http or https, got {scheme}"
            ))),
        }
    }

    /// Validate that a socket address such as `127.0.0.1:8000` parses
    pub fn validate_socket_addr(value: &str, field_name: &str) -> ConfigResult<()> {
        value
            .parse::<std::net::SocketAddr>()
            .map(|_| ())
            .map_err(|e| {
                crate::ConfigError::Validation(format!("{field_name} is not a valid address: {e}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(ValidationUtils::validate_not_empty("value", "field").is_ok());
        assert!(ValidationUtils::validate_not_empty("   ", "field").is_err());
    }

    #[test]
    fn test_validate_timeout_seconds() {
        assert!(ValidationUtils::validate_timeout_seconds(30, "timeout").is_ok());
        assert!(ValidationUtils::validate_timeout_seconds(0, "timeout").is_err());
        assert!(ValidationUtils::validate_timeout_seconds(3601, "timeout").is_err());
    }

    #[test]
    fn test_validate_http_url() {
        assert!(ValidationUtils::validate_http_url("https://httpbin.org/post", "url").is_ok());
        assert!(ValidationUtils::validate_http_url("http://127.0.0.1:9000/hook", "url").is_ok());
        assert!(ValidationUtils::validate_http_url("ftp://example.com", "url").is_err());
        assert!(matches!(
            ValidationUtils::validate_http_url("not a url", "url"),
            Err(crate::ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_socket_addr() {
        assert!(ValidationUtils::validate_socket_addr("127.0.0.1:8000", "addr").is_ok());
        assert!(ValidationUtils::validate_socket_addr("localhost", "addr").is_err());
    }
}
