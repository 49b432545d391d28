//! HTTP status interpretation shared by every endpoint.

/// Status code the API answers with on success. No other 2xx value is used.
pub const HTTP_OK: u16 = 200;

/// Whether `status` is the one success code the API uses.
pub fn is_success(status: u16) -> bool {
    status == HTTP_OK
}

/// Human-readable message for a non-200 status code.
pub fn status_message(status: u16) -> String {
    let message = match status {
        400 => "Bad Request",
        401 => "Unauthorized - Check your API key",
        403 => "Access Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        410 => "Gone",
        418 => "I'm a teapot",
        429 => "Too Many Requests / Rate limit reached",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        other => return format!("Error {}", other),
    };
    message.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses() {
        let table = [
            (400, "Bad Request"),
            (401, "Unauthorized - Check your API key"),
            (403, "Access Forbidden"),
            (404, "Not Found"),
            (405, "Method Not Allowed"),
            (406, "Not Acceptable"),
            (410, "Gone"),
            (418, "I'm a teapot"),
            (429, "Too Many Requests / Rate limit reached"),
            (500, "Internal Server Error"),
            (503, "Service Unavailable"),
        ];
        for (code, expected) in table {
            assert_eq!(status_message(code), expected, "status {}", code);
        }
    }

    #[test]
    fn test_unknown_status_falls_back_to_code() {
        assert_eq!(status_message(1337), "Error 1337");
        assert_eq!(status_message(502), "Error 502");
    }

    #[test]
    fn test_only_200_is_success() {
        assert!(is_success(200));
        assert!(!is_success(201));
        assert!(!is_success(204));
        assert!(!is_success(404));
    }
}
