use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Rejects request URIs with traversal sequences and logs obvious scanner user agents.
///
/// Only the URI path is inspected. The `path` query parameter names the
/// directory to inventory and is validated by the handlers.
pub async fn validate_request_middleware(req: Request, next: Next) -> Response {
    if contains_path_traversal(req.uri().path()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {
                    "code": "INVALID_PATH",
                    "message": "Path traversal detected in request",
                },
                "status": 400,
            })),
        )
            .into_response();
    }

    if let Some(ua_str) = req.headers().get("user-agent").and_then(|ua| ua.to_str().ok()) {
        if is_suspicious_user_agent(ua_str) {
            tracing::warn!("Suspicious user agent detected: {}", sanitize_for_logging(ua_str));
        }
    }

    next.run(req).await
}

fn contains_path_traversal(path: &str) -> bool {
    if path.contains("/..") || path.contains("\\..") || path.starts_with("..") {
        return true;
    }
    if path.contains("/./") || path.contains("\\.\\") || path.contains("....") {
        return true;
    }

    // URL-encoded variants (single and double encoding)
    const ENCODED_PATTERNS: [&str; 9] =
        ["%2e%2e", "%252e%252e", "%2e/", "%252e%2f", "/%2e", "%2f%2e", "%2e%5c", "%5c%2e", "%00"];
    let lower = path.to_lowercase();
    ENCODED_PATTERNS.iter().any(|p| lower.contains(p)) || path.contains('\0')
}

fn is_suspicious_user_agent(ua: &str) -> bool {
    let ua_lower = ua.to_lowercase();
    ["scanner", "nikto", "sqlmap", "havij", "acunetix"].iter().any(|s| ua_lower.contains(s))
        || (ua_lower.contains("crawler") && !ua_lower.contains("googlebot") && !ua_lower.contains("bingbot"))
}

/// Strips control characters, caps the length and escapes quotes for log output.
pub fn sanitize_for_logging(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .take(200)
        .collect::<String>()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\'', "\\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_traversal_detection() {
        assert!(contains_path_traversal("../etc/passwd"));
        assert!(contains_path_traversal("/analyze/../etc"));
        assert!(contains_path_traversal("/%2e%2e/etc"));
        assert!(contains_path_traversal("/a/%2E%2E/b"));
        assert!(contains_path_traversal("path\0with\0null"));

        assert!(!contains_path_traversal("/analyze/files"));
        assert!(!contains_path_traversal("/file-info"));
    }

    #[test]
    fn test_suspicious_user_agents() {
        assert!(is_suspicious_user_agent("nikto/2.1.5"));
        assert!(is_suspicious_user_agent("sqlmap/1.0"));
        assert!(is_suspicious_user_agent("some crawler"));

        assert!(!is_suspicious_user_agent("curl/8.5.0"));
        assert!(!is_suspicious_user_agent("Googlebot crawler/2.1"));
    }

    #[test]
    fn test_sanitize_for_logging() {
        assert_eq!(sanitize_for_logging("/srv/data"), "/srv/data");
        let sanitized = sanitize_for_logging("a\x00b\x01c");
        assert_eq!(sanitized, "abc");
        assert_eq!(sanitize_for_logging(&"a".repeat(300)).len(), 200);
        assert_eq!(sanitize_for_logging("it's"), "it\\'s");
    }
}
