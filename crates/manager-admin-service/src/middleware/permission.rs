//! 权限匹配
//!
//! 管理员的可访问路径按 SUPER（读写）和 QUERY（只读）两组缓存，
//! 路径模式只支持 `*` 通配符。

use axum::http::Method;
use serde::{Deserialize, Serialize};

/// 用户可访问路径集合
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPermissions {
    /// 可读写的路径
    #[serde(rename = "SUPER", default)]
    pub super_paths: Vec<String>,
    /// 只读路径
    #[serde(rename = "QUERY", default)]
    pub query_paths: Vec<String>,
}

impl UserPermissions {
    /// GET 请求命中任一分组即可，其余方法必须命中 SUPER
    pub fn is_permitted(&self, method: &Method, path: &str) -> bool {
        if matches_any(&self.super_paths, path) {
            return true;
        }
        *method == Method::GET && matches_any(&self.query_paths, path)
    }
}

fn matches_any(patterns: &[String], path: &str) -> bool {
    patterns.iter().any(|pattern| simple_match(pattern, path))
}

/// `*` 通配符匹配，`*` 可匹配任意长度（含空）的字符序列
///
/// ```
/// use manager_admin::middleware::simple_match;
///
/// assert!(simple_match("/manager/goods*", "/manager/goods/list"));
/// assert!(simple_match("*/statistics/*", "/manager/statistics/member"));
/// assert!(!simple_match("/manager/goods", "/manager/goods/list"));
/// ```
pub fn simple_match(pattern: &str, text: &str) -> bool {
    let Some(first) = pattern.find('*') else {
        return pattern == text;
    };

    if first > 0 {
        return match (text.get(..first), text.get(first..)) {
            (Some(head), Some(rest)) => head == &pattern[..first] && simple_match(&pattern[first..], rest),
            _ => false,
        };
    }

    // 以 * 开头
    let tail = &pattern[1..];
    if tail.is_empty() {
        return true;
    }

    let Some(next) = tail.find('*') else {
        return text.ends_with(tail);
    };
    let part = &tail[..next];
    let remaining = &tail[next..];
    if part.is_empty() {
        return simple_match(remaining, text);
    }

    text.match_indices(part)
        .any(|(idx, _)| simple_match(remaining, &text[idx + part.len()..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_match() {
        let cases = [
            ("/manager/member", "/manager/member", true),
            ("/manager/member", "/manager/member/1", false),
            ("/manager/member*", "/manager/member/1", true),
            ("*", "/anything", true),
            ("*/list", "/manager/goods/list", true),
            ("*/list", "/manager/goods/listing", false),
            ("/manager/*/orders", "/manager/distribution/orders", true),
            ("/manager/*/orders", "/manager/distribution/refunds", false),
            ("**/orders", "/a/b/orders", true),
            ("*goods*", "/manager/goods/1", true),
            ("*goods*", "/manager/member/1", false),
            ("/manager/statistics*", "/manager", false),
        ];

        for (pattern, text, expected) in cases {
            assert_eq!(simple_match(pattern, text), expected, "{pattern} ~ {text}");
        }
    }

    #[test]
    fn test_query_paths_only_allow_get() {
        let permissions = UserPermissions {
            super_paths: vec![],
            query_paths: vec!["/api/manager/statistics*".to_string()],
        };

        assert!(permissions.is_permitted(&Method::GET, "/api/manager/statistics/member"));
        assert!(!permissions.is_permitted(&Method::POST, "/api/manager/statistics/member"));
    }

    #[test]
    fn test_super_paths_allow_all_methods() {
        let permissions = UserPermissions {
            super_paths: vec!["/api/manager/distribution*".to_string()],
            query_paths: vec![],
        };

        assert!(permissions.is_permitted(&Method::GET, "/api/manager/distribution/orders"));
        assert!(permissions.is_permitted(&Method::PUT, "/api/manager/distribution/orders"));
        assert!(!permissions.is_permitted(&Method::GET, "/api/manager/statistics/member"));
    }

    #[test]
    fn test_empty_permissions_deny() {
        assert!(!UserPermissions::default().is_permitted(&Method::GET, "/api/manager/x"));
    }

    #[test]
    fn test_deserialize_cached_map() {
        let json = r#"{"SUPER":["/a*"],"QUERY":["/b*"]}"#;
        let permissions: UserPermissions = serde_json::from_str(json).unwrap();
        assert_eq!(permissions.super_paths, vec!["/a*"]);
        assert_eq!(permissions.query_paths, vec!["/b*"]);

        let partial: UserPermissions = serde_json::from_str(r#"{"QUERY":[]}"#).unwrap();
        assert!(partial.super_paths.is_empty());
    }
}
