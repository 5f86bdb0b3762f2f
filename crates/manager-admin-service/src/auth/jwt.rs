//! JWT Token 处理
//!
//! 提供 JWT Token 的生成和验证功能。用户信息以 JSON 字符串形式
//! 放在 `userContext` 声明中，与登录子系统签发的令牌格式一致。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::AuthUser;
use crate::error::AdminError;

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// 签名密钥
    pub secret: String,
    /// Token 过期时间（秒）
    pub expires_in_secs: i64,
    /// Token 签发者
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "mall-manager-secret-key-change-in-production".to_string(),
            expires_in_secs: 86400,
            issuer: "mall".to_string(),
        }
    }
}

/// JWT Claims（Token 载荷）
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// 用户名
    pub sub: String,
    /// 序列化后的 [`AuthUser`]
    #[serde(rename = "userContext")]
    pub user_context: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// JWT 管理器
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 生成 JWT Token，返回 (token, 过期时间戳)
    pub fn generate_token(&self, user: &AuthUser) -> Result<(String, i64), AdminError> {
        self.generate_token_with_ttl(user, self.config.expires_in_secs)
    }

    fn generate_token_with_ttl(
        &self,
        user: &AuthUser,
        ttl_secs: i64,
    ) -> Result<(String, i64), AdminError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl_secs);

        let claims = Claims {
            sub: user.username.clone(),
            user_context: serde_json::to_string(user)?,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AdminError::Internal(format!("JWT 生成失败: {}", e)))?;

        Ok((token, exp.timestamp()))
    }

    /// 验证并解析 JWT Token
    ///
    /// 过期返回 [`AdminError::TokenExpired`]，其他失败返回 [`AdminError::Unauthorized`]
    pub fn verify_token(&self, token: &str) -> Result<Claims, AdminError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AdminError::TokenExpired,
                    ErrorKind::InvalidToken => AdminError::Unauthorized("无效的 Token".to_string()),
                    _ => AdminError::Unauthorized(format!("Token 验证失败: {}", e)),
                }
            })?;

        Ok(token_data.claims)
    }

    /// 验证 Token 并还原用户上下文
    pub fn decode_user(&self, token: &str) -> Result<AuthUser, AdminError> {
        let claims = self.verify_token(token)?;
        serde_json::from_str(&claims.user_context)
            .map_err(|e| AdminError::Unauthorized(format!("用户上下文解析失败: {}", e)))
    }
}
