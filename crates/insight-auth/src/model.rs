//! Authentication models
//!
//! This file defines the JWT payload, the logged-in user view and the
//! per-request auth context.

use jsonwebtoken::errors::ErrorKind;
use serde::{Deserialize, Serialize};

use insight_common::Role;
use insight_persistence::UserInfo;

// Auth configuration keys
pub const TOKEN_SECRET_KEY: &str = "insight.auth.token.secret.key";
pub const DEFAULT_TOKEN_SECRET_KEY: &str = "";
pub const TOKEN_EXPIRE_SECONDS: &str = "insight.auth.token.expire.seconds";
pub const DEFAULT_TOKEN_EXPIRE_SECONDS: i64 = 18000;

pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const ACCESS_TOKEN: &str = "accessToken";
pub const TOKEN_PREFIX: &str = "Bearer ";

/// Login failure message. Never says whether the username or the password was wrong.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// JWT payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtPayload {
    /// Username
    pub sub: String,
    /// User id
    pub uid: i32,
    pub role: Role,
    pub exp: i64,
}

/// Public view of an authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl TryFrom<UserInfo> for AuthUser {
    type Error = String;

    fn try_from(value: UserInfo) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            role: value.role.parse()?,
            username: value.username,
        })
    }
}

impl From<&JwtPayload> for AuthUser {
    fn from(value: &JwtPayload) -> Self {
        Self {
            id: value.uid,
            username: value.sub.clone(),
            role: value.role,
        }
    }
}

/// Login response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    pub token: String,
    pub user: AuthUser,
}

/// Auth context passed through request extensions
#[derive(Debug, Default, Clone)]
pub struct AuthContext {
    pub user: Option<AuthUser>,
    pub jwt_error: Option<jsonwebtoken::errors::Error>,
    pub token_provided: bool,
}

impl AuthContext {
    pub fn authenticated(user: AuthUser) -> Self {
        Self {
            user: Some(user),
            jwt_error: None,
            token_provided: true,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn jwt_error_string(&self) -> String {
        if let Some(e) = &self.jwt_error {
            match e.kind() {
                ErrorKind::ExpiredSignature => "token expired!".to_string(),
                _ => e.to_string(),
            }
        } else {
            String::default()
        }
    }
}
