// Security context and authorization macro for API access control

use actix_web::{HttpMessage, HttpRequest, web};

use insight_auth::model::{AuthContext, AuthUser};
use insight_common::{ActionTypes, InsightError};

use crate::model::AppState;

const NO_AUTH_CONTEXT: &str = "no auth context found";
const NO_TOKEN: &str = "no token provided";
const AUTHORIZATION_FAILED: &str = "authorization failed";

// Security context for API access control
#[derive(Debug, Clone)]
pub struct Secured<'a> {
    pub req: &'a HttpRequest,          // HTTP request reference
    pub data: &'a web::Data<AppState>, // Application state
    pub action: ActionTypes,           // Requested action type
    pub resource: &'a str,             // Target resource name
}

impl<'a> Secured<'a> {
    pub fn builder(
        req: &'a HttpRequest,
        data: &'a web::Data<AppState>,
        resource: &'a str,
    ) -> SecuredBuilder<'a> {
        SecuredBuilder::new(req, data, resource)
    }

    /// Resolve the caller and check the role against (resource, action).
    ///
    /// Missing, invalid or expired tokens fail with `InsightError::Auth`;
    /// a role without permission fails with `InsightError::Forbidden`.
    pub fn authorize(&self) -> Result<AuthUser, InsightError> {
        let auth_context = self.req.extensions().get::<AuthContext>().cloned();

        let auth_context = match auth_context {
            Some(ctx) => ctx,
            None => return Err(InsightError::Auth(NO_AUTH_CONTEXT.to_string())),
        };

        if !auth_context.token_provided {
            return Err(InsightError::Auth(NO_TOKEN.to_string()));
        }

        if auth_context.jwt_error.is_some() {
            return Err(InsightError::Auth(auth_context.jwt_error_string()));
        }

        let user = match auth_context.user {
            Some(user) => user,
            None => return Err(InsightError::Auth(NO_AUTH_CONTEXT.to_string())),
        };

        if !user.role.permits(self.resource, self.action) {
            tracing::warn!(
                username = %user.username,
                role = %user.role,
                resource = self.resource,
                action = %self.action,
                path = self.req.path(),
                "Authorization failed"
            );
            return Err(InsightError::Forbidden(AUTHORIZATION_FAILED.to_string()));
        }

        Ok(user)
    }
}

#[derive(Debug, Clone)]
pub struct SecuredBuilder<'a> {
    req: &'a HttpRequest,
    data: &'a web::Data<AppState>,
    action: ActionTypes,
    resource: &'a str,
}

impl<'a> SecuredBuilder<'a> {
    pub fn new(req: &'a HttpRequest, data: &'a web::Data<AppState>, resource: &'a str) -> Self {
        SecuredBuilder::<'a> {
            req,
            data,
            action: ActionTypes::default(),
            resource,
        }
    }

    pub fn action(mut self, action: ActionTypes) -> Self {
        self.action = action;
        self
    }

    pub fn resource(mut self, resource: &'a str) -> Self {
        self.resource = resource;
        self
    }

    pub fn build(self) -> Secured<'a> {
        Secured::<'a> {
            req: self.req,
            data: self.data,
            action: self.action,
            resource: self.resource,
        }
    }
}

/// Guard a handler returning `Result<_, AppError>`.
///
/// Evaluates to the authenticated [`AuthUser`]; returns the 401/403 error
/// from the enclosing handler otherwise.
#[macro_export]
macro_rules! secured {
    ($secured: expr) => {
        match $secured.authorize() {
            Ok(__user) => __user,
            Err(__err) => return Err($crate::error::AppError::from(__err)),
        }
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::test::TestRequest;
    use insight_common::{INSIGHT_RESOURCE, MASTER_RESOURCE, Role};
    use insight_migration::{Migrator, MigratorTrait};
    use insight_persistence::ExternalDbPersistService;
    use insight_persistence::sea_orm::{ConnectOptions, Database};

    use super::*;
    use crate::model::Configuration;

    async fn app_state() -> web::Data<AppState> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        web::Data::new(AppState::new(
            Configuration::default(),
            Arc::new(ExternalDbPersistService::new(db)),
        ))
    }

    fn request(ctx: Option<AuthContext>) -> HttpRequest {
        let req = TestRequest::default().to_http_request();
        if let Some(ctx) = ctx {
            req.extensions_mut().insert(ctx);
        }
        req
    }

    fn user(role: Role) -> AuthUser {
        AuthUser {
            id: 1,
            username: role.as_str().to_lowercase(),
            role,
        }
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let data = app_state().await;

        let req = request(None);
        let err = Secured::builder(&req, &data, INSIGHT_RESOURCE)
            .action(ActionTypes::Write)
            .build()
            .authorize()
            .unwrap_err();
        assert!(matches!(err, InsightError::Auth(ref m) if m == NO_AUTH_CONTEXT));

        let req = request(Some(AuthContext::default()));
        let err = Secured::builder(&req, &data, INSIGHT_RESOURCE)
            .action(ActionTypes::Write)
            .build()
            .authorize()
            .unwrap_err();
        assert!(matches!(err, InsightError::Auth(ref m) if m == NO_TOKEN));
    }

    #[actix_web::test]
    async fn test_role_matrix() {
        let data = app_state().await;

        let cases = [
            (Role::Admin, INSIGHT_RESOURCE, true),
            (Role::Admin, MASTER_RESOURCE, true),
            (Role::Manager, INSIGHT_RESOURCE, true),
            (Role::Manager, MASTER_RESOURCE, false),
            (Role::Viewer, INSIGHT_RESOURCE, false),
            (Role::Viewer, MASTER_RESOURCE, false),
        ];

        for (role, resource, allowed) in cases {
            let req = request(Some(AuthContext::authenticated(user(role))));
            let result = Secured::builder(&req, &data, resource)
                .action(ActionTypes::Write)
                .build()
                .authorize();
            match result {
                Ok(u) => {
                    assert!(allowed, "{role} should not write {resource}");
                    assert_eq!(u.role, role);
                }
                Err(e) => {
                    assert!(!allowed, "{role} should write {resource}");
                    assert!(matches!(e, InsightError::Forbidden(_)));
                }
            }
        }
    }

    #[actix_web::test]
    async fn test_viewer_may_read() {
        let data = app_state().await;
        let req = request(Some(AuthContext::authenticated(user(Role::Viewer))));
        let user = Secured::builder(&req, &data, INSIGHT_RESOURCE)
            .build()
            .authorize()
            .unwrap();
        assert_eq!(user.username, "viewer");
    }
}
