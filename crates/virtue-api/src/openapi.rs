//! # OpenAPI Specification Assembly
//!
//! Collects every utoipa-documented route into one OpenAPI 3.1 document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the admin bearer token scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Admin token for /api/admin/*. Set via VIRTUE_ADMIN_TOKEN.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// The full API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "VirtueVerse API",
        version = "0.1.0",
        description = "Good-deeds tracker backend: users submit deeds, admins verify them, verified deeds award credits shown on a leaderboard.\n\nSuccessful responses are wrapped as `{success: true, data}`; errors as `{success: false, error, code}`.",
        license(name = "MIT")
    ),
    servers((url = "http://localhost:8080", description = "Local development server")),
    paths(
        // ── Accounts ─────────────────────────────────────────────────
        crate::routes::auth::signup,
        crate::routes::auth::login,
        crate::routes::profile::get_profile,
        // ── Deeds ────────────────────────────────────────────────────
        crate::routes::deeds::list_catalog,
        crate::routes::deeds::create_deed,
        crate::routes::deeds::list_user_deeds,
        crate::routes::leaderboard::get_leaderboard,
        // ── Admin ────────────────────────────────────────────────────
        crate::routes::admin::list_pending,
        crate::routes::admin::verify_deed,
        crate::routes::admin::audit_credits,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::response::MessageBody,
        crate::routes::auth::SignupRequest,
        crate::routes::auth::LoginRequest,
        crate::routes::deeds::SubmitDeedRequest,
        crate::routes::admin::VerifyRequest,
        crate::routes::admin::AuditReport,
        virtue_core::UserProfile,
        virtue_core::Role,
        virtue_core::DeedCatalogItem,
        virtue_state::Deed,
        virtue_state::DeedStatus,
        virtue_state::PendingDeed,
        virtue_state::LeaderboardEntry,
        virtue_state::BalanceDiscrepancy,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup and login"),
        (name = "profile", description = "User profiles"),
        (name = "deeds", description = "Catalog, submission, and history"),
        (name = "leaderboard", description = "Credit rankings"),
        (name = "admin", description = "Verification queue and credit audit"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/auth/signup",
            "/api/auth/login",
            "/api/profile/{email}",
            "/api/deeds",
            "/api/deeds/catalog",
            "/api/deeds/{userId}",
            "/api/leaderboard",
            "/api/admin/deeds/pending",
            "/api/admin/deeds/verify",
            "/api/admin/audit/credits",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
