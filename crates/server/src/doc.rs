use crate::auth::AUTH_HEADER;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "x-auth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                AUTH_HEADER,
                "Token returned by login or registration",
            ))),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness checks"),
        (name = "Authentication", description = "Login and token checks"),
        (name = "Users", description = "Registration and profiles"),
        (name = "Courses", description = "Course catalog"),
        (name = "Shopping Cart", description = "Courses a student is considering"),
        (name = "Schedules", description = "Term schedules built from the cart"),
    ),
    info(
        title = "Course Enrollment API",
        version = "1.0.0",
        description = "Course catalog, shopping cart and term schedules",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
