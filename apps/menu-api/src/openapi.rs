//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Menu API",
        version = "0.1.0",
        description = "Categories, products, carriers and users of a restaurant menu"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/v1/categories", api = domain_categories::ApiDoc),
        (path = "/api/v1/products", api = domain_products::ApiDoc),
        (path = "/api/v1/carriers", api = domain_carriers::ApiDoc),
        (path = "/api/v1/users", api = domain_users::ApiDoc)
    )
)]
pub struct ApiDoc;
