//! OpenAPI document served at `/swagger.json` and `/swagger.yaml`, and the HTML viewers over it.

use crate::error::AppError;
use crate::model::{
    AccountView, Category, CategoryInput, Credentials, Item, ItemInput, NewUser, StockStatus,
    TokenView,
};
use utoipa::openapi::{
    content::ContentBuilder,
    path::{HttpMethod, OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder, PathsBuilder},
    request_body::RequestBodyBuilder,
    response::ResponseBuilder,
    security::{ApiKey, ApiKeyValue, SecurityRequirement, SecurityScheme},
    Ref, Required,
};
use utoipa::OpenApi;

const SECURITY_SCHEME: &str = "tokenAuth";

#[derive(OpenApi)]
#[openapi(
    info(title = "Stockroom API", description = "Inventory items, categories, and accounts"),
    components(schemas(
        Item, ItemInput, StockStatus, Category, CategoryInput, NewUser, AccountView, Credentials,
        TokenView
    ))
)]
struct ApiDoc;

fn json_response(description: &str, schema: Option<&str>) -> utoipa::openapi::Response {
    let builder = ResponseBuilder::new().description(description);
    match schema {
        Some(name) => builder
            .content(
                "application/json",
                ContentBuilder::new()
                    .schema(Some(Ref::from_schema_name(name)))
                    .build(),
            )
            .build(),
        None => builder.build(),
    }
}

fn json_body(schema: &str) -> utoipa::openapi::request_body::RequestBody {
    RequestBodyBuilder::new()
        .content(
            "application/json",
            ContentBuilder::new()
                .schema(Some(Ref::from_schema_name(schema)))
                .build(),
        )
        .required(Some(Required::True))
        .build()
}

fn query_param(name: &str, description: &str) -> utoipa::openapi::path::Parameter {
    ParameterBuilder::new()
        .name(name)
        .parameter_in(ParameterIn::Query)
        .required(Required::False)
        .description(Some(description))
        .build()
}

fn secured(op: OperationBuilder, id: &str, tag: &str) -> OperationBuilder {
    op.operation_id(Some(id))
        .tag(tag)
        .security(SecurityRequirement::new(SECURITY_SCHEME, Vec::<String>::new()))
        .response("401", json_response("Missing or invalid token", None))
}

fn list_operation(id: &str, tag: &str, filters: &[(&str, &str)]) -> OperationBuilder {
    let mut op = secured(OperationBuilder::new(), id, tag)
        .summary(Some("Paginated list: {count, next, previous, results}"))
        .parameter(query_param("limit", "Page size (default 25)"))
        .parameter(query_param("offset", "Index of the first record"))
        .response("200", json_response("Page of records", None));
    for (name, description) in filters {
        op = op.parameter(query_param(name, description));
    }
    op
}

fn create_operation(id: &str, tag: &str, input: &str, record: &str) -> OperationBuilder {
    secured(OperationBuilder::new(), id, tag)
        .request_body(Some(json_body(input)))
        .response("201", json_response("Created", Some(record)))
        .response("400", json_response("Validation errors", None))
}

pub fn document() -> utoipa::openapi::OpenApi {
    let sku = ParameterBuilder::new()
        .name("sku")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .build();

    let items = PathItemBuilder::new()
        .operation(
            HttpMethod::Get,
            list_operation(
                "list_items",
                "items",
                &[
                    ("category", "Exact category"),
                    ("stock_status", "in_stock or out_of_stock"),
                    ("start_date", "Lower created_at bound; requires end_date"),
                    ("end_date", "Upper created_at bound; requires start_date"),
                ],
            )
            .build(),
        )
        .operation(HttpMethod::Post, create_operation("create_item", "items", "ItemInput", "Item").build())
        .build();

    let item = PathItemBuilder::new()
        .operation(
            HttpMethod::Get,
            secured(OperationBuilder::new(), "get_item", "items")
                .parameter(sku.clone())
                .response("200", json_response("Item", Some("Item")))
                .response("404", json_response("Item not found", None))
                .build(),
        )
        .operation(
            HttpMethod::Put,
            secured(OperationBuilder::new(), "update_item", "items")
                .parameter(sku.clone())
                .request_body(Some(json_body("ItemInput")))
                .response("200", json_response("Updated", Some("Item")))
                .response("400", json_response("Validation errors", None))
                .response("404", json_response("Item not found", None))
                .build(),
        )
        .operation(
            HttpMethod::Delete,
            secured(OperationBuilder::new(), "delete_item", "items")
                .parameter(sku)
                .response("204", json_response("Deleted", None))
                .response("404", json_response("Item not found", None))
                .build(),
        )
        .build();

    let categories = PathItemBuilder::new()
        .operation(
            HttpMethod::Get,
            list_operation("list_categories", "categories", &[]).build(),
        )
        .operation(
            HttpMethod::Post,
            create_operation("create_category", "categories", "CategoryInput", "Category").build(),
        )
        .build();

    let create_user = PathItemBuilder::new()
        .operation(
            HttpMethod::Post,
            OperationBuilder::new()
                .operation_id(Some("create_user"))
                .tag("accounts")
                .request_body(Some(json_body("NewUser")))
                .response("201", json_response("Account created", Some("AccountView")))
                .response("400", json_response("Validation errors", None))
                .build(),
        )
        .build();

    let token = PathItemBuilder::new()
        .operation(
            HttpMethod::Post,
            OperationBuilder::new()
                .operation_id(Some("obtain_token"))
                .tag("accounts")
                .request_body(Some(json_body("Credentials")))
                .response("200", json_response("Token", Some("TokenView")))
                .response("400", json_response("Bad credentials", None))
                .build(),
        )
        .build();

    let mut doc = ApiDoc::openapi();
    doc.paths = PathsBuilder::new()
        .path("/items/", items)
        .path("/items/{sku}/", item)
        .path("/categories/", categories)
        .path("/create_user/", create_user)
        .path("/api-token-auth/", token)
        .build();
    if let Some(components) = doc.components.as_mut() {
        components.add_security_scheme(
            SECURITY_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "Token <key> or Bearer <key>",
            ))),
        );
    }
    doc
}

pub fn yaml() -> Result<String, AppError> {
    document()
        .to_yaml()
        .map_err(|e| AppError::Internal(format!("openapi yaml: {}", e)))
}

/// Swagger UI page, assets from the public CDN.
pub const SWAGGER_UI_PAGE: &str = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Stockroom API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/swagger.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

/// ReDoc page, assets from the public CDN.
pub const REDOC_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Stockroom API</title>
</head>
<body>
  <redoc spec-url="/swagger.json"></redoc>
  <script src="https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js"></script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = serde_json::to_value(document()).unwrap();
        for path in ["/items/", "/items/{sku}/", "/categories/", "/create_user/", "/api-token-auth/"] {
            assert!(doc["paths"].get(path).is_some(), "missing {}", path);
        }
        assert!(doc["paths"]["/items/{sku}/"].get("delete").is_some());
        assert!(doc["components"]["schemas"].get("Item").is_some());
        assert!(doc["components"]["securitySchemes"].get(SECURITY_SCHEME).is_some());
    }

    #[test]
    fn write_bodies_use_input_schemas() {
        let doc = serde_json::to_value(document()).unwrap();
        let body_ref = |path: &str, method: &str| {
            doc["paths"][path][method]["requestBody"]["content"]["application/json"]["schema"]
                ["$ref"]
                .as_str()
                .unwrap()
                .to_string()
        };
        assert_eq!(body_ref("/items/", "post"), "#/components/schemas/ItemInput");
        assert_eq!(body_ref("/items/{sku}/", "put"), "#/components/schemas/ItemInput");
        assert_eq!(body_ref("/categories/", "post"), "#/components/schemas/CategoryInput");
        let input = &doc["components"]["schemas"]["ItemInput"]["properties"];
        assert!(input.get("sku").is_some());
        assert!(input.get("id").is_none());
        assert!(input.get("created_at").is_none());
    }

    #[test]
    fn yaml_rendering_matches_json_paths() {
        let yaml = yaml().unwrap();
        assert!(yaml.starts_with("openapi:"));
        assert!(yaml.contains("/api-token-auth/"));
        assert!(yaml.contains("tokenAuth"));
    }
}
