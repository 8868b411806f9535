use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Material Wastage API",
        version = "0.1.0",
        description = r#"
# Material Wastage API

Tracks material dispatched to external companies and the batches returned against each
dispatch, and reports the resulting wastage percentage.

## Wastage

```
wastage = ((givenQuantity - totalReceived) / givenQuantity) * 100
```

Values are shown with two decimals. Returns larger than the dispatched quantity produce a
negative wastage. Report endpoints always recompute from the stored batch returns; when a
dispatch has no positive quantity the wastage is `null` (JSON) or `N/A` (files).

## Dates

Date fields and filters accept RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS` (UTC) or
`YYYY-MM-DD`.

## Error Handling

```json
{
  "error": "Not Found",
  "message": "Material not found",
  "request_id": "5f0c…",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development")
    ),
    tags(
        (name = "Materials", description = "Material dispatch records"),
        (name = "Batch Returns", description = "Quantities returned against a dispatch"),
        (name = "Reports", description = "Wastage summaries, spreadsheet and PDF exports"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        // Materials
        crate::handlers::materials::list_materials,
        crate::handlers::materials::create_material,
        crate::handlers::materials::update_material,
        crate::handlers::materials::delete_material,

        // Batch returns
        crate::handlers::batch_returns::create_batch_return,
        crate::handlers::batch_returns::list_batch_returns,

        // Reports
        crate::handlers::reports::wastage_summary,
        crate::handlers::reports::wastage_detail,
        crate::handlers::reports::export_excel,
        crate::handlers::reports::generate_pdf,

        // Health
        crate::health::health_check,
    ),
    components(
        schemas(
            crate::models::material_dispatch::Model,
            crate::models::batch_return::Model,

            crate::handlers::materials::CreateMaterialRequest,
            crate::handlers::materials::UpdateMaterialRequest,
            crate::handlers::materials::DispatchCreatedResponse,
            crate::handlers::materials::DispatchUpdatedResponse,
            crate::handlers::materials::MessageResponse,
            crate::handlers::batch_returns::CreateBatchReturnRequest,
            crate::handlers::batch_returns::BatchCreatedResponse,

            crate::services::reports::WastageSummaryItem,
            crate::services::reports::WastageDetail,

            crate::health::HealthInfo,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
