//! Category taxonomy handler

use axum::Json;

use spendwise_core::Category;

/// GET /api/categories - List the budget categories in display order
pub async fn list_categories() -> Json<Vec<Category>> {
    Json(Category::all().to_vec())
}
