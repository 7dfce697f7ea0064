use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use praxeum_core::{AppError, PaginationMeta};
use praxeum_models::ids::ResourceId;

use crate::modules::resources::model::{
    PaginatedResourcesResponse, Resource, ResourceFilterParams,
};

const RESOURCE_COLUMNS: &str = "id, branch_id, name, kind, is_active, created_at, updated_at";

pub struct ResourceService;

impl ResourceService {
    /// Fetch a resource by ID.
    pub async fn get_resource<'e, E>(executor: E, resource_id: ResourceId) -> Result<Resource, AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Resource>(&format!(
            "SELECT {RESOURCE_COLUMNS} FROM resources WHERE id = $1"
        ))
        .bind(resource_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Resource not found")))
    }

    /// Paginated resource listing with branch/kind/active filters.
    #[instrument(skip(db))]
    pub async fn list_resources(
        db: &PgPool,
        filters: ResourceFilterParams,
    ) -> Result<PaginatedResourcesResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut where_clause = String::new();
        if let Some(branch_id) = filters.branch_id {
            where_clause.push_str(&format!(" AND branch_id = '{}'", branch_id));
        }
        if let Some(kind) = filters.kind {
            where_clause.push_str(&format!(" AND kind = '{}'", kind));
        }
        if let Some(is_active) = filters.is_active {
            where_clause.push_str(&format!(" AND is_active = {}", is_active));
        }

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM resources WHERE TRUE{where_clause}"
        ))
        .fetch_one(db)
        .await?;

        let resources = sqlx::query_as::<_, Resource>(&format!(
            "SELECT {RESOURCE_COLUMNS} FROM resources WHERE TRUE{where_clause} ORDER BY name LIMIT {limit} OFFSET {offset}"
        ))
        .fetch_all(db)
        .await?;

        let has_more = offset + limit < total;

        Ok(PaginatedResourcesResponse {
            data: resources,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                page: None,
                has_more,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_seed;
    use praxeum_core::{ErrorCode, PaginationParams};
    use praxeum_models::enums::ResourceKind;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_resource_not_found(pool: PgPool) {
        let err = ResourceService::get_resource(&pool, ResourceId::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_filters_by_kind(pool: PgPool) {
        let branch_id = test_seed::create_branch(&pool).await;
        test_seed::create_resource(&pool, branch_id, "Room 101", ResourceKind::Room).await;
        test_seed::create_resource(&pool, branch_id, "Meet Link A", ResourceKind::Virtual).await;

        let result = ResourceService::list_resources(
            &pool,
            ResourceFilterParams {
                branch_id: Some(branch_id),
                kind: Some(ResourceKind::Virtual),
                is_active: None,
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();

        assert_eq!(result.meta.total, 1);
        assert_eq!(result.data[0].name, "Meet Link A");
        assert_eq!(result.data[0].kind, ResourceKind::Virtual);
    }
}
