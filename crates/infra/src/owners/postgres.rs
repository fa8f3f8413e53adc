//! Postgres-backed owner lookup.
//!
//! Each resource lives in its own table. Projects own themselves, orders,
//! invoices and files carry a nullable `project_id`, suppliers have no
//! project column at all.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use projectguard_auth::{LookupError, ModuleName, OwnerLookup, Ownership, Resource};
use projectguard_core::{EntityId, ProjectId};

pub struct PostgresOwnerLookup {
    pool: PgPool,
}

impl PostgresOwnerLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn table_for(module: ModuleName) -> &'static str {
    match module {
        ModuleName::Invoices => "invoices",
        ModuleName::Orders => "orders",
        ModuleName::Suppliers => "suppliers",
        ModuleName::Files => "files",
    }
}

// Row mapping, kept apart from the queries.

fn project_row(found: Option<Uuid>) -> Option<Ownership> {
    found.map(|uuid| Ownership::Project(ProjectId::from_uuid(uuid)))
}

fn supplier_row(found: Option<i32>) -> Option<Ownership> {
    found.map(|_| Ownership::Unowned)
}

/// Outer `None` is a missing record, inner `None` a NULL `project_id`.
fn owned_row(found: Option<Option<Uuid>>) -> Option<Ownership> {
    found.map(|project| match project {
        Some(uuid) => Ownership::Project(ProjectId::from_uuid(uuid)),
        None => Ownership::Unresolved,
    })
}

fn backend(e: sqlx::Error) -> LookupError {
    LookupError::Backend(e.to_string())
}

#[async_trait]
impl OwnerLookup for PostgresOwnerLookup {
    async fn owner_of(
        &self,
        resource: Resource,
        id: EntityId,
    ) -> Result<Option<Ownership>, LookupError> {
        tracing::debug!(%resource, entity_id = %id, "resolving record owner");
        match resource {
            Resource::Projects => {
                let found = sqlx::query_scalar::<_, Uuid>("SELECT id FROM projects WHERE id = $1")
                    .bind(id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(backend)?;
                Ok(project_row(found))
            }
            Resource::Module(ModuleName::Suppliers) => {
                let found = sqlx::query_scalar::<_, i32>("SELECT 1 FROM suppliers WHERE id = $1")
                    .bind(id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(backend)?;
                Ok(supplier_row(found))
            }
            Resource::Module(module) => {
                let sql = format!("SELECT project_id FROM {} WHERE id = $1", table_for(module));
                let found = sqlx::query_scalar::<_, Option<Uuid>>(&sql)
                    .bind(id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(backend)?;
                Ok(owned_row(found))
            }
        }
    }
}
