use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fractic_server_error::ServerError;

use crate::{
    domain::{
        logic::access_policy::{ensure, is_administrator},
        repositories::{
            categories_repository::CategoriesRepository, users_repository::UsersRepository,
        },
        usecases::users_usecase::resolve_actor,
    },
    entities::{Category, CategoryDraft, Session},
    errors::{CategoryNotFound, MissingRequiredField},
};

#[async_trait]
pub trait CategoriesUsecase: Send + Sync {
    /// Ordered by display order.
    async fn list(&self) -> Result<Vec<Category>, ServerError>;

    /// Categories selectable on the transaction forms.
    async fn list_active(&self) -> Result<Vec<Category>, ServerError>;

    async fn create(
        &self,
        session: &Session,
        draft: CategoryDraft,
    ) -> Result<Category, ServerError>;

    async fn update(
        &self,
        session: &Session,
        id: &str,
        draft: CategoryDraft,
    ) -> Result<Category, ServerError>;

    async fn set_active(
        &self,
        session: &Session,
        id: &str,
        active: bool,
    ) -> Result<Category, ServerError>;
}

pub(crate) struct CategoriesUsecaseImpl<R1, R2>
where
    R1: CategoriesRepository,
    R2: UsersRepository,
{
    categories_repository: Arc<R1>,
    users_repository: Arc<R2>,
}

impl<R1, R2> CategoriesUsecaseImpl<R1, R2>
where
    R1: CategoriesRepository,
    R2: UsersRepository,
{
    pub(crate) fn new(categories_repository: Arc<R1>, users_repository: Arc<R2>) -> Self {
        Self {
            categories_repository,
            users_repository,
        }
    }

    async fn require_admin(&self, session: &Session) -> Result<(), ServerError> {
        let actor = resolve_actor(self.users_repository.as_ref(), session).await?;
        ensure(is_administrator(&actor), "maintain categories")
    }

    async fn existing(&self, id: &str) -> Result<Category, ServerError> {
        self.categories_repository
            .get(id)
            .await?
            .ok_or_else(|| CategoryNotFound::new(id))
    }
}

fn validated(draft: CategoryDraft) -> Result<CategoryDraft, ServerError> {
    let name = draft.name.trim().to_string();
    if name.is_empty() {
        return Err(MissingRequiredField::new("name"));
    }
    Ok(CategoryDraft {
        name,
        description: draft
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        ..draft
    })
}

#[async_trait]
impl<R1, R2> CategoriesUsecase for CategoriesUsecaseImpl<R1, R2>
where
    R1: CategoriesRepository,
    R2: UsersRepository,
{
    async fn list(&self) -> Result<Vec<Category>, ServerError> {
        self.categories_repository.list().await
    }

    async fn list_active(&self) -> Result<Vec<Category>, ServerError> {
        let mut categories = self.categories_repository.list().await?;
        categories.retain(|c| c.is_active);
        Ok(categories)
    }

    async fn create(
        &self,
        session: &Session,
        draft: CategoryDraft,
    ) -> Result<Category, ServerError> {
        self.require_admin(session).await?;
        let draft = validated(draft)?;
        let now = Utc::now();
        let category = self
            .categories_repository
            .add(Category {
                id: String::new(),
                name: draft.name,
                display_order: draft.display_order,
                description: draft.description,
                is_active: draft.is_active,
                created_at: now,
                updated_at: now,
            })
            .await?;
        tracing::info!(id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    async fn update(
        &self,
        session: &Session,
        id: &str,
        draft: CategoryDraft,
    ) -> Result<Category, ServerError> {
        self.require_admin(session).await?;
        let draft = validated(draft)?;
        let category = Category {
            name: draft.name,
            display_order: draft.display_order,
            description: draft.description,
            is_active: draft.is_active,
            updated_at: Utc::now(),
            ..self.existing(id).await?
        };
        self.categories_repository.update(&category).await?;
        Ok(category)
    }

    async fn set_active(
        &self,
        session: &Session,
        id: &str,
        active: bool,
    ) -> Result<Category, ServerError> {
        self.require_admin(session).await?;
        let category = Category {
            is_active: active,
            updated_at: Utc::now(),
            ..self.existing(id).await?
        };
        self.categories_repository.update(&category).await?;
        tracing::info!(id, active, "category activation changed");
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        domain::usecases::test_support::{Categories, Fixture, Users},
        entities::UserRole,
    };

    fn usecase(f: &Fixture) -> CategoriesUsecaseImpl<Categories, Users> {
        CategoriesUsecaseImpl::new(f.categories.clone(), f.users.clone())
    }

    fn draft(name: &str, display_order: u32) -> CategoryDraft {
        CategoryDraft {
            name: name.into(),
            display_order,
            description: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn lists_by_display_order_and_hides_inactive() {
        let f = Fixture::new().await;
        let admin = f.user("a1", UserRole::Admin, None).await;
        let uc = usecase(&f);

        uc.create(&admin, draft("Travel", 2)).await.unwrap();
        let meals = uc.create(&admin, draft(" Meals ", 1)).await.unwrap();
        uc.create(&admin, draft("Supplies", 3)).await.unwrap();
        assert_eq!(meals.name, "Meals");

        let names = |cs: Vec<Category>| cs.into_iter().map(|c| c.name).collect::<Vec<_>>();
        assert_eq!(names(uc.list().await.unwrap()), vec!["Meals", "Travel", "Supplies"]);

        uc.set_active(&admin, &meals.id, false).await.unwrap();
        assert_eq!(names(uc.list_active().await.unwrap()), vec!["Travel", "Supplies"]);
        assert_eq!(uc.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_keeps_identity() {
        let f = Fixture::new().await;
        let admin = f.user("a1", UserRole::Admin, None).await;
        let uc = usecase(&f);
        let created = uc.create(&admin, draft("Travel", 2)).await.unwrap();

        let updated = uc
            .update(
                &admin,
                &created.id,
                CategoryDraft {
                    description: Some("Trains and taxis".into()),
                    ..draft("Transport", 5)
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "Transport");
        assert_eq!(f.categories.get(&created.id).await.unwrap(), Some(updated));

        assert!(uc.update(&admin, "missing", draft("X", 1)).await.is_err());
        assert!(uc.create(&admin, draft("  ", 1)).await.is_err());
    }

    #[tokio::test]
    async fn only_admins_maintain_categories() {
        let f = Fixture::new().await;
        let user = f.user("u1", UserRole::RegionManager, Some("r1")).await;
        assert!(usecase(&f).create(&user, draft("Travel", 1)).await.is_err());
    }
}
