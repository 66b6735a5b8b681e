use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PrimaryKeyTrait, Select,
};
use std::future::Future;
use std::pin::Pin;

/// A generic repository over a sea-orm entity `E`, parameterised by a
/// `Filter` type `F` each aggregate defines to express its own query knobs.
/// `apply_filter` builds its `Select<E>` directly with `ColumnTrait`
/// comparisons; the teacher's version routed the same comparisons through a
/// separate `ApplyComparison` trait that had no live implementations, so
/// that indirection is not carried forward.
pub trait Repository<E, F>: Send + Sync
where
    E: EntityTrait,
    E::Model: Sync + Send + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    F: Send + Sync + 'static,
    E::Model: sea_orm::IntoActiveModel<E::ActiveModel>,
{
    fn db(&self) -> &DatabaseConnection;

    fn apply_filter(query: Select<E>, filter: &F) -> Select<E>;

    fn apply_sorting(query: Select<E>, sort_by: Option<String>) -> Select<E> {
        query
    }

    fn create(
        &self,
        active_model: E::ActiveModel,
    ) -> Pin<Box<dyn Future<Output = Result<E::Model, DbErr>> + Send>> {
        let db = self.db().clone();
        Box::pin(async move { active_model.insert(&db).await.map_err(DbErr::from) })
    }

    fn update(
        &self,
        active_model: E::ActiveModel,
    ) -> Pin<Box<dyn Future<Output = Result<E::Model, DbErr>> + Send>> {
        let db = self.db().clone();
        Box::pin(async move { active_model.update(&db).await.map_err(DbErr::from) })
    }

    fn delete(
        &self,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Pin<Box<dyn Future<Output = Result<(), DbErr>> + Send>> {
        let db = self.db().clone();
        Box::pin(async move {
            E::delete_by_id(id).exec(&db).await.map_err(DbErr::from)?;
            Ok(())
        })
    }

    fn find_by_id(
        &self,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Pin<Box<dyn Future<Output = Result<Option<E::Model>, DbErr>> + Send>> {
        let db = self.db().clone();
        Box::pin(async move { E::find_by_id(id).one(&db).await.map_err(DbErr::from) })
    }

    fn find_one(
        &self,
        filter_params: F,
    ) -> Pin<Box<dyn Future<Output = Result<Option<E::Model>, DbErr>> + Send>> {
        let db = self.db().clone();
        Box::pin(async move {
            Self::apply_filter(E::find(), &filter_params)
                .one(&db)
                .await
                .map_err(DbErr::from)
        })
    }

    fn find_all(
        &self,
        filter_params: F,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<E::Model>, DbErr>> + Send>> {
        let db = self.db().clone();
        Box::pin(async move {
            Self::apply_filter(E::find(), &filter_params)
                .all(&db)
                .await
                .map_err(DbErr::from)
        })
    }

    fn count(
        &self,
        filter_params: F,
    ) -> Pin<Box<dyn Future<Output = Result<u64, DbErr>> + Send>> {
        let db = self.db().clone();
        Box::pin(async move {
            let query = Self::apply_filter(E::find(), &filter_params);
            <Select<E> as sea_orm::PaginatorTrait<'_, _>>::count(query, &db)
                .await
                .map_err(DbErr::from)
        })
    }
}
