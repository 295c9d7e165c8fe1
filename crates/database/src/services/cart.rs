use super::error::ServiceError;
use crate::{clock::Clock, entities::shopping_cart, store::Store};
use log::debug;
use sea_orm::prelude::Uuid;

/// Operations on a student's own shopping cart
pub struct CartService;

impl CartService {
    /// Returns the student's cart, creating an empty one on first use
    pub async fn get_or_create(
        store: &dyn Store,
        clock: &dyn Clock,
        user_id: Uuid,
    ) -> Result<shopping_cart::Model, ServiceError> {
        if let Some(cart) = store.find_cart(user_id).await? {
            return Ok(cart);
        }

        debug!("Creating shopping cart for user {user_id}");
        let cart = store
            .insert_cart(shopping_cart::Model::empty(user_id, clock.now()))
            .await?;

        Ok(cart)
    }

    /// Stages a catalog course in the cart.
    ///
    /// Fails with `NotFound` for an unknown course and `Conflict` when the
    /// course is already in the cart, leaving the cart as it was.
    pub async fn add_course(
        store: &dyn Store,
        clock: &dyn Clock,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<shopping_cart::Model, ServiceError> {
        if store.find_course(course_id).await?.is_none() {
            return Err(ServiceError::not_found("Course not found"));
        }

        let mut cart = Self::get_or_create(store, clock, user_id).await?;

        if !cart.add_course(course_id, clock.now()) {
            return Err(ServiceError::conflict("Course is already in cart"));
        }

        Ok(store.save_cart(cart).await?)
    }

    /// Returns whether the course was in the cart
    pub async fn remove_course(
        store: &dyn Store,
        clock: &dyn Clock,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<bool, ServiceError> {
        let mut cart = Self::existing(store, user_id).await?;

        if !cart.remove_course(course_id, clock.now()) {
            return Ok(false);
        }

        store.save_cart(cart).await?;
        Ok(true)
    }

    pub async fn clear(
        store: &dyn Store,
        clock: &dyn Clock,
        user_id: Uuid,
    ) -> Result<shopping_cart::Model, ServiceError> {
        let mut cart = Self::existing(store, user_id).await?;
        cart.clear(clock.now());

        Ok(store.save_cart(cart).await?)
    }

    /// A student without a cart has nothing in it
    pub async fn has_course(
        store: &dyn Store,
        user_id: Uuid,
        course_id: Uuid,
    ) -> Result<bool, ServiceError> {
        Ok(store
            .find_cart(user_id)
            .await?
            .is_some_and(|cart| cart.has_course(course_id)))
    }

    async fn existing(
        store: &dyn Store,
        user_id: Uuid,
    ) -> Result<shopping_cart::Model, ServiceError> {
        store
            .find_cart(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Shopping cart not found"))
    }
}

#[cfg(test)]
mod test {
    use super::CartService;
    use crate::{
        clock::FixedClock,
        services::{
            course::{CourseDraft, CourseService},
            error::ServiceError,
        },
        store::MemoryStore,
    };
    use chrono::{TimeZone, Utc};
    use sea_orm::prelude::Uuid;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap())
    }

    async fn course(store: &MemoryStore, clock: &FixedClock, number: &str) -> Uuid {
        let draft = CourseDraft {
            prefix: "SDEV".to_string(),
            number: number.to_string(),
            name: "Course".to_string(),
            credit_hours_min: 3.0,
            ..Default::default()
        };

        CourseService::create(store, clock, draft).await.unwrap().id
    }

    #[tokio::test]
    async fn test_get_or_create_is_lazy_and_stable() {
        let store = MemoryStore::new();
        let clock = clock();
        let student = Uuid::new_v4();

        let first = CartService::get_or_create(&store, &clock, student)
            .await
            .unwrap();
        let second = CartService::get_or_create(&store, &clock, student)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert!(first.items.is_empty());
    }

    #[tokio::test]
    async fn test_add_then_check() {
        let store = MemoryStore::new();
        let clock = clock();
        let student = Uuid::new_v4();
        let sdev120 = course(&store, &clock, "120").await;

        assert!(
            !CartService::has_course(&store, student, sdev120)
                .await
                .unwrap()
        );

        let cart = CartService::add_course(&store, &clock, student, sdev120)
            .await
            .unwrap();
        assert_eq!(cart.items.len(), 1);
        assert!(
            CartService::has_course(&store, student, sdev120)
                .await
                .unwrap()
        );

        let again = CartService::add_course(&store, &clock, student, sdev120).await;
        assert!(matches!(again, Err(ServiceError::Conflict(_))));

        let cart = CartService::get_or_create(&store, &clock, student)
            .await
            .unwrap();
        assert_eq!(cart.items.len(), 1);
    }

    #[tokio::test]
    async fn test_add_unknown_course() {
        let store = MemoryStore::new();
        let clock = clock();

        let result = CartService::add_course(&store, &clock, Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let store = MemoryStore::new();
        let clock = clock();
        let student = Uuid::new_v4();
        let sdev120 = course(&store, &clock, "120").await;
        let sdev200 = course(&store, &clock, "200").await;

        // No cart yet
        assert!(matches!(
            CartService::remove_course(&store, &clock, student, sdev120).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            CartService::clear(&store, &clock, student).await,
            Err(ServiceError::NotFound(_))
        ));

        CartService::add_course(&store, &clock, student, sdev120)
            .await
            .unwrap();
        CartService::add_course(&store, &clock, student, sdev200)
            .await
            .unwrap();

        assert!(
            CartService::remove_course(&store, &clock, student, sdev120)
                .await
                .unwrap()
        );
        assert!(
            !CartService::remove_course(&store, &clock, student, sdev120)
                .await
                .unwrap()
        );

        let cart = CartService::clear(&store, &clock, student).await.unwrap();
        assert!(cart.items.is_empty());
        assert!(
            !CartService::has_course(&store, student, sdev200)
                .await
                .unwrap()
        );
    }
}
