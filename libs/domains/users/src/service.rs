//! User Service - Business logic layer

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use document_store::bson::{doc, oid::ObjectId};
use document_store::{
    DocumentStore, FindQuery, FindResult, PaginationParams, SortKey, StoreError, find, find_first,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, Role, User, UserResponse};

pub const COLLECTION: &str = "users";

/// `orderBy` values users accept
pub const SORT_KEYS: &[SortKey] = &[SortKey::Id];

pub struct UserService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for UserService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore + ?Sized> UserService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Make the store reject a second user with the same e-mail. Run once at
    /// startup; `create` relies on it when two registrations race.
    #[instrument(skip(self))]
    pub async fn ensure_indexes(&self) -> UserResult<()> {
        self.store.ensure_unique(COLLECTION, "email").await?;
        Ok(())
    }

    /// Register a user with the `user` role. The e-mail is stored lowercased
    /// and must not belong to any user, deleted ones included.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateUser) -> UserResult<ObjectId> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let email = input.email.trim().to_lowercase();
        if self
            .store
            .find_one_by_field(COLLECTION, "email", email.as_str().into())
            .await?
            .is_some()
        {
            warn!(%email, "Email already registered");
            return Err(UserError::EmailTaken(email));
        }

        let password_hash = hash_password(&input.password)?;
        let id = self
            .store
            .insert(
                COLLECTION,
                doc! {
                    "email": email.as_str(),
                    "passwordHash": password_hash,
                    "firstName": input.first_name,
                    "lastName": input.last_name,
                    "role": Role::User.as_str(),
                },
            )
            .await
            .map_err(|e| match e {
                StoreError::Duplicate { .. } => {
                    warn!(%email, "Email registered concurrently");
                    UserError::EmailTaken(email.clone())
                }
                other => other.into(),
            })?;

        info!(%id, %email, "Created user");
        Ok(id)
    }

    /// Soft delete; repeating it is not an error
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ObjectId) -> UserResult<()> {
        if self.store.get_by_id(COLLECTION, id).await?.is_none() {
            return Err(UserError::NotFound(id));
        }

        self.store.soft_delete_by_id(COLLECTION, id).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ObjectId) -> UserResult<UserResponse> {
        find_first::<_, User>(self.store.as_ref(), COLLECTION, &FindQuery::by_id(id))
            .await?
            .map(UserResponse::from)
            .ok_or(UserError::NotFound(id))
    }

    /// `search` matches the e-mail address
    #[instrument(skip(self))]
    pub async fn find(&self, params: &PaginationParams) -> UserResult<FindResult<UserResponse>> {
        let query = FindQuery::from_params(params, SORT_KEYS).search_on("email");
        let users: FindResult<User> = find(self.store.as_ref(), COLLECTION, &query).await?;
        Ok(users.map(UserResponse::from))
    }
}

/// Argon2id with a random salt, as a PHC string
fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use document_store::{InMemoryDocumentStore, MockDocumentStore};

    fn fixture() -> (UserService<InMemoryDocumentStore>, Arc<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        (UserService::new(Arc::clone(&store)), store)
    }

    fn signup(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password: "margherita".to_string(),
            confirm_password: "margherita".to_string(),
            first_name: "Mario".to_string(),
            last_name: "Rossi".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let (service, store) = fixture();
        let id = service.create(signup("Mario@Example.com")).await.unwrap();

        let raw = store.get_by_id(COLLECTION, id).await.unwrap().unwrap();
        let hash = raw.get_str("passwordHash").unwrap();
        assert_ne!(hash, "margherita");
        assert!(hash.starts_with("$argon2id$"));
        let parsed = PasswordHash::new(hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"margherita", &parsed)
                .is_ok()
        );

        let user = service.get(id).await.unwrap();
        assert_eq!(user.email, "mario@example.com");
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn test_salts_differ() {
        let first = hash_password("quattro-formaggi").unwrap();
        let second = hash_password("quattro-formaggi").unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_response_has_no_hash() {
        let (service, _) = fixture();
        let id = service.create(signup("luigi@example.com")).await.unwrap();

        let json = serde_json::to_value(service.get(id).await.unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "_id": id.to_hex(),
                "email": "luigi@example.com",
                "firstName": "Mario",
                "lastName": "Rossi",
                "role": "user"
            })
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_even_after_delete() {
        let (service, _) = fixture();
        let id = service.create(signup("anna@example.com")).await.unwrap();

        let again = service.create(signup("ANNA@example.com")).await;
        assert!(matches!(again, Err(UserError::EmailTaken(email)) if email == "anna@example.com"));

        service.delete(id).await.unwrap();
        assert!(matches!(
            service.create(signup("anna@example.com")).await,
            Err(UserError::EmailTaken(_))
        ));
    }

    #[tokio::test]
    async fn test_password_confirmation_must_match() {
        let (service, _) = fixture();
        let result = service
            .create(CreateUser {
                confirm_password: "marinara".into(),
                ..signup("paolo@example.com")
            })
            .await;
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_find_searches_email() {
        let (service, _) = fixture();
        service.create(signup("giulia@pizzeria.it")).await.unwrap();
        service.create(signup("marco@trattoria.it")).await.unwrap();

        let found = service
            .find(&PaginationParams {
                search: "PIZZERIA".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.count, 1);
        assert_eq!(found.items[0].email, "giulia@pizzeria.it");
    }

    #[tokio::test]
    async fn test_deleted_user_is_hidden() {
        let (service, _) = fixture();
        let id = service.create(signup("sara@example.com")).await.unwrap();
        service.delete(id).await.unwrap();

        assert!(matches!(service.get(id).await, Err(UserError::NotFound(_))));
        assert!(matches!(
            service.delete(ObjectId::new()).await,
            Err(UserError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_failure_propagates() {
        let mut store = MockDocumentStore::new();
        store.expect_find_one_by_field().returning(|_, _, _| Ok(None));
        store.expect_insert().returning(|collection, _| {
            Err(StoreError::Persistence {
                operation: "insert",
                collection: collection.to_string(),
                reason: "not acknowledged".into(),
            })
        });

        let service = UserService::new(Arc::new(store));
        let result = service.create(signup("fail@example.com")).await;
        assert!(matches!(
            result,
            Err(UserError::Store(StoreError::Persistence { .. }))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_registration_loses_with_conflict() {
        let mut store = MockDocumentStore::new();
        // the lookup misses because the other registration has not landed yet
        store.expect_find_one_by_field().returning(|_, _, _| Ok(None));
        store.expect_insert().returning(|collection, _| {
            Err(StoreError::Duplicate {
                collection: collection.to_string(),
                reason: "E11000 duplicate key".into(),
            })
        });

        let service = UserService::new(Arc::new(store));
        let result = service.create(signup("Rita@Example.com")).await;
        assert!(matches!(result, Err(UserError::EmailTaken(email)) if email == "rita@example.com"));
    }

    #[tokio::test]
    async fn test_ensure_indexes_makes_email_unique_in_store() {
        let (service, store) = fixture();
        service.ensure_indexes().await.unwrap();
        service.create(signup("elena@example.com")).await.unwrap();

        let bypass = store
            .insert(COLLECTION, doc! { "email": "elena@example.com" })
            .await;
        assert!(matches!(bypass, Err(StoreError::Duplicate { .. })));
    }
}
