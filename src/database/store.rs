use sqlx::PgPool;
use thiserror::Error;

use crate::config::ConfigError;
use crate::database::models::{Book, NewBook, NewPerson, Person};

/// Errors from the store. Storage failures are surfaced as-is rather than
/// folded into a closed taxonomy; callers that care about a class of failure
/// inspect the underlying message or constraint name.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid database configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    /// True when the underlying failure is a unique-constraint violation
    /// (SQLSTATE 23505): a taken email or call number.
    pub fn is_unique_violation(&self) -> bool {
        self.database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == "23505")
    }

    /// Name of the violated constraint, when the database reported one.
    pub fn constraint(&self) -> Option<&str> {
        self.database_error().and_then(|db| db.constraint())
    }

    fn database_error(&self) -> Option<&(dyn sqlx::error::DatabaseError + 'static)> {
        match self {
            StoreError::Sqlx(err) => err.as_database_error(),
            StoreError::Config(_) => None,
        }
    }
}

/// Typed CRUD and relationship loading over the connection pool, independent of
/// HTTP concerns. Cloned into the router state; rows live only for the duration
/// of one request cycle.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connectivity probe for the health endpoint.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// All live people. The `Books` relationship is left unresolved here; fetch
    /// a single person to have it populated.
    pub async fn list_people(&self) -> Result<Vec<Person>, StoreError> {
        let people = sqlx::query_as::<_, Person>(
            "SELECT id, name, email, created_at, updated_at, deleted_at
             FROM people
             WHERE deleted_at IS NULL",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(people)
    }

    /// A single live person with their books resolved. `None` when the id does
    /// not belong to a live row.
    pub async fn get_person(&self, id: i32) -> Result<Option<Person>, StoreError> {
        let person = sqlx::query_as::<_, Person>(
            "SELECT id, name, email, created_at, updated_at, deleted_at
             FROM people
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match person {
            Some(mut person) => {
                person.books = self.list_books_by_person(person.id).await?;
                Ok(Some(person))
            }
            None => Ok(None),
        }
    }

    pub async fn create_person(&self, new: &NewPerson) -> Result<Person, StoreError> {
        let person = sqlx::query_as::<_, Person>(
            "INSERT INTO people (name, email)
             VALUES ($1, $2)
             RETURNING id, name, email, created_at, updated_at, deleted_at",
        )
        .bind(&new.name)
        .bind(&new.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(person)
    }

    /// Soft-delete in a single statement; the returned row carries the
    /// deletion stamp. `None` when no live row matched, so deleting a missing
    /// person is not a storage failure.
    pub async fn delete_person(&self, id: i32) -> Result<Option<Person>, StoreError> {
        let person = sqlx::query_as::<_, Person>(
            "UPDATE people
             SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id, name, email, created_at, updated_at, deleted_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }

    /// All live books, in storage order.
    pub async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, call_number, person_id, created_at, updated_at, deleted_at
             FROM books
             WHERE deleted_at IS NULL",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    pub async fn get_book(&self, id: i32) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, call_number, person_id, created_at, updated_at, deleted_at
             FROM books
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    pub async fn create_book(&self, new: &NewBook) -> Result<Book, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, author, call_number, person_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, title, author, call_number, person_id, created_at, updated_at, deleted_at",
        )
        .bind(&new.title)
        .bind(&new.author)
        .bind(new.call_number)
        .bind(new.person_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    /// Book analogue of [`Store::delete_person`].
    pub async fn delete_book(&self, id: i32) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(
            "UPDATE books
             SET deleted_at = now(), updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id, title, author, call_number, person_id, created_at, updated_at, deleted_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Relationship loader: live books whose `person_id` matches, in storage
    /// order.
    pub async fn list_books_by_person(&self, person_id: i32) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, call_number, person_id, created_at, updated_at, deleted_at
             FROM books
             WHERE person_id = $1 AND deleted_at IS NULL",
        )
        .bind(person_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }
}
