//! Seed the catalog with sample categories and books.
//!
//! Intended for local development. Seeding is idempotent: categories are
//! keyed by name and books by ISBN, so re-running the command inserts
//! nothing new.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use tracing::info;

use bookstore_core::CategoryId;

struct SeedBook {
    title: &'static str,
    author: &'static str,
    isbn: &'static str,
    category: &'static str,
    price: &'static str,
    stock: i32,
    publisher: &'static str,
    publish_date: Option<NaiveDate>,
}

const CATEGORIES: &[(&str, &str)] = &[
    ("Fiction", "Novels and short stories"),
    ("Science Fiction", "Speculative and futuristic fiction"),
    ("Programming", "Software development and computer science"),
    ("History", "Historical non-fiction"),
];

fn sample_books() -> Vec<SeedBook> {
    vec![
        SeedBook {
            title: "Dune",
            author: "Frank Herbert",
            isbn: "9780441172719",
            category: "Science Fiction",
            price: "19.99",
            stock: 12,
            publisher: "Ace",
            publish_date: NaiveDate::from_ymd_opt(1965, 8, 1),
        },
        SeedBook {
            title: "The Left Hand of Darkness",
            author: "Ursula K. Le Guin",
            isbn: "9780441478125",
            category: "Science Fiction",
            price: "15.99",
            stock: 8,
            publisher: "Ace",
            publish_date: NaiveDate::from_ymd_opt(1969, 3, 1),
        },
        SeedBook {
            title: "The Rust Programming Language",
            author: "Steve Klabnik",
            isbn: "9781718503106",
            category: "Programming",
            price: "49.99",
            stock: 20,
            publisher: "No Starch Press",
            publish_date: NaiveDate::from_ymd_opt(2023, 2, 28),
        },
        SeedBook {
            title: "Designing Data-Intensive Applications",
            author: "Martin Kleppmann",
            isbn: "9781449373320",
            category: "Programming",
            price: "59.99",
            stock: 5,
            publisher: "O'Reilly",
            publish_date: NaiveDate::from_ymd_opt(2017, 3, 16),
        },
        SeedBook {
            title: "The Remains of the Day",
            author: "Kazuo Ishiguro",
            isbn: "9780679731726",
            category: "Fiction",
            price: "16.00",
            stock: 7,
            publisher: "Vintage",
            publish_date: NaiveDate::from_ymd_opt(1989, 5, 1),
        },
        SeedBook {
            title: "SPQR: A History of Ancient Rome",
            author: "Mary Beard",
            isbn: "9781631492228",
            category: "History",
            price: "18.95",
            stock: 0,
            publisher: "Liveright",
            publish_date: NaiveDate::from_ymd_opt(2015, 11, 9),
        },
    ]
}

/// Seed sample data into the catalog.
///
/// # Errors
///
/// Returns an error if the environment variable is missing, the database
/// is unreachable, or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("BOOKSTORE_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("BOOKSTORE_DATABASE_URL"))?;

    info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let mut inserted_categories = 0u32;
    for (name, description) in CATEGORIES {
        let result = sqlx::query(
            "INSERT INTO categories (name, description)
             VALUES ($1, $2)
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(description)
        .execute(&pool)
        .await?;
        inserted_categories += u32::try_from(result.rows_affected()).unwrap_or(0);
    }

    let mut inserted_books = 0u32;
    for book in sample_books() {
        let category_id = category_id_by_name(&pool, book.category).await?;
        let price: Decimal = book
            .price
            .parse()
            .map_err(|_| SeedError::InvalidPrice(book.isbn))?;

        let result = sqlx::query(
            "INSERT INTO books (title, author, isbn, category_id, price, stock, publisher, publish_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (isbn) DO NOTHING",
        )
        .bind(book.title)
        .bind(book.author)
        .bind(book.isbn)
        .bind(category_id)
        .bind(price)
        .bind(book.stock)
        .bind(book.publisher)
        .bind(book.publish_date)
        .execute(&pool)
        .await?;
        inserted_books += u32::try_from(result.rows_affected()).unwrap_or(0);
    }

    info!(
        categories = inserted_categories,
        books = inserted_books,
        "Seeding complete!"
    );
    Ok(())
}

async fn category_id_by_name(pool: &PgPool, name: &str) -> Result<CategoryId, SeedError> {
    sqlx::query_scalar::<_, CategoryId>("SELECT id FROM categories WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?
        .ok_or(SeedError::UnknownCategory(name.to_owned()))
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid price for book {0}")]
    InvalidPrice(&'static str),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}
