use serde::{Deserialize, Serialize};
use validator::Validate;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Identifier assigned by the catalog
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Year of publication
    pub published_date: i64,
    /// Score from 0 to 5
    pub rating: i64,
}

impl Book {
    pub fn new(
        id: i64,
        title: &str,
        author: &str,
        description: &str,
        published_date: i64,
        rating: i64,
    ) -> Self {
        Self {
            id,
            title: title.to_string(),
            author: author.to_string(),
            description: description.to_string(),
            published_date,
            rating,
        }
    }
}

/// Request body for creating or replacing a book.
///
/// `id` is ignored on create and selects the target on update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[validate(length(min = 3))]
    pub title: String,
    #[validate(length(min = 1))]
    pub author: String,
    #[validate(length(min = 1, max = 100))]
    pub description: String,
    #[validate(range(min = 2000, max = 2030))]
    pub published_date: i64,
    #[validate(range(min = 0, max = 5))]
    pub rating: i64,
}

impl BookRequest {
    /// Build the stored record under the given id.
    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            description: self.description,
            published_date: self.published_date,
            rating: self.rating,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BookIdPath {
    #[validate(range(min = 1))]
    pub book_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RatingQuery {
    #[validate(range(min = 0, max = 5))]
    pub book_rating: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PublishedDateQuery {
    #[validate(range(min = 2000, max = 2030))]
    pub published_date: i64,
}

/// Records the catalog starts with.
pub fn seed_books() -> Vec<Book> {
    vec![
        Book::new(1, "Computer Science Pro", "codingwithroby", "A very nice book!", 2009, 5),
        Book::new(2, "Be Fast with FastAPI", "codingwithroby", "A great book!", 2009, 5),
        Book::new(3, "Master Endpoints", "codingwithroby", "An awesome book!", 2008, 5),
        Book::new(4, "HP1", "Author 1", "Book Description", 2008, 2),
        Book::new(5, "Hp2", "Author 2", "Book Description", 2010, 3),
        Book::new(6, "HP3", "Author 3", "Book Description", 2010, 1),
    ]
}
