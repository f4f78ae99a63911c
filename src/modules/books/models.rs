use bookshop_db::{Entity, SortKey};
use serde::{Deserialize, Serialize};

use crate::modules::authors::models::{AuthorDto, AuthorEntity};

/// Persisted book record, keyed by ISBN. The author is held by id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEntity {
    pub isbn: String,
    pub title: Option<String>,
    pub author_id: Option<i64>,
}

impl Entity for BookEntity {
    type Key = String;
    const NAME: &'static str = "book";
    const SORTABLE: &'static [&'static str] = &["isbn", "title"];

    fn key(&self) -> Option<&String> {
        Some(&self.isbn)
    }

    fn set_key(&mut self, key: String) {
        self.isbn = key;
    }

    fn sort_key(&self, property: &str) -> SortKey {
        match property {
            "isbn" => SortKey::Text(self.isbn.clone()),
            "title" => self.title.as_deref().into(),
            _ => SortKey::Null,
        }
    }
}

/// A book together with the author it currently references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub book: BookEntity,
    pub author: Option<AuthorEntity>,
}

/// Write-side book data as received from a client.
///
/// `author` names an existing author; its `name`/`age`, when given, must agree
/// with the stored author.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookDraft {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<AuthorEntity>,
}

/// Book as exposed by the API, with the author embedded in full.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookDto {
    /// Natural identifier
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<AuthorDto>,
}

impl From<BookRecord> for BookDto {
    fn from(record: BookRecord) -> Self {
        Self {
            isbn: Some(record.book.isbn),
            title: record.book.title,
            author: record.author.map(AuthorDto::from),
        }
    }
}

impl From<BookDto> for BookDraft {
    fn from(dto: BookDto) -> Self {
        Self {
            isbn: dto.isbn,
            title: dto.title,
            author: dto.author.map(AuthorEntity::from),
        }
    }
}
