use bookshop_db::{Entity, SortKey};
use serde::{Deserialize, Serialize};

/// Persisted author record. `id` is assigned by the store on first save.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthorEntity {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub age: Option<i32>,
}

impl AuthorEntity {
    /// Copy every field present in `patch` onto `self`; absent fields keep their value.
    /// The id is never touched.
    pub fn merge(&mut self, patch: AuthorEntity) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(age) = patch.age {
            self.age = Some(age);
        }
    }
}

impl Entity for AuthorEntity {
    type Key = i64;
    const NAME: &'static str = "author";
    const SORTABLE: &'static [&'static str] = &["id", "name", "age"];

    fn key(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_key(&mut self, key: i64) {
        self.id = Some(key);
    }

    fn sort_key(&self, property: &str) -> SortKey {
        match property {
            "id" => self.id.into(),
            "name" => self.name.as_deref().into(),
            "age" => self.age.map(i64::from).into(),
            _ => SortKey::Null,
        }
    }
}

/// Author as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthorDto {
    /// Unique identifier of the author
    pub id: Option<i64>,
    /// Human-readable name
    pub name: Option<String>,
    pub age: Option<i32>,
}

impl From<AuthorEntity> for AuthorDto {
    fn from(entity: AuthorEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            age: entity.age,
        }
    }
}

impl From<AuthorDto> for AuthorEntity {
    fn from(dto: AuthorDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            age: dto.age,
        }
    }
}
