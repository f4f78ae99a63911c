//! Request-shaping helpers shared by the resource endpoints.

use bookshop_db::{Direction, PageRequest, Sort};
use bookshop_kernel::settings::PaginationSettings;
use serde::Deserialize;

use crate::error::{CatalogError, CatalogResult};

/// `?page=&size=&sort=property[,asc|desc]` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub sort: Option<String>,
}

impl PageQuery {
    /// Resolve against configured limits. Sizes below one fall back to the
    /// default; sizes above the maximum are clamped.
    pub fn into_page_request(self, limits: &PaginationSettings) -> CatalogResult<PageRequest> {
        let size = match self.size {
            Some(size) if size >= 1 => size.min(limits.max_page_size),
            _ => limits.default_page_size,
        };

        let request = PageRequest::new(self.page.unwrap_or(0), size);
        match self.sort.as_deref().map(str::trim) {
            None | Some("") => Ok(request),
            Some(expression) => Ok(request.with_sort(parse_sort(expression)?)),
        }
    }
}

fn parse_sort(expression: &str) -> CatalogResult<Sort> {
    let mut parts = expression.split(',').map(str::trim);
    let property = parts.next().unwrap_or_default();
    if property.is_empty() {
        return Err(CatalogError::InvalidPageRequest(format!(
            "sort '{expression}' names no property"
        )));
    }

    let direction = match parts.next() {
        None => Direction::Asc,
        Some(dir) if dir.eq_ignore_ascii_case("asc") => Direction::Asc,
        Some(dir) if dir.eq_ignore_ascii_case("desc") => Direction::Desc,
        Some(other) => {
            return Err(CatalogError::InvalidPageRequest(format!(
                "unknown sort direction '{other}'"
            )))
        }
    };

    if parts.next().is_some() {
        return Err(CatalogError::InvalidPageRequest(format!(
            "sort '{expression}' has too many parts"
        )));
    }

    Ok(Sort {
        property: property.to_string(),
        direction,
    })
}
