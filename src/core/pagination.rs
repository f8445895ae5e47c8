//! Page requests and page results shared by every entity store.

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Sort direction for a paged query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

/// Sort key. The column always comes from a store's whitelist, never from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub direction: Direction,
}

/// A zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn of(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: None,
        }
    }

    pub fn with_sort(mut self, column: &'static str, direction: Direction) -> Self {
        self.sort = Some(Sort { column, direction });
        self
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }

    /// `ORDER BY` clause for the request, falling back to `default_column`
    pub fn order_by(&self, default_column: &'static str) -> String {
        match self.sort {
            Some(sort) => format!("ORDER BY {} {}, id ASC", sort.column, sort.direction.as_sql()),
            None => format!("ORDER BY {} ASC, id ASC", default_column),
        }
    }
}

/// Limits applied to client-supplied page sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: 12,
            max_size: 100,
        }
    }
}

/// Paging query string (`?page=&size=&sort=&direction=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl PageParams {
    /// Build a [`PageRequest`], clamping the size and checking the sort key
    /// against the columns the store allows.
    pub fn into_request(
        &self,
        limits: &PageLimits,
        sortable: &[&'static str],
    ) -> Result<PageRequest, ValidationError> {
        let mut errors = ValidationError::new();

        let size = self
            .size
            .unwrap_or(limits.default_size)
            .clamp(1, limits.max_size.max(1));
        let mut request = PageRequest::of(self.page.unwrap_or(0), size);

        let direction = match self.direction.as_deref() {
            Some(raw) => raw.parse::<Direction>().unwrap_or_else(|msg| {
                errors.add("direction", msg);
                Direction::Asc
            }),
            None => Direction::Asc,
        };

        if let Some(raw) = self.sort.as_deref() {
            match sortable
                .iter()
                .copied()
                .find(|column| column.eq_ignore_ascii_case(raw))
            {
                Some(column) => request = request.with_sort(column, direction),
                None => errors.add(
                    "sort",
                    format!("Cannot sort by '{}'; allowed: {}", raw, sortable.join(", ")),
                ),
            }
        }

        errors.into_result()?;
        Ok(request)
    }
}

/// One page of results plus the metadata needed to navigate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let page_size = request.size.max(1);
        let total_pages = total_elements.div_ceil(u64::from(page_size));
        let page_number = request.page;

        Self {
            number_of_elements: content.len(),
            content,
            total_elements,
            total_pages,
            page_number,
            page_size,
            first: page_number == 0,
            last: u64::from(page_number) + 1 >= total_pages,
        }
    }

    /// Map every item, keeping the page metadata untouched
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            page_number: self.page_number,
            page_size: self.page_size,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
        }
    }
}
