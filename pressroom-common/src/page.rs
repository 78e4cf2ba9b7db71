use serde::{Deserialize, Serialize};

/// A 1-based page number. Zero is accepted and simply selects nothing.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageNumber(u32);

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(1);

    #[must_use]
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Which slice of a listing to fetch.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct PageRequest {
    pub number: PageNumber,
    pub size: u32,
}

impl PageRequest {
    #[must_use]
    pub fn new(number: PageNumber, size: u32) -> Self {
        Self { number, size }
    }

    /// Rows to skip, or `None` when the page cannot contain anything.
    #[must_use]
    pub fn offset(self) -> Option<u64> {
        let index = self.number.get().checked_sub(1)?;
        (self.size > 0).then(|| u64::from(index) * u64::from(self.size))
    }

    /// How many rows to ask the store for: one more than fits, to learn whether a next page exists.
    #[must_use]
    pub fn probe_limit(self) -> u64 {
        u64::from(self.size) + 1
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: PageNumber,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// A page with no items. Anything past the first page can still link back.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            page: request.number,
            has_previous: request.number > PageNumber::FIRST,
            has_next: false,
        }
    }

    /// Builds a page from up to [`PageRequest::probe_limit`] rows.
    #[must_use]
    pub fn from_probe(request: PageRequest, mut rows: Vec<T>) -> Self {
        if rows.is_empty() {
            return Self::empty(request);
        }

        let size = usize::try_from(request.size).unwrap_or(usize::MAX);
        let has_next = rows.len() > size;
        rows.truncate(size);

        Self {
            items: rows,
            page: request.number,
            has_previous: request.number > PageNumber::FIRST,
            has_next,
        }
    }
}
