//! Typed description of a listing query.
//!
//! A [`FindQuery`] is backend-neutral: the MongoDB store turns it into an
//! aggregation pipeline, the in-memory store evaluates it directly.

use mongodb::bson::{Bson, oid::ObjectId};
use strum::{AsRefStr, EnumString};

use crate::params::PaginationParams;

/// Attribute a listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum SortKey {
    #[strum(serialize = "id")]
    Id,
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "price")]
    Price,
    /// Name of the joined category
    #[strum(serialize = "category")]
    CategoryName,
}

impl SortKey {
    /// Parse an `orderBy` value; unknown values yield `None`
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    /// Stored (possibly dotted) path the key sorts on
    pub fn field(self) -> &'static str {
        match self {
            SortKey::Id => "_id",
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::CategoryName => "category.name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub ascending: bool,
}

impl Sort {
    /// `1` or `-1`, as MongoDB expects
    pub fn direction(&self) -> i32 {
        if self.ascending { 1 } else { -1 }
    }
}

/// Page of a paginated listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub per_page: u64,
}

impl PageWindow {
    /// Clamps both values to at least 1
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn total_pages(&self, count: u64) -> u64 {
        count.div_ceil(self.per_page)
    }
}

/// Which records a listing selects
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Literal, case-insensitive substring; `None` matches everything
    pub search: Option<String>,
    pub search_field: String,
    pub include_deleted: bool,
    /// Extra equality conditions, ANDed
    pub equals: Vec<(String, Bson)>,
}

impl Filter {
    /// Non-deleted records, searching on `name`
    pub fn active() -> Self {
        Self {
            search: None,
            search_field: "name".to_string(),
            include_deleted: false,
            equals: Vec::new(),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::active()
    }
}

/// Left join of one related record, as `$lookup` + `$unwind` would do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub from: String,
    pub local_field: String,
    pub foreign_field: String,
    pub as_field: String,
}

impl JoinSpec {
    pub fn new(from: &str, local_field: &str, foreign_field: &str, as_field: &str) -> Self {
        Self {
            from: from.to_string(),
            local_field: local_field.to_string(),
            foreign_field: foreign_field.to_string(),
            as_field: as_field.to_string(),
        }
    }
}

/// Everything a backend needs to run one listing
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub window: Option<PageWindow>,
    pub join: Option<JoinSpec>,
    /// Strip `deleted` from results and from the joined record
    pub scrub_deleted: bool,
}

impl FindQuery {
    /// Every active record, unsorted and unpaged
    pub fn active() -> Self {
        Self {
            filter: Filter::active(),
            sort: None,
            window: None,
            join: None,
            scrub_deleted: true,
        }
    }

    /// The active record with this `_id`
    pub fn by_id(id: ObjectId) -> Self {
        Self::active().with_field("_id", id)
    }

    /// Translate request parameters. `order_by` values outside `sortable`
    /// are ignored, leaving the natural order.
    pub fn from_params(params: &PaginationParams, sortable: &[SortKey]) -> Self {
        let search = Some(params.search.clone()).filter(|s| !s.is_empty());

        let sort = SortKey::parse(&params.order_by)
            .filter(|key| sortable.contains(key))
            .map(|key| Sort {
                key,
                ascending: params.ascending,
            });

        let window = params
            .paginated
            .then(|| PageWindow::new(params.page, params.per_page));

        Self {
            filter: Filter {
                search,
                include_deleted: params.deleted,
                ..Filter::active()
            },
            sort,
            window,
            join: None,
            scrub_deleted: !params.deleted,
        }
    }

    pub fn join(mut self, join: JoinSpec) -> Self {
        self.join = Some(join);
        self
    }

    /// Add an equality condition
    pub fn with_field(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.filter.equals.push((field.to_string(), value.into()));
        self
    }

    /// Search on `field` instead of `name`
    pub fn search_on(mut self, field: &str) -> Self {
        self.filter.search_field = field.to_string();
        self
    }
}
