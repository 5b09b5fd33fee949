//! Query parameters accepted by list, search, and production operations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Largest page the search endpoint accepts.
pub const MAX_SEARCH_SIZE: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// `field:direction` pairs joined by commas, e.g. `serial:asc,id:desc`.
pub(crate) fn sort_param(sort: &[Sort]) -> String {
    sort.iter()
        .map(|s| format!("{}:{}", s.field, s.direction.as_str()))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub from: u32,
    pub size: u32,
    pub sort: Vec<Sort>,
    pub ids: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermitListQuery {
    pub list: ListQuery,
    pub aggregate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryListQuery {
    pub from: u32,
    pub size: u32,
    pub sort: Vec<Sort>,
    pub update_ids: Vec<String>,
    pub model_type: String,
}

/// Full-text well search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub filters: Vec<String>,
    pub from: u32,
    pub size: u32,
    pub sort: Vec<Sort>,
}

impl SearchQuery {
    pub(crate) fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        if !self.sort.is_empty() {
            pairs.append_pair("sort", &sort_param(&self.sort));
        }
        if !self.filters.is_empty() {
            pairs.append_pair("filters", &self.filters.join(","));
        }
        if !self.query.is_empty() {
            pairs.append_pair("query", &self.query);
        }
        pairs.append_pair("from", &self.from.to_string());
        pairs.append_pair("size", &self.size.to_string());
    }
}

/// Paging and date window for meter reading lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingQuery {
    pub from: u32,
    pub size: u32,
    pub sort: Vec<Sort>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Date window for production totals. Dates are sent as `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductionQuery {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub estimate_bounds: bool,
}

impl ProductionQuery {
    pub(crate) fn apply(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        if let Some(from) = self.from_date {
            pairs.append_pair("fromDate", &from.format("%Y-%m-%d").to_string());
        }
        if let Some(to) = self.to_date {
            pairs.append_pair("toDate", &to.format("%Y-%m-%d").to_string());
        }
        pairs.append_pair("estimateBounds", &self.estimate_bounds.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_param_joins_pairs() {
        let sort = vec![Sort::asc("serial"), Sort::desc("id")];
        assert_eq!(sort_param(&sort), "serial:asc,id:desc");
    }

    #[test]
    fn search_query_omits_empty_parts() {
        let mut url = Url::parse("http://localhost/wells/search.json").unwrap();
        SearchQuery {
            size: 25,
            ..SearchQuery::default()
        }
        .apply(&mut url);
        assert_eq!(url.query(), Some("from=0&size=25"));
    }

    #[test]
    fn search_query_encodes_every_part() {
        let mut url = Url::parse("http://localhost/wells/search.json").unwrap();
        SearchQuery {
            query: "north field".to_string(),
            filters: vec!["active".to_string(), "county:ellis".to_string()],
            from: 10,
            size: 5,
            sort: vec![Sort::asc("serial")],
        }
        .apply(&mut url);
        assert_eq!(
            url.query(),
            Some("sort=serial%3Aasc&filters=active%2Ccounty%3Aellis&query=north+field&from=10&size=5")
        );
    }

    #[test]
    fn production_query_formats_dates() {
        let mut url = Url::parse("http://localhost/wells/1/production.json").unwrap();
        ProductionQuery {
            from_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            to_date: NaiveDate::from_ymd_opt(2024, 12, 31),
            estimate_bounds: true,
        }
        .apply(&mut url);
        assert_eq!(
            url.query(),
            Some("fromDate=2024-01-01&toDate=2024-12-31&estimateBounds=true")
        );
    }
}
