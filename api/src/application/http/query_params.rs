use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Filter operator for query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,  // equals (default)
    Gt,  // greater than
    Gte, // greater than or equal
    Lt,  // less than
    Lte, // less than or equal
}

impl FromStr for FilterOperator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(FilterOperator::Eq),
            "gt" => Ok(FilterOperator::Gt),
            "gte" => Ok(FilterOperator::Gte),
            "lt" => Ok(FilterOperator::Lt),
            "lte" => Ok(FilterOperator::Lte),
            _ => Err(()),
        }
    }
}

/// Filter condition for a single field
#[derive(Debug, Clone)]
pub struct FilterCondition {
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl FilterCondition {
    /// Value as a UTC timestamp. Accepts RFC 3339 and naive ISO 8601 (read as UTC).
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        parse_datetime_utc(&self.value)
    }
}

pub fn parse_datetime_utc(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|dt| dt.and_utc())
}

/// Parsed filter parameters
#[derive(Debug, Clone, Default)]
pub struct FilterParams {
    pub conditions: Vec<FilterCondition>,
}

impl FilterParams {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sort specification for a single field
#[derive(Debug, Clone)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Parsed sort parameters
#[derive(Debug, Clone, Default)]
pub struct SortParams {
    pub sorts: Vec<SortSpec>,
}

impl SortParams {
    pub fn new() -> Self {
        Self { sorts: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.sorts.is_empty()
    }

    /// Parse sort string like "field1,-field2,field3"
    pub fn from_string(s: &str) -> Self {
        let mut sorts = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some(stripped) = part.strip_prefix('-') {
                sorts.push(SortSpec {
                    field: stripped.to_string(),
                    direction: SortDirection::Desc,
                });
            } else {
                sorts.push(SortSpec {
                    field: part.to_string(),
                    direction: SortDirection::Asc,
                });
            }
        }
        Self { sorts }
    }

    /// Back to the "field1,-field2" form the repositories read, keeping only
    /// `allowed` fields. `None` when nothing is left.
    pub fn to_sort_string(&self, allowed: &[&str]) -> Option<String> {
        let parts: Vec<String> = self
            .sorts
            .iter()
            .filter(|s| allowed.contains(&s.field.as_str()))
            .map(|s| match s.direction {
                SortDirection::Desc => format!("-{}", s.field),
                SortDirection::Asc => s.field.clone(),
            })
            .collect();

        (!parts.is_empty()).then(|| parts.join(","))
    }
}

/// Pagination parameters
#[derive(Debug, Clone, Default)]
pub struct PaginationParams {
    pub offset: i64,
    pub limit: i64,
}

impl PaginationParams {
    pub fn new(offset: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            offset: offset.unwrap_or(0).max(0),
            limit: limit.unwrap_or(20).clamp(1, 100), // Default 20, max 100
        }
    }
}

/// Combined query parameters (filter, sort, pagination)
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub filter: FilterParams,
    pub sort: SortParams,
    pub pagination: PaginationParams,
}

impl QueryParams {
    /// Parse from query string map
    /// Handles formats like:
    /// - filter[field]=value (defaults to eq)
    /// - filter[field][operator]=value
    /// - sort=field or sort=-field
    /// - offset=0, limit=20
    pub fn from_query_map(query_map: &HashMap<String, String>) -> Self {
        let mut filter = FilterParams::new();
        let mut sort = SortParams::new();
        let mut offset: Option<i64> = None;
        let mut limit: Option<i64> = None;

        for (key, value) in query_map {
            if let Some(filter_key) = key.strip_prefix("filter[") {
                if let Some(end_bracket) = filter_key.find(']') {
                    let field = filter_key[..end_bracket].to_string();
                    let remaining = &filter_key[end_bracket + 1..];

                    if remaining.is_empty() {
                        filter.conditions.push(FilterCondition {
                            field,
                            operator: FilterOperator::Eq,
                            value: value.clone(),
                        });
                    } else if remaining.starts_with('[') && remaining.ends_with(']') {
                        let operator_str = &remaining[1..remaining.len() - 1];
                        if let Ok(operator) = operator_str.parse::<FilterOperator>() {
                            filter.conditions.push(FilterCondition {
                                field,
                                operator,
                                value: value.clone(),
                            });
                        }
                    }
                }
            } else if key == "sort" {
                sort = SortParams::from_string(value);
            } else if key == "offset" {
                if let Ok(val) = value.parse::<i64>() {
                    offset = Some(val);
                }
            } else if key == "limit"
                && let Ok(val) = value.parse::<i64>()
            {
                limit = Some(val);
            }
        }

        Self {
            filter,
            sort,
            pagination: PaginationParams::new(offset, limit),
        }
    }

    pub fn offset(&self) -> u32 {
        u32::try_from(self.pagination.offset).unwrap_or(u32::MAX)
    }

    pub fn limit(&self) -> u32 {
        // clamped to 1..=100 by PaginationParams::new
        self.pagination.limit as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(pairs: &[(&str, &str)]) -> QueryParams {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        QueryParams::from_query_map(&map)
    }

    #[test]
    fn test_filter_parse_simple() {
        let params = parse(&[("filter[overall_risk]", "Red")]);
        assert_eq!(params.filter.conditions.len(), 1);
        assert_eq!(params.filter.conditions[0].field, "overall_risk");
        assert_eq!(params.filter.conditions[0].operator, FilterOperator::Eq);
        assert_eq!(params.filter.conditions[0].value, "Red");
    }

    #[test]
    fn test_filter_parse_with_operator() {
        let params = parse(&[
            ("filter[severity][gte]", "3"),
            ("filter[severity][between]", "1"),
            ("filter[name][ilike]", "%bread%"),
        ]);
        assert_eq!(params.filter.conditions.len(), 1);
        assert_eq!(params.filter.conditions[0].field, "severity");
        assert_eq!(params.filter.conditions[0].operator, FilterOperator::Gte);
        assert_eq!(params.filter.conditions[0].value, "3");
    }

    #[test]
    fn test_sort_round_trips_allowed_fields_only() {
        let params = parse(&[("sort", "-logged_at, password ,name")]);
        assert_eq!(params.sort.sorts.len(), 3);
        assert_eq!(params.sort.sorts[0].direction, SortDirection::Desc);
        assert_eq!(
            params.sort.to_sort_string(&["logged_at", "name"]).as_deref(),
            Some("-logged_at,name")
        );
        assert_eq!(params.sort.to_sort_string(&["severity"]), None);
    }

    #[test]
    fn test_pagination_is_clamped() {
        let params = parse(&[("offset", "-4"), ("limit", "500")]);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), 100);

        let params = parse(&[]);
        assert_eq!(params.limit(), 20);
    }

    #[test]
    fn test_datetime_values() {
        let rfc = FilterCondition {
            field: "logged_at".to_string(),
            operator: FilterOperator::Gte,
            value: "2026-10-01T08:30:00+02:00".to_string(),
        };
        assert_eq!(rfc.datetime().unwrap().to_rfc3339(), "2026-10-01T06:30:00+00:00");

        assert!(parse_datetime_utc("2026-10-01T08:30:00.250").is_some());
        assert!(parse_datetime_utc("yesterday").is_none());
    }
}
