//! Expense filter builder for constructing dynamic SQL queries
//!
//! This module provides a builder pattern for constructing WHERE clauses
//! and related SQL components for expense queries. Every filter is scoped
//! to a single owner; the remaining conditions are ANDed when present.

use chrono::NaiveDate;

/// Builder for constructing expense query filters
///
/// The lifetime `'query` represents how long borrowed filter parameters
/// (the category label) must remain valid.
#[derive(Debug, Clone, Copy)]
pub struct ExpenseFilter<'query> {
    pub user_id: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<&'query str>,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword (always present: owner scoping)
    pub where_clause: String,
    /// ORDER BY clause including "ORDER BY" keyword
    pub order_clause: &'static str,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl<'query> ExpenseFilter<'query> {
    /// Create a filter matching every expense owned by `user_id`
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            start_date: None,
            end_date: None,
            category: None,
        }
    }

    /// Set inclusive lower date bound
    pub fn start_date(mut self, date: Option<NaiveDate>) -> Self {
        self.start_date = date;
        self
    }

    /// Set inclusive upper date bound
    pub fn end_date(mut self, date: Option<NaiveDate>) -> Self {
        self.end_date = date;
        self
    }

    /// Set category filter (exact match; blank means no filter)
    pub fn category(mut self, category: Option<&'query str>) -> Self {
        self.category = category;
        self
    }

    /// True when only the owner condition applies
    pub fn is_unfiltered(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.category.map_or(true, |c| c.is_empty())
    }

    /// Build the filter components
    pub fn build(self) -> FilterResult {
        let mut conditions = vec!["e.user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(self.user_id)];

        // Dates are stored as ISO text, so lexical comparison is date order
        if let Some(from) = self.start_date {
            conditions.push("e.date >= ?".to_string());
            params.push(Box::new(from.to_string()));
        }

        if let Some(to) = self.end_date {
            conditions.push("e.date <= ?".to_string());
            params.push(Box::new(to.to_string()));
        }

        if let Some(category) = self.category {
            if !category.is_empty() {
                conditions.push("e.category = ?".to_string());
                params.push(Box::new(category.to_string()));
            }
        }

        FilterResult {
            where_clause: format!("WHERE {}", conditions.join(" AND ")),
            order_clause: "ORDER BY e.id ASC",
            params,
        }
    }
}

impl FilterResult {
    /// Build a COUNT query
    pub fn build_count_query(&self) -> String {
        format!("SELECT COUNT(*) FROM expenses e {}", self.where_clause)
    }

    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
