//! WHERE-clause builder shared by the list queries
//!
//! Collects conditions and their boxed parameters so each domain's list
//! function can add only the filters the caller supplied.

use rusqlite::ToSql;

#[derive(Default)]
pub(crate) struct WhereBuilder {
    conditions: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `condition` (with one `?` placeholder) when `value` is present
    pub fn push<T: ToSql + 'static>(&mut self, condition: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.conditions.push(condition.to_string());
            self.params.push(Box::new(value));
        }
        self
    }

    /// Add a condition that takes no parameter
    pub fn push_raw(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_string());
        self
    }

    /// Append a trailing parameter (LIMIT / OFFSET) after the WHERE params
    pub fn bind<T: ToSql + 'static>(&mut self, value: T) -> &mut Self {
        self.params.push(Box::new(value));
        self
    }

    /// The WHERE clause including the keyword, or empty
    pub fn clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn params(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_has_no_clause() {
        let builder = WhereBuilder::new();
        assert_eq!(builder.clause(), "");
        assert!(builder.params().is_empty());
    }

    #[test]
    fn test_only_present_values_are_added() {
        let mut builder = WhereBuilder::new();
        builder
            .push("category = ?", Some("food".to_string()))
            .push("date >= ?", None::<String>)
            .push_raw("sent = 0");
        assert_eq!(builder.clause(), "WHERE category = ? AND sent = 0");
        assert_eq!(builder.params().len(), 1);
    }
}
