use crate::domain::QueryFilter;

#[derive(Debug, Clone)]
pub struct ApiURL(String);

impl AsRef<str> for ApiURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ApiURL {
    pub fn new(base_url: &str) -> Self {
        Self(base_url.trim_end_matches('/').to_string())
    }

    /// Append the given path to the URL.
    ///
    /// The backend routes all end in a slash, so one is added when missing.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_matches('/');
        Self(format!("{}/{}/", trimmed_url, trimmed_path))
    }

    pub fn with_filter(&self, filter: &impl QueryFilter) -> Self {
        let query = filter
            .as_query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() {
            return self.clone();
        }

        if self.0.contains('?') {
            Self(format!("{}&{}", self.0, query))
        } else {
            Self(format!("{}?{}", self.0, query))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DateFilter;
    use time::macros::date;

    #[test]
    fn append_path_normalizes_slashes() {
        let url = ApiURL::new("http://localhost:8000/api/").append_path("/timesheets/my-timesheets");
        assert_eq!(
            url.as_ref(),
            "http://localhost:8000/api/timesheets/my-timesheets/"
        );
    }

    #[test]
    fn with_filter_adds_date_range() {
        let filter = DateFilter::new(date!(2024 - 01 - 15), date!(2024 - 01 - 21));
        let url = ApiURL::new("http://localhost:8000/api")
            .append_path("timesheets/my-timesheets")
            .with_filter(&filter);
        assert_eq!(
            url.as_ref(),
            "http://localhost:8000/api/timesheets/my-timesheets/?date_from=2024-01-15&date_to=2024-01-21"
        );
    }
}
