mod date_filter;

pub use date_filter::DateFilter;

pub trait QueryFilter {
    fn as_query_pairs(&self) -> Vec<(&'static str, String)>;
}
