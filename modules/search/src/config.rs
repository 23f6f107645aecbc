use std::time::Duration;

#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Search")]
pub struct SearchConfig {
    #[arg(
        id = "search-max-per-category",
        long = "search-max-per-category",
        env = "TRUSTIFY_SEARCH_MAX_PER_CATEGORY",
        default_value_t = 5,
        help = "Number of autocomplete items per category, unless requested otherwise."
    )]
    pub max_per_category: usize,

    #[arg(
        id = "search-max-limit",
        long = "search-max-limit",
        env = "TRUSTIFY_SEARCH_MAX_LIMIT",
        default_value_t = 50,
        help = "Upper bound of the number of autocomplete items per category a client may request."
    )]
    pub max_limit: usize,

    #[arg(
        id = "search-query-timeout",
        long = "search-query-timeout",
        env = "TRUSTIFY_SEARCH_QUERY_TIMEOUT",
        default_value = "500ms",
        help = "Time allowed for searching a single category."
    )]
    pub query_timeout: humantime::Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_per_category: 5,
            max_limit: 50,
            query_timeout: Duration::from_millis(500).into(),
        }
    }
}

impl SearchConfig {
    /// The effective number of items per category, at least one.
    pub fn cap(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.max_per_category)
            .min(self.max_limit)
            .max(1)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 5)]
    #[case(Some(3), 3)]
    #[case(Some(0), 1)]
    #[case(Some(1000), 50)]
    fn cap(#[case] requested: Option<usize>, #[case] expected: usize) {
        assert_eq!(SearchConfig::default().cap(requested), expected);
    }
}
