use std::num::NonZeroUsize;
use std::time::Duration;

fn parse_concurrency(s: &str) -> Result<NonZeroUsize, String> {
    let value: usize = s.parse().map_err(|e| format!("Invalid number: {e}"))?;
    NonZeroUsize::new(value).ok_or_else(|| "Concurrency must be greater than zero".to_string())
}

const DEFAULT_CONCURRENCY: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(val) => val,
    None => panic!("Default concurrency must be non-zero integer"),
};

/// What to do when the catalog lookup of a single pURL fails.
#[derive(
    clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum LookupFailurePolicy {
    /// Answer with an empty list for the failed pURL and report it as degraded
    #[default]
    Degrade,
    /// Fail the whole request
    Fail,
}

#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Recommendations")]
pub struct RecommendConfig {
    #[arg(
        id = "recommend-concurrency",
        long = "recommend-concurrency",
        env = "TRUSTIFY_RECOMMEND_CONCURRENCY",
        default_value = "8",
        value_parser = parse_concurrency,
        help = "The number of concurrent catalog lookups of a single request (must be > 0)."
    )]
    pub concurrency: NonZeroUsize,

    #[arg(
        id = "recommend-lookup-timeout",
        long = "recommend-lookup-timeout",
        env = "TRUSTIFY_RECOMMEND_LOOKUP_TIMEOUT",
        default_value = "5s",
        help = "Time allowed for a single catalog lookup."
    )]
    pub lookup_timeout: humantime::Duration,

    #[arg(
        id = "recommend-retries",
        long = "recommend-retries",
        env = "TRUSTIFY_RECOMMEND_RETRIES",
        default_value_t = 2,
        help = "Number of retries of a failed catalog lookup."
    )]
    pub retries: u32,

    #[arg(
        id = "recommend-retry-backoff",
        long = "recommend-retry-backoff",
        env = "TRUSTIFY_RECOMMEND_RETRY_BACKOFF",
        default_value = "100ms",
        help = "Delay before the first retry, doubled for each following one."
    )]
    pub retry_backoff: humantime::Duration,

    #[arg(
        id = "recommend-failure-policy",
        long = "recommend-failure-policy",
        env = "TRUSTIFY_RECOMMEND_FAILURE_POLICY",
        value_enum,
        default_value_t = LookupFailurePolicy::Degrade,
        help = "Handling of pURLs whose catalog lookup failed."
    )]
    pub failure_policy: LookupFailurePolicy,

    #[arg(
        id = "recommend-vendor",
        long = "recommend-vendor",
        env = "TRUSTIFY_RECOMMEND_VENDOR",
        default_value = "redhat",
        help = "The vendor tag of rebuilt versions, as in '1.2.3.<vendor>-00001'."
    )]
    pub vendor: String,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            lookup_timeout: Duration::from_secs(5).into(),
            retries: 2,
            retry_backoff: Duration::from_millis(100).into(),
            failure_policy: LookupFailurePolicy::Degrade,
            vendor: "redhat".into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::Parser;

    #[derive(clap::Parser, Debug)]
    struct Cli {
        #[command(flatten)]
        recommend: RecommendConfig,
    }

    #[test]
    fn defaults_match() {
        let cli = Cli::try_parse_from(["test"]).unwrap();
        let default = RecommendConfig::default();
        assert_eq!(cli.recommend.concurrency, default.concurrency);
        assert_eq!(*cli.recommend.lookup_timeout, *default.lookup_timeout);
        assert_eq!(cli.recommend.retries, default.retries);
        assert_eq!(*cli.recommend.retry_backoff, *default.retry_backoff);
        assert_eq!(cli.recommend.failure_policy, LookupFailurePolicy::Degrade);
        assert_eq!(cli.recommend.vendor, "redhat");
    }

    #[test]
    fn parse_flags() {
        let cli = Cli::try_parse_from([
            "test",
            "--recommend-concurrency",
            "2",
            "--recommend-lookup-timeout",
            "250ms",
            "--recommend-failure-policy",
            "fail",
        ])
        .unwrap();
        assert_eq!(cli.recommend.concurrency.get(), 2);
        assert_eq!(*cli.recommend.lookup_timeout, Duration::from_millis(250));
        assert_eq!(cli.recommend.failure_policy, LookupFailurePolicy::Fail);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        assert!(Cli::try_parse_from(["test", "--recommend-concurrency", "0"]).is_err());
    }
}
