/// Information about an HTTP endpoint of the application.
pub trait Endpoint: std::fmt::Debug + Clone + Send + Sync + 'static {
    /// The default port
    const PORT: u16;
    /// The base path of the API
    const PATH: &'static str;

    fn port() -> u16 {
        Self::PORT
    }
}

/// The main API endpoint.
#[derive(Clone, Debug)]
pub struct Trustify;

impl Endpoint for Trustify {
    const PORT: u16 = 8080;
    const PATH: &'static str = "/api";
}
