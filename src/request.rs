/// Metadata about the in-flight request.
///
/// Contains the request identifier used for log correlation, the URI that
/// gets stashed on denial, and the action name policies inspect.
///
/// # Examples
///
/// ```
/// use access_gate::Request;
///
/// let request = Request::new("req-1", "/orders?page=2").with_action("index");
/// assert_eq!(request.uri(), "/orders?page=2");
/// assert_eq!(request.action(), Some("index"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    request_id: String,
    uri: String,
    action: Option<String>,
}

impl Request {
    /// Creates request metadata with no action name.
    pub fn new(request_id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            uri: uri.into(),
            action: None,
        }
    }

    /// Sets the action (handler) name the router picked for this request.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Unique identifier for this request
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// URI the client asked for, including the query string.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Action name, if the host supplied one.
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}
