/// Authenticated client information
///
/// Inserted into request extensions by the auth middleware. Handlers extract
/// it via `Extension<Auth>` to tag their logs with the calling client.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct Auth {
    /// Id of the API secret the client presented
    #[serde(default)]
    pub id: Option<String>,
}

impl Auth {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    /// Context for requests served with authentication disabled
    pub fn empty() -> Self {
        Self::default()
    }

    /// Client id for logs, `anonymous` when unauthenticated
    ///
    /// ```
    /// use tonisynth::auth::Auth;
    ///
    /// assert_eq!(Auth::new("storybook").client(), "storybook");
    /// assert_eq!(Auth::empty().client(), "anonymous");
    /// ```
    pub fn client(&self) -> &str {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or("anonymous")
    }
}
