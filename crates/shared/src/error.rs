use thiserror::Error;

/// Kind of dashboard resource a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Worksheet,
    DataSource,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Worksheet => f.write_str("worksheet"),
            ResourceKind::DataSource => f.write_str("data source"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("host extension API unavailable: {0}")]
    HostUnavailable(String),
    #[error("{kind} not found: {name}")]
    NotFound { kind: ResourceKind, name: String },
    #[error("network failure during dispatch: {0}")]
    Network(String),
    #[error("backend rejected action request with status {status}")]
    Server { status: u16 },
    #[error("message channel closed before the action event was accepted")]
    ChannelClosed,
    #[error("action cycle exceeded its deadline")]
    Timeout,
    #[error("an action is already in flight")]
    Busy,
}

impl PanelError {
    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }
}
