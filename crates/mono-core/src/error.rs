use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonoError {
    #[error("Unknown command: {name}\nNamespaces: {namespaces}\nComposites: {composites}")]
    UnknownNamespace {
        name: String,
        namespaces: String,
        composites: String,
    },

    #[error("Unknown {namespace} command: {action}\nAvailable: {available}")]
    UnknownAction {
        namespace: String,
        action: String,
        available: String,
    },

    #[error("Missing {namespace} command\nAvailable: {available}")]
    MissingAction {
        namespace: String,
        available: String,
    },

    #[error("{namespace} {action} requires <{arg}>\nUsage: {usage}")]
    MissingArgument {
        namespace: String,
        action: String,
        arg: String,
        usage: String,
    },

    #[error("composite '{0}' takes no arguments")]
    CompositeArguments(String),

    #[error("{namespace} root does not exist: {path}")]
    MissingRoot { namespace: String, path: String },

    #[error("{program}: command not found ({source})")]
    MissingExecutable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid command template '{0}'")]
    InvalidTemplate(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl MonoError {
    /// Process exit code reported for this error.
    ///
    /// Spawn failures follow the shell conventions (127 not found, 126 not
    /// executable) so callers see the same status a direct invocation gives.
    pub fn exit_code(&self) -> i32 {
        match self {
            MonoError::MissingExecutable { .. } => 127,
            MonoError::SpawnFailed { source, .. }
                if source.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                126
            }
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, MonoError>;
