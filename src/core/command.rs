use async_trait::async_trait;
use crate::core::library::LibraryError;

#[derive(Debug)]
pub enum CommandError {
    Conflict {
        message: String,
        reason_code: Option<String>,
    },
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    NotFound {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Serialization {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::Database { message, reason_code, retryable } => {
                CommandError::Database { message, reason_code, retryable }
            }
            LibraryError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            LibraryError::Conflict { message, reason_code } => {
                CommandError::Conflict { message, reason_code }
            }
            LibraryError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            LibraryError::Serialization { message } => {
                CommandError::Serialization { message }
            }
            LibraryError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code, retryable: false }
            }
        }
    }
}

impl CommandError {
    pub fn message(&self) -> &str {
        match self {
            CommandError::Conflict { message, .. } => { message }
            CommandError::Database { message, .. } => { message }
            CommandError::NotFound { message } => { message }
            CommandError::Runtime { message, .. } => { message }
            CommandError::Serialization { message } => { message }
            CommandError::Validation { message, .. } => { message }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::command::CommandError;
    use crate::core::library::LibraryError;

    #[tokio::test]
    async fn test_should_build_command_error() {
        let _ = CommandError::Conflict { message: "test".to_string(), reason_code: None };
        let _ = CommandError::Database { message: "test".to_string(), reason_code: None, retryable: false };
        let _ = CommandError::Runtime { message: "test".to_string(), reason_code: None, retryable: false };
        let _ = CommandError::Serialization { message: "test".to_string() };
        let _ = CommandError::Validation { message: "test".to_string(), reason_code: None };
    }

    #[tokio::test]
    async fn test_should_convert_library_error() {
        let err = CommandError::from(LibraryError::conflict("book on loan", Some("book_on_loan".to_string())));
        assert!(matches!(err, CommandError::Conflict { ref reason_code, .. } if reason_code.as_deref() == Some("book_on_loan")));
        assert_eq!("book on loan", err.message());

        let err = CommandError::from(LibraryError::not_found("missing"));
        assert!(matches!(err, CommandError::NotFound { .. }));

        let err = CommandError::from(LibraryError::validation("bad email", None));
        assert!(matches!(err, CommandError::Validation { .. }));
    }
}
