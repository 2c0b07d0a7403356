use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlertError {
    #[error("Alert not found: {0}")]
    NotFound(String),

    #[error("Alert {0} does not belong to this account")]
    NotOwner(String),

    #[error("Invalid alert: {0}")]
    InvalidAlert(String),
}
