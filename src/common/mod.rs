use thiserror::Error;

/// Rejected user input. The message is shown back to the user right before the question is asked again.
#[derive(Error, Debug, PartialEq)]
pub(crate) enum InputError {
    #[error("'{0}' is not an amount. Enter a number like 1500 or 12.50.")]
    InvalidAmount(String),

    #[error("The amount must be greater than zero.")]
    NonPositiveAmount,

    #[error("The category can't be empty.")]
    EmptyCategory,

    #[error("'{0}' is a menu button. Press Cancel to leave this entry.")]
    ReservedLabel(String),
}
