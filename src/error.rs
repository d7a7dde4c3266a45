use snafu::Snafu;

#[derive(Snafu, Debug, PartialEq, Eq)]
pub enum FSRSError {
    NotEnoughData,
    InvalidParameters,
    InvalidInput,
}

pub type Result<T, E = FSRSError> = std::result::Result<T, E>;
