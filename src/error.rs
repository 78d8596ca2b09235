use thiserror::Error;

/// Failure modes surfaced by the accumulator core.
///
/// `verify` never returns this type; a bad witness is reported as `false`,
/// not an error (see `RSAAccumulator::verify` / `BMAccumulator::verify`).
#[derive(Debug, Error)]
pub enum AccumulatorError {
    #[error("arithmetic on operands with mismatched moduli ({lhs} vs {rhs})")]
    ArithmeticMismatch { lhs: String, rhs: String },

    #[error("could not parse numeric value: {0}")]
    ParseError(String),

    #[error("RSA keygen could not produce a modulus of the requested size")]
    CryptoFailure,

    #[error("pairing output was not a properly reduced GT element")]
    PairingFailure,

    #[error("verification failed")]
    VerificationFailure,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AccumulatorError>;
