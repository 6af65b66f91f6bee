//! The platform standard Kerberos and GSS-API error types.
//!
//! Kerberos return codes follow RFC 4120 section 7.5.9. GSS-API major status
//! values follow the layout of RFC 2744 section 3.9.1: calling errors in the
//! top byte, routine errors in the next byte and supplementary information in
//! the low 16 bits.

use super::{
    ProviderRuntime, ProviderType, GSSAPI_GSS_EXCEPTION, KRB5_KRB_EXCEPTION, MAJOR_METHOD,
    NO_CRED_CONSTANT, RETURN_CODE_METHOD,
};
use crate::error::ExtractionError;
use std::error::Error;
use std::fmt;

const CALLING_ERROR_OFFSET: u32 = 24;
const ROUTINE_ERROR_OFFSET: u32 = 16;

/// An error reported by the Kerberos library, carrying a protocol return code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KrbException {
    return_code: i32,
    text: Option<String>,
}

impl KrbException {
    pub fn new(return_code: i32) -> Self {
        Self {
            return_code,
            text: None,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn return_code(&self) -> i32 {
        self.return_code
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl fmt::Display for KrbException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{} ({})", text, self.return_code),
            None => write!(f, "Kerberos error ({})", self.return_code),
        }
    }
}

impl Error for KrbException {}

/// An error reported by the GSS-API layer.
///
/// The mechanism failure that caused it, usually a [`KrbException`], may be
/// attached as the source.
#[derive(Debug)]
pub struct GssException {
    major: u32,
    minor: i32,
    cause: Option<Box<dyn Error + Send + Sync>>,
}

impl GssException {
    pub const BAD_BINDINGS: u32 = 1 << CALLING_ERROR_OFFSET;
    pub const BAD_MECH: u32 = 1 << ROUTINE_ERROR_OFFSET;
    pub const BAD_NAME: u32 = 2 << ROUTINE_ERROR_OFFSET;
    pub const BAD_NAMETYPE: u32 = 3 << ROUTINE_ERROR_OFFSET;
    pub const BAD_STATUS: u32 = 5 << ROUTINE_ERROR_OFFSET;
    pub const BAD_MIC: u32 = 6 << ROUTINE_ERROR_OFFSET;
    pub const NO_CRED: u32 = 7 << ROUTINE_ERROR_OFFSET;
    pub const NO_CONTEXT: u32 = 8 << ROUTINE_ERROR_OFFSET;
    pub const DEFECTIVE_TOKEN: u32 = 9 << ROUTINE_ERROR_OFFSET;
    pub const DEFECTIVE_CREDENTIAL: u32 = 10 << ROUTINE_ERROR_OFFSET;
    pub const CREDENTIALS_EXPIRED: u32 = 11 << ROUTINE_ERROR_OFFSET;
    pub const CONTEXT_EXPIRED: u32 = 12 << ROUTINE_ERROR_OFFSET;
    pub const FAILURE: u32 = 13 << ROUTINE_ERROR_OFFSET;
    pub const UNAVAILABLE: u32 = 16 << ROUTINE_ERROR_OFFSET;

    pub fn new(major: u32, minor: i32) -> Self {
        Self {
            major,
            minor,
            cause: None,
        }
    }

    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        self.cause = Some(cause.into());
        self
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> i32 {
        self.minor
    }
}

impl fmt::Display for GssException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GSS-API failure (major {:#010x}, minor {})",
            self.major, self.minor
        )
    }
}

impl Error for GssException {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}

fn return_code(e: &KrbException) -> Result<i32, ExtractionError> {
    Ok(e.return_code())
}

fn major(e: &GssException) -> Result<i32, ExtractionError> {
    i32::try_from(e.major()).map_err(|_| ExtractionError::CodeOutOfRange)
}

pub fn krb_exception_type() -> ProviderType {
    ProviderType::builder::<KrbException>(KRB5_KRB_EXCEPTION)
        .method(RETURN_CODE_METHOD, return_code)
        .build()
}

pub fn gss_exception_type() -> ProviderType {
    ProviderType::builder::<GssException>(GSSAPI_GSS_EXCEPTION)
        .method(MAJOR_METHOD, major)
        .constant(NO_CRED_CONSTANT, GssException::NO_CRED as i32)
        .build()
}

/// Register the standard provider types with `runtime`.
pub fn register(runtime: &mut ProviderRuntime) {
    runtime.register(krb_exception_type());
    runtime.register(gss_exception_type());
}
