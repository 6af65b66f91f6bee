use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// Kerberos failures that may require special handling during a handshake.
///
/// The numeric value of each variant is the standard Kerberos return code
/// (RFC 4120 section 7.5.9) carried by the provider's exception type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(i32)]
pub enum KerberosError {
    /// KDC_ERR_S_PRINCIPAL_UNKNOWN. Not retriable, but classified so that
    /// callers can report a missing service principal distinctly.
    ServerNotFound = 7,
    /// KDC_ERR_CLIENT_NOTYET. Client not yet valid, try again later.
    ClientNotYetValid = 21,
    /// KRB_AP_ERR_TKT_NYV. Usually a small clock window between peers.
    TicketNotYetValid = 33,
    /// KRB_AP_ERR_REPEAT. Replay detection can produce false positives.
    Replay = 34,
}

impl KerberosError {
    pub const ALL: [KerberosError; 4] = [
        KerberosError::ServerNotFound,
        KerberosError::ClientNotYetValid,
        KerberosError::TicketNotYetValid,
        KerberosError::Replay,
    ];

    /// Look up a Kerberos return code. Codes outside the taxonomy are a normal
    /// outcome and yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        KerberosError::try_from(code).ok()
    }

    pub fn code(self) -> i32 {
        self.into()
    }

    pub fn retriable(self) -> bool {
        match self {
            KerberosError::ServerNotFound => false,
            KerberosError::ClientNotYetValid
            | KerberosError::TicketNotYetValid
            | KerberosError::Replay => true,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            KerberosError::ServerNotFound => "SERVER_NOT_FOUND",
            KerberosError::ClientNotYetValid => "CLIENT_NOT_YET_VALID",
            KerberosError::TicketNotYetValid => "TICKET_NOT_YET_VALID",
            KerberosError::Replay => "REPLAY",
        }
    }
}

impl fmt::Display for KerberosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}
