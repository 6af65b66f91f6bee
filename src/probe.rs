//! One-time discovery of the provider error types this process can classify.
//!
//! Probing never fails. A candidate that cannot be resolved, or that resolves
//! but lacks the member we need, is logged at trace level and the next one is
//! tried. When nothing resolves the family is bound as absent and the
//! classifier degrades to "unknown" for it.

use crate::config::{GssProbeConfig, KerberosProbeConfig};
use crate::error::ProbeError;
use crate::provider::{Accessor, ProviderRuntime, ProviderType};
use tracing::{debug, trace};

/// The Kerberos exception family, as bound by the probe.
#[derive(Debug, Clone, Default)]
pub enum KerberosBinding {
    #[default]
    Absent,
    Present {
        provider: ProviderType,
        return_code: Accessor,
    },
}

impl KerberosBinding {
    pub fn is_present(&self) -> bool {
        matches!(self, KerberosBinding::Present { .. })
    }

    pub fn provider(&self) -> Option<&ProviderType> {
        match self {
            KerberosBinding::Present { provider, .. } => Some(provider),
            KerberosBinding::Absent => None,
        }
    }
}

/// The GSS-API exception family, as bound by the probe.
#[derive(Debug, Clone, Default)]
pub enum GssBinding {
    #[default]
    Absent,
    Present {
        provider: ProviderType,
        major: Accessor,
        no_credential: i32,
    },
}

impl GssBinding {
    pub fn is_present(&self) -> bool {
        matches!(self, GssBinding::Present { .. })
    }

    pub fn provider(&self) -> Option<&ProviderType> {
        match self {
            GssBinding::Present { provider, .. } => Some(provider),
            GssBinding::Absent => None,
        }
    }

    pub fn no_credential(&self) -> Option<i32> {
        match self {
            GssBinding::Present { no_credential, .. } => Some(*no_credential),
            GssBinding::Absent => None,
        }
    }
}

fn resolve_kerberos(
    runtime: &ProviderRuntime,
    candidate: &str,
    config: &KerberosProbeConfig,
) -> Result<KerberosBinding, ProbeError> {
    if !runtime.can_load(candidate) {
        return Err(ProbeError::TypeNotFound);
    }
    let provider = runtime.resolve(candidate)?;
    let return_code = provider.method(&config.return_code_method)?;

    Ok(KerberosBinding::Present {
        provider: provider.clone(),
        return_code,
    })
}

fn resolve_gss(
    runtime: &ProviderRuntime,
    candidate: &str,
    config: &GssProbeConfig,
) -> Result<GssBinding, ProbeError> {
    if !runtime.can_load(candidate) {
        return Err(ProbeError::TypeNotFound);
    }
    let provider = runtime.resolve(candidate)?;
    let major = provider.method(&config.major_method)?;
    let no_credential = provider.constant(&config.no_credential_constant)?;

    Ok(GssBinding::Present {
        provider: provider.clone(),
        major,
        no_credential,
    })
}

/// Bind the first Kerberos exception candidate that resolves completely.
pub fn probe_kerberos_family(
    runtime: &ProviderRuntime,
    config: &KerberosProbeConfig,
) -> KerberosBinding {
    for candidate in config.candidates.iter() {
        match resolve_kerberos(runtime, candidate, config) {
            Ok(binding) => {
                debug!(%candidate, "bound Kerberos exception type");
                return binding;
            }
            Err(err) => {
                trace!(%candidate, ?err, "Kerberos exception candidate rejected");
            }
        }
    }
    debug!("no Kerberos exception type available");
    KerberosBinding::Absent
}

/// Bind the first GSS-API exception candidate that resolves completely,
/// including its no-credential constant.
pub fn probe_gss_family(runtime: &ProviderRuntime, config: &GssProbeConfig) -> GssBinding {
    for candidate in config.candidates.iter() {
        match resolve_gss(runtime, candidate, config) {
            Ok(binding) => {
                debug!(%candidate, "bound GSS-API exception type");
                return binding;
            }
            Err(err) => {
                trace!(%candidate, ?err, "GSS-API exception candidate rejected");
            }
        }
    }
    debug!("no GSS-API exception type available");
    GssBinding::Absent
}
