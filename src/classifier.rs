use crate::chain::find_cause;
use crate::config::ProbeConfig;
use crate::probe::{probe_gss_family, probe_kerberos_family, GssBinding, KerberosBinding};
use crate::provider::ProviderRuntime;
use crate::taxonomy::KerberosError;
use std::error::Error;
use std::sync::OnceLock;
use tracing::{debug, trace};

static GLOBAL_CLASSIFIER: OnceLock<Classifier> = OnceLock::new();

/// Classifies handshake failures against the provider types bound at probe
/// time. Immutable once built, so one instance serves every session.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    kerberos: KerberosBinding,
    gss: GssBinding,
}

impl Classifier {
    pub fn new(kerberos: KerberosBinding, gss: GssBinding) -> Self {
        Self { kerberos, gss }
    }

    pub fn probe(runtime: &ProviderRuntime, config: &ProbeConfig) -> Self {
        let kerberos = probe_kerberos_family(runtime, &config.kerberos);
        let gss = probe_gss_family(runtime, &config.gss);
        Self::new(kerberos, gss)
    }

    /// The process-wide classifier, probed once against
    /// [`ProviderRuntime::global`] on first use.
    pub fn global() -> &'static Classifier {
        GLOBAL_CLASSIFIER
            .get_or_init(|| Classifier::probe(ProviderRuntime::global(), &ProbeConfig::default()))
    }

    pub fn kerberos_binding(&self) -> &KerberosBinding {
        &self.kerberos
    }

    pub fn gss_binding(&self) -> &GssBinding {
        &self.gss
    }

    /// Identify the Kerberos failure underlying `failure`, if it is one we know.
    pub fn classify(&self, failure: &(dyn Error + 'static)) -> Option<KerberosError> {
        let KerberosBinding::Present {
            provider,
            return_code,
        } = &self.kerberos
        else {
            return None;
        };

        let cause = find_cause(failure, provider)?;

        let code = match return_code.extract(cause) {
            Ok(code) => code,
            Err(err) => {
                trace!(
                    ?failure,
                    ?err,
                    "Kerberos return code could not be determined"
                );
                return None;
            }
        };

        let classified = KerberosError::from_code(code);
        debug!(code, ?classified, "classified Kerberos failure");
        classified
    }

    /// True when `failure` was caused by the GSS-API layer having no
    /// credentials. This happens transiently during re-login, when a session
    /// authenticates after the old credentials are gone but before new ones
    /// are in place, so it is worth retrying.
    pub fn is_retriable_no_credential(&self, failure: &(dyn Error + 'static)) -> bool {
        let GssBinding::Present {
            provider,
            major,
            no_credential,
        } = &self.gss
        else {
            return false;
        };

        let Some(cause) = find_cause(failure, provider) else {
            return false;
        };

        match major.extract(cause) {
            Ok(major) => major == *no_credential,
            Err(err) => {
                trace!(
                    ?failure,
                    ?err,
                    "GSS-API major code could not be determined"
                );
                false
            }
        }
    }

    /// True when either a retriable Kerberos failure or the GSS-API
    /// no-credential condition underlies `failure`.
    pub fn is_retriable(&self, failure: &(dyn Error + 'static)) -> bool {
        self.classify(failure)
            .is_some_and(|classified| classified.retriable())
            || self.is_retriable_no_credential(failure)
    }
}
