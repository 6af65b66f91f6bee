use crate::provider::{
    GSSAPI_GSS_EXCEPTION, KRB5_KRB_EXCEPTION, MAJOR_METHOD, NO_CRED_CONSTANT, RETURN_CODE_METHOD,
    VENDOR_INTERNAL_KRB_EXCEPTION, VENDOR_KRB_EXCEPTION,
};
use serde::Deserialize;
use std::fs;
use std::io;
use std::io::Read;
use std::path::Path;
use tracing::error;

// Android ships no Kerberos or GSS-API provider at all.
#[cfg(target_os = "android")]
fn default_kerberos_candidates() -> Vec<String> {
    Vec::new()
}

// Vendor specific types take priority over the platform standard one.
#[cfg(not(target_os = "android"))]
fn default_kerberos_candidates() -> Vec<String> {
    vec![
        VENDOR_KRB_EXCEPTION.to_string(),
        VENDOR_INTERNAL_KRB_EXCEPTION.to_string(),
        KRB5_KRB_EXCEPTION.to_string(),
    ]
}

#[cfg(target_os = "android")]
fn default_gss_candidates() -> Vec<String> {
    Vec::new()
}

#[cfg(not(target_os = "android"))]
fn default_gss_candidates() -> Vec<String> {
    vec![GSSAPI_GSS_EXCEPTION.to_string()]
}

fn default_return_code_method() -> String {
    RETURN_CODE_METHOD.to_string()
}

fn default_major_method() -> String {
    MAJOR_METHOD.to_string()
}

fn default_no_credential_constant() -> String {
    NO_CRED_CONSTANT.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct KerberosProbeConfig {
    #[serde(default = "default_kerberos_candidates")]
    pub candidates: Vec<String>,
    #[serde(default = "default_return_code_method")]
    pub return_code_method: String,
}

impl Default for KerberosProbeConfig {
    fn default() -> Self {
        Self {
            candidates: default_kerberos_candidates(),
            return_code_method: default_return_code_method(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GssProbeConfig {
    #[serde(default = "default_gss_candidates")]
    pub candidates: Vec<String>,
    #[serde(default = "default_major_method")]
    pub major_method: String,
    #[serde(default = "default_no_credential_constant")]
    pub no_credential_constant: String,
}

impl Default for GssProbeConfig {
    fn default() -> Self {
        Self {
            candidates: default_gss_candidates(),
            major_method: default_major_method(),
            no_credential_constant: default_no_credential_constant(),
        }
    }
}

/// Which provider types the probe looks for, in priority order, and which
/// members it binds on them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub kerberos: KerberosProbeConfig,
    #[serde(default)]
    pub gss: GssProbeConfig,
}

impl ProbeConfig {
    pub fn parse<P: AsRef<Path>>(path: P) -> io::Result<ProbeConfig> {
        let mut contents = String::new();
        let mut f = fs::File::open(&path)?;
        f.read_to_string(&mut contents)?;

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> io::Result<ProbeConfig> {
        toml::from_str(contents).map_err(|err| {
            error!(?err);
            io::Error::other("toml parse failure")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_is_default() {
        let cfg = ProbeConfig::from_toml_str("").expect("empty config parses");
        let default = ProbeConfig::default();
        assert_eq!(cfg.kerberos.candidates, default.kerberos.candidates);
        assert_eq!(cfg.kerberos.return_code_method, RETURN_CODE_METHOD);
        assert_eq!(cfg.gss.candidates, default.gss.candidates);
        assert_eq!(cfg.gss.major_method, MAJOR_METHOD);
        assert_eq!(cfg.gss.no_credential_constant, NO_CRED_CONSTANT);
    }

    #[cfg(not(target_os = "android"))]
    #[test]
    fn vendor_candidates_come_first() {
        let cfg = ProbeConfig::default();
        assert_eq!(
            cfg.kerberos.candidates,
            vec![
                VENDOR_KRB_EXCEPTION,
                VENDOR_INTERNAL_KRB_EXCEPTION,
                KRB5_KRB_EXCEPTION
            ]
        );
        assert_eq!(cfg.gss.candidates, vec![GSSAPI_GSS_EXCEPTION]);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let cfg = ProbeConfig::from_toml_str(
            r#"
            [kerberos]
            candidates = ["site::krb5::KrbError", "krb5::KrbException"]
            "#,
        )
        .expect("config parses");

        assert_eq!(
            cfg.kerberos.candidates,
            vec!["site::krb5::KrbError", "krb5::KrbException"]
        );
        assert_eq!(cfg.kerberos.return_code_method, RETURN_CODE_METHOD);
        assert_eq!(cfg.gss.candidates, ProbeConfig::default().gss.candidates);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let err = ProbeConfig::from_toml_str("[kerberos]\ncandidates = 7\n")
            .expect_err("candidates must be a list");
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn parse_from_file() {
        let _ = tracing_subscriber::fmt::try_init();

        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        writeln!(
            file,
            "[gss]\ncandidates = [\"site::gss::Status\"]\nmajor_method = \"major_status\""
        )
        .expect("Failed to write config");

        let cfg = ProbeConfig::parse(file.path()).expect("config parses");
        assert_eq!(cfg.gss.candidates, vec!["site::gss::Status"]);
        assert_eq!(cfg.gss.major_method, "major_status");
        assert_eq!(cfg.gss.no_credential_constant, NO_CRED_CONSTANT);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let err = ProbeConfig::parse(dir.path().join("absent.toml")).expect_err("no such file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
