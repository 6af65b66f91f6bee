use clap::{Parser, Subcommand};
use krime_classify::probe::{GssBinding, KerberosBinding};
use krime_classify::provider::standard::{GssException, KrbException};
use krime_classify::{Classifier, KerberosError, ProbeConfig, ProviderRuntime};
use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;
use tracing::{debug, error};

#[derive(Debug, Parser)]
#[clap(about = "Kerberos and GSS-API handshake failure classifier")]
struct OptParser {
    #[clap(subcommand)]
    command: Opt,
}

#[derive(Debug, Subcommand)]
enum Opt {
    /// Show which provider error types are bound in this process.
    Probe {
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Look up a Kerberos return code.
    Code {
        #[clap(allow_negative_numbers = true)]
        code: i32,
    },
    /// Classify a handshake failure built around a standard provider error.
    Simulate {
        #[clap(long, conflicts_with = "gss_major")]
        krb_code: Option<i32>,
        #[clap(long)]
        gss_major: Option<u32>,
        #[clap(long, default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..))]
        depth: u64,
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

/// Stand-in for the layers an authenticator wraps around a provider failure.
#[derive(Debug)]
struct HandshakeFailure {
    stage: usize,
    cause: Box<dyn Error + Send + Sync>,
}

impl fmt::Display for HandshakeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "authentication failed at stage {}", self.stage)
    }
}

impl Error for HandshakeFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&*self.cause as &(dyn Error + 'static))
    }
}

/// Wrap `root` in `depth` layers. `depth` is at least 1.
fn wrap(depth: usize, root: Box<dyn Error + Send + Sync>) -> HandshakeFailure {
    let mut failure = HandshakeFailure {
        stage: depth,
        cause: root,
    };
    for stage in (1..depth).rev() {
        failure = HandshakeFailure {
            stage,
            cause: Box::new(failure),
        };
    }
    failure
}

fn load_classifier(config: Option<PathBuf>) -> io::Result<Classifier> {
    match config {
        Some(path) => {
            let cfg = ProbeConfig::parse(&path)?;
            debug!(?cfg);
            Ok(Classifier::probe(ProviderRuntime::global(), &cfg))
        }
        None => Ok(Classifier::global().clone()),
    }
}

fn describe(variant: Option<KerberosError>) -> String {
    match variant {
        Some(v) => format!("{} retriable={}", v, v.retriable()),
        None => "unknown".to_string(),
    }
}

fn main() -> io::Result<()> {
    let opt = OptParser::parse();

    tracing_subscriber::fmt::init();

    match opt.command {
        Opt::Probe { config } => {
            let classifier = load_classifier(config)?;
            match classifier.kerberos_binding() {
                KerberosBinding::Present {
                    provider,
                    return_code,
                } => println!(
                    "kerberos: {} ({}) via {}",
                    provider.name(),
                    provider.type_name(),
                    return_code.name()
                ),
                KerberosBinding::Absent => println!("kerberos: absent"),
            }
            match classifier.gss_binding() {
                GssBinding::Present {
                    provider,
                    major,
                    no_credential,
                } => println!(
                    "gss: {} ({}) via {}, no credential = {:#010x}",
                    provider.name(),
                    provider.type_name(),
                    major.name(),
                    no_credential
                ),
                GssBinding::Absent => println!("gss: absent"),
            }
            Ok(())
        }
        Opt::Code { code } => {
            println!("{}", describe(KerberosError::from_code(code)));
            Ok(())
        }
        Opt::Simulate {
            krb_code,
            gss_major,
            depth,
            config,
        } => {
            let root: Box<dyn Error + Send + Sync> = match (krb_code, gss_major) {
                (Some(code), _) => Box::new(
                    GssException::new(GssException::FAILURE, 0)
                        .with_cause(KrbException::new(code)),
                ),
                (None, Some(major)) => Box::new(GssException::new(major, 0)),
                (None, None) => {
                    error!("one of --krb-code or --gss-major is required");
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "nothing to simulate",
                    ));
                }
            };

            let depth = usize::try_from(depth).map_err(|err| {
                error!(?err, "depth out of range");
                io::Error::new(io::ErrorKind::InvalidInput, "depth out of range")
            })?;

            let classifier = load_classifier(config)?;
            let failure = wrap(depth, root);

            println!("failure: {}", failure);
            println!("classified: {}", describe(classifier.classify(&failure)));
            println!(
                "no credential: {}",
                classifier.is_retriable_no_credential(&failure)
            );
            println!("retriable: {}", classifier.is_retriable(&failure));
            Ok(())
        }
    }
}
