//! The set of security provider error types that are loadable in this process.
//!
//! A provider is the library that actually performs the Kerberos or GSS-API
//! exchange. Its error types are not known when this crate is built, so each
//! provider registers its types here under a well known identifier, together
//! with named accessors that read a numeric code out of an instance and any
//! named constants the classifier needs. The probe later resolves identifiers
//! against a runtime, in priority order, and binds what it finds.

pub mod standard;

use crate::error::{ExtractionError, ProbeError};
use std::any::TypeId;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Vendor specific Kerberos exception type.
pub const VENDOR_KRB_EXCEPTION: &str = "vendor::krb5::KrbException";
/// Vendor specific Kerberos exception type, as shipped by older vendor builds.
pub const VENDOR_INTERNAL_KRB_EXCEPTION: &str = "vendor::krb5::internal::KrbException";
/// Platform standard Kerberos exception type.
pub const KRB5_KRB_EXCEPTION: &str = "krb5::KrbException";
/// Platform standard GSS-API exception type.
pub const GSSAPI_GSS_EXCEPTION: &str = "gssapi::GssException";

pub const RETURN_CODE_METHOD: &str = "return_code";
pub const MAJOR_METHOD: &str = "major";
pub const NO_CRED_CONSTANT: &str = "NO_CRED";

type AccessorFn = dyn Fn(&(dyn Error + 'static)) -> Result<i32, ExtractionError> + Send + Sync;

/// A named accessor bound to one provider type.
#[derive(Clone)]
pub struct Accessor {
    name: String,
    f: Arc<AccessorFn>,
}

impl Accessor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extract(&self, cause: &(dyn Error + 'static)) -> Result<i32, ExtractionError> {
        (self.f)(cause)
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor").field("name", &self.name).finish()
    }
}

fn instance_of<T: Error + 'static>(err: &(dyn Error + 'static)) -> bool {
    err.is::<T>()
}

/// A provider error type, resolved from its identifier.
#[derive(Clone)]
pub struct ProviderType {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    is_instance: fn(&(dyn Error + 'static)) -> bool,
    methods: BTreeMap<String, Accessor>,
    constants: BTreeMap<String, i32>,
}

impl ProviderType {
    pub fn builder<T: Error + 'static>(name: &str) -> ProviderTypeBuilder<T> {
        ProviderTypeBuilder {
            name: name.to_string(),
            methods: BTreeMap::new(),
            constants: BTreeMap::new(),
            _type: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_instance(&self, err: &(dyn Error + 'static)) -> bool {
        (self.is_instance)(err)
    }

    pub fn method(&self, name: &str) -> Result<Accessor, ProbeError> {
        self.methods
            .get(name)
            .cloned()
            .ok_or(ProbeError::MethodNotFound)
    }

    pub fn constant(&self, name: &str) -> Result<i32, ProbeError> {
        self.constants
            .get(name)
            .copied()
            .ok_or(ProbeError::ConstantNotFound)
    }
}

impl fmt::Debug for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderType")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("constants", &self.constants)
            .finish()
    }
}

pub struct ProviderTypeBuilder<T> {
    name: String,
    methods: BTreeMap<String, Accessor>,
    constants: BTreeMap<String, i32>,
    _type: PhantomData<fn() -> T>,
}

impl<T: Error + 'static> ProviderTypeBuilder<T> {
    /// Expose a numeric accessor. The accessor is only ever handed causes
    /// that downcast to `T`; anything else is reported as a type mismatch.
    pub fn method(mut self, name: &str, f: fn(&T) -> Result<i32, ExtractionError>) -> Self {
        let accessor = Accessor {
            name: name.to_string(),
            f: Arc::new(move |err: &(dyn Error + 'static)| {
                err.downcast_ref::<T>()
                    .ok_or(ExtractionError::TypeMismatch)
                    .and_then(f)
            }),
        };
        self.methods.insert(name.to_string(), accessor);
        self
    }

    pub fn constant(mut self, name: &str, value: i32) -> Self {
        self.constants.insert(name.to_string(), value);
        self
    }

    pub fn build(self) -> ProviderType {
        ProviderType {
            name: self.name,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            is_instance: instance_of::<T>,
            methods: self.methods,
            constants: self.constants,
        }
    }
}

/// The provider types available to this process.
#[derive(Debug, Clone, Default)]
pub struct ProviderRuntime {
    types: BTreeMap<String, ProviderType>,
}

static GLOBAL_RUNTIME: OnceLock<ProviderRuntime> = OnceLock::new();

impl ProviderRuntime {
    /// A runtime with no providers at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// The providers that ship with this platform build.
    pub fn platform() -> Self {
        #[allow(unused_mut)]
        let mut runtime = ProviderRuntime::new();
        #[cfg(feature = "standard-provider")]
        standard::register(&mut runtime);
        runtime
    }

    /// The process-wide runtime. Fixed on first use, defaulting to
    /// [`ProviderRuntime::platform`].
    pub fn global() -> &'static ProviderRuntime {
        GLOBAL_RUNTIME.get_or_init(ProviderRuntime::platform)
    }

    /// Install the process-wide runtime. This must happen before anything
    /// calls [`ProviderRuntime::global`], otherwise the runtime is handed back.
    pub fn install(runtime: ProviderRuntime) -> Result<(), ProviderRuntime> {
        GLOBAL_RUNTIME.set(runtime)
    }

    pub fn register(&mut self, provider: ProviderType) {
        debug!(name = %provider.name, type_name = provider.type_name, "registered provider type");
        self.types.insert(provider.name.clone(), provider);
    }

    pub fn with(mut self, provider: ProviderType) -> Self {
        self.register(provider);
        self
    }

    pub fn can_load(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn resolve(&self, name: &str) -> Result<&ProviderType, ProbeError> {
        self.types.get(name).ok_or(ProbeError::TypeNotFound)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
