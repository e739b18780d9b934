//! Service binding table: which concrete provider satisfies each capability.
//!
//! Bindings are collected once at process start through a [`BindingTableBuilder`]
//! and frozen into a [`BindingTable`]. The frozen table has no mutating API, so
//! it can be shared across threads behind an `Arc` without locking.

use std::any::{Any, type_name};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::sync::Arc;

use anvil_core::{DomainError, DomainResult};

/// Name of an abstract service role (e.g. `"DateFormatService"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capability(String);

impl Capability {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Capability {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Capability {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for Capability {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A registered provider, type-erased. Always holds an `Arc<T>`.
struct Binding {
    provider: Box<dyn Any + Send + Sync>,
    provider_type: &'static str,
}

/// A unit of wiring: registers the bindings for one concern.
pub trait ServiceModule {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    fn configure(&self, bindings: &mut BindingTableBuilder) -> DomainResult<()>;
}

/// Registration phase of a [`BindingTable`].
#[derive(Default)]
pub struct BindingTableBuilder {
    bindings: BTreeMap<Capability, Binding>,
}

impl BindingTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `capability` to `provider`.
    ///
    /// Each capability may be bound once; a second registration is a
    /// `Conflict`. `T` is usually a trait object (`dyn SomeService`), and
    /// resolution must ask for the same `T`.
    pub fn register<T>(
        &mut self,
        capability: impl Into<Capability>,
        provider: Arc<T>,
    ) -> DomainResult<&mut Self>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let capability = capability.into();
        if let Some(existing) = self.bindings.get(&capability) {
            return Err(DomainError::conflict(format!(
                "capability {capability} is already bound to {}",
                existing.provider_type
            )));
        }

        tracing::debug!(
            capability = %capability,
            provider = type_name::<T>(),
            "registered binding"
        );
        self.bindings.insert(
            capability,
            Binding {
                provider: Box::new(provider),
                provider_type: type_name::<T>(),
            },
        );
        Ok(self)
    }

    /// Run a module's registrations against this builder.
    pub fn install(&mut self, module: &dyn ServiceModule) -> DomainResult<&mut Self> {
        tracing::debug!(module = module.name(), "installing service module");
        module.configure(self)?;
        Ok(self)
    }

    pub fn contains(&self, capability: &str) -> bool {
        self.bindings.contains_key(capability)
    }

    /// End the registration phase.
    pub fn build(self) -> BindingTable {
        tracing::info!(bindings = self.bindings.len(), "binding table resolved");
        BindingTable {
            bindings: self.bindings,
        }
    }
}

/// Immutable capability -> provider table.
#[derive(Default)]
pub struct BindingTable {
    bindings: BTreeMap<Capability, Binding>,
}

impl BindingTable {
    pub fn builder() -> BindingTableBuilder {
        BindingTableBuilder::new()
    }

    /// Install every module in order, then freeze.
    pub fn from_modules(modules: &[&dyn ServiceModule]) -> DomainResult<Self> {
        let mut builder = BindingTableBuilder::new();
        for module in modules {
            builder.install(*module)?;
        }
        Ok(builder.build())
    }

    /// Look up the provider bound to `capability`.
    ///
    /// Fails with `UnboundCapability` if nothing was registered, or with
    /// `Validation` if the binding holds a different provider type than `T`.
    pub fn resolve<T>(&self, capability: &str) -> DomainResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let binding = self
            .bindings
            .get(capability)
            .ok_or_else(|| DomainError::unbound(capability))?;

        binding
            .provider
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "capability {capability} is bound to {}, not {}",
                    binding.provider_type,
                    type_name::<T>()
                ))
            })
    }

    pub fn contains(&self, capability: &str) -> bool {
        self.bindings.contains_key(capability)
    }

    /// Bound capability names, sorted.
    pub fn capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.bindings.keys()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl core::fmt::Debug for BindingTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(
                self.bindings
                    .iter()
                    .map(|(capability, binding)| (capability.as_str(), binding.provider_type)),
            )
            .finish()
    }
}
