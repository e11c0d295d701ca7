use crate::{
    AnyObjectInfo, AttributeMappingConvention, Mapped, MappingConvention, MinnowError, ObjectInfo,
    Result,
};
use log::{debug, warn};
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock, PoisonError, RwLock},
};

static GLOBAL: OnceLock<Arc<ObjectInfoRegistry>> = OnceLock::new();

/// Cache of [`ObjectInfo`] keyed by type.
///
/// Each type is derived once, the first time it is requested, using the
/// registry's mapping convention. Lookups of known types only take a read
/// lock. Concurrent first requests for the same type are serialized so the
/// derivation runs exactly once.
pub struct ObjectInfoRegistry {
    convention: RwLock<Arc<dyn MappingConvention>>,
    infos: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    creation: Mutex<()>,
}

impl ObjectInfoRegistry {
    pub fn new(convention: impl MappingConvention + 'static) -> Self {
        Self {
            convention: RwLock::new(Arc::new(convention)),
            infos: Default::default(),
            creation: Mutex::new(()),
        }
    }

    /// Process wide registry, using [`AttributeMappingConvention`] unless
    /// configured otherwise before the first derivation.
    pub fn global() -> Arc<Self> {
        GLOBAL
            .get_or_init(|| Arc::new(Self::new(AttributeMappingConvention)))
            .clone()
    }

    /// Replaces the mapping convention.
    ///
    /// Only allowed while nothing has been derived, the cached metadata would
    /// otherwise disagree with the new convention.
    pub fn configure(&self, convention: impl MappingConvention + 'static) -> Result<()> {
        let _creation = self.creation.lock().unwrap_or_else(PoisonError::into_inner);
        let derived = self.len();
        if derived > 0 {
            let error = MinnowError::invalid_operation(format!(
                "The mapping convention cannot change after {derived} types have been mapped"
            ));
            warn!("{error}");
            return Err(error.into());
        }
        *self
            .convention
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::new(convention);
        debug!("Installed a new mapping convention");
        Ok(())
    }

    /// [`Self::configure`] on the global registry.
    pub fn configure_global(convention: impl MappingConvention + 'static) -> Result<()> {
        Self::global().configure(convention)
    }

    pub fn convention(&self) -> Arc<dyn MappingConvention> {
        self.convention
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get<T: Mapped>(&self) -> Result<Arc<ObjectInfo<T>>> {
        if let Some(info) = self.lookup::<T>() {
            return Ok(info);
        }
        let _creation = self.creation.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(info) = self.lookup::<T>() {
            return Ok(info);
        }
        let convention = self.convention();
        let info = Arc::new(ObjectInfo::<T>::new(convention.as_ref())?);
        debug!(
            "Derived the object info of `{}` mapped to `{}` ({} columns)",
            info.type_name(),
            info.table_info().qualified_name(),
            info.table_info().columns().len(),
        );
        self.infos
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<T>(), info.clone());
        Ok(info)
    }

    /// Same as [`Self::get`] with the type erased.
    pub fn get_any<T: Mapped>(&self) -> Result<Arc<dyn AnyObjectInfo>> {
        let info: Arc<dyn AnyObjectInfo> = self.get::<T>()?;
        Ok(info)
    }

    fn lookup<T: Mapped>(&self) -> Option<Arc<ObjectInfo<T>>> {
        self.infos
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|v| v.downcast::<ObjectInfo<T>>().ok())
    }

    /// Number of types derived so far.
    pub fn len(&self) -> usize {
        self.infos
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets every derived type, the convention stays.
    pub fn clear(&self) {
        let _creation = self.creation.lock().unwrap_or_else(PoisonError::into_inner);
        self.infos
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for ObjectInfoRegistry {
    fn default() -> Self {
        Self::new(AttributeMappingConvention)
    }
}
