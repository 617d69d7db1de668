//! Registry of engine implementations and resolution of the default engine.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::engine::{Engine, EngineType, LinAlg, Math, Statistics};
use crate::engines::{ParallelEngine, PureEngine};
use crate::env::{env_string, ENGINE_VAR};
use crate::errors::OpError;

/// Map from engine type to engine.
pub type EngineMap = BTreeMap<EngineType, Arc<dyn Engine>>;

/// Default engines in order of preference.
const PREFERENCE_ORDER: [EngineType; 2] = [EngineType::PARALLEL, EngineType::PURE];

/// A set of engines keyed by [`EngineType`], plus the engine which is used
/// by default.
///
/// Registration is copy-on-write. Readers take a snapshot of the current
/// map, which is never modified after it has been published, so a reader
/// either sees a fully constructed engine or does not see it at all.
///
/// The default engine is chosen on first use and is fixed from then on, so
/// concurrent callers always observe the same instance.
pub struct EngineRegistry {
    engines: RwLock<Arc<EngineMap>>,
    default: OnceLock<Arc<dyn Engine>>,

    /// Name of the engine to prefer as the default.
    preferred: Option<String>,
}

impl EngineRegistry {
    /// Create a registry with no engines.
    pub fn new() -> EngineRegistry {
        EngineRegistry {
            engines: RwLock::new(Arc::new(EngineMap::new())),
            default: OnceLock::new(),
            preferred: None,
        }
    }

    /// Create a registry containing the [`PureEngine`] and
    /// [`ParallelEngine`].
    pub fn with_builtin_engines() -> EngineRegistry {
        let registry = EngineRegistry::new();
        registry.register(Arc::new(ParallelEngine::new()));
        registry.register(Arc::new(PureEngine::new()));
        registry
    }

    /// Set the name of the engine which should become the default, if it
    /// is registered when the default is resolved.
    pub fn with_preferred_engine(mut self, name: Option<String>) -> EngineRegistry {
        self.preferred = name;
        self
    }

    /// Add an engine to the registry.
    ///
    /// Returns false if an engine with the same type is already registered,
    /// in which case the existing engine is kept.
    pub fn register(&self, engine: Arc<dyn Engine>) -> bool {
        let engine_type = engine.engine_type();
        let mut engines = self.engines.write().unwrap_or_else(PoisonError::into_inner);
        if engines.contains_key(&engine_type) {
            return false;
        }

        let mut updated = EngineMap::clone(&engines);
        updated.insert(engine_type, engine);
        *engines = Arc::new(updated);

        log::debug!("Registered engine \"{}\"", engine_type);
        true
    }

    /// Return a snapshot of the registered engines.
    pub fn engines(&self) -> Arc<EngineMap> {
        self.engines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Return the engine registered for `engine_type`.
    pub fn resolve(&self, engine_type: EngineType) -> Result<Arc<dyn Engine>, OpError> {
        self.engines()
            .get(&engine_type)
            .cloned()
            .ok_or(OpError::EngineNotFound(engine_type))
    }

    /// Return the default engine, choosing it if this is the first call.
    ///
    /// The preferred engine is used if it is registered, otherwise the first
    /// registered engine in the order `parallel`, `pure`, then any other
    /// engine.
    pub fn resolve_default(&self) -> Result<&Arc<dyn Engine>, OpError> {
        if let Some(engine) = self.default.get() {
            return Ok(engine);
        }

        let candidate = self.choose_default()?;
        Ok(self.default.get_or_init(|| {
            log::debug!("Using \"{}\" as the default engine", candidate.engine_type());
            candidate
        }))
    }

    /// Fix the default engine to the one registered for `engine_type`.
    ///
    /// This fails if the default has already been resolved.
    pub fn set_default_engine(&self, engine_type: EngineType) -> Result<(), OpError> {
        let engine = self.resolve(engine_type)?;
        self.default
            .set(engine)
            .map_err(|_| OpError::DefaultEngineAlreadyResolved)?;
        log::debug!("Using \"{}\" as the default engine", engine_type);
        Ok(())
    }

    fn choose_default(&self) -> Result<Arc<dyn Engine>, OpError> {
        let engines = self.engines();

        if let Some(name) = self.preferred.as_deref() {
            let preferred = engines
                .iter()
                .find(|(engine_type, _)| engine_type.name() == name);
            match preferred {
                Some((_, engine)) => return Ok(engine.clone()),
                None => log::warn!(
                    "Engine \"{}\" requested by {} is not registered",
                    name,
                    ENGINE_VAR
                ),
            }
        }

        PREFERENCE_ORDER
            .iter()
            .find_map(|engine_type| engines.get(engine_type))
            .or_else(|| engines.values().next())
            .cloned()
            .ok_or(OpError::EngineNotFound(EngineType::PURE))
    }
}

impl Default for EngineRegistry {
    fn default() -> EngineRegistry {
        EngineRegistry::new()
    }
}

/// Return the process-wide engine registry.
///
/// On first use this is created with the built-in engines, preferring the
/// engine named by the `NDKIT_ENGINE` environment variable as the default.
pub fn registry() -> &'static EngineRegistry {
    static REGISTRY: OnceLock<EngineRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        EngineRegistry::with_builtin_engines().with_preferred_engine(env_string(ENGINE_VAR))
    })
}

/// Return the default engine of the process-wide registry.
pub fn engine() -> Result<&'static dyn Engine, OpError> {
    registry().resolve_default().map(|engine| engine.as_ref())
}

pub fn math_engine() -> Result<&'static dyn Math, OpError> {
    engine().map(|engine| engine.math())
}

pub fn linalg_engine() -> Result<&'static dyn LinAlg, OpError> {
    engine().map(|engine| engine.linalg())
}

pub fn stat_engine() -> Result<&'static dyn Statistics, OpError> {
    engine().map(|engine| engine.stat())
}

/// Fix the default engine of the process-wide registry.
///
/// See [`EngineRegistry::set_default_engine`].
pub fn set_default_engine(engine_type: EngineType) -> Result<(), OpError> {
    registry().set_default_engine(engine_type)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::EngineRegistry;
    use crate::engine::{Engine, EngineType, LinAlg, Math, Statistics};
    use crate::engines::PureEngine;
    use crate::errors::OpError;

    /// Engine registered under a custom type which delegates to the pure
    /// engine.
    #[derive(Debug, Default)]
    struct CustomEngine {
        pure: PureEngine,
    }

    impl Engine for CustomEngine {
        fn engine_type(&self) -> EngineType {
            EngineType::new("custom")
        }

        fn math(&self) -> &dyn Math {
            &self.pure
        }

        fn linalg(&self) -> &dyn LinAlg {
            &self.pure
        }

        fn stat(&self) -> &dyn Statistics {
            &self.pure
        }
    }

    fn same_engine(a: &Arc<dyn Engine>, b: &Arc<dyn Engine>) -> bool {
        Arc::as_ptr(a) as *const u8 == Arc::as_ptr(b) as *const u8
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = EngineRegistry::new();
        assert_eq!(
            registry.resolve(EngineType::PURE).err(),
            Some(OpError::EngineNotFound(EngineType::PURE))
        );
        assert!(registry.resolve_default().is_err());

        let pure: Arc<dyn Engine> = Arc::new(PureEngine::new());
        assert!(registry.register(pure.clone()));
        assert!(!registry.register(Arc::new(PureEngine::new())));
        assert_eq!(registry.engines().len(), 1);

        let resolved = registry.resolve(EngineType::PURE).unwrap();
        assert!(same_engine(&resolved, &pure));
        assert!(same_engine(registry.resolve_default().unwrap(), &pure));
    }

    #[test]
    fn test_default_preference() {
        let registry = EngineRegistry::with_builtin_engines();
        assert_eq!(
            registry.resolve_default().unwrap().engine_type(),
            EngineType::PARALLEL
        );

        let registry =
            EngineRegistry::with_builtin_engines().with_preferred_engine(Some("pure".into()));
        assert_eq!(
            registry.resolve_default().unwrap().engine_type(),
            EngineType::PURE
        );

        let registry =
            EngineRegistry::with_builtin_engines().with_preferred_engine(Some("missing".into()));
        assert_eq!(
            registry.resolve_default().unwrap().engine_type(),
            EngineType::PARALLEL
        );

        let registry = EngineRegistry::new();
        registry.register(Arc::new(CustomEngine::default()));
        assert_eq!(
            registry.resolve_default().unwrap().name(),
            "custom"
        );
    }

    #[test]
    fn test_set_default_engine() {
        let registry = EngineRegistry::with_builtin_engines();
        registry.register(Arc::new(CustomEngine::default()));

        assert_eq!(
            registry.set_default_engine(EngineType::new("other")),
            Err(OpError::EngineNotFound(EngineType::new("other")))
        );
        assert_eq!(
            registry.set_default_engine(EngineType::new("custom")),
            Ok(())
        );
        assert_eq!(
            registry.resolve_default().unwrap().engine_type(),
            EngineType::new("custom")
        );
        assert_eq!(
            registry.set_default_engine(EngineType::PURE),
            Err(OpError::DefaultEngineAlreadyResolved)
        );
    }

    #[test]
    fn test_concurrent_default_resolution() {
        let registry = EngineRegistry::with_builtin_engines();

        let resolved: Vec<Arc<dyn Engine>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| s.spawn(|| registry.resolve_default().map(|e| e.clone())))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap().unwrap())
                .collect()
        });

        assert!(resolved.iter().all(|e| same_engine(e, &resolved[0])));
    }
}
