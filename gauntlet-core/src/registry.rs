//! A registry of generator factories keyed by type.
//!
//! Factories are looked up by [`TypeId`] and may resolve the generators of
//! other types through the [`Resolver`] they are handed, so composite
//! generators are assembled from registered parts. Resolution tracks the
//! types it is in the middle of building and reports a cycle instead of
//! recursing forever.

use crate::error::{GauntletError, Result};
use crate::gen::Gen;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

type Factory = Rc<dyn Fn(&mut Resolver<'_>) -> Result<Box<dyn Any>>>;

struct Entry {
    type_name: &'static str,
    factory: Factory,
}

#[derive(Default)]
pub struct GenRegistry {
    entries: HashMap<TypeId, Entry>,
}

impl GenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with generators for `bool`, `char`, `String` and the
    /// primitive integers.
    pub fn with_defaults() -> Self {
        let mut registry = GenRegistry::new();
        registry.register_gen(Gen::bool());
        registry.register_gen(Gen::<i8>::integer().build());
        registry.register_gen(Gen::<i16>::integer().build());
        registry.register_gen(Gen::<i32>::integer().build());
        registry.register_gen(Gen::<i64>::integer().build());
        registry.register_gen(Gen::<u8>::integer().build());
        registry.register_gen(Gen::<u16>::integer().build());
        registry.register_gen(Gen::<u32>::integer().build());
        registry.register_gen(Gen::<u64>::integer().build());
        registry.register_gen(Gen::<usize>::integer().build());
        registry.register_gen(Gen::ascii_alphanumeric());
        registry.register::<String, _>(|resolver| Ok(Gen::string_of(resolver.resolve::<char>()?)));
        registry
    }

    /// Register a factory for `T`, replacing any previous one.
    pub fn register<T, F>(&mut self, factory: F)
    where
        T: Clone + 'static,
        F: Fn(&mut Resolver<'_>) -> Result<Gen<T>> + 'static,
    {
        self.entries.insert(
            TypeId::of::<T>(),
            Entry {
                type_name: type_name::<T>(),
                factory: Rc::new(move |resolver: &mut Resolver<'_>| {
                    factory(resolver).map(|gen| Box::new(gen) as Box<dyn Any>)
                }),
            },
        );
    }

    /// Register a ready-made generator for `T`.
    pub fn register_gen<T>(&mut self, gen: Gen<T>)
    where
        T: Clone + 'static,
    {
        self.register::<T, _>(move |_| Ok(gen.clone()));
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    pub fn resolve<T>(&self) -> Result<Gen<T>>
    where
        T: Clone + 'static,
    {
        Resolver {
            registry: self,
            visiting: Vec::new(),
        }
        .resolve()
    }
}

/// Resolution in progress, handed to factories.
pub struct Resolver<'a> {
    registry: &'a GenRegistry,
    visiting: Vec<(TypeId, &'static str)>,
}

impl Resolver<'_> {
    pub fn resolve<T>(&mut self) -> Result<Gen<T>>
    where
        T: Clone + 'static,
    {
        let id = TypeId::of::<T>();
        let name = type_name::<T>();

        if let Some(start) = self.visiting.iter().position(|(visiting, _)| *visiting == id) {
            let mut path: Vec<String> = self.visiting[start..]
                .iter()
                .map(|(_, name)| name.to_string())
                .collect();
            path.push(name.to_string());
            return Err(GauntletError::CircularReference { path });
        }

        let registry = self.registry;
        let entry = registry
            .entries
            .get(&id)
            .ok_or_else(|| GauntletError::UnregisteredType {
                type_name: name.to_string(),
            })?;

        debug!(type_name = entry.type_name, depth = self.visiting.len(), "resolving generator");
        self.visiting.push((id, entry.type_name));
        let built = (entry.factory)(self);
        self.visiting.pop();

        built?.downcast::<Gen<T>>().map(|gen| *gen).map_err(|_| {
            GauntletError::generator(
                "GenRegistry",
                format!("factory for {name} produced a generator of another type"),
            )
        })
    }
}
