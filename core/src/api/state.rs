//! # Generation State
//!
//! The identifier-indexed side table that lets any model node resolve a
//! weak reference to any other node. One `State` exists per generation run,
//! is passed explicitly everywhere resolution is needed, and is discarded
//! with the run. There is deliberately no global instance so independent
//! runs can execute in parallel.

use crate::api::{Api, Enum, Message, Method};
use crate::error::{AppError, AppResult};
use indexmap::IndexMap;

/// Identifier-indexed lookup tables for one generation run.
///
/// Entries are indexed copies of the model entities; the owned model tree is
/// never mutated after the state is built, so the copies cannot go stale.
/// Insertion order is preserved, keeping every traversal deterministic.
#[derive(Debug, Clone, Default)]
pub struct State {
    messages: IndexMap<String, Message>,
    enums: IndexMap<String, Enum>,
    methods: IndexMap<String, Method>,
    well_known_loaded: bool,
}

impl State {
    /// Indexes every message, enum and method reachable from the API root.
    ///
    /// Fails if two entities share an identifier; identifiers must be unique
    /// within one generation run.
    pub fn build(api: &Api) -> AppResult<State> {
        let mut state = State::default();
        for message in &api.messages {
            state.register_message(message)?;
        }
        for enumz in &api.enums {
            state.register_enum(enumz)?;
        }
        for service in &api.services {
            for method in &service.methods {
                state.register_method(method)?;
            }
        }
        Ok(state)
    }

    /// Registers a message and, recursively, its nested messages and enums.
    pub fn register_message(&mut self, message: &Message) -> AppResult<()> {
        if self
            .messages
            .insert(message.id.clone(), message.clone())
            .is_some()
        {
            return Err(AppError::General(format!(
                "duplicate message id '{}'",
                message.id
            )));
        }
        for nested in &message.messages {
            self.register_message(nested)?;
        }
        for enumz in &message.enums {
            self.register_enum(enumz)?;
        }
        Ok(())
    }

    /// Registers an enum.
    pub fn register_enum(&mut self, enumz: &Enum) -> AppResult<()> {
        if self.enums.insert(enumz.id.clone(), enumz.clone()).is_some() {
            return Err(AppError::General(format!(
                "duplicate enum id '{}'",
                enumz.id
            )));
        }
        Ok(())
    }

    /// Registers a method.
    pub fn register_method(&mut self, method: &Method) -> AppResult<()> {
        if self
            .methods
            .insert(method.id.clone(), method.clone())
            .is_some()
        {
            return Err(AppError::General(format!(
                "duplicate method id '{}'",
                method.id
            )));
        }
        Ok(())
    }

    /// Registers a well-known message only if it is not already present.
    ///
    /// Used by [`crate::codec::Codec::load_well_known_types`]; a parser that
    /// already loaded the type wins.
    pub fn register_well_known(&mut self, message: Message) {
        self.messages.entry(message.id.clone()).or_insert(message);
    }

    /// Resolves a message identifier.
    ///
    /// `referrer` names the entity holding the reference so a failure can
    /// report both ends of the dangling link.
    pub fn resolve_message(&self, id: &str, referrer: &str) -> AppResult<&Message> {
        self.messages.get(id).ok_or_else(|| AppError::Reference {
            id: id.to_string(),
            referrer: referrer.to_string(),
        })
    }

    /// Resolves an enum identifier.
    pub fn resolve_enum(&self, id: &str, referrer: &str) -> AppResult<&Enum> {
        self.enums.get(id).ok_or_else(|| AppError::Reference {
            id: id.to_string(),
            referrer: referrer.to_string(),
        })
    }

    /// Resolves a method identifier.
    pub fn resolve_method(&self, id: &str, referrer: &str) -> AppResult<&Method> {
        self.methods.get(id).ok_or_else(|| AppError::Reference {
            id: id.to_string(),
            referrer: referrer.to_string(),
        })
    }

    /// Marks the well-known types as loaded.
    ///
    /// Returns true on the first call of a run and false afterwards, making
    /// [`crate::codec::Codec::load_well_known_types`] idempotent.
    pub fn start_well_known_load(&mut self) -> bool {
        if self.well_known_loaded {
            false
        } else {
            self.well_known_loaded = true;
            true
        }
    }
}
