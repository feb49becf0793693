use std::sync::Arc;

use thiserror::Error;

use crate::builtins::{ClapHands, RightHandUp, TwoHandsBottom, TwoHandsUp};
use crate::gesture::Gesture;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// First registration wins; re-adding a name is reported, never silently
    /// merged.
    #[error("gesture \"{0}\" is already registered")]
    AlreadyRegistered(String),
    #[error("gesture \"{0}\" is not registered")]
    UnknownGesture(String),
}

/// An ordered collection of gesture definitions, unique by name.
///
/// Insertion order is preserved and is the dispatch order of the engine, so
/// subscribers see a reproducible event ordering for a given frame sequence.
#[derive(Default)]
pub struct GestureCatalog {
    gestures: Vec<Arc<dyn Gesture>>,
}

impl GestureCatalog {
    pub fn new() -> Self {
        GestureCatalog::default()
    }

    pub fn add(&mut self, gesture: Arc<dyn Gesture>) -> Result<(), CatalogError> {
        if self.contains(gesture.name()) {
            return Err(CatalogError::AlreadyRegistered(gesture.name().to_owned()));
        }
        self.gestures.push(gesture);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Arc<dyn Gesture>, CatalogError> {
        let index = self
            .gestures
            .iter()
            .position(|gesture| gesture.name() == name)
            .ok_or_else(|| CatalogError::UnknownGesture(name.to_owned()))?;
        Ok(self.gestures.remove(index))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.gestures.iter().any(|gesture| gesture.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Gesture>> {
        self.gestures.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.gestures.iter().map(|gesture| gesture.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }
}

/// Builds the gesture set an engine starts with, swappable without touching
/// the dispatcher.
pub trait GestureFactory {
    fn create_gestures(&self) -> Vec<Arc<dyn Gesture>>;
}

/// The default catalog: the three built-in postures plus ClapHands.
pub struct AllGesturesFactory;

impl GestureFactory for AllGesturesFactory {
    fn create_gestures(&self) -> Vec<Arc<dyn Gesture>> {
        vec![
            Arc::new(RightHandUp),
            Arc::new(TwoHandsUp),
            Arc::new(TwoHandsBottom),
            Arc::new(ClapHands),
        ]
    }
}
