//! Domain value objects - Immutable objects defined by their attributes

mod persona;

pub use persona::{Persona, PersonaRegistry};
