//! Progress reporting on the terminal

pub mod reporter;
