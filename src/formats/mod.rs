//! Serialization formats: the flat record format and the OFX interchange
//! document

pub mod ofx;
pub mod record;
