// Domain layer: request, prediction and catalog types plus the response envelopes.
// Serde only; no calculation lives here.

pub mod model;
pub mod response;
