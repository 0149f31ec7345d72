// handlers/protected/mod.rs - endpoints behind `require_session`
//
// Each handler receives the resolved `Actor`, already-validated input from
// `ValidatedJson` / `ValidatedQuery`, and hands both to its service.
pub mod appointments;
pub mod locations;
pub mod pets;
pub mod professionals;
