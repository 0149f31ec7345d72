// handlers/mod.rs - two security tiers
//
// public:    no session required (service info, health, /api/auth/*)
// protected: session cookie resolved into an Actor by `require_session`
pub mod protected;
pub mod public;
