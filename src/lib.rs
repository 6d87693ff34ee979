//! Sidero Valley - Field Epidemiology Outbreak Investigation Simulation
//!
//! A hidden truth population (`truth`) is generated once per seed. The player
//! sees it only through the disclosure layer and the village contacts, and
//! their progress lives in a per-player `session::SessionState`.

pub mod core;
pub mod disclosure;
pub mod llm;
pub mod npc;
pub mod session;
pub mod study;
pub mod truth;
