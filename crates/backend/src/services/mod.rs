//! Business services.
//!
//! Each service defines the backend seam it needs as a trait, implemented
//! by [`crate::supabase::SupabaseClient`] for production and by in-memory
//! fakes in tests. Services never reach for a global client; the caller
//! injects one.

pub mod accounts;
pub mod admin;
pub mod seeder;
pub mod stores;
