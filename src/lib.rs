pub mod analysis;
pub mod chat_gateway;
pub mod completion;
pub mod fallback;
pub mod http_client;
pub mod play;
pub mod provider;
pub mod state;
pub mod supabase_fetch;
pub mod transform;
