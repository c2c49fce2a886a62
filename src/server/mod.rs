// Server module entry point
// Listener creation, accept loop and per-connection tasks

pub mod connection;
pub mod listener;

// `loop` is a keyword, so the file is mounted as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::start_server_loop;
