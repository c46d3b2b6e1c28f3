//! Greeting served by the demo `hello` query.

/// Returns the demo greeting.
pub fn hello_world() -> String {
    "Hello world!".to_string()
}
