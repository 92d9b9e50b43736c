pub mod app;
pub mod config;
pub mod emit;
pub mod errors;
pub mod ingest;
pub mod sqs;
pub mod transform;
pub mod types;
pub mod util;
// Configure a global allocator optimized for throughput.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
