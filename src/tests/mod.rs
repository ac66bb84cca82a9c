// Test modules for Netpresence
// Shared fakes live in `fakes`; each other module covers one area of the crate


mod poll_tests;
mod probe_tests;
mod tui_tests;
