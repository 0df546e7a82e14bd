mod config_tests;
mod fetch_tests;
mod normalizer_tests;
mod utils;
