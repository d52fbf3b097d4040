fn main() {
    // Only espidf builds need the ESP-IDF build environment exported.
    // Host builds (tests, clippy) must work without a toolchain install.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
