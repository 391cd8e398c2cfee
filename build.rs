fn main() {
    // embuild exports ESP-IDF include/link arguments for on-device builds.
    // Host-target builds (tests, fuzzing) skip it — the env var is only set
    // when the `espidf` feature is enabled.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
