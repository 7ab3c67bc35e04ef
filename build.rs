fn main() {
    // ESP-IDF toolchain environment is only needed for the on-target build.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
