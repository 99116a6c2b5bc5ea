fn main() {
    // ESP-IDF link arguments are only meaningful for the firmware target.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
