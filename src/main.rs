#![windows_subsystem = "windows"]

#[cfg(windows)]
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Exactly one instance owns the tray icon and the preference file.
    audio_switcher_rs::platform::instance::terminate_other_instances();

    audio_switcher_rs::app::run()
}

#[cfg(not(windows))]
fn main() {
    eprintln!("audio-switcher-rs only runs on Windows");
    std::process::exit(1);
}
