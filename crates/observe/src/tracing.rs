use {
    std::{io::IsTerminal, panic::PanicHookInfo, sync::Once},
    tracing_subscriber::EnvFilter,
};

/// Initializes the tracing setup that is shared between the binaries.
/// `env_filter` has similar syntax to env_logger. It is documented at
/// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
pub fn initialize(env_filter: &str) {
    set_tracing_subscriber(env_filter);
    std::panic::set_hook(Box::new(tracing_panic_hook));
}

/// Like [`initialize`], but can be called multiple times in a row. Later
/// calls are ignored.
///
/// Useful for tests.
pub fn initialize_reentrant(env_filter: &str) {
    // The tracing subscriber below is a global object so initializing it again
    // in the same process by a different thread would fail.
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        set_tracing_subscriber(env_filter);
        std::panic::set_hook(Box::new(tracing_panic_hook));
    });
}

fn set_tracing_subscriber(env_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_ansi(std::io::stdout().is_terminal())
        .init();
}

/// Panic hook that prints roughly the same message as the default panic hook
/// but uses tracing::error instead of stderr, so panics show up with the
/// proper log format.
fn tracing_panic_hook(panic: &PanicHookInfo) {
    let thread = std::thread::current();
    let name = thread.name().unwrap_or("<unnamed>");
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!("thread '{name}' {panic}\nstack backtrace:\n{backtrace}");
}
