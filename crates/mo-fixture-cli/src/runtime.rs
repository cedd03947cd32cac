//! Runtime that does not wait on blocking threads at exit.
//!
//! `tokio::io::stdin` reads on a blocking thread that cannot be cancelled.
//! After Ctrl-C that read would otherwise keep the process alive until the
//! operator presses Enter.

use std::future::Future;

/// Run `future` to completion on a fresh multi-threaded runtime, then shut
/// the runtime down without joining outstanding blocking tasks.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built.
pub fn block_on_detached<F: Future>(future: F) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}
