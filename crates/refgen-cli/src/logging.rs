//! Subscriber setup. `RUST_LOG` is honoured; `--trace` raises refgen targets
//! to `debug` on top of it.

use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const TRACE_DIRECTIVES: [&str; 2] = ["refgen=debug", "refgen_lib=debug"];

pub fn init(trace: bool) {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if trace {
        for directive in TRACE_DIRECTIVES {
            if let Ok(directive) = directive.parse::<Directive>() {
                filter = filter.add_directive(directive);
            }
        }
    }

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
