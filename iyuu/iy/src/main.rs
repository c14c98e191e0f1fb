#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

//! iy is a command line application based on IYUU API.
//!
//! If IYUU token is "token",
//!
//! ```
//! $ iy -t token -T title -m content
//! ```
//!
//! Or you can set environment variable instead, and pipe content from standard input,
//!
//! ```
//! $ export IYUU_TOKEN=token
//! $ echo content | iy -T title
//! ```
//!
//! For more information,
//!
//! ```
//! $ iy -h
//! ```

use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use log::{debug, Level};
use logging_timer::{finish, stimer};

use iyuu::{Client, DEFAULT_BASE_URL};

#[doc(hidden)]
#[derive(Debug, Parser)]
#[clap(about, author, version)]
struct Opts {
    /// IYUU token, the part before ".send" in your IYUU URL.
    #[clap(short, long, env = "IYUU_TOKEN")]
    token: String,
    /// Notification title.
    #[clap(short = 'T', long)]
    title: String,
    /// Notification content. Read from standard input if omitted and standard input is not a terminal.
    #[clap(short, long)]
    message: Option<String>,
    /// Verbose.
    #[clap(short, long)]
    verbose: bool,
    /// Timeout of the request in seconds.
    #[clap(long, env = "IYUU_TIMEOUT")]
    timeout: Option<u64>,
    /// Base URL of IYUU API.
    #[clap(long, env = "IYUU_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[doc(hidden)]
fn main() -> anyhow::Result<()> {
    use std::io::Read as _;

    pretty_env_logger::init();

    let opts: Opts = Opts::parse();

    let mut builder = Client::builder(&opts.token).base_url(&opts.base_url);
    if let Some(t) = opts.timeout {
        builder = builder.timeout(Duration::from_secs(t));
    }
    let client = builder.build()?;

    let message = if let Some(ref m) = opts.message {
        m.clone()
    } else if atty::isnt(atty::Stream::Stdin) {
        debug!("load content from standard input");
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        String::new()
    };

    let tmr = stimer!(Level::Debug; "NOTIFY");
    let res = client.send(&opts.title, &message);
    finish!(tmr);

    let json = serde_json::to_string(&res)?;
    if !res.is_success() {
        bail!(json);
    } else if opts.verbose {
        println!("{json}");
    }
    Ok(())
}
