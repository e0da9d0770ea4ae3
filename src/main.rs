// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxdock-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxdock and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mxdock server binary.
//!
//! Serves the diagram store API and raw document files over HTTP at
//! `http://127.0.0.1:<port>/`. The embedding page drives the editor iframe
//! and calls back into these endpoints.

use std::error::Error;

use mxdock::store::DocumentFolder;
use tracing_subscriber::EnvFilter;

const DEFAULT_HTTP_PORT: u16 = 27436;
const DEFAULT_ROOT_DIR: &str = "./diagrams";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<root-dir>] [--http-port <port>]\n  {program} [--root <dir>] [--http-port <port>]\n\nServes the diagram store at `http://127.0.0.1:<port>/`.\n--http-port selects the port (0 = ephemeral; default {DEFAULT_HTTP_PORT}).\n\nIf root-dir/--root is omitted, `{DEFAULT_ROOT_DIR}` is used and created on demand."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    root_dir: Option<String>,
    http_port: Option<u16>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--root" => {
                if options.root_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.root_dir = Some(dir);
            }
            "--http-port" => {
                if options.http_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.http_port = Some(port);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.root_dir.is_some() {
                    return Err(());
                }
                options.root_dir = Some(arg);
            }
        }
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "mxdock".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();

        let root = options.root_dir.unwrap_or_else(|| DEFAULT_ROOT_DIR.to_owned());
        let port = options.http_port.unwrap_or(DEFAULT_HTTP_PORT);
        let folder = DocumentFolder::new(&root);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
            let bound = listener.local_addr()?;
            tracing::info!(root = %root, addr = %bound, "serving diagram store");

            let router = mxdock::http::router(folder);
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("mxdock: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_root_flag() {
        let options = parse_options(["--root".to_owned(), "some/dir".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.root_dir.as_deref(), Some("some/dir"));
        assert_eq!(options.http_port, None);
    }

    #[test]
    fn parses_positional_root_dir() {
        let options = parse_options(["some/dir".to_owned()].into_iter()).expect("parse options");
        assert_eq!(options.root_dir.as_deref(), Some("some/dir"));
    }

    #[test]
    fn parses_http_port() {
        let options = parse_options(["--http-port".to_owned(), "1234".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.http_port, Some(1234));
    }

    #[test]
    fn parses_flags_in_any_order() {
        let options = parse_options(
            ["--http-port".to_owned(), "0".to_owned(), "some/dir".to_owned()].into_iter(),
        )
        .expect("parse options");
        assert_eq!(options.root_dir.as_deref(), Some("some/dir"));
        assert_eq!(options.http_port, Some(0));
    }

    #[test]
    fn rejects_unknown_args() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_unparseable_port() {
        parse_options(["--http-port".to_owned(), "a-lot".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse_options(
            ["--root".to_owned(), ".".to_owned(), "--root".to_owned(), "other".to_owned()]
                .into_iter(),
        )
        .unwrap_err();

        parse_options(
            [
                "--http-port".to_owned(),
                "1".to_owned(),
                "--http-port".to_owned(),
                "2".to_owned(),
            ]
            .into_iter(),
        )
        .unwrap_err();
    }

    #[test]
    fn rejects_multiple_positional_root_dirs() {
        parse_options(["one".to_owned(), "two".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_positional_root_dir_with_root_flag() {
        parse_options(["--root".to_owned(), "one".to_owned(), "two".to_owned()].into_iter())
            .unwrap_err();
    }

    #[test]
    fn rejects_missing_values() {
        parse_options(["--root".to_owned()].into_iter()).unwrap_err();
        parse_options(["--http-port".to_owned()].into_iter()).unwrap_err();
    }
}
